//! `equivalent`, `sync_vars`, `merge_sync`: comparing and merging graphs
//! that may use different key names for the same computation.

use crate::depth::depth_map;
use crate::error::Error;
use crate::key::Key;
use crate::literal::literals_equivalent;
use crate::value::{Graph, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Structural equality between two values up to key renaming.
///
/// `mapping` is keyed by names found in `b`, each mapped to the name it is
/// expected to correspond to in `a`. A key in `b` with no entry in
/// `mapping` must equal the corresponding key in `a` literally. Literals
/// are compared with [`literals_equivalent`].
pub fn equivalent(a: &Value, b: &Value, mapping: &HashMap<Key, Key>) -> bool {
    match (a, b) {
        (Value::Literal(x), Value::Literal(y)) => literals_equivalent(x.as_ref(), y.as_ref()),
        (Value::Key(x), Value::Key(y)) => match mapping.get(y) {
            Some(expected) => expected == x,
            None => x == y,
        },
        (Value::Seq(xs), Value::Seq(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| equivalent(x, y, mapping))
        }
        (Value::Task(x), Value::Task(y)) => {
            x.operator == y.operator
                && x.args.len() == y.args.len()
                && x.args.iter().zip(&y.args).all(|(p, q)| equivalent(p, q, mapping))
        }
        _ => false,
    }
}

/// Finds a best-effort correspondence between `b`'s keys and `a`'s keys:
/// for every key of `b`, an `a` key whose value is [`equivalent`] under the
/// mapping built so far.
///
/// Processes both graphs in increasing topological depth (leaves first,
/// via [`depth_map`]) so that a match found at a shallower depth is
/// available when checking equivalence of the keys that depend on it.
/// Within a depth level, keys are tried in sorted order for a
/// deterministic result when more than one candidate would match — the
/// source material only ever exercises graphs where this doesn't arise.
pub fn sync_vars(a: &Graph, b: &Graph) -> Result<HashMap<Key, Key>, Error> {
    let depth_a = depth_map(a)?;
    let depth_b = depth_map(b)?;

    let by_depth_a = group_by_depth(&depth_a);
    let by_depth_b = group_by_depth(&depth_b);

    let mut mapping: HashMap<Key, Key> = HashMap::new();
    let mut unmatched_a: BTreeSet<Key> = a.keys().cloned().collect();

    for (depth, keys_b) in &by_depth_b {
        let Some(keys_a) = by_depth_a.get(depth) else {
            continue;
        };
        for key_b in keys_b {
            let candidate = keys_a
                .iter()
                .filter(|key_a| unmatched_a.contains(*key_a))
                .find(|key_a| equivalent(&a[*key_a], &b[key_b], &mapping))
                .cloned();
            if let Some(key_a) = candidate {
                mapping.insert(key_b.clone(), key_a.clone());
                unmatched_a.remove(&key_a);
            }
        }
    }

    Ok(mapping)
}

fn group_by_depth(depth: &HashMap<Key, usize>) -> BTreeMap<usize, BTreeSet<Key>> {
    let mut grouped: BTreeMap<usize, BTreeSet<Key>> = BTreeMap::new();
    for (key, level) in depth {
        grouped.entry(*level).or_default().insert(key.clone());
    }
    grouped
}

/// Merges `b` into `a`: every key of `b` that [`sync_vars`] matched to a key
/// of `a` is dropped (it is redundant with its `a` counterpart), and every
/// unmatched key of `b` is kept, with its references to matched keys
/// rewritten to point at their `a` counterpart.
///
/// An unmatched key of `b` that happens to share a name with a key already
/// present in `a` (the two graphs are under no obligation to use disjoint
/// names) is renamed to the smallest `"{key}__{n}"`, `n >= 1`, not already
/// taken by `a` or by another renamed key of `b` — a straight insert would
/// silently overwrite the `a` entry and corrupt anything in `a` that still
/// depends on it by that name.
pub fn merge_sync(a: &Graph, b: &Graph) -> Result<Graph, Error> {
    let mapping = sync_vars(a, b)?;
    let mut result = a.clone();

    let unmatched: BTreeSet<Key> = b
        .keys()
        .filter(|key| !mapping.contains_key(*key))
        .cloned()
        .collect();

    let mut rename: HashMap<Key, Key> = HashMap::new();
    for key_b in &unmatched {
        let mut candidate = key_b.clone();
        let mut n = 1usize;
        while result.contains_key(&candidate) || rename.values().any(|taken| taken == &candidate) {
            candidate = Key::from(format!("{key_b}__{n}"));
            n += 1;
        }
        rename.insert(key_b.clone(), candidate);
    }

    let mut full_mapping = mapping;
    full_mapping.extend(rename.iter().map(|(k, v)| (k.clone(), v.clone())));

    for key_b in &unmatched {
        let final_key = &rename[key_b];
        result.insert(final_key.clone(), redirect(&b[key_b], &full_mapping));
    }

    Ok(result)
}

fn redirect(value: &Value, mapping: &HashMap<Key, Key>) -> Value {
    match value {
        Value::Literal(_) => value.clone(),
        Value::Key(key) => match mapping.get(key) {
            Some(target) => Value::Key(target.clone()),
            None => value.clone(),
        },
        Value::Seq(items) => Value::Seq(items.iter().map(|item| redirect(item, mapping)).collect()),
        Value::Task(task) => Value::Task(crate::value::Task {
            operator: task.operator.clone(),
            args: task.args.iter().map(|arg| redirect(arg, mapping)).collect(),
        }),
    }
}
