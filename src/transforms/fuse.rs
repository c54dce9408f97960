//! `fuse`: collapse linear chains of single-occurrence dependencies.
//!
//! A key `dep` fuses into a key `consumer` iff `dep` occurs exactly once
//! anywhere in the whole graph, and that one occurrence is the *only*
//! key-reference anywhere in `consumer`'s value. This is symmetric in what
//! kind of value `dep` holds: a literal, an alias, or a task are all
//! equally fusible by this rule. A key referenced twice by the same
//! consumer (`(add, 'b', 'b')`) never fuses, and a consumer depending on
//! two distinct keys never absorbs either of them — it is this occurrence
//! rule, not a literal/task distinction, that keeps `a` and `b` separate in
//! `(add, 'a', 'b')`-shaped chains.

use crate::error::Error;
use crate::key::Key;
use crate::value::{Graph, Task, Value};
use std::collections::{HashMap, HashSet};

/// Inlines any key whose sole reference is the sole dependency of its
/// consumer, collapsing linear chains to a fixed point. Equivalent to
/// `fuse_retaining(graph, &HashSet::new())`.
pub fn fuse(graph: &Graph) -> Result<Graph, Error> {
    fuse_retaining(graph, &HashSet::new())
}

/// Like [`fuse`], but keys in `retain` are never removed, even when they
/// would otherwise be eligible to fuse into their consumer.
pub fn fuse_retaining(graph: &Graph, retain: &HashSet<Key>) -> Result<Graph, Error> {
    let mut current = graph.clone();
    let mut fused = 0usize;

    loop {
        let before = current.len();
        let degrees = Degrees::compute(&current);
        let candidate = degrees
            .sole_dependency
            .iter()
            .find(|(consumer, dep)| {
                *consumer != *dep
                    && !retain.contains(*dep)
                    && degrees.out_degree.get(*dep).copied().unwrap_or(0) == 1
            })
            .map(|(consumer, dep)| (consumer.clone(), dep.clone()));

        let Some((consumer, dep)) = candidate else {
            break;
        };

        current = fuse_pair(current, &dep, &consumer);
        fused += 1;

        if current.len() >= before {
            return Err(Error::NonTerminating);
        }
    }

    log::debug!("fuse: collapsed {fused} keys");
    Ok(current)
}

/// Per-key occurrence degrees, computed fresh after every fusion since
/// absorbing one key's value into another can change the occurrence counts
/// of everything that value itself referenced.
struct Degrees {
    /// Total occurrences of each key anywhere else in the graph.
    out_degree: HashMap<Key, usize>,
    /// For a consumer whose value contains exactly one key-reference in
    /// total, that reference's key.
    sole_dependency: HashMap<Key, Key>,
}

impl Degrees {
    fn compute(graph: &Graph) -> Self {
        let mut out_degree: HashMap<Key, usize> = graph.keys().map(|k| (k.clone(), 0)).collect();
        let mut sole_dependency = HashMap::new();

        for (key, value) in graph {
            let mut occurrences = HashMap::new();
            count_occurrences(graph, value, &mut occurrences);

            for (referenced, count) in &occurrences {
                *out_degree.entry(referenced.clone()).or_insert(0) += count;
            }

            if occurrences.len() == 1 {
                let (dep, count) = occurrences.into_iter().next().unwrap();
                if count == 1 {
                    sole_dependency.insert(key.clone(), dep);
                }
            }
        }

        Degrees {
            out_degree,
            sole_dependency,
        }
    }
}

fn count_occurrences(graph: &Graph, value: &Value, out: &mut HashMap<Key, usize>) {
    match value {
        Value::Literal(_) => {}
        Value::Key(key) => {
            if graph.contains_key(key) {
                *out.entry(key.clone()).or_insert(0) += 1;
            }
        }
        Value::Seq(items) => {
            for item in items {
                count_occurrences(graph, item, out);
            }
        }
        Value::Task(task) => {
            for arg in &task.args {
                count_occurrences(graph, arg, out);
            }
        }
    }
}

fn substitute_single(value: &Value, key: &Key, replacement: &Value) -> Value {
    match value {
        Value::Key(k) if k == key => replacement.clone(),
        Value::Key(_) | Value::Literal(_) => value.clone(),
        Value::Seq(items) => Value::Seq(
            items
                .iter()
                .map(|item| substitute_single(item, key, replacement))
                .collect(),
        ),
        Value::Task(task) => Value::Task(Task {
            operator: task.operator.clone(),
            args: task
                .args
                .iter()
                .map(|arg| substitute_single(arg, key, replacement))
                .collect(),
        }),
    }
}

fn fuse_pair(mut graph: Graph, dep: &Key, consumer: &Key) -> Graph {
    let dep_value = graph
        .get(dep)
        .cloned()
        .expect("fusible dependency must exist in the graph");
    let consumer_value = graph
        .get(consumer)
        .cloned()
        .expect("consumer key must exist in the graph");
    let rewritten = substitute_single(&consumer_value, dep, &dep_value);
    graph.insert(consumer.clone(), rewritten);
    graph.remove(dep);
    graph
}
