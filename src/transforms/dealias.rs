//! `dealias`: collapse alias chains to direct references.
//!
//! An alias chain like `b: 'a', c: 'b'` collapses so that any consumer of
//! `c` references `a` directly; `b` and `c` themselves vanish since nothing
//! needs to address them by name anymore. An alias with no consumer at all
//! (it would otherwise simply disappear, taking its key with it) is instead
//! rewritten into an explicit `identity` task pointing at its canonical
//! target, so the key survives as an addressable output.

use crate::error::Error;
use crate::key::Key;
use crate::operator::identity_operator;
use crate::value::{classify, reference_counts, Graph, Kind, Task, Value};
use std::collections::{HashMap, HashSet};

/// Rewrites every alias in `graph` to reference its canonical (non-alias)
/// target directly, dropping aliases that have become unreachable and
/// wrapping any alias that was never referenced in an explicit `identity`
/// task.
pub fn dealias(graph: &Graph) -> Result<Graph, Error> {
    let canonical = canonical_targets(graph)?;
    let counts = reference_counts(graph);

    let mut result = Graph::new();
    for (key, value) in graph {
        match classify(graph, value) {
            Kind::Alias => {
                if counts.get(key).copied().unwrap_or(0) == 0 {
                    let target = canonical[key].clone();
                    result.insert(
                        key.clone(),
                        Value::Task(Task {
                            operator: identity_operator(),
                            args: vec![Value::Key(target)],
                        }),
                    );
                }
            }
            Kind::Literal | Kind::Task => {
                result.insert(key.clone(), redirect(value, &canonical));
            }
        }
    }

    log::debug!(
        "dealias: resolved {} alias keys across {} kept entries",
        canonical.len(),
        result.len()
    );
    Ok(result)
}

/// For every key classified [`Kind::Alias`], walks the chain of aliases to
/// its ultimate non-alias target.
fn canonical_targets(graph: &Graph) -> Result<HashMap<Key, Key>, Error> {
    let mut canonical = HashMap::new();
    for key in graph.keys() {
        if classify(graph, &graph[key]) == Kind::Alias {
            resolve_chain(graph, key, &mut canonical, &mut HashSet::new())?;
        }
    }
    Ok(canonical)
}

fn resolve_chain(
    graph: &Graph,
    key: &Key,
    canonical: &mut HashMap<Key, Key>,
    in_progress: &mut HashSet<Key>,
) -> Result<Key, Error> {
    if let Some(target) = canonical.get(key) {
        return Ok(target.clone());
    }
    if classify(graph, &graph[key]) != Kind::Alias {
        return Ok(key.clone());
    }
    if !in_progress.insert(key.clone()) {
        return Err(Error::NonTerminating);
    }
    let next = match &graph[key] {
        Value::Key(next) => next.clone(),
        _ => unreachable!("classify already confirmed this is an alias"),
    };
    let target = resolve_chain(graph, &next, canonical, in_progress)?;
    in_progress.remove(key);
    canonical.insert(key.clone(), target.clone());
    Ok(target)
}

fn redirect(value: &Value, canonical: &HashMap<Key, Key>) -> Value {
    match value {
        Value::Literal(_) => value.clone(),
        Value::Key(key) => match canonical.get(key) {
            Some(target) => Value::Key(target.clone()),
            None => value.clone(),
        },
        Value::Seq(items) => Value::Seq(items.iter().map(|item| redirect(item, canonical)).collect()),
        Value::Task(task) => Value::Task(Task {
            operator: task.operator.clone(),
            args: task.args.iter().map(|arg| redirect(arg, canonical)).collect(),
        }),
    }
}
