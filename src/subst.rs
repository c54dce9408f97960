//! Shared substitution helper used by [`crate::inline`] and
//! [`crate::inline_functions`].
//!
//! Both transformations are instances of the same operation: given a set of
//! selected keys, replace every reference to one of them, anywhere in the
//! graph, with that key's own (recursively resolved) value, then drop the
//! selected keys.

use crate::error::Error;
use crate::key::Key;
use crate::value::{Graph, Task, Value};
use std::collections::{HashMap, HashSet};

/// Replaces every reference to a key in `selected` within `value` with that
/// key's resolved value, recursively.
pub fn substitute(
    graph: &Graph,
    value: &Value,
    selected: &HashSet<Key>,
    memo: &mut HashMap<Key, Value>,
) -> Result<Value, Error> {
    let mut in_progress = HashSet::new();
    substitute_inner(graph, value, selected, memo, &mut in_progress)
}

fn substitute_inner(
    graph: &Graph,
    value: &Value,
    selected: &HashSet<Key>,
    memo: &mut HashMap<Key, Value>,
    in_progress: &mut HashSet<Key>,
) -> Result<Value, Error> {
    match value {
        Value::Key(key) if selected.contains(key) => {
            resolve(graph, key, selected, memo, in_progress)
        }
        Value::Key(_) | Value::Literal(_) => Ok(value.clone()),
        Value::Seq(items) => {
            let items = items
                .iter()
                .map(|item| substitute_inner(graph, item, selected, memo, in_progress))
                .collect::<Result<_, _>>()?;
            Ok(Value::Seq(items))
        }
        Value::Task(task) => {
            let args = task
                .args
                .iter()
                .map(|arg| substitute_inner(graph, arg, selected, memo, in_progress))
                .collect::<Result<_, _>>()?;
            Ok(Value::Task(Task {
                operator: task.operator.clone(),
                args,
            }))
        }
    }
}

fn resolve(
    graph: &Graph,
    key: &Key,
    selected: &HashSet<Key>,
    memo: &mut HashMap<Key, Value>,
    in_progress: &mut HashSet<Key>,
) -> Result<Value, Error> {
    if let Some(resolved) = memo.get(key) {
        return Ok(resolved.clone());
    }
    if !in_progress.insert(key.clone()) {
        return Err(Error::NonTerminating);
    }
    let raw = graph
        .get(key)
        .expect("selected keys for substitution must exist in the graph");
    let resolved = substitute_inner(graph, raw, selected, memo, in_progress)?;
    in_progress.remove(key);
    memo.insert(key.clone(), resolved.clone());
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key;
    use crate::operator::Operator;

    #[test]
    fn substitutes_recursively() {
        let inc = Operator::named("inc");
        let add = Operator::named("add");
        let mut graph: Graph = Graph::new();
        graph.insert(key("x"), Value::literal(1_i32));
        graph.insert(key("y"), Value::task(inc, vec![Value::key("x")]));

        let selected: HashSet<Key> = [key("x"), key("y")].into_iter().collect();
        let mut memo = HashMap::new();
        let value = Value::task(add, vec![Value::key("x"), Value::key("y")]);
        let result = substitute(&graph, &value, &selected, &mut memo).unwrap();

        match result {
            Value::Task(task) => {
                assert_eq!(task.args.len(), 2);
            }
            _ => panic!("expected a task"),
        }
    }

    #[test]
    fn detects_cyclic_selection() {
        let inc = Operator::named("inc");
        let mut graph: Graph = Graph::new();
        graph.insert(key("a"), Value::task(inc.clone(), vec![Value::key("b")]));
        graph.insert(key("b"), Value::task(inc, vec![Value::key("a")]));

        let selected: HashSet<Key> = [key("a"), key("b")].into_iter().collect();
        let mut memo = HashMap::new();
        let err = substitute(&graph, &Value::key("a"), &selected, &mut memo).unwrap_err();
        assert_eq!(err, Error::NonTerminating);
    }
}
