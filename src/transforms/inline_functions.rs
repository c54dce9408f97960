//! `inline_functions`: fold away calls to a caller-designated set of cheap
//! operators.
//!
//! A conservative cousin of [`crate::inline`]: rather than inlining every
//! literal, it targets tasks whose operator the caller has declared "fast"
//! (cheap enough that paying for an extra dependency edge isn't worth it),
//! and only when folding them away actually removes a key — a key with no
//! consumer has nowhere to be inlined into and is left alone.

use crate::error::Error;
use crate::key::Key;
use crate::operator::Operator;
use crate::subst::substitute;
use crate::value::{reference_counts, Graph, Value};
use std::collections::{HashMap, HashSet};

/// Inlines every task whose operator (after unwrapping any curry/partial
/// layers) is in `fast_functions` and that has at least one consumer.
///
/// Keys named in `protect` are never inlined away, even if otherwise
/// eligible.
pub fn inline_functions(
    graph: &Graph,
    fast_functions: &HashSet<Operator>,
    protect: Option<&[Key]>,
) -> Result<Graph, Error> {
    let protect: HashSet<&Key> = protect.into_iter().flatten().collect();
    let counts = reference_counts(graph);

    let selected: HashSet<Key> = graph
        .iter()
        .filter(|(key, value)| {
            !protect.contains(key)
                && counts.get(*key).copied().unwrap_or(0) > 0
                && matches!(value, Value::Task(task) if fast_functions.contains(&task.operator.base()))
        })
        .map(|(key, _)| key.clone())
        .collect();

    let mut memo = HashMap::new();
    let mut result = Graph::new();
    for (key, value) in graph {
        if selected.contains(key) {
            continue;
        }
        let resolved = substitute(graph, value, &selected, &mut memo)?;
        result.insert(key.clone(), resolved);
    }

    log::debug!(
        "inline_functions: folded {} of {} keys",
        selected.len(),
        graph.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key;
    use crate::value::{Task, Value};

    #[test]
    fn inlines_fast_calls_with_a_consumer() {
        let inc = Operator::named("inc");
        let double = Operator::named("double");
        let add = Operator::named("add");
        let mut graph: Graph = Graph::new();
        graph.insert(key("x"), Value::literal(1_i32));
        graph.insert(key("y"), Value::literal(1_i32));
        graph.insert(key("i"), Value::task(inc.clone(), vec![Value::key("x")]));
        graph.insert(key("d"), Value::task(double, vec![Value::key("y")]));
        graph.insert(
            key("out"),
            Value::task(add, vec![Value::key("i"), Value::key("d")]),
        );

        let fast: HashSet<Operator> = [inc].into_iter().collect();
        let result = inline_functions(&graph, &fast, None).unwrap();
        assert!(!result.contains_key(&key("i")));
        assert!(result.contains_key(&key("d")));
        match &result[&key("out")] {
            Value::Task(task) => {
                assert!(matches!(task.args[0], Value::Task(_)));
                assert_eq!(task.args[1], Value::key("d"));
            }
            _ => panic!("expected a task"),
        }
    }

    #[test]
    fn unwraps_partial_applications_for_the_eligibility_check() {
        let add = Operator::named("add");
        let inc = Operator::named("inc");
        let partial_add = add.partial(1);
        let mut graph: Graph = Graph::new();
        graph.insert(key("x"), Value::literal(1_i32));
        graph.insert(key("y"), Value::literal(2_i32));
        graph.insert(
            key("a"),
            Value::Task(Task {
                operator: partial_add,
                args: vec![Value::key("x")],
            }),
        );
        graph.insert(key("b"), Value::task(inc, vec![Value::key("a")]));

        let fast: HashSet<Operator> = [add].into_iter().collect();
        let result = inline_functions(&graph, &fast, None).unwrap();
        assert!(!result.contains_key(&key("a")));
        match &result[&key("b")] {
            Value::Task(task) => assert!(matches!(task.args[0], Value::Task(_))),
            _ => panic!("expected a task"),
        }
    }

    #[test]
    fn a_fast_call_with_no_consumer_is_left_alone() {
        let inc = Operator::named("inc");
        let mut graph: Graph = Graph::new();
        graph.insert(key("y"), Value::literal(1_i32));
        graph.insert(key("x"), Value::task(inc.clone(), vec![Value::key("y")]));

        let fast: HashSet<Operator> = [inc].into_iter().collect();
        let result = inline_functions(&graph, &fast, None).unwrap();
        assert_eq!(result.len(), graph.len());
        assert!(result.contains_key(&key("x")));
        assert!(result.contains_key(&key("y")));
    }

    #[test]
    fn protected_keys_are_never_inlined() {
        let inc = Operator::named("inc");
        let mut graph: Graph = Graph::new();
        graph.insert(key("x"), Value::literal(1_i32));
        graph.insert(key("i"), Value::task(inc.clone(), vec![Value::key("x")]));
        graph.insert(key("out"), Value::task(inc, vec![Value::key("i")]));

        let fast: HashSet<Operator> = [Operator::named("inc")].into_iter().collect();
        let protect = [key("i")];
        let result = inline_functions(&graph, &fast, Some(&protect)).unwrap();
        assert!(result.contains_key(&key("i")));
    }

    #[test]
    fn traverses_into_list_arguments() {
        let inc = Operator::named("inc");
        let double = Operator::named("double");
        let sum = Operator::named("sum");
        let mut graph: Graph = Graph::new();
        graph.insert(key("x"), Value::literal(1_i32));
        graph.insert(key("y"), Value::literal(1_i32));
        graph.insert(key("i"), Value::task(inc.clone(), vec![Value::key("x")]));
        graph.insert(key("d"), Value::task(double, vec![Value::key("y")]));
        graph.insert(
            key("out"),
            Value::task(sum, vec![Value::seq(vec![Value::key("i"), Value::key("d")])]),
        );

        let fast: HashSet<Operator> = [inc].into_iter().collect();
        let result = inline_functions(&graph, &fast, None).unwrap();
        match &result[&key("out")] {
            Value::Task(task) => match &task.args[0] {
                Value::Seq(items) => {
                    assert!(matches!(items[0], Value::Task(_)));
                    assert_eq!(items[1], Value::key("d"));
                }
                _ => panic!("expected a seq"),
            },
            _ => panic!("expected a task"),
        }
    }
}
