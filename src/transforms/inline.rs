//! `inline`: resolve selected keys' values directly into every reference.

use crate::error::Error;
use crate::key::Key;
use crate::subst::substitute;
use crate::transforms::cull::Roots;
use crate::value::{classify, Graph, Kind};
use std::collections::{HashMap, HashSet};

/// Controls which keys [`inline`] folds away.
#[derive(Debug, Clone)]
pub struct InlineOptions {
    /// Extra keys to inline beyond (or instead of) constants.
    pub keys: Option<Roots>,
    /// When true (the default), every literal-valued key is inlined too.
    pub inline_constants: bool,
}

impl InlineOptions {
    /// The default options: no extra keys, constants inlined.
    pub fn new() -> Self {
        InlineOptions {
            keys: None,
            inline_constants: true,
        }
    }
}

impl Default for InlineOptions {
    fn default() -> Self {
        InlineOptions::new()
    }
}

/// Replaces every reference to a selected key with that key's (recursively
/// resolved) value, then drops the selected keys from the graph.
///
/// A key is selected if it is named in `options.keys`, or if
/// `options.inline_constants` is set (the default) and the key's value is a
/// literal. Selection is independent of reference count: unlike [`crate::fuse`],
/// `inline` is meant for constants and explicitly chosen keys regardless of
/// how many places they are used.
pub fn inline(graph: &Graph, options: &InlineOptions) -> Result<Graph, Error> {
    let mut selected: HashSet<Key> = HashSet::new();

    if let Some(roots) = &options.keys {
        let mut explicit = Vec::new();
        roots.flatten_into(&mut explicit);
        for key in explicit {
            if !graph.contains_key(&key) {
                return Err(Error::UnknownKey(key));
            }
            selected.insert(key);
        }
    }

    if options.inline_constants {
        for (key, value) in graph {
            if classify(graph, value) == Kind::Literal {
                selected.insert(key.clone());
            }
        }
    }

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
        "inline: folded {} of {} keys",
        selected.len(),
        graph.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key;
    use crate::operator::Operator;
    use crate::value::Value;

    #[test]
    fn default_options_inline_only_constants() {
        let inc = Operator::named("inc");
        let add = Operator::named("add");
        let mut graph: Graph = Graph::new();
        graph.insert(key("a"), Value::literal(1_i32));
        graph.insert(key("b"), Value::task(inc.clone(), vec![Value::key("a")]));
        graph.insert(key("c"), Value::task(inc, vec![Value::key("b")]));
        graph.insert(
            key("d"),
            Value::task(add, vec![Value::key("a"), Value::key("c")]),
        );

        let result = inline(&graph, &InlineOptions::new()).unwrap();
        assert_eq!(result.len(), 3);
        assert!(!result.contains_key(&key("a")));
        match &result[&key("b")] {
            Value::Task(task) => assert!(matches!(task.args[0], Value::Literal(_))),
            _ => panic!("expected a task"),
        }
        match &result[&key("d")] {
            Value::Task(task) => {
                assert!(matches!(task.args[0], Value::Literal(_)));
                assert_eq!(task.args[1], Value::key("c"));
            }
            _ => panic!("expected a task"),
        }
    }

    #[test]
    fn explicit_keys_resolve_recursively_and_are_removed() {
        let inc = Operator::named("inc");
        let add = Operator::named("add");
        let mut graph: Graph = Graph::new();
        graph.insert(key("a"), Value::literal(1_i32));
        graph.insert(key("b"), Value::task(inc.clone(), vec![Value::key("a")]));
        graph.insert(key("c"), Value::task(inc, vec![Value::key("b")]));
        graph.insert(
            key("d"),
            Value::task(add, vec![Value::key("a"), Value::key("c")]),
        );

        let options = InlineOptions {
            keys: Some(vec![key("a"), key("b"), key("c")].into()),
            inline_constants: true,
        };
        let result = inline(&graph, &options).unwrap();
        assert_eq!(result.len(), 1);
        match &result[&key("d")] {
            Value::Task(task) => {
                assert!(matches!(task.args[0], Value::Literal(_)));
                match &task.args[1] {
                    Value::Task(nested_outer) => match &nested_outer.args[0] {
                        Value::Task(nested_inner) => {
                            assert!(matches!(nested_inner.args[0], Value::Literal(_)))
                        }
                        _ => panic!("expected nested task"),
                    },
                    _ => panic!("expected nested task"),
                }
            }
            _ => panic!("expected a task"),
        }
    }

    #[test]
    fn disabling_constants_keeps_the_key_but_still_inlines_selected_ones() {
        let inc = Operator::named("inc");
        let add = Operator::named("add");
        let mut graph: Graph = Graph::new();
        graph.insert(key("x"), Value::literal(1_i32));
        graph.insert(key("y"), Value::task(inc, vec![Value::key("x")]));
        graph.insert(
            key("z"),
            Value::task(add, vec![Value::key("x"), Value::key("y")]),
        );

        let options = InlineOptions {
            keys: Some(key("y").into()),
            inline_constants: false,
        };
        let result = inline(&graph, &options).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.contains_key(&key("x")));
        match &result[&key("z")] {
            Value::Task(task) => {
                assert_eq!(task.args[0], Value::key("x"));
                match &task.args[1] {
                    Value::Task(inner) => assert_eq!(inner.args[0], Value::key("x")),
                    _ => panic!("expected nested task"),
                }
            }
            _ => panic!("expected a task"),
        }
    }

    #[test]
    fn unknown_explicit_key_errors() {
        let graph: Graph = Graph::new();
        let options = InlineOptions {
            keys: Some(key("missing").into()),
            inline_constants: false,
        };
        let err = inline(&graph, &options).unwrap_err();
        assert_eq!(err, Error::UnknownKey(key("missing")));
    }
}
