//! The graph's value representation, and the traversal primitives shared by
//! every transformation.
//!
//! A value is a small tagged union the rest of the crate pattern-matches
//! on: an opaque literal, a key reference, a plain ordered sequence, or a
//! task. `classify` resolves what a top-level graph entry's value means
//! relative to its enclosing graph (a bare key may be an alias or a
//! dangling/absent reference depending on whether the graph still holds
//! that key).

use crate::key::Key;
use crate::literal::{literals_equivalent, DynLiteral, Literal};
use crate::operator::Operator;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A graph entry's value, or a nested argument within one.
#[derive(Debug, Clone)]
pub enum Value {
    /// An opaque datum that is not a task and not a key reference.
    Literal(DynLiteral),
    /// A reference to a key.
    ///
    /// At the top level of a graph entry this is an alias (if the key
    /// exists in the graph); nested inside a task's arguments it is always
    /// a plain reference, never an alias to resolve (see
    /// [`classify`]).
    Key(Key),
    /// An ordered sequence that is not itself headed by an operator, e.g.
    /// the list argument in `(sum, [a, b])`.
    Seq(Vec<Value>),
    /// An operator applied to arguments.
    Task(Task),
}

/// An operator and its ordered arguments.
#[derive(Debug, Clone)]
pub struct Task {
    /// The operator occupying the task's head position.
    pub operator: Operator,
    /// The task's ordered arguments.
    pub args: Vec<Value>,
}

/// Structural equality: literals compare via [`literals_equivalent`]
/// (identity first, then a panic-guarded value comparison), keys by name,
/// tasks by operator identity and pointwise argument equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Literal(a), Value::Literal(b)) => literals_equivalent(a.as_ref(), b.as_ref()),
            (Value::Key(a), Value::Key(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Task(a), Value::Task(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.args == other.args
    }
}

impl Value {
    /// Builds a literal value.
    pub fn literal<T: Literal>(value: T) -> Self {
        Value::Literal(Box::new(value))
    }

    /// Builds a key reference.
    pub fn key(key: impl Into<Key>) -> Self {
        Value::Key(key.into())
    }

    /// Builds a task value.
    pub fn task(operator: Operator, args: Vec<Value>) -> Self {
        Value::Task(Task { operator, args })
    }

    /// Builds a plain (non-task) ordered sequence.
    pub fn seq(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

/// A mapping from key to value representing a deferred computation.
///
/// This is the wire format exchanged with the front-end that builds graphs
/// and the scheduler that executes them; its shape is fixed by §6 of the
/// specification this crate implements.
pub type Graph = HashMap<Key, Value>;

/// What kind of entry `value` is, relative to `graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// An opaque datum, or a key that is not present in `graph`.
    Literal,
    /// A key that is present in `graph`.
    Alias,
    /// An operator applied to arguments.
    Task,
}

/// Classifies a graph entry's top-level value.
///
/// Only ever meaningful at the top level of a graph entry: a bare key
/// nested inside a task's arguments is always a reference, never an alias,
/// regardless of what `classify` would say about it in isolation.
pub fn classify(graph: &Graph, value: &Value) -> Kind {
    match value {
        Value::Task(_) => Kind::Task,
        Value::Key(key) if graph.contains_key(key) => Kind::Alias,
        _ => Kind::Literal,
    }
}

/// Recursively collects every key of `graph` that appears within `value`,
/// descending into tasks and nested ordered sequences but not into
/// literals.
pub fn references(graph: &Graph, value: &Value) -> BTreeSet<Key> {
    let mut out = BTreeSet::new();
    collect_references(graph, value, &mut out);
    out
}

fn collect_references(graph: &Graph, value: &Value, out: &mut BTreeSet<Key>) {
    match value {
        Value::Literal(_) => {}
        Value::Key(key) => {
            if graph.contains_key(key) {
                out.insert(key.clone());
            }
        }
        Value::Seq(items) => {
            for item in items {
                collect_references(graph, item, out);
            }
        }
        Value::Task(task) => {
            for arg in &task.args {
                collect_references(graph, arg, out);
            }
        }
    }
}

/// Recursively collects every operator occupying the head position of every
/// task and nested task within `value`.
pub fn functions_of(value: &Value) -> HashSet<Operator> {
    let mut out = HashSet::new();
    collect_operators(value, &mut out);
    out
}

fn collect_operators(value: &Value, out: &mut HashSet<Operator>) {
    match value {
        Value::Literal(_) | Value::Key(_) => {}
        Value::Seq(items) => {
            for item in items {
                collect_operators(item, out);
            }
        }
        Value::Task(task) => {
            out.insert(task.operator.clone());
            for arg in &task.args {
                collect_operators(arg, out);
            }
        }
    }
}

/// Counts, for every key of `graph`, how many *other* keys reference it.
///
/// Shared by [`crate::fuse`], [`crate::inline_functions`] and
/// [`crate::dealias`], all of which need to know whether a key has exactly
/// one consumer, at least one consumer, or none.
pub fn reference_counts(graph: &Graph) -> HashMap<Key, usize> {
    let mut counts: HashMap<Key, usize> = graph.keys().map(|k| (k.clone(), 0)).collect();
    for (consumer, value) in graph {
        for referenced in references(graph, value) {
            if &referenced != consumer {
                *counts.entry(referenced).or_insert(0) += 1;
            }
        }
    }
    counts
}
