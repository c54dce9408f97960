//! `cull`: the sub-graph reachable from a set of output keys.

use crate::error::Error;
use crate::key::Key;
use crate::value::{references, Graph};
use std::collections::VecDeque;

/// A possibly-nested collection of root keys, as accepted by [`cull`].
///
/// Lets callers pass a single key, a flat list, or an arbitrarily nested
/// list of keys; the union of all keys found at any depth is the root set.
#[derive(Debug, Clone)]
pub enum Roots {
    /// A single root key.
    One(Key),
    /// A nested collection of roots.
    Many(Vec<Roots>),
}

impl Roots {
    pub(crate) fn flatten_into(&self, out: &mut Vec<Key>) {
        match self {
            Roots::One(key) => out.push(key.clone()),
            Roots::Many(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

impl From<Key> for Roots {
    fn from(key: Key) -> Self {
        Roots::One(key)
    }
}

impl From<&str> for Roots {
    fn from(key: &str) -> Self {
        Roots::One(Key::from(key))
    }
}

impl<T: Into<Roots>> From<Vec<T>> for Roots {
    fn from(items: Vec<T>) -> Self {
        Roots::Many(items.into_iter().map(Into::into).collect())
    }
}

/// Returns the sub-graph reachable from `outputs`.
///
/// Fails with [`Error::UnknownKey`] if any root key is absent from `graph`.
pub fn cull(graph: &Graph, outputs: impl Into<Roots>) -> Result<Graph, Error> {
    let mut root_keys = Vec::new();
    outputs.into().flatten_into(&mut root_keys);

    let mut result = Graph::new();
    let mut queue: VecDeque<Key> = VecDeque::new();
    for key in root_keys {
        if !graph.contains_key(&key) {
            return Err(Error::UnknownKey(key));
        }
        queue.push_back(key);
    }

    while let Some(key) = queue.pop_front() {
        if result.contains_key(&key) {
            continue;
        }
        let value = graph
            .get(&key)
            .expect("queued keys were checked against the graph")
            .clone();
        for dependency in references(graph, &value) {
            if !result.contains_key(&dependency) {
                queue.push_back(dependency);
            }
        }
        result.insert(key, value);
    }

    log::debug!(
        "cull: kept {} of {} keys",
        result.len(),
        graph.len()
    );
    Ok(result)
}
