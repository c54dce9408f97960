//! Internal dependency-DAG construction and topological depth.
//!
//! Builds a `daggy::Dag` from a graph's key references and relies on
//! `Dag::add_edge`'s built-in cycle rejection to double as this crate's
//! general cycle detector: a graph whose dependency edges would cycle is
//! not a valid input, and `daggy` reports that for free instead of a
//! hand-written DFS-with-coloring cycle check.

use crate::error::Error;
use crate::key::Key;
use crate::value::{references, Graph};
use daggy::petgraph::algo::toposort;
use daggy::petgraph::visit::IntoNeighborsDirected;
use daggy::petgraph::Direction;
use daggy::{Dag, NodeIndex};
use std::collections::HashMap;

/// Computes, for every key of `graph`, its topological depth: `0` for a key
/// with no in-graph dependencies, otherwise `1 + max(depth of dependency)`.
///
/// Used by [`crate::sync_vars`] to compare the two graphs level by level,
/// leaves first.
pub fn depth_map(graph: &Graph) -> Result<HashMap<Key, usize>, Error> {
    let mut dag: Dag<Key, ()> = Dag::new();
    let mut index_of: HashMap<Key, NodeIndex> = HashMap::with_capacity(graph.len());
    for key in graph.keys() {
        let index = dag.add_node(key.clone());
        index_of.insert(key.clone(), index);
    }
    for (key, value) in graph {
        let key_index = index_of[key];
        for dependency in references(graph, value) {
            let dependency_index = index_of[&dependency];
            dag.add_edge(dependency_index, key_index, ())
                .map_err(|_| Error::NonTerminating)?;
        }
    }

    let order = toposort(&dag, None).map_err(|_| Error::NonTerminating)?;
    let mut depth: HashMap<NodeIndex, usize> = HashMap::with_capacity(graph.len());
    for node in order {
        let level = dag
            .neighbors_directed(node, Direction::Incoming)
            .map(|parent| depth.get(&parent).copied().unwrap_or(0) + 1)
            .max()
            .unwrap_or(0);
        depth.insert(node, level);
    }

    Ok(depth
        .into_iter()
        .map(|(index, level)| (dag.node_weight(index).unwrap().clone(), level))
        .collect())
}
