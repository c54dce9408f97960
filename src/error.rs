//! The error types.
//!
//! A small hand-written `Error` enum with a manual `Display` impl built
//! from `f.debug_tuple`, rather than a `thiserror` derive.

use crate::key::Key;

/// Errors that can happen while rewriting a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// [`crate::cull`] was asked to start from a root key that is not
    /// present in the graph.
    UnknownKey(Key),
    /// The dependency relation contains a cycle. Only possible on a
    /// malformed input; well-formed DAGs never trigger this.
    NonTerminating,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKey(key) => f.debug_tuple("Error::UnknownKey").field(key).finish(),
            Self::NonTerminating => f.debug_tuple("Error::NonTerminating").finish(),
        }
    }
}

impl std::error::Error for Error {}
