//! Graph keys.

use std::sync::Arc;

/// A hashable, comparable identifier naming one graph entry.
///
/// `Arc<str>` is used rather than `String` so that the many graph copies a
/// chain of transformations produces can share key allocations instead of
/// re-allocating every key on every rewrite.
pub type Key = Arc<str>;

/// Builds a [`Key`] from a `&str`, for tests and call sites that don't
/// already hold an `Arc<str>`.
pub fn key(s: &str) -> Key {
    Key::from(s)
}
