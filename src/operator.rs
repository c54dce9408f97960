//! Opaque operator identity.
//!
//! An `Operator` is an inert handle occupying a task's head position,
//! compared only by identity — this crate never calls an operator, only the
//! scheduler it hands the optimized graph back to does.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

#[derive(Debug)]
enum OperatorKind {
    Named { label: String },
    Partial { base: Operator, bound: usize },
}

/// An opaque callable occupying the head position of a [`crate::Task`].
///
/// The optimizer never invokes an operator; it only compares operators for
/// identity (two operators are equal iff they are the same handle, not
/// merely handles with the same label) and collects them via
/// [`crate::functions_of`].
#[derive(Debug, Clone)]
pub struct Operator(Arc<OperatorKind>);

impl Operator {
    /// Creates a new named operator.
    ///
    /// Two operators created by separate calls to `named`, even with the
    /// same label, are never equal to each other — identity is what
    /// matters, not the label. Callers that need the "same" operator to
    /// compare equal across a graph must clone a single `Operator` value.
    pub fn named(label: impl Into<String>) -> Self {
        Operator(Arc::new(OperatorKind::Named {
            label: label.into(),
        }))
    }

    /// Wraps `self` as a partial application with `bound` arguments already
    /// supplied.
    pub fn partial(&self, bound: usize) -> Self {
        Operator(Arc::new(OperatorKind::Partial {
            base: self.clone(),
            bound,
        }))
    }

    /// True if this operator is a curried/partially-applied wrapper around
    /// another operator.
    pub fn is_partial(&self) -> bool {
        matches!(*self.0, OperatorKind::Partial { .. })
    }

    /// Number of arguments already bound, if this is a partial application.
    pub fn bound_arity(&self) -> Option<usize> {
        match &*self.0 {
            OperatorKind::Partial { bound, .. } => Some(*bound),
            OperatorKind::Named { .. } => None,
        }
    }

    /// The ultimate non-partial operator underneath any number of layers of
    /// currying, or `self` if it is already bare.
    ///
    /// [`crate::inline_functions`] checks a task's "fast function" eligibility
    /// against this rather than the raw operator, so a partial application of
    /// a fast function is recognized as fast too — it is the curry/partial
    /// wrapper that this method looks past, not the eligibility itself.
    pub fn base(&self) -> Operator {
        match &*self.0 {
            OperatorKind::Named { .. } => self.clone(),
            OperatorKind::Partial { base, .. } => base.base(),
        }
    }

    fn label(&self) -> &str {
        match &*self.0 {
            OperatorKind::Named { label } => label,
            OperatorKind::Partial { base, .. } => base.label(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_partial() {
            write!(f, "partial({})", self.label())
        } else {
            f.write_str(self.label())
        }
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Operator {}

impl Hash for Operator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as *const () as usize).hash(state)
    }
}

static IDENTITY: OnceLock<Operator> = OnceLock::new();

/// The well-known identity operator.
///
/// [`crate::dealias`] builds identity tasks from this singleton so that a
/// scheduler consuming the optimized graph can recognize and short-circuit
/// them by comparing against this same `Operator` value.
pub fn identity_operator() -> Operator {
    IDENTITY.get_or_init(|| Operator::named("identity")).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_calls_are_not_equal() {
        assert_ne!(Operator::named("inc"), Operator::named("inc"));
    }

    #[test]
    fn clones_are_equal() {
        let inc = Operator::named("inc");
        assert_eq!(inc, inc.clone());
    }

    #[test]
    fn partial_is_not_equal_to_base() {
        let add = Operator::named("add");
        let partial = add.partial(1);
        assert_ne!(add, partial);
        assert!(partial.is_partial());
        assert!(!add.is_partial());
        assert_eq!(partial.bound_arity(), Some(1));
    }

    #[test]
    fn base_unwraps_any_number_of_curry_layers() {
        let add = Operator::named("add");
        let once = add.partial(1);
        let twice = once.partial(1);
        assert_eq!(add.base(), add);
        assert_eq!(once.base(), add);
        assert_eq!(twice.base(), add);
    }

    #[test]
    fn identity_is_a_stable_singleton() {
        assert_eq!(identity_operator(), identity_operator());
    }
}
