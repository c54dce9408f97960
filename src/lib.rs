//! `task_graph_optimizer` rewrites a deferred computation graph before a
//! scheduler runs it.
//!
//! A graph is a [`Graph`]: a map from [`Key`] to [`Value`], where a value is
//! either an opaque [`Literal`], an alias (a bare key reference to another
//! entry), or a [`Task`] — an [`Operator`] applied to ordered arguments that
//! may themselves be literals, aliases, nested tasks, or plain ordered
//! sequences. None of the six rewrites in this crate ever calls an operator;
//! they only restructure the graph that something else will later execute.
//!
//! # Example
//!
//! ```
//! use taskgraph::{cull, fuse, inline, InlineOptions, Graph, Operator, Value};
//!
//! let inc = Operator::named("inc");
//! let add = Operator::named("add");
//!
//! let mut graph: Graph = Graph::new();
//! graph.insert("x".into(), Value::literal(1_i32));
//! graph.insert("y".into(), Value::task(inc.clone(), vec![Value::key("x")]));
//! graph.insert("z".into(), Value::task(inc, vec![Value::key("x")]));
//! graph.insert("out".into(), Value::task(add, vec![Value::key("y"), Value::literal(10_i32)]));
//!
//! // Drop 'z': nothing reachable from 'out' depends on it.
//! let culled = cull(&graph, "out").unwrap();
//! assert_eq!(culled.len(), 3);
//!
//! // Fold the lone dependency chain and the leaf constant together.
//! let fused = fuse(&culled).unwrap();
//! let inlined = inline(&fused, &InlineOptions::new()).unwrap();
//! assert_eq!(inlined.len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`cull`]: keep only the sub-graph reachable from a set of outputs.
//! - [`fuse`] / [`fuse_retaining`]: collapse linear single-occurrence chains.
//! - [`inline`]: resolve selected keys' values directly into their consumers.
//! - [`inline_functions`]: a conservative `inline` targeting cheap operators.
//! - [`dealias`]: collapse alias chains to direct references.
//! - [`equivalent`] / [`sync_vars`] / [`merge_sync`]: compare and merge
//!   graphs that use different key names for the same computation.

#![warn(
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_abi,
    missing_docs,
    missing_debug_implementations,
    non_ascii_idents,
    noop_method_call,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    variant_size_differences
)]

mod depth;
mod error;
mod key;
mod literal;
mod operator;
mod subst;
mod transforms;
mod value;

pub use error::Error;
pub use key::{key, Key};
pub use literal::{literals_equivalent, DynLiteral, Literal};
pub use operator::{identity_operator, Operator};
pub use transforms::cull::{cull, Roots};
pub use transforms::dealias::dealias;
pub use transforms::equivalence::{equivalent, merge_sync, sync_vars};
pub use transforms::fuse::{fuse, fuse_retaining};
pub use transforms::inline::{inline, InlineOptions};
pub use transforms::inline_functions::inline_functions;
pub use value::{classify, functions_of, reference_counts, references, Graph, Kind, Task, Value};
