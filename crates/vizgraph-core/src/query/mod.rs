// Traversal classification and compilation
//
// A caller sends a short traversal expression; the classifier decides how to
// expand it and the compiler produces the projected query that the store runs.

pub mod builder;
pub mod classifier;
pub mod compiler;

pub use builder::{AnonStep, GremlinQuery, Projection, Source, Step, Traversal};
pub use classifier::{classify, QueryPlan};
pub use compiler::{compile, NodeLimit};

/// Which edges, if any, are fetched alongside each traversed vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Only the vertices themselves.
    SelfOnly,
    Inbound,
    Outbound,
}
