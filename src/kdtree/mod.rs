//! A mutable k-d tree of linked nodes.
//!
//! Supports insertion and removal after construction, and exposes its node hierarchy for manual
//! traversal and for export to a plain nested structure.

#![warn(missing_docs)]

mod builder;
mod index;
mod node;
mod portable;
mod r#trait;
mod traversal;

pub use builder::KdTreeBuilder;
pub use index::KdTree;
pub use portable::PortableNode;
pub use traversal::NodeRef;
