//! An immutable k-d tree stored as one array of points.
//!
//! The tree is implicit: the middle element of a range is that range's split point, and the
//! halves before and after it are its subtrees. There are no links to follow and nothing to
//! update, so insertion and removal are not supported.

mod index;
mod r#trait;

pub use index::FlatKdTree;

#[cfg(test)]
mod test;
