#![doc = include_str!("../README.md")]

mod error;
pub mod flat;
pub mod heap;
pub mod indices;
pub mod kdtree;
pub mod metric;
pub mod neighbors;
pub mod select;
mod r#trait;
mod r#type;

pub use error::{KdIndexError, Result};
pub use neighbors::Neighbor;
pub use r#trait::{KdIndex, KeyOf, NumOf};
pub use r#type::{Coord, Coordinates, IndexableNum, PointId};

#[cfg(test)]
pub(crate) mod test;
