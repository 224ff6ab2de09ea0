use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KdIndexError {
    /// An index was constructed or loaded without any coordinate keys.
    #[error("at least one dimension is required")]
    EmptyDimensions,

    /// An item passed to [`ScoredHeap::remove`][crate::heap::ScoredHeap::remove] is not in the
    /// heap.
    #[error("item not found in heap")]
    ItemNotFound,

    /// A prebuilt node refers to a split axis outside the dimension list.
    #[error("node axis {axis} is out of range for {dimensions} dimensions")]
    InvalidAxis {
        /// The offending axis index.
        axis: usize,
        /// The number of dimensions of the tree.
        dimensions: usize,
    },

    /// A prebuilt node carries `u32::MAX`, the one id that is never handed out.
    #[error("point id {id} is reserved")]
    ReservedId {
        /// The offending id.
        id: u32,
    },

    /// Two prebuilt nodes carry the same id.
    #[error("point id {id} appears more than once")]
    DuplicateId {
        /// The repeated id.
        id: u32,
    },

    /// Every id up to `u32::MAX` has been handed out.
    #[error("no point ids left for insertion")]
    IdsExhausted,

    /// More points than a [`PointId`][crate::PointId] can address.
    #[error("cannot index {count} points, the maximum is u32::MAX")]
    TooManyItems {
        /// The number of points supplied.
        count: usize,
    },
}

pub type Result<T> = std::result::Result<T, KdIndexError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invalid_axis_message() {
        let e = KdIndexError::InvalidAxis {
            axis: 3,
            dimensions: 2,
        };
        assert_eq!(e.to_string(), "node axis 3 is out of range for 2 dimensions");
    }

    #[test]
    fn duplicate_id_message() {
        let e = KdIndexError::DuplicateId { id: 7 };
        assert_eq!(e.to_string(), "point id 7 appears more than once");
    }

    #[test]
    fn item_not_found_message() {
        assert_eq!(
            KdIndexError::ItemNotFound.to_string(),
            "item not found in heap"
        );
    }
}
