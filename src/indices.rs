//! Point ids stored as either `u16` or `u32` to save space.

use crate::r#type::PointId;

/// Owned point ids, `u16` when every id fits.
#[derive(Debug, Clone, PartialEq)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    /// Ids `0..num_items`, in order.
    pub fn sequential(num_items: usize) -> Self {
        if num_items <= u16::MAX as usize + 1 {
            // Every id fits: the largest is `num_items - 1`.
            Self::U16((0..num_items).map(|i| i as u16).collect())
        } else {
            Self::U32((0..num_items).map(|i| i as u32).collect())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U16(arr) => arr.len(),
            Self::U32(arr) => arr.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn bytes_per_element(&self) -> usize {
        match self {
            Self::U16(_) => 2,
            Self::U32(_) => 4,
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> PointId {
        match self {
            Self::U16(arr) => PointId(arr[index] as u32),
            Self::U32(arr) => PointId(arr[index]),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PointId> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    pub fn view_mut(&mut self) -> MutableIndices<'_> {
        match self {
            Self::U16(arr) => MutableIndices::U16(arr),
            Self::U32(arr) => MutableIndices::U32(arr),
        }
    }
}

/// A mutable slice of ids that may be either `u16` or `u32`.
#[derive(Debug)]
pub enum MutableIndices<'a> {
    U16(&'a mut [u16]),
    U32(&'a mut [u32]),
}

impl MutableIndices<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::U16(arr) => arr.len(),
            Self::U32(arr) => arr.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        match self {
            Self::U16(arr) => arr.swap(a, b),
            Self::U32(arr) => arr.swap(a, b),
        }
    }
}

impl<'a> MutableIndices<'a> {
    /// Divide into `[0, mid)` and `[mid, len)`.
    pub fn split_at(self, mid: usize) -> (MutableIndices<'a>, MutableIndices<'a>) {
        match self {
            Self::U16(arr) => {
                let (left, right) = arr.split_at_mut(mid);
                (MutableIndices::U16(left), MutableIndices::U16(right))
            }
            Self::U32(arr) => {
                let (left, right) = arr.split_at_mut(mid);
                (MutableIndices::U32(left), MutableIndices::U32(right))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn picks_the_narrowest_width() {
        assert_eq!(Indices::sequential(65536).bytes_per_element(), 2);
        assert_eq!(Indices::sequential(65537).bytes_per_element(), 4);
    }

    #[test]
    fn swaps_through_a_split() {
        let mut ids = Indices::sequential(4);
        {
            let (mut left, mut right) = ids.view_mut().split_at(2);
            left.swap(0, 1);
            right.swap(0, 1);
        }
        let ids: Vec<u32> = ids.iter().map(|id| id.0).collect();
        assert_eq!(ids, vec![1, 0, 3, 2]);
    }
}
