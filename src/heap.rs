//! A binary max-heap ordered by a caller-supplied score.
//!
//! Unlike [`std::collections::BinaryHeap`] the ordering lives in a function instead of an `Ord`
//! impl, elements can be removed from the middle, and the backing storage can be read in heap
//! order. The nearest-neighbor searches use it to keep the `k` best candidates: scored by
//! distance, the top is always the worst kept candidate.

use crate::error::{KdIndexError, Result};

/// A binary heap whose top is the element with the highest score.
pub struct ScoredHeap<T, F> {
    content: Vec<T>,
    score: F,
}

impl<T, F> ScoredHeap<T, F>
where
    F: Fn(&T) -> f64,
{
    /// Create an empty heap ordered by `score`.
    pub fn new(score: F) -> Self {
        Self::with_capacity(0, score)
    }

    /// Create an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize, score: F) -> Self {
        Self {
            content: Vec::with_capacity(capacity),
            score,
        }
    }

    /// The number of elements in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if the heap holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The highest-scored element, if any.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.content.first()
    }

    /// Add an element.
    pub fn push(&mut self, item: T) {
        self.content.push(item);
        self.bubble_up(self.content.len() - 1);
    }

    /// Remove and return the highest-scored element.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.content.pop()?;
        if self.content.is_empty() {
            return Some(last);
        }
        let top = std::mem::replace(&mut self.content[0], last);
        self.sink_down(0);
        Some(top)
    }

    /// Remove the first element equal to `item`.
    ///
    /// Returns [`KdIndexError::ItemNotFound`] if no element matches.
    pub fn remove(&mut self, item: &T) -> Result<T>
    where
        T: PartialEq,
    {
        let pos = self
            .content
            .iter()
            .position(|candidate| candidate == item)
            .ok_or(KdIndexError::ItemNotFound)?;

        let removed = self.content.swap_remove(pos);
        if pos < self.content.len() {
            // The former last element now fills the hole and may belong above or below it.
            if (self.score)(&self.content[pos]) > (self.score)(&removed) {
                self.bubble_up(pos);
            } else {
                self.sink_down(pos);
            }
        }
        Ok(removed)
    }

    /// Iterate over the elements in heap order (top first, otherwise unsorted).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }

    /// Consume the heap, returning its storage in heap order.
    pub fn into_vec(self) -> Vec<T> {
        self.content
    }

    fn bubble_up(&mut self, mut n: usize) {
        let score = (self.score)(&self.content[n]);
        while n > 0 {
            let parent = (n - 1) / 2;
            if score > (self.score)(&self.content[parent]) {
                self.content.swap(n, parent);
                n = parent;
            } else {
                break;
            }
        }
    }

    fn sink_down(&mut self, mut n: usize) {
        let len = self.content.len();
        let score = (self.score)(&self.content[n]);

        loop {
            let right = (n + 1) * 2;
            let left = right - 1;
            let mut target = None;
            let mut target_score = score;

            if left < len {
                let left_score = (self.score)(&self.content[left]);
                if left_score > target_score {
                    target = Some(left);
                    target_score = left_score;
                }
            }
            if right < len && (self.score)(&self.content[right]) > target_score {
                target = Some(right);
            }

            match target {
                Some(child) => {
                    self.content.swap(n, child);
                    n = child;
                }
                None => break,
            }
        }
    }
}

impl<T, F> std::fmt::Debug for ScoredHeap<T, F>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoredHeap")
            .field("content", &self.content)
            .finish()
    }
}
