//! Nearest-neighbor results and the bounded candidate set used while searching.

use crate::heap::ScoredHeap;
use crate::r#type::PointId;

/// A point returned by a nearest-neighbor query.
#[derive(Debug)]
pub struct Neighbor<'a, P> {
    /// The identity of the point.
    pub id: PointId,
    /// The point itself.
    pub point: &'a P,
    /// Distance from the query under the index's metric.
    pub distance: f64,
}

impl<P> Clone for Neighbor<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Neighbor<'_, P> {}

/// Sort neighbors closest first.
///
/// Queries return neighbors in no particular order.
pub fn sort_by_distance<P>(neighbors: &mut [Neighbor<'_, P>]) {
    neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate<T> {
    /// `None` for the placeholders seeded by a distance limit.
    target: Option<T>,
    distance: f64,
}

fn candidate_score<T>(candidate: &Candidate<T>) -> f64 {
    candidate.distance
}

/// The best `capacity` candidates seen so far, worst on top.
pub(crate) struct Candidates<T> {
    heap: ScoredHeap<Candidate<T>, fn(&Candidate<T>) -> f64>,
    capacity: usize,
}

impl<T> Candidates<T> {
    /// Seed with `capacity` placeholders at `max_distance` when given, so only strictly closer
    /// targets are ever kept and the far-side pruning is bounded by the radius from the start.
    pub(crate) fn new(capacity: usize, max_distance: Option<f64>) -> Self {
        let score: fn(&Candidate<T>) -> f64 = candidate_score::<T>;
        let mut heap = ScoredHeap::with_capacity(capacity + 1, score);
        if let Some(distance) = max_distance {
            for _ in 0..capacity {
                heap.push(Candidate {
                    target: None,
                    distance,
                });
            }
        }
        Self { heap, capacity }
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Distance of the worst kept candidate.
    #[inline]
    fn worst(&self) -> f64 {
        self.heap
            .peek()
            .map_or(f64::INFINITY, |candidate| candidate.distance)
    }

    /// Whether something at `bound` could still displace a kept candidate.
    #[inline]
    pub(crate) fn admits(&self, bound: f64) -> bool {
        !self.is_full() || bound.abs() < self.worst()
    }

    /// Keep `target` if there is room or it beats the worst kept candidate.
    pub(crate) fn offer(&mut self, target: T, distance: f64) {
        if !self.is_full() || distance < self.worst() {
            self.heap.push(Candidate {
                target: Some(target),
                distance,
            });
            if self.heap.len() > self.capacity {
                self.heap.pop();
            }
        }
    }

    /// The kept targets and their distances, in heap order.
    pub(crate) fn into_targets(self) -> impl Iterator<Item = (T, f64)> {
        let capacity = self.capacity;
        self.heap
            .into_vec()
            .into_iter()
            .take(capacity)
            .filter_map(|candidate| candidate.target.map(|target| (target, candidate.distance)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn targets(candidates: Candidates<usize>) -> Vec<(usize, f64)> {
        let mut out: Vec<_> = candidates.into_targets().collect();
        out.sort_by_key(|(target, _)| *target);
        out
    }

    #[test]
    fn keeps_the_closest() {
        let mut candidates = Candidates::new(2, None);
        candidates.offer(0, 5.0);
        candidates.offer(1, 1.0);
        candidates.offer(2, 3.0);
        candidates.offer(3, 4.0);
        assert_eq!(targets(candidates), vec![(1, 1.0), (2, 3.0)]);
    }

    #[test]
    fn admits_until_full() {
        let mut candidates = Candidates::new(2, None);
        assert!(candidates.admits(100.0));
        candidates.offer(0, 2.0);
        assert!(candidates.admits(100.0));
        candidates.offer(1, 3.0);
        assert!(!candidates.admits(100.0));
        assert!(candidates.admits(-2.5));
        assert!(!candidates.admits(3.0));
    }

    #[test]
    fn distance_limit_drops_far_targets() {
        let mut candidates = Candidates::new(3, Some(2.0));
        assert!(!candidates.admits(2.0));
        candidates.offer(0, 2.0);
        candidates.offer(1, 1.5);
        candidates.offer(2, 0.5);
        assert_eq!(targets(candidates), vec![(1, 1.5), (2, 0.5)]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut candidates = Candidates::new(0, None);
        candidates.offer(0, 1.0);
        assert!(targets(candidates).is_empty());
    }
}
