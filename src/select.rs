//! In-place selection (quickselect) over index ranges.
//!
//! Ranges are half-open: `[left, right)` holds `right - left` elements. After
//! [`select`] the element at `nth` is the one a full sort would put there, everything before it
//! compares `<=` and everything after it `>=`.

use crate::r#type::Coordinates;

/// A sequence that can be partially ordered in place by one value per element.
pub trait Selectable {
    /// The value elements are ordered by.
    type Value: PartialOrd + Copy;

    /// The number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The ordering value of the element at `index`.
    fn value(&self, index: usize) -> Self::Value;

    /// Exchange two elements.
    fn swap(&mut self, a: usize, b: usize);
}

/// How [`select_with`] chooses its pivot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PivotStrategy {
    /// The middle of the live range. Expected linear time, quadratic worst case, and faster in
    /// practice.
    #[default]
    Midpoint,
    /// Median of the medians of groups of five. Linear worst case.
    MedianOfMedians,
}

/// Partition `[left, right)` around the value at `pivot`.
///
/// Elements smaller than the pivot value move to the front; the pivot element lands right after
/// them. Returns its final position.
pub fn partition<S: Selectable + ?Sized>(
    buf: &mut S,
    left: usize,
    right: usize,
    pivot: usize,
) -> usize {
    let value = buf.value(pivot);
    let last = right - 1;
    buf.swap(pivot, last);

    let mut store = left;
    for i in left..last {
        if buf.value(i) < value {
            if store < i {
                buf.swap(store, i);
            }
            store += 1;
        }
    }
    if store < last {
        buf.swap(store, last);
    }
    store
}

/// Partition `[left, right)` into three runs around the value at `pivot`: smaller values, values
/// equal to it, then larger values. Returns the bounds `(lt, gt)` of the equal run.
///
/// Runs of equal values cost one pass, where [`partition`] would leave them all on one side.
pub fn partition_three_way<S: Selectable + ?Sized>(
    buf: &mut S,
    left: usize,
    right: usize,
    pivot: usize,
) -> (usize, usize) {
    let value = buf.value(pivot);
    let (mut lt, mut i, mut gt) = (left, left, right);
    while i < gt {
        let current = buf.value(i);
        if current < value {
            if lt < i {
                buf.swap(lt, i);
            }
            lt += 1;
            i += 1;
        } else if value < current {
            gt -= 1;
            buf.swap(i, gt);
        } else {
            i += 1;
        }
    }
    (lt, gt)
}

/// Rearrange `[left, right)` so that the element at `nth` is in sorted position, using a
/// midpoint pivot.
///
/// `nth` must lie in `[left, right)`.
pub fn select<S: Selectable + ?Sized>(buf: &mut S, left: usize, right: usize, nth: usize) -> usize {
    select_with(buf, left, right, nth, PivotStrategy::Midpoint)
}

/// Like [`select`] with an explicit pivot strategy.
pub fn select_with<S: Selectable + ?Sized>(
    buf: &mut S,
    mut left: usize,
    mut right: usize,
    nth: usize,
    strategy: PivotStrategy,
) -> usize {
    debug_assert!(left <= nth && nth < right, "rank {nth} outside [{left}, {right})");

    loop {
        if left + 1 >= right {
            return left;
        }

        let pivot = match strategy {
            PivotStrategy::Midpoint => (left + right) >> 1,
            PivotStrategy::MedianOfMedians => median_of_medians(buf, left, right),
        };
        let (lt, gt) = partition_three_way(buf, left, right, pivot);

        if nth < lt {
            right = lt;
        } else if nth >= gt {
            left = gt;
        } else {
            return nth;
        }
    }
}

/// Sort a group of at most five elements with insertion sort and return the position of its
/// median.
fn small_median<S: Selectable + ?Sized>(buf: &mut S, left: usize, right: usize) -> usize {
    for i in left + 1..right {
        let mut j = i;
        while j > left && buf.value(j) < buf.value(j - 1) {
            buf.swap(j, j - 1);
            j -= 1;
        }
    }
    (left + right) >> 1
}

/// Gather the medians of each group of five at the front of the range, then select their median.
fn median_of_medians<S: Selectable + ?Sized>(buf: &mut S, left: usize, right: usize) -> usize {
    if right - left <= 5 {
        return small_median(buf, left, right);
    }

    let mut medians_end = left;
    let mut group = left;
    while group < right {
        let group_end = (group + 5).min(right);
        let median = small_median(buf, group, group_end);
        buf.swap(median, medians_end);
        medians_end += 1;
        group += 5;
    }

    let mid = (left + medians_end) >> 1;
    select_with(buf, left, medians_end, mid, PivotStrategy::MedianOfMedians)
}

/// A slice ordered by a key function.
pub struct ByKey<'a, T, F> {
    items: &'a mut [T],
    key: F,
}

impl<'a, T, F> ByKey<'a, T, F> {
    /// Wrap `items`, ordering them by `key`.
    pub fn new(items: &'a mut [T], key: F) -> Self {
        Self { items, key }
    }
}

impl<T, V, F> Selectable for ByKey<'_, T, F>
where
    V: PartialOrd + Copy,
    F: Fn(&T) -> V,
{
    type Value = V;

    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    fn value(&self, index: usize) -> V {
        (self.key)(&self.items[index])
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
    }
}

/// Put the `nth` smallest element of `items` (by `key`) at position `nth`.
///
/// ```
/// use kd_index::select::select_nth_by_key;
///
/// let mut values = [9, 1, 8, 2, 7, 3];
/// select_nth_by_key(&mut values, 2, |v| *v);
/// assert_eq!(values[2], 3);
/// assert!(values[..2].iter().all(|v| *v <= 3));
/// assert!(values[3..].iter().all(|v| *v >= 3));
/// ```
pub fn select_nth_by_key<T, V, F>(items: &mut [T], nth: usize, key: F)
where
    V: PartialOrd + Copy,
    F: Fn(&T) -> V,
{
    let len = items.len();
    select(&mut ByKey::new(items, key), 0, len, nth);
}

/// Points ordered by their coordinate on one key.
pub(crate) struct ByAxis<'a, T, P: Coordinates> {
    items: &'a mut [T],
    axis: &'a P::Key,
    point: fn(&T) -> &P,
}

impl<'a, T, P: Coordinates> ByAxis<'a, T, P> {
    pub(crate) fn new(items: &'a mut [T], axis: &'a P::Key, point: fn(&T) -> &P) -> Self {
        Self { items, axis, point }
    }
}

impl<T, P: Coordinates> Selectable for ByAxis<'_, T, P> {
    type Value = P::Num;

    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    fn value(&self, index: usize) -> P::Num {
        (self.point)(&self.items[index]).coord(self.axis)
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn assert_selected(values: &[i32], nth: usize) {
        let mut sorted = values.to_vec();
        sorted.sort();
        assert_eq!(values[nth], sorted[nth]);
        assert!(values[..nth].iter().all(|v| *v <= values[nth]));
        assert!(values[nth + 1..].iter().all(|v| *v >= values[nth]));
    }

    #[test]
    fn partition_moves_smaller_values_first() {
        let mut values = [5, 3, 9, 1, 7];
        let pos = partition(&mut ByKey::new(&mut values, |v: &i32| *v), 0, 5, 0);
        assert_eq!(pos, 2);
        assert_eq!(values[pos], 5);
        assert!(values[..pos].iter().all(|v| *v < 5));
        assert!(values[pos + 1..].iter().all(|v| *v >= 5));
    }

    #[test]
    fn selects_every_rank() {
        let mut rng = StdRng::seed_from_u64(7);
        let original: Vec<i32> = (0..50).map(|_| rng.gen_range(-20..20)).collect();
        for strategy in [PivotStrategy::Midpoint, PivotStrategy::MedianOfMedians] {
            for nth in 0..original.len() {
                let mut values = original.clone();
                let len = values.len();
                let mut buf = ByKey::new(&mut values, |v: &i32| *v);
                let pos = select_with(&mut buf, 0, len, nth, strategy);
                assert_eq!(pos, nth);
                assert_selected(&values, nth);
            }
        }
    }

    #[test]
    fn selects_within_a_sub_range() {
        let mut values = [100, 9, 4, 7, 1, -100];
        select(&mut ByKey::new(&mut values, |v: &i32| *v), 1, 5, 2);
        assert_eq!(values[0], 100);
        assert_eq!(values[5], -100);
        assert_eq!(values[2], 4);
    }

    #[test]
    fn all_equal_values() {
        let mut values = [3; 17];
        select_nth_by_key(&mut values, 8, |v| *v);
        assert_eq!(values, [3; 17]);
    }

    /// Integers that count how often their values are read.
    struct Counted<'a> {
        values: &'a mut [i32],
        reads: std::cell::Cell<usize>,
    }

    impl Selectable for Counted<'_> {
        type Value = i32;

        fn len(&self) -> usize {
            self.values.len()
        }

        fn value(&self, index: usize) -> i32 {
            self.reads.set(self.reads.get() + 1);
            self.values[index]
        }

        fn swap(&mut self, a: usize, b: usize) {
            self.values.swap(a, b);
        }
    }

    #[test]
    fn equal_values_take_one_pass() {
        let mut values = vec![3; 5000];
        values.extend([1, 9]);
        let len = values.len();
        let mut buf = Counted {
            values: &mut values,
            reads: Default::default(),
        };
        select(&mut buf, 0, len, len / 2);
        assert!(buf.reads.get() <= 2 * len, "{} reads", buf.reads.get());
        assert_selected(&values, len / 2);
    }

    #[test]
    fn three_way_partition_groups_ties() {
        let mut values = [4, 2, 4, 8, 4, 1, 9, 4];
        let (lt, gt) = partition_three_way(&mut ByKey::new(&mut values, |v: &i32| *v), 0, 8, 0);
        assert_eq!((lt, gt), (2, 6));
        assert!(values[..lt].iter().all(|v| *v < 4));
        assert!(values[lt..gt].iter().all(|v| *v == 4));
        assert!(values[gt..].iter().all(|v| *v > 4));
    }

    #[test]
    fn single_element() {
        let mut values = [42];
        select_nth_by_key(&mut values, 0, |v| *v);
        assert_eq!(values, [42]);
    }
}
