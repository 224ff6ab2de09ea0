use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use geo_traits::CoordTrait;
use num_traits::{Bounded, Num, NumCast, ToPrimitive};

/// A trait for types that can be used for indexed coordinates.
pub trait IndexableNum:
    Num + NumCast + ToPrimitive + PartialOrd + Copy + Debug + Send + Sync + Bounded
{
}

impl IndexableNum for i8 {}
impl IndexableNum for u8 {}
impl IndexableNum for i16 {}
impl IndexableNum for u16 {}
impl IndexableNum for i32 {}
impl IndexableNum for u32 {}
impl IndexableNum for i64 {}
impl IndexableNum for u64 {}
impl IndexableNum for f32 {}
impl IndexableNum for f64 {}

/// Read access to the named coordinates of a point.
///
/// A tree is built over a list of keys (its *dimensions*) and only ever asks a point for the
/// coordinates under those keys. Asking for a key the point does not have is a caller error;
/// the map implementations panic in that case.
pub trait Coordinates {
    /// The coordinate key, e.g. `usize` for positional points or `&str` for named ones.
    type Key;

    /// The numeric type of each coordinate.
    type Num: IndexableNum;

    /// The value of this point along `key`.
    fn coord(&self, key: &Self::Key) -> Self::Num;
}

impl<T: Coordinates + ?Sized> Coordinates for &T {
    type Key = T::Key;
    type Num = T::Num;

    #[inline]
    fn coord(&self, key: &Self::Key) -> Self::Num {
        (**self).coord(key)
    }
}

impl<N: IndexableNum, const D: usize> Coordinates for [N; D] {
    type Key = usize;
    type Num = N;

    #[inline]
    fn coord(&self, key: &usize) -> N {
        self[*key]
    }
}

impl<N: IndexableNum> Coordinates for [N] {
    type Key = usize;
    type Num = N;

    #[inline]
    fn coord(&self, key: &usize) -> N {
        self[*key]
    }
}

impl<N: IndexableNum> Coordinates for Vec<N> {
    type Key = usize;
    type Num = N;

    #[inline]
    fn coord(&self, key: &usize) -> N {
        self[*key]
    }
}

impl<K, N, S> Coordinates for HashMap<K, N, S>
where
    K: Eq + Hash,
    N: IndexableNum,
    S: BuildHasher,
{
    type Key = K;
    type Num = N;

    fn coord(&self, key: &K) -> N {
        *self.get(key).expect("point is missing a dimension key")
    }
}

impl<K: Ord, N: IndexableNum> Coordinates for BTreeMap<K, N> {
    type Key = K;
    type Num = N;

    fn coord(&self, key: &K) -> N {
        *self.get(key).expect("point is missing a dimension key")
    }
}

/// The identity of a point stored in an index.
///
/// Bulk-built points get the id of their position in the input; points added with
/// [`KdTree::insert`][crate::kdtree::KdTree::insert] get the next unused id. Two points with
/// identical coordinates always have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointId(pub u32);

impl PointId {
    /// The id as a `usize`, e.g. to index back into the original input.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for PointId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A single 2D coordinate.
///
/// Key `0` is x and key `1` is y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord<N: IndexableNum> {
    /// x value
    pub x: N,
    /// y value
    pub y: N,
}

impl<N: IndexableNum> Coord<N> {
    /// Copy the x and y values out of any geo-traits coordinate.
    pub fn from_coord(coord: &impl CoordTrait<T = N>) -> Self {
        Self {
            x: coord.x(),
            y: coord.y(),
        }
    }
}

impl<N: IndexableNum> CoordTrait for Coord<N> {
    type T = N;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}

impl<N: IndexableNum> Coordinates for Coord<N> {
    type Key = usize;
    type Num = N;

    #[inline]
    fn coord(&self, key: &usize) -> N {
        self.nth_or_panic(*key)
    }
}
