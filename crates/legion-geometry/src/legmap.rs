//! Fixed-size tables indexed by [`LegId`] and [`JointId`].
//!
//! The identifiers are closed enums, so lookups never go out of bounds and
//! no per-access validation is needed.

use core::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::ids::{JointId, LegId};

/// One value per leg, indexed by [`LegId`].
///
/// # Examples
///
/// ```
/// use legion_geometry::{LegId, LegMap};
///
/// let mut lifted = LegMap::splat(false);
/// lifted[LegId::RearLeft] = true;
/// assert_eq!(lifted.iter().filter(|(_, l)| **l).count(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegMap<T>([T; 4]);

impl<T> LegMap<T> {
    /// Wrap an array ordered by [`LegId::index`].
    pub const fn new(values: [T; 4]) -> Self {
        Self(values)
    }

    /// Build a map by calling `f` for every leg.
    pub fn from_fn(mut f: impl FnMut(LegId) -> T) -> Self {
        Self(LegId::ALL.map(&mut f))
    }

    /// Iterate legs with their values in index order.
    pub fn iter(&self) -> impl Iterator<Item = (LegId, &T)> {
        LegId::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate legs with mutable values in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (LegId, &mut T)> {
        LegId::ALL.into_iter().zip(self.0.iter_mut())
    }

    /// Transform every value.
    pub fn map<U>(self, mut f: impl FnMut(LegId, T) -> U) -> LegMap<U> {
        let mut legs = LegId::ALL.into_iter();
        LegMap(self.0.map(|value| {
            let leg = legs.next().unwrap_or(LegId::RearRight);
            f(leg, value)
        }))
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &[T; 4] {
        &self.0
    }
}

impl<T: Copy> LegMap<T> {
    /// Same value for every leg.
    pub const fn splat(value: T) -> Self {
        Self([value; 4])
    }
}

impl<T> Index<LegId> for LegMap<T> {
    type Output = T;

    #[inline]
    #[expect(clippy::indexing_slicing, reason = "LegId discriminants are 0..=3")]
    fn index(&self, leg: LegId) -> &T {
        &self.0[leg.index()]
    }
}

impl<T> IndexMut<LegId> for LegMap<T> {
    #[inline]
    #[expect(clippy::indexing_slicing, reason = "LegId discriminants are 0..=3")]
    fn index_mut(&mut self, leg: LegId) -> &mut T {
        &mut self.0[leg.index()]
    }
}

/// One value per joint, indexed by [`JointId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointMap<T>([T; 3]);

impl<T> JointMap<T> {
    /// Wrap an array ordered hip, thigh, knee.
    pub const fn new(values: [T; 3]) -> Self {
        Self(values)
    }

    /// Iterate joints with their values in index order.
    pub fn iter(&self) -> impl Iterator<Item = (JointId, &T)> {
        JointId::ALL.into_iter().zip(self.0.iter())
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &[T; 3] {
        &self.0
    }
}

impl<T> Index<JointId> for JointMap<T> {
    type Output = T;

    #[inline]
    #[expect(clippy::indexing_slicing, reason = "JointId discriminants are 0..=2")]
    fn index(&self, joint: JointId) -> &T {
        &self.0[joint.index()]
    }
}

impl<T> IndexMut<JointId> for JointMap<T> {
    #[inline]
    #[expect(clippy::indexing_slicing, reason = "JointId discriminants are 0..=2")]
    fn index_mut(&mut self, joint: JointId) -> &mut T {
        &mut self.0[joint.index()]
    }
}
