//! Leg-local positions and per-axis targets.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Distance below which an axis counts as arrived, in millimetres.
pub const ARRIVAL_EPSILON: f32 = 1e-3;

/// Marker for an axis that must not move.
pub const KEEP: AxisTarget = AxisTarget::Keep;

/// Cartesian axis of a leg-local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Outward from the body
    X,
    /// Along the body
    Y,
    /// Vertical, negative towards the ground
    Z,
}

impl Axis {
    /// All axes in order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Foot position in a leg-local frame, in millimetres.
///
/// The origin is the leg's hip rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Site {
    /// Outward offset
    pub x: f32,
    /// Forward offset
    pub y: f32,
    /// Height, negative below the hip
    pub z: f32,
}

impl Site {
    /// Create a site.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Read one axis.
    #[inline]
    pub fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Mutable access to one axis.
    #[inline]
    pub fn axis_mut(&mut self, axis: Axis) -> &mut f32 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// True when no coordinate is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Horizontal distance from the hip rotation axis.
    #[inline]
    pub fn horizontal_radius(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another site.
    pub fn distance_to(&self, other: &Site) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Whether every axis is within `tolerance` of `other`.
    pub fn approx_eq(&self, other: &Site, tolerance: f32) -> bool {
        Axis::ALL
            .iter()
            .all(|&a| (self.axis(a) - other.axis(a)).abs() <= tolerance)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Target for one axis of a site.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisTarget {
    /// Leave the axis where it is
    #[default]
    Keep,
    /// Move the axis to this coordinate
    To(f32),
}

impl AxisTarget {
    /// The coordinate, or `None` for [`KEEP`].
    #[inline]
    pub fn value(self) -> Option<f32> {
        match self {
            AxisTarget::Keep => None,
            AxisTarget::To(v) => Some(v),
        }
    }

    /// Whether this axis is marked [`KEEP`].
    #[inline]
    pub fn is_keep(self) -> bool {
        matches!(self, AxisTarget::Keep)
    }

    /// The coordinate, falling back to `current` for [`KEEP`].
    #[inline]
    pub fn resolve(self, current: f32) -> f32 {
        self.value().unwrap_or(current)
    }
}

impl From<f32> for AxisTarget {
    fn from(v: f32) -> Self {
        AxisTarget::To(v)
    }
}

/// Per-axis target for one leg.
///
/// # Examples
///
/// ```
/// use legion_geometry::{KEEP, Site, SiteTarget};
///
/// let lift = SiteTarget::new(KEEP, KEEP, -30.0);
/// let from = Site::new(62.0, 0.0, -50.0);
/// assert_eq!(lift.resolve(&from), Site::new(62.0, 0.0, -30.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteTarget {
    /// X target
    pub x: AxisTarget,
    /// Y target
    pub y: AxisTarget,
    /// Z target
    pub z: AxisTarget,
}

impl SiteTarget {
    /// Leave the whole leg where it is.
    pub const HOLD: SiteTarget = SiteTarget {
        x: AxisTarget::Keep,
        y: AxisTarget::Keep,
        z: AxisTarget::Keep,
    };

    /// Build a target from per-axis values or [`KEEP`].
    pub fn new(x: impl Into<AxisTarget>, y: impl Into<AxisTarget>, z: impl Into<AxisTarget>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// Target every axis of `site`.
    pub const fn to(site: Site) -> Self {
        Self {
            x: AxisTarget::To(site.x),
            y: AxisTarget::To(site.y),
            z: AxisTarget::To(site.z),
        }
    }

    /// Read one axis.
    #[inline]
    pub fn axis(&self, axis: Axis) -> AxisTarget {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// The site reached from `current` once every non-[`KEEP`] axis arrives.
    pub fn resolve(&self, current: &Site) -> Site {
        Site::new(
            self.x.resolve(current.x),
            self.y.resolve(current.y),
            self.z.resolve(current.z),
        )
    }

    /// Whether every axis is [`KEEP`].
    pub fn is_hold(&self) -> bool {
        self.x.is_keep() && self.y.is_keep() && self.z.is_keep()
    }
}

impl From<Site> for SiteTarget {
    fn from(site: Site) -> Self {
        SiteTarget::to(site)
    }
}
