//! Convenience re-exports for crates built on the geometry model.

pub use crate::{
    ARRIVAL_EPSILON, Axis, AxisTarget, JointId, JointMap, KEEP, LegId, LegMap, RobotConfig, Site,
    SiteTarget, TurnGeometry,
};
