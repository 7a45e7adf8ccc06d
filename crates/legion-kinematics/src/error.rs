//! Kinematics errors.

use legion_errors::{LegionError, MotionFault};
use legion_geometry::LegId;

/// Reasons a site cannot be converted to joint angles.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    /// The foot is closer or further than the leg can reach
    #[error("{leg} site at distance {distance:.2} mm is outside the workspace [{min:.2}, {max:.2}]")]
    Unreachable {
        /// Leg the site was requested for
        leg: LegId,
        /// Thigh-pivot-to-foot distance of the request
        distance: f32,
        /// Shortest reachable distance
        min: f32,
        /// Longest reachable distance
        max: f32,
    },

    /// A coordinate is NaN or infinite
    #[error("{leg} site has a non-finite coordinate")]
    NonFiniteSite {
        /// Leg the site was requested for
        leg: LegId,
    },
}

impl KinematicsError {
    /// Fault code reported for this error.
    pub fn fault(&self) -> MotionFault {
        match self {
            KinematicsError::Unreachable { .. } => MotionFault::Unreachable,
            KinematicsError::NonFiniteSite { .. } => MotionFault::NonFiniteSite,
        }
    }

    /// Leg the error concerns.
    pub fn leg(&self) -> LegId {
        match self {
            KinematicsError::Unreachable { leg, .. } | KinematicsError::NonFiniteSite { leg } => {
                *leg
            }
        }
    }
}

impl From<KinematicsError> for LegionError {
    fn from(e: KinematicsError) -> Self {
        LegionError::Motion(e.fault())
    }
}
