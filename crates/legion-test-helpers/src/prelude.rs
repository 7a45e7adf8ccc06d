//! Convenience re-exports for common test utilities.

pub use crate::must::{must, must_err, must_some, must_with};

#[cfg(feature = "tracking")]
pub use crate::tracking::{AllocationGuard, track};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{
    config_with_rest, gait_sites, kinematics, leg_site_pairs, robot_config, turn_geometry,
};

#[cfg(feature = "mock")]
pub use crate::mock::{ActuatorWrite, RecordingActuator, RecordingChannels, RecordingTraceSink};

pub use crate::{assert_approx_eq, assert_site_approx_eq};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
