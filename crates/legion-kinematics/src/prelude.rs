//! Convenience re-exports for kinematics users.

pub use crate::{
    ActuatorSink, JointAngles, Kinematics, KinematicsError, Solution, WorkspaceClamp, write_leg,
};
