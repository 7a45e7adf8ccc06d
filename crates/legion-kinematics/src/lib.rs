//! Three-joint leg kinematics for Legion.
//!
//! Converts leg-local foot sites to actuator angles and back. The solver is
//! pure and allocation-free so it can run for all four legs every tick.
//!
//! - [`Kinematics::to_joint_angles`] fails with [`KinematicsError::Unreachable`]
//!   outside the workspace
//! - [`Kinematics::clamp_to_workspace`] pulls a site back to the nearest
//!   reachable distance along the same direction
//! - [`Kinematics::solve`] combines both and clamps every joint to the
//!   actuator range, reporting each correction
//!
//! # Example
//!
//! ```
//! use legion_geometry::{GeometryConfig, LegId, Site};
//! use legion_kinematics::Kinematics;
//!
//! let ik = Kinematics::new(GeometryConfig::default());
//! let site = Site::new(62.0, 0.0, -50.0);
//! let angles = ik.to_joint_angles(site, LegId::FrontLeft)?;
//! let back = ik.to_site(angles, LegId::FrontLeft);
//! assert!(back.approx_eq(&site, 1e-3));
//! # Ok::<(), legion_kinematics::KinematicsError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod actuator;
pub mod angles;
pub mod error;
pub mod prelude;
pub mod solver;

pub use actuator::{ActuatorSink, ChannelActuator, ChannelSink, write_leg};
pub use angles::{ACTUATOR_MAX_DEG, ACTUATOR_MIN_DEG, JointAngles};
pub use error::KinematicsError;
pub use solver::{Kinematics, Solution, WorkspaceClamp};
