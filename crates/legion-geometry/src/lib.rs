//! Leg identifiers, sites, robot dimensions and configuration for Legion.
//!
//! Everything in this crate is fixed at configuration time and shared
//! read-only by the kinematics solver, the trajectory interpolator and the
//! gait sequencer.
//!
//! # Modules
//!
//! - [`ids`]: [`LegId`] and [`JointId`]
//! - [`legmap`]: fixed arrays indexed by leg or joint
//! - [`site`]: leg-local positions and per-axis targets with [`KEEP`]
//! - [`config`]: [`RobotConfig`] and its sections, with YAML/JSON loading
//! - [`turn`]: derived in-place turning geometry
//!
//! # Example
//!
//! ```
//! use legion_geometry::{LegId, RobotConfig, TurnGeometry};
//!
//! let config = RobotConfig::default();
//! config.validate()?;
//!
//! let stance = config.movement.neutral_stance();
//! assert!(stance[LegId::FrontLeft].y < stance[LegId::FrontRight].y);
//!
//! let turn = TurnGeometry::derive(&config.geometry, &config.movement);
//! assert!(turn.turn_x0 < turn.turn_x1);
//! # Ok::<(), legion_errors::ConfigError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod ids;
pub mod legmap;
pub mod prelude;
pub mod site;
pub mod turn;

pub use config::{
    ChannelMap, CommandLimits, ControlConfig, GeometryConfig, GestureConfig, MovementConfig,
    RobotConfig, SpeedConfig,
};
pub use ids::{JointId, LegId};
pub use legmap::{JointMap, LegMap};
pub use site::{ARRIVAL_EPSILON, Axis, AxisTarget, KEEP, Site, SiteTarget};
pub use turn::{TurnGeometry, rotate_about};
