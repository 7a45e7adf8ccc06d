//! Robot configuration: dimensions, postures, speeds, limits and wiring.
//!
//! Every section deserializes with defaults for missing fields, so a config
//! file only needs to list what differs from the stock robot. The whole
//! configuration is validated once at load time and treated as immutable
//! afterwards.

use std::path::Path;

use legion_errors::{ConfigError, ValidationError};
use serde::{Deserialize, Serialize};

use crate::ids::{JointId, LegId};
use crate::legmap::{JointMap, LegMap};
use crate::site::Site;
use crate::turn::TurnGeometry;

/// Link lengths and body dimensions, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometryConfig {
    /// Coxa offset from the hip rotation axis to the thigh pivot
    pub length_a: f32,
    /// Thigh link
    pub length_b: f32,
    /// Shank link
    pub length_c: f32,
    /// Spacing between neighbouring hips
    pub length_side: f32,
    /// Foot height when the body rests on the ground
    pub z_absolute: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            length_a: 27.5,
            length_b: 55.0,
            length_c: 77.5,
            length_side: 71.0,
            z_absolute: -28.0,
        }
    }
}

impl GeometryConfig {
    /// Shortest reachable thigh-pivot-to-foot distance.
    pub fn min_reach(&self) -> f32 {
        (self.length_b - self.length_c).abs()
    }

    /// Longest reachable thigh-pivot-to-foot distance.
    pub fn max_reach(&self) -> f32 {
        self.length_b + self.length_c
    }

    /// Planar distance from the thigh pivot to the foot at `site`.
    pub fn planar_distance(&self, site: &Site) -> f32 {
        let v = site.horizontal_radius() - self.length_a;
        v.hypot(site.z)
    }

    /// Whether `site` lies inside the reachable workspace.
    pub fn is_reachable(&self, site: &Site) -> bool {
        let d = self.planar_distance(site);
        d >= self.min_reach() && d <= self.max_reach()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("length_a", self.length_a),
            ("length_b", self.length_b),
            ("length_c", self.length_c),
            ("length_side", self.length_side),
        ] {
            positive(field, value)?;
        }
        finite("z_absolute", self.z_absolute)
    }
}

/// Canonical postures: heights and foot offsets, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementConfig {
    /// Foot height while standing
    pub z_default: f32,
    /// Foot height while a leg is lifted
    pub z_up: f32,
    /// Foot height when seated
    pub z_boot: f32,
    /// Outward foot offset
    pub x_default: f32,
    /// Lateral sway applied during body shifts
    pub x_offset: f32,
    /// Rear-most foot position along the body
    pub y_start: f32,
    /// Step length along the body
    pub y_step: f32,
    /// Centred foot position along the body
    pub y_default: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            z_default: -50.0,
            z_up: -30.0,
            z_boot: -28.0,
            x_default: 62.0,
            x_offset: 0.0,
            y_start: 0.0,
            y_step: 40.0,
            y_default: 62.0,
        }
    }
}

impl MovementConfig {
    /// Standing posture: right feet forward by one step, left feet back.
    pub fn neutral_stance(&self) -> LegMap<Site> {
        self.stance_at(self.z_default)
    }

    /// Seated posture with the same foot layout as [`Self::neutral_stance`].
    pub fn boot_stance(&self) -> LegMap<Site> {
        self.stance_at(self.z_boot)
    }

    fn stance_at(&self, z: f32) -> LegMap<Site> {
        LegMap::from_fn(|leg| {
            if leg.is_left() {
                Site::new(self.x_default + self.x_offset, self.y_start, z)
            } else {
                Site::new(self.x_default - self.x_offset, self.y_start + self.y_step, z)
            }
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("z_default", self.z_default),
            ("z_up", self.z_up),
            ("z_boot", self.z_boot),
            ("x_default", self.x_default),
            ("x_offset", self.x_offset),
            ("y_start", self.y_start),
            ("y_default", self.y_default),
        ] {
            finite(field, value)?;
        }
        positive("y_step", self.y_step)?;
        if self.z_up <= self.z_default {
            return Err(ValidationError::constraint(
                "z_up must be above z_default so lifted feet clear the ground",
            ));
        }
        if self.z_boot <= self.z_default {
            return Err(ValidationError::constraint(
                "z_boot must be above z_default so sitting lowers the body",
            ));
        }
        Ok(())
    }
}

/// Per-motion rates in millimetres per tick, before the speed multiple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpeedConfig {
    /// Rate for in-place turning phases
    pub spot_turn_speed: f32,
    /// Rate for single-leg lift, swing and plant
    pub leg_move_speed: f32,
    /// Rate for four-leg body shifts
    pub body_move_speed: f32,
    /// Rate for standing up and sitting down
    pub stand_seat_speed: f32,
    /// Rate for slow pose adjustments during gestures
    pub pose_speed: f32,
    /// Base rate for the dance gesture
    pub dance_speed: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            spot_turn_speed: 5.0,
            leg_move_speed: 15.0,
            body_move_speed: 5.0,
            stand_seat_speed: 1.0,
            pose_speed: 1.0,
            dance_speed: 2.0,
        }
    }
}

impl SpeedConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("spot_turn_speed", self.spot_turn_speed),
            ("leg_move_speed", self.leg_move_speed),
            ("body_move_speed", self.body_move_speed),
            ("stand_seat_speed", self.stand_seat_speed),
            ("pose_speed", self.pose_speed),
            ("dance_speed", self.dance_speed),
        ] {
            positive(field, value)?;
        }
        Ok(())
    }
}

/// Accepted ranges for motion command parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandLimits {
    /// Largest step or repetition count
    pub max_steps: u32,
    /// Smallest speed multiple
    pub min_speed_multiple: f32,
    /// Largest speed multiple
    pub max_speed_multiple: f32,
    /// Largest body or head offset, in millimetres
    pub max_pose_offset: f32,
}

impl Default for CommandLimits {
    fn default() -> Self {
        Self {
            max_steps: 64,
            min_speed_multiple: 0.1,
            max_speed_multiple: 4.0,
            max_pose_offset: 30.0,
        }
    }
}

impl CommandLimits {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_steps == 0 {
            return Err(ValidationError::non_positive("max_steps", self.max_steps));
        }
        positive("min_speed_multiple", self.min_speed_multiple)?;
        positive("max_speed_multiple", self.max_speed_multiple)?;
        if self.min_speed_multiple > self.max_speed_multiple {
            return Err(ValidationError::constraint(
                "min_speed_multiple must not exceed max_speed_multiple",
            ));
        }
        positive("max_pose_offset", self.max_pose_offset)
    }
}

/// Fixed offsets used by the gesture sequences, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    /// Body shift away from the gesturing leg
    pub body_shift: f32,
    /// Foot height of a waving leg
    pub wave_height: f32,
    /// How far inward a shaking foot reaches from `x_default`
    pub shake_reach: f32,
    /// Upper foot height of a shake
    pub shake_high: f32,
    /// Lower foot height of a shake
    pub shake_low: f32,
    /// Extra crouch depth before dancing
    pub dance_drop: f32,
    /// Fore-aft sway amplitude while dancing
    pub dance_sway: f32,
    /// Head tilt while dancing
    pub dance_tilt: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            body_shift: 15.0,
            wave_height: 50.0,
            shake_reach: 30.0,
            shake_high: 55.0,
            shake_low: 10.0,
            dance_drop: 20.0,
            dance_sway: 20.0,
            dance_tilt: 30.0,
        }
    }
}

impl GestureConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("body_shift", self.body_shift),
            ("dance_drop", self.dance_drop),
            ("dance_sway", self.dance_sway),
            ("dance_tilt", self.dance_tilt),
        ] {
            positive(field, value)?;
        }
        for (field, value) in [
            ("wave_height", self.wave_height),
            ("shake_reach", self.shake_reach),
            ("shake_high", self.shake_high),
            ("shake_low", self.shake_low),
        ] {
            finite(field, value)?;
        }
        Ok(())
    }
}

/// Actuator channel for every joint of every leg.
///
/// # Examples
///
/// ```
/// use legion_geometry::{ChannelMap, JointId, LegId};
///
/// let channels = ChannelMap::default();
/// assert_eq!(channels.channel(LegId::FrontRight, JointId::Thigh), 0);
/// assert_eq!(channels.channel(LegId::FrontLeft, JointId::Hip), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelMap(LegMap<JointMap<u8>>);

impl Default for ChannelMap {
    fn default() -> Self {
        Self(LegMap::new([
            JointMap::new([10, 8, 9]),
            JointMap::new([2, 0, 1]),
            JointMap::new([14, 12, 13]),
            JointMap::new([6, 4, 5]),
        ]))
    }
}

impl ChannelMap {
    /// Build a map from explicit hip, thigh, knee channels per leg.
    pub fn new(channels: LegMap<JointMap<u8>>) -> Self {
        Self(channels)
    }

    /// Channel driving `joint` of `leg`.
    #[inline]
    pub fn channel(&self, leg: LegId, joint: JointId) -> u8 {
        self.0[leg][joint]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = [false; 256];
        for (_, joints) in self.0.iter() {
            for (_, &channel) in joints.iter() {
                let slot = seen
                    .get_mut(usize::from(channel))
                    .ok_or_else(|| ValidationError::constraint("channel index overflow"))?;
                if *slot {
                    return Err(ValidationError::duplicate("channels", channel));
                }
                *slot = true;
            }
        }
        Ok(())
    }
}

/// Control loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    /// Tick period in milliseconds
    pub tick_period_ms: u64,
    /// Idle ticks before the robot parks; zero disables parking
    pub rest_after_ticks: u32,
    /// Start seated instead of standing
    pub start_seated: bool,
    /// Speed multiple used when a command does not set one
    pub speed_multiple: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 20,
            rest_after_ticks: 500,
            start_seated: false,
            speed_multiple: 1.0,
        }
    }
}

impl ControlConfig {
    fn validate(&self, limits: &CommandLimits) -> Result<(), ValidationError> {
        if self.tick_period_ms == 0 {
            return Err(ValidationError::non_positive("tick_period_ms", 0));
        }
        if !(self.speed_multiple >= limits.min_speed_multiple
            && self.speed_multiple <= limits.max_speed_multiple)
        {
            return Err(ValidationError::out_of_range(
                "speed_multiple",
                self.speed_multiple,
                limits.min_speed_multiple,
                limits.max_speed_multiple,
            ));
        }
        Ok(())
    }
}

/// Complete robot configuration.
///
/// # Examples
///
/// ```
/// use legion_geometry::RobotConfig;
///
/// let config = RobotConfig::from_yaml_str("speeds:\n  leg_move_speed: 8.0\n")?;
/// assert!((config.speeds.leg_move_speed - 8.0).abs() < f32::EPSILON);
/// assert!((config.geometry.length_b - 55.0).abs() < f32::EPSILON);
/// # Ok::<(), legion_errors::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    /// Link lengths and body dimensions
    pub geometry: GeometryConfig,
    /// Canonical postures
    pub movement: MovementConfig,
    /// Per-motion rates
    pub speeds: SpeedConfig,
    /// Command parameter ranges
    pub limits: CommandLimits,
    /// Gesture offsets
    pub gestures: GestureConfig,
    /// Actuator wiring
    pub channels: ChannelMap,
    /// Control loop settings
    pub control: ControlConfig,
}

impl RobotConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RobotConfig =
            serde_yaml::from_str(text).map_err(|e| ConfigError::parse("yaml", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: RobotConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::parse("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::UnsupportedFormat`] for unknown extensions, and the
    /// parse or validation errors of the chosen format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::read(&shown, e))?;

        let result = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text),
            "json" => Self::from_json_str(&text),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        match result {
            Ok(config) => {
                tracing::info!(path = %shown, "Robot configuration loaded");
                Ok(config)
            }
            Err(ConfigError::Parse { reason, .. }) => Err(ConfigError::parse(shown, reason)),
            Err(e) => Err(e),
        }
    }

    /// Check every section and the reachability of the canonical postures.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, wrapped in
    /// [`ConfigError::Invalid`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry.validate()?;
        self.movement.validate()?;
        self.speeds.validate()?;
        self.limits.validate()?;
        self.gestures.validate()?;
        self.channels.validate()?;
        self.control.validate(&self.limits)?;
        self.validate_postures()?;
        Ok(())
    }

    fn validate_postures(&self) -> Result<(), ValidationError> {
        let m = &self.movement;
        let turn = TurnGeometry::derive(&self.geometry, m);
        if !turn.is_finite() {
            return Err(ValidationError::constraint(
                "turn geometry is degenerate for these dimensions",
            ));
        }
        let x_out = m.x_default + m.x_offset;
        let x_in = m.x_default - m.x_offset;
        let y_far = m.y_start + 2.0 * m.y_step;
        let neutral = m.neutral_stance();
        let boot = m.boot_stance();
        let stances = neutral
            .iter()
            .map(|(_, site)| ("neutral stance", *site))
            .chain(boot.iter().map(|(_, site)| ("boot stance", *site)));
        let strides = [x_out, x_in].into_iter().flat_map(|x| {
            [
                ("forward stance", Site::new(x, m.y_start + m.y_step, m.z_default)),
                ("far stance", Site::new(x, y_far, m.z_default)),
            ]
        });
        let swing = [
            ("swing apex", Site::new(x_out, m.y_start, m.z_up)),
            ("swing apex", Site::new(x_out, y_far, m.z_up)),
        ];
        let pivots = [
            ("turn pivot", turn.turn_x0, turn.turn_y0),
            ("turn counterpart", turn.turn_x1, turn.turn_y1),
        ]
        .into_iter()
        .flat_map(|(name, x, y)| {
            [x + m.x_offset, x - m.x_offset].into_iter().flat_map(move |x| {
                [(name, Site::new(x, y, m.z_default)), (name, Site::new(x, y, m.z_up))]
            })
        });
        let postures = stances.chain(strides).chain(swing).chain(pivots);
        for (name, site) in postures {
            if !self.geometry.is_reachable(&site) {
                return Err(ValidationError::constraint(format!(
                    "{name} {site} lies outside the leg workspace [{:.1}, {:.1}]",
                    self.geometry.min_reach(),
                    self.geometry.max_reach()
                )));
            }
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::non_positive(field, value));
    }
    Ok(())
}

fn finite(field: &str, value: f32) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::non_finite(field))
    }
}
