//! Joint angles and the mapping between model and actuator frames.

use legion_geometry::{JointId, JointMap, LegId};

/// Lowest angle an actuator accepts, in degrees.
pub const ACTUATOR_MIN_DEG: f32 = 0.0;

/// Highest angle an actuator accepts, in degrees.
pub const ACTUATOR_MAX_DEG: f32 = 180.0;

/// Joint angles of one leg in the actuator frame, in degrees.
///
/// 90 degrees is the mechanical centre of every joint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointAngles {
    /// Hip rotation
    pub hip: f32,
    /// Thigh pitch
    pub thigh: f32,
    /// Knee pitch
    pub knee: f32,
}

impl JointAngles {
    /// All joints at their mechanical centre.
    pub const CENTERED: JointAngles = JointAngles {
        hip: 90.0,
        thigh: 90.0,
        knee: 90.0,
    };

    /// Create angles from hip, thigh and knee values.
    pub const fn new(hip: f32, thigh: f32, knee: f32) -> Self {
        Self { hip, thigh, knee }
    }

    /// Read one joint.
    #[inline]
    pub fn get(&self, joint: JointId) -> f32 {
        match joint {
            JointId::Hip => self.hip,
            JointId::Thigh => self.thigh,
            JointId::Knee => self.knee,
        }
    }

    /// Angles as a joint-indexed table.
    pub fn to_joint_map(self) -> JointMap<f32> {
        JointMap::new([self.hip, self.thigh, self.knee])
    }

    /// Whether every joint lies inside the actuator range.
    pub fn is_within_range(&self) -> bool {
        JointId::ALL.iter().all(|&j| {
            let a = self.get(j);
            (ACTUATOR_MIN_DEG..=ACTUATOR_MAX_DEG).contains(&a)
        })
    }

    /// Clamp every joint to the actuator range.
    ///
    /// Returns the clamped angles and which joints were corrected.
    pub fn clamped(self) -> (JointAngles, JointMap<bool>) {
        let clamp = |a: f32| a.clamp(ACTUATOR_MIN_DEG, ACTUATOR_MAX_DEG);
        let out = JointAngles::new(clamp(self.hip), clamp(self.thigh), clamp(self.knee));
        let moved = JointMap::new([
            (out.hip - self.hip).abs() > 0.0,
            (out.thigh - self.thigh).abs() > 0.0,
            (out.knee - self.knee).abs() > 0.0,
        ]);
        (out, moved)
    }
}

/// Geometric angles of one leg, in degrees.
///
/// `alpha` is the thigh elevation, `beta` the interior knee angle and
/// `gamma` the hip yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LegAngles {
    pub(crate) alpha: f64,
    pub(crate) beta: f64,
    pub(crate) gamma: f64,
}

/// Map geometric angles onto the actuators of `leg`.
pub(crate) fn to_actuator(leg: LegId, model: LegAngles) -> JointAngles {
    let (hip, thigh, knee) = if leg.is_mirrored() {
        (90.0 - model.gamma, 90.0 + model.alpha, 180.0 - model.beta)
    } else {
        (model.gamma + 90.0, 90.0 - model.alpha, model.beta)
    };
    JointAngles::new(hip as f32, thigh as f32, knee as f32)
}

/// Inverse of [`to_actuator`].
pub(crate) fn from_actuator(leg: LegId, angles: JointAngles) -> LegAngles {
    let hip = f64::from(angles.hip);
    let thigh = f64::from(angles.thigh);
    let knee = f64::from(angles.knee);
    if leg.is_mirrored() {
        LegAngles {
            alpha: thigh - 90.0,
            beta: 180.0 - knee,
            gamma: 90.0 - hip,
        }
    } else {
        LegAngles {
            alpha: 90.0 - thigh,
            beta: knee,
            gamma: hip - 90.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actuator_mapping_roundtrip() {
        let model = LegAngles {
            alpha: 28.5,
            beta: 51.25,
            gamma: -12.0,
        };
        for leg in LegId::ALL {
            let back = from_actuator(leg, to_actuator(leg, model));
            assert!((back.alpha - model.alpha).abs() < 1e-4);
            assert!((back.beta - model.beta).abs() < 1e-4);
            assert!((back.gamma - model.gamma).abs() < 1e-4);
        }
    }

    #[test]
    fn test_mirrored_legs_move_opposite() {
        let model = LegAngles {
            alpha: 10.0,
            beta: 60.0,
            gamma: 5.0,
        };
        let plain = to_actuator(LegId::FrontRight, model);
        let mirrored = to_actuator(LegId::FrontLeft, model);
        assert!((plain.thigh - 80.0).abs() < 1e-5);
        assert!((mirrored.thigh - 100.0).abs() < 1e-5);
        assert!((plain.hip - 95.0).abs() < 1e-5);
        assert!((mirrored.hip - 85.0).abs() < 1e-5);
        assert!((plain.knee - 60.0).abs() < 1e-5);
        assert!((mirrored.knee - 120.0).abs() < 1e-5);
    }

    #[test]
    fn test_clamped_reports_corrections() {
        let (out, moved) = JointAngles::new(-4.0, 90.0, 181.5).clamped();
        assert!((out.hip - 0.0).abs() < f32::EPSILON);
        assert!((out.knee - 180.0).abs() < f32::EPSILON);
        assert!(moved[JointId::Hip]);
        assert!(!moved[JointId::Thigh]);
        assert!(moved[JointId::Knee]);
        assert!(out.is_within_range());
    }

    #[test]
    fn test_nan_joint_is_not_in_range() {
        assert!(!JointAngles::new(f32::NAN, 90.0, 90.0).is_within_range());
    }
}
