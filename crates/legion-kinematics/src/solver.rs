//! Site to joint angle conversion and back.
//!
//! Each leg is a yawing hip, a coxa offset `length_a`, and a planar
//! two-link arm (`length_b`, `length_c`) pitching about the thigh pivot.
//! Given a foot site, the hip yaw comes from the horizontal projection, and
//! the thigh and knee from the law of cosines over the triangle formed by
//! both links and the pivot-to-foot distance `d`.
//!
//! Trigonometry runs in `f64` and is narrowed to `f32` at the boundary.

use legion_errors::MotionFault;
use legion_geometry::{GeometryConfig, JointId, JointMap, LegId, Site};

use crate::angles::{JointAngles, LegAngles, from_actuator, to_actuator};
use crate::error::KinematicsError;

/// Result of pulling a site back into the workspace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceClamp {
    /// Site inside the workspace
    pub site: Site,
    /// Pivot-to-foot distance of the original request
    pub requested_distance: f32,
    /// Pivot-to-foot distance after clamping
    pub clamped_distance: f32,
    /// Whether the site had to move
    pub clamped: bool,
}

/// Safe per-tick solution for one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Angles to send to the actuators, inside `[0, 180]`
    pub angles: JointAngles,
    /// Angles before range clamping
    pub raw: JointAngles,
    /// Workspace correction applied before solving
    pub workspace: WorkspaceClamp,
    /// Joints whose angle was clamped to the actuator range
    pub joint_clamps: JointMap<bool>,
}

impl Solution {
    /// Whether the site was solved without any correction.
    pub fn is_clean(&self) -> bool {
        !self.workspace.clamped && !self.joint_clamps.iter().any(|(_, c)| *c)
    }

    /// Faults raised while producing this solution, at most one of each kind.
    pub fn faults(&self) -> impl Iterator<Item = MotionFault> {
        let unreachable = self.workspace.clamped.then_some(MotionFault::Unreachable);
        let out_of_range = self
            .joint_clamps
            .iter()
            .any(|(_, c)| *c)
            .then_some(MotionFault::JointOutOfRange);
        unreachable.into_iter().chain(out_of_range)
    }

    /// Joints that were clamped to the actuator range.
    pub fn clamped_joints(&self) -> impl Iterator<Item = JointId> + '_ {
        self.joint_clamps
            .iter()
            .filter_map(|(joint, clamped)| clamped.then_some(joint))
    }
}

/// Pure leg kinematics for one robot geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Kinematics {
    geometry: GeometryConfig,
}

impl Kinematics {
    /// Create a solver for the given link lengths.
    pub fn new(geometry: GeometryConfig) -> Self {
        Self { geometry }
    }

    /// Link lengths and body dimensions.
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Convert a site to actuator-frame joint angles.
    ///
    /// The angles are not clamped to the actuator range; see
    /// [`Kinematics::solve`] for the clamped pipeline.
    ///
    /// # Errors
    ///
    /// - [`KinematicsError::NonFiniteSite`] if any coordinate is NaN or infinite
    /// - [`KinematicsError::Unreachable`] if the pivot-to-foot distance lies
    ///   outside `[|length_b - length_c|, length_b + length_c]`
    pub fn to_joint_angles(&self, site: Site, leg: LegId) -> Result<JointAngles, KinematicsError> {
        if !site.is_finite() {
            return Err(KinematicsError::NonFiniteSite { leg });
        }
        let distance = self.geometry.planar_distance(&site);
        let (min, max) = (self.geometry.min_reach(), self.geometry.max_reach());
        if !(distance >= min && distance <= max) || distance <= 0.0 {
            return Err(KinematicsError::Unreachable {
                leg,
                distance,
                min,
                max,
            });
        }
        Ok(to_actuator(leg, self.model_angles(site)))
    }

    /// Convert actuator-frame joint angles back to the site they reach.
    pub fn to_site(&self, angles: JointAngles, leg: LegId) -> Site {
        let model = from_actuator(leg, angles);
        let (a, b, c) = self.links();

        let beta = model.beta.to_radians();
        let d = (b * b + c * c - 2.0 * b * c * beta.cos()).max(0.0).sqrt();
        let phi = if d > f64::EPSILON {
            acos_clamped((b * b - c * c + d * d) / (2.0 * b * d))
        } else {
            0.0
        };
        let elevation = model.alpha.to_radians() - phi;
        let v = d * elevation.cos();
        let z = d * elevation.sin();
        let r = v + a;
        let gamma = model.gamma.to_radians();

        Site::new((r * gamma.cos()) as f32, (r * gamma.sin()) as f32, z as f32)
    }

    /// Pull a site back to the nearest reachable distance along the same direction.
    ///
    /// The pivot-to-foot vector `(v, z)` is scaled to the boundary; the hip
    /// yaw is preserved. A foot exactly on the pivot is pushed outward.
    pub fn clamp_to_workspace(&self, site: Site) -> WorkspaceClamp {
        let a = f64::from(self.geometry.length_a);
        let (x, y, z) = (f64::from(site.x), f64::from(site.y), f64::from(site.z));
        let r = x.hypot(y);
        let v = r - a;
        let d = v.hypot(z);
        let min = f64::from(self.geometry.min_reach());
        let max = f64::from(self.geometry.max_reach());

        if d >= min && d <= max && d > 0.0 {
            return WorkspaceClamp {
                site,
                requested_distance: d as f32,
                clamped_distance: d as f32,
                clamped: false,
            };
        }

        let target = d.clamp(min, max).max(f64::EPSILON);
        let (unit_v, unit_z) = if d > f64::EPSILON { (v / d, z / d) } else { (1.0, 0.0) };
        let new_v = unit_v * target;
        let new_z = unit_z * target;
        let new_r = new_v + a;
        let (unit_x, unit_y) = if r > f64::EPSILON { (x / r, y / r) } else { (1.0, 0.0) };

        let clamped = Site::new(
            (unit_x * new_r) as f32,
            (unit_y * new_r) as f32,
            new_z as f32,
        );
        WorkspaceClamp {
            site: clamped,
            requested_distance: d as f32,
            clamped_distance: target as f32,
            clamped: true,
        }
    }

    /// Clamp to the workspace, solve, and clamp every joint to the actuator range.
    ///
    /// # RT Safety
    ///
    /// Allocation-free and bounded; safe to call for every leg every tick.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::NonFiniteSite`] if the site cannot be
    /// interpreted at all. Every other problem is corrected and reported in
    /// the returned [`Solution`].
    pub fn solve(&self, site: Site, leg: LegId) -> Result<Solution, KinematicsError> {
        if !site.is_finite() {
            return Err(KinematicsError::NonFiniteSite { leg });
        }
        let workspace = self.clamp_to_workspace(site);
        let raw = to_actuator(leg, self.model_angles(workspace.site));
        let (angles, joint_clamps) = raw.clamped();
        Ok(Solution {
            angles,
            raw,
            workspace,
            joint_clamps,
        })
    }

    /// Geometric angles for a site, without a reach check.
    ///
    /// `acos` arguments are clamped so boundary sites that drift by
    /// rounding still produce finite angles.
    fn model_angles(&self, site: Site) -> LegAngles {
        let (a, b, c) = self.links();
        let (x, y, z) = (f64::from(site.x), f64::from(site.y), f64::from(site.z));
        let v = x.hypot(y) - a;
        let d = v.hypot(z).max(f64::EPSILON);

        let alpha = z.atan2(v) + acos_clamped((b * b - c * c + d * d) / (2.0 * b * d));
        let beta = acos_clamped((b * b + c * c - d * d) / (2.0 * b * c));
        let gamma = y.atan2(x);

        LegAngles {
            alpha: alpha.to_degrees(),
            beta: beta.to_degrees(),
            gamma: gamma.to_degrees(),
        }
    }

    fn links(&self) -> (f64, f64, f64) {
        (
            f64::from(self.geometry.length_a),
            f64::from(self.geometry.length_b),
            f64::from(self.geometry.length_c),
        )
    }
}

fn acos_clamped(cos: f64) -> f64 {
    cos.clamp(-1.0, 1.0).acos()
}
