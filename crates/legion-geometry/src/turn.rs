//! In-place turning geometry.
//!
//! A turn step swings the body about the neighbouring hip. Seen from one
//! leg, a foot standing at `(turn_x1, turn_y1)` ends up at
//! `(turn_x0, turn_y0)` after the body segment of length `temp_b` rotates by
//! `temp_alpha` about that hip.

use crate::config::{GeometryConfig, MovementConfig};

/// Rotate `point` about `pivot` by `angle` radians, counter-clockwise.
///
/// # Examples
///
/// ```
/// use legion_geometry::rotate_about;
///
/// let (x, y) = rotate_about((2.0, 1.0), (1.0, 1.0), core::f32::consts::FRAC_PI_2);
/// assert!((x - 1.0).abs() < 1e-6);
/// assert!((y - 2.0).abs() < 1e-6);
/// ```
pub fn rotate_about(point: (f32, f32), pivot: (f32, f32), angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    let dx = point.0 - pivot.0;
    let dy = point.1 - pivot.1;
    (
        pivot.0 + dx * cos - dy * sin,
        pivot.1 + dx * sin + dy * cos,
    )
}

/// Derived turning constants, in millimetres and radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnGeometry {
    /// Diagonal from a foot at `y_step` to the far hip
    pub temp_a: f32,
    /// Body segment swung during one turn step
    pub temp_b: f32,
    /// Diagonal across the whole stance
    pub temp_c: f32,
    /// Body rotation per turn step
    pub temp_alpha: f32,
    /// Foot target after the body has turned
    pub turn_x0: f32,
    /// Foot target after the body has turned
    pub turn_y0: f32,
    /// Foot target before the body turns
    pub turn_x1: f32,
    /// Foot target before the body turns
    pub turn_y1: f32,
}

impl TurnGeometry {
    /// Compute the turning constants for a robot.
    pub fn derive(geometry: &GeometryConfig, movement: &MovementConfig) -> Self {
        let side = geometry.length_side;
        let span = 2.0 * movement.x_default + side;

        let temp_a = span.hypot(movement.y_step);
        let temp_b = 2.0 * (movement.y_start + movement.y_step) + side;
        let temp_c = span.hypot(2.0 * movement.y_start + movement.y_step + side);
        let cos_alpha = (temp_a * temp_a + temp_b * temp_b - temp_c * temp_c) / (2.0 * temp_a * temp_b);
        let temp_alpha = cos_alpha.clamp(-1.0, 1.0).acos();

        let turn_x1 = (temp_a - side) / 2.0;
        let turn_y1 = movement.y_start + movement.y_step / 2.0;

        let hip = (turn_x1, -(turn_y1 + side));
        let (turn_x0, turn_y0) = rotate_about((turn_x1 - temp_b, hip.1), hip, -temp_alpha);

        Self {
            temp_a,
            temp_b,
            temp_c,
            temp_alpha,
            turn_x0,
            turn_y0,
            turn_x1,
            turn_y1,
        }
    }

    /// The neighbouring hip the body swings about, in this leg's frame.
    pub fn swing_hip(&self, length_side: f32) -> (f32, f32) {
        (self.turn_x1, -(self.turn_y1 + length_side))
    }

    /// Body rotation per turn step, in degrees.
    pub fn step_degrees(&self) -> f32 {
        self.temp_alpha.to_degrees()
    }

    /// Whether every constant is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.temp_a,
            self.temp_b,
            self.temp_c,
            self.temp_alpha,
            self.turn_x0,
            self.turn_y0,
            self.turn_x1,
            self.turn_y1,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> TurnGeometry {
        TurnGeometry::derive(&GeometryConfig::default(), &MovementConfig::default())
    }

    #[test]
    fn test_stock_constants() {
        let t = stock();
        assert!((t.temp_a - 199.06).abs() < 0.01);
        assert!((t.temp_b - 151.0).abs() < 1e-4);
        assert!((t.temp_c - 224.38).abs() < 0.01);
        assert!((t.step_degrees() - 78.41).abs() < 0.01);
        assert!((t.turn_x1 - 64.03).abs() < 0.01);
        assert!((t.turn_y1 - 20.0).abs() < 1e-4);
        assert!((t.turn_x0 - 33.69).abs() < 0.01);
        assert!((t.turn_y0 - 56.92).abs() < 0.01);
    }

    #[test]
    fn test_pivot_matches_closed_form() {
        let t = stock();
        let side = GeometryConfig::default().length_side;
        let x0 = t.turn_x1 - t.temp_b * t.temp_alpha.cos();
        let y0 = t.temp_b * t.temp_alpha.sin() - t.turn_y1 - side;
        assert!((t.turn_x0 - x0).abs() < 1e-3);
        assert!((t.turn_y0 - y0).abs() < 1e-3);
    }

    #[test]
    fn test_rotating_back_recovers_swing_start() {
        let t = stock();
        let side = GeometryConfig::default().length_side;
        let hip = t.swing_hip(side);
        let (x, y) = rotate_about((t.turn_x0, t.turn_y0), hip, t.temp_alpha);
        assert!((x - (t.turn_x1 - t.temp_b)).abs() < 1e-3);
        assert!((y - hip.1).abs() < 1e-3);
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let (x, y) = rotate_about((12.5, -3.0), (1.0, 2.0), 0.0);
        assert!((x - 12.5).abs() < 1e-6);
        assert!((y + 3.0).abs() < 1e-6);
    }
}
