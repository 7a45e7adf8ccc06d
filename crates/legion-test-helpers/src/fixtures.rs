//! Stock configurations and sample sites.

use legion_geometry::{GeometryConfig, LegId, MovementConfig, RobotConfig, Site, TurnGeometry};
use legion_kinematics::Kinematics;

/// Default robot configuration.
pub fn robot_config() -> RobotConfig {
    RobotConfig::default()
}

/// Configuration that parks after `ticks` idle ticks.
pub fn config_with_rest(ticks: u32) -> RobotConfig {
    let mut config = RobotConfig::default();
    config.control.rest_after_ticks = ticks;
    config
}

/// Solver over the default geometry.
pub fn kinematics() -> Kinematics {
    Kinematics::new(GeometryConfig::default())
}

/// Turn constants of the default robot.
pub fn turn_geometry() -> TurnGeometry {
    TurnGeometry::derive(&GeometryConfig::default(), &MovementConfig::default())
}

/// Sites every leg visits during the stock gaits.
pub fn gait_sites() -> Vec<Site> {
    let m = MovementConfig::default();
    let t = turn_geometry();
    vec![
        Site::new(m.x_default, m.y_start, m.z_default),
        Site::new(m.x_default, m.y_start + m.y_step, m.z_default),
        Site::new(m.x_default, m.y_start + 2.0 * m.y_step, m.z_up),
        Site::new(m.x_default, m.y_start, m.z_up),
        Site::new(m.x_default, m.y_start + m.y_step, m.z_boot),
        Site::new(t.turn_x0, t.turn_y0, m.z_default),
        Site::new(t.turn_x1, t.turn_y1, m.z_default),
        Site::new(t.turn_x0, t.turn_y0, m.z_up),
    ]
}

/// Every leg paired with every gait site.
pub fn leg_site_pairs() -> Vec<(LegId, Site)> {
    LegId::ALL
        .into_iter()
        .flat_map(|leg| gait_sites().into_iter().map(move |site| (leg, site)))
        .collect()
}
