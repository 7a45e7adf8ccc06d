//! Idle detection and automatic parking.

use legion_geometry::{ARRIVAL_EPSILON, RobotConfig};
use legion_trajectory::RobotState;
use tracing::info;

/// What the controller should do after an idle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestAction {
    /// Keep going
    None,
    /// Sit the robot down
    Park,
}

/// Counts consecutive idle ticks and asks for a sit once the robot has been
/// idle long enough.
///
/// # Examples
///
/// ```
/// use legion_gait::{RestAction, RestController};
/// use legion_geometry::MovementConfig;
/// use legion_trajectory::RobotState;
///
/// let movement = MovementConfig::default();
/// let mut rest = RestController::new(3, movement.z_boot);
/// let mut state = RobotState::standing(&movement);
///
/// assert_eq!(rest.on_tick(true, &mut state), RestAction::None);
/// assert_eq!(rest.on_tick(true, &mut state), RestAction::None);
/// assert_eq!(rest.on_tick(true, &mut state), RestAction::Park);
/// assert_eq!(rest.on_tick(true, &mut state), RestAction::None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RestController {
    rest_after_ticks: u32,
    z_boot: f32,
    parked: bool,
}

impl RestController {
    /// Park after `rest_after_ticks` idle ticks; `0` never parks.
    pub fn new(rest_after_ticks: u32, z_boot: f32) -> Self {
        Self {
            rest_after_ticks,
            z_boot,
            parked: false,
        }
    }

    /// Controller configured from `config.control` and `config.movement`.
    pub fn from_config(config: &RobotConfig) -> Self {
        Self::new(config.control.rest_after_ticks, config.movement.z_boot)
    }

    /// Idle ticks before parking.
    pub fn rest_after_ticks(&self) -> u32 {
        self.rest_after_ticks
    }

    /// Whether parking already happened since the last command.
    pub fn is_parked(&self) -> bool {
        self.parked
    }

    /// A command arrived this tick.
    pub fn on_command(&mut self, state: &mut RobotState) {
        state.rest_counter = 0;
        self.parked = false;
    }

    /// Observe one tick.
    ///
    /// `idle` means no command arrived this tick and the sequencer has
    /// nothing in progress. Any busy tick restarts the count.
    pub fn on_tick(&mut self, idle: bool, state: &mut RobotState) -> RestAction {
        if !idle {
            state.rest_counter = 0;
            return RestAction::None;
        }
        state.rest_counter = state.rest_counter.saturating_add(1);

        if self.parked || self.rest_after_ticks == 0 || state.rest_counter != self.rest_after_ticks {
            return RestAction::None;
        }
        self.parked = true;
        if state.all_feet_at_height(self.z_boot, ARRIVAL_EPSILON) {
            return RestAction::None;
        }
        info!(idle_ticks = state.rest_counter, "idle timeout, parking");
        RestAction::Park
    }
}

#[cfg(test)]
mod tests {
    use legion_geometry::MovementConfig;

    use super::*;

    #[test]
    fn test_parks_exactly_once() {
        let movement = MovementConfig::default();
        let mut rest = RestController::new(5, movement.z_boot);
        let mut state = RobotState::standing(&movement);
        let actions: Vec<_> = (0..20).map(|_| rest.on_tick(true, &mut state)).collect();
        let parks: Vec<_> = actions
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == RestAction::Park)
            .map(|(i, _)| i + 1)
            .collect();
        assert_eq!(parks, vec![5]);
        assert!(rest.is_parked());
    }

    #[test]
    fn test_busy_tick_restarts_count() {
        let movement = MovementConfig::default();
        let mut rest = RestController::new(3, movement.z_boot);
        let mut state = RobotState::standing(&movement);
        rest.on_tick(true, &mut state);
        rest.on_tick(true, &mut state);
        assert_eq!(rest.on_tick(false, &mut state), RestAction::None);
        assert_eq!(state.rest_counter, 0);
        rest.on_tick(true, &mut state);
        rest.on_tick(true, &mut state);
        assert_eq!(rest.on_tick(true, &mut state), RestAction::Park);
    }

    #[test]
    fn test_command_rearms() {
        let movement = MovementConfig::default();
        let mut rest = RestController::new(2, movement.z_boot);
        let mut state = RobotState::standing(&movement);
        rest.on_tick(true, &mut state);
        assert_eq!(rest.on_tick(true, &mut state), RestAction::Park);
        rest.on_command(&mut state);
        assert_eq!(state.rest_counter, 0);
        assert!(!rest.is_parked());
        rest.on_tick(true, &mut state);
        assert_eq!(rest.on_tick(true, &mut state), RestAction::Park);
    }

    #[test]
    fn test_already_seated_does_not_park() {
        let movement = MovementConfig::default();
        let mut rest = RestController::new(1, movement.z_boot);
        let mut state = RobotState::seated(&movement);
        assert_eq!(rest.on_tick(true, &mut state), RestAction::None);
        assert!(rest.is_parked());
    }

    #[test]
    fn test_zero_disables_parking() {
        let movement = MovementConfig::default();
        let mut rest = RestController::new(0, movement.z_boot);
        let mut state = RobotState::standing(&movement);
        assert!((0..1000).all(|_| rest.on_tick(true, &mut state) == RestAction::None));
    }
}
