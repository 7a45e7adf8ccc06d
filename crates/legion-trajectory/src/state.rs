//! The robot state aggregate shared by the sequencer and the interpolator.

use legion_geometry::{LegId, LegMap, MovementConfig, Site, SiteTarget};

/// Current and target foot positions plus motion scalars.
///
/// Owned by the controller and passed by reference to each component in
/// tick order. The sequencer writes targets, the interpolator moves
/// `site_now`, the rest controller counts idle ticks.
///
/// Every change to targets or rate bumps [`RobotState::generation`], which
/// tells the interpolator to re-plan from the current positions.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    site_now: LegMap<Site>,
    site_expect: LegMap<SiteTarget>,
    move_speed: f32,
    speed_multiple: f32,
    /// Consecutive idle ticks
    pub rest_counter: u32,
    generation: u64,
}

impl RobotState {
    /// Feet at `sites`, nothing moving.
    pub fn at(sites: LegMap<Site>) -> Self {
        Self {
            site_now: sites,
            site_expect: sites.map(|_, s| SiteTarget::to(s)),
            move_speed: 1.0,
            speed_multiple: 1.0,
            rest_counter: 0,
            generation: 0,
        }
    }

    /// Standing in the neutral stance.
    pub fn standing(movement: &MovementConfig) -> Self {
        Self::at(movement.neutral_stance())
    }

    /// Seated in the boot stance.
    pub fn seated(movement: &MovementConfig) -> Self {
        Self::at(movement.boot_stance())
    }

    /// Current foot positions.
    #[inline]
    pub fn site_now(&self) -> &LegMap<Site> {
        &self.site_now
    }

    /// Mutable foot positions, for the interpolator.
    #[inline]
    pub fn site_now_mut(&mut self) -> &mut LegMap<Site> {
        &mut self.site_now
    }

    /// Current targets.
    #[inline]
    pub fn site_expect(&self) -> &LegMap<SiteTarget> {
        &self.site_expect
    }

    /// Where every foot ends up once the current targets are reached.
    pub fn projected_sites(&self) -> LegMap<Site> {
        LegMap::from_fn(|leg| self.site_expect[leg].resolve(&self.site_now[leg]))
    }

    /// Replace every leg's target and the rate used to reach it.
    pub fn set_targets(&mut self, targets: LegMap<SiteTarget>, move_speed: f32) {
        self.site_expect = targets;
        self.move_speed = move_speed;
        self.bump();
    }

    /// Replace one leg's target, leaving the others and the rate as they are.
    pub fn set_target(&mut self, leg: LegId, target: SiteTarget) {
        self.site_expect[leg] = target;
        self.bump();
    }

    /// Base rate in millimetres per tick.
    #[inline]
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Change the base rate of the motion in progress.
    pub fn set_move_speed(&mut self, move_speed: f32) {
        self.move_speed = move_speed;
        self.bump();
    }

    /// Global rate multiplier.
    #[inline]
    pub fn speed_multiple(&self) -> f32 {
        self.speed_multiple
    }

    /// Change the global rate multiplier.
    pub fn set_speed_multiple(&mut self, speed_multiple: f32) {
        if speed_multiple.to_bits() != self.speed_multiple.to_bits() {
            self.speed_multiple = speed_multiple;
            self.bump();
        }
    }

    /// Effective rate: `move_speed * speed_multiple`.
    #[inline]
    pub fn rate(&self) -> f32 {
        self.move_speed * self.speed_multiple
    }

    /// Counter bumped on every target or rate change.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Teleport every foot to `sites` and target them in place.
    pub fn reset_to(&mut self, sites: LegMap<Site>) {
        self.site_now = sites;
        self.site_expect = sites.map(|_, s| SiteTarget::to(s));
        self.bump();
    }

    /// Whether every foot sits within `tolerance` of height `z`.
    pub fn all_feet_at_height(&self, z: f32, tolerance: f32) -> bool {
        self.site_now.iter().all(|(_, s)| (s.z - z).abs() <= tolerance)
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legion_geometry::KEEP;

    #[test]
    fn test_standing_targets_current_sites() {
        let movement = MovementConfig::default();
        let state = RobotState::standing(&movement);
        assert_eq!(state.projected_sites(), movement.neutral_stance());
        assert_eq!(state.generation(), 0);
        assert!(state.all_feet_at_height(movement.z_default, 1e-6));
    }

    #[test]
    fn test_target_changes_bump_generation() {
        let mut state = RobotState::seated(&MovementConfig::default());
        state.set_targets(LegMap::splat(SiteTarget::new(KEEP, KEEP, -50.0)), 1.0);
        state.set_target(LegId::FrontLeft, SiteTarget::HOLD);
        state.set_move_speed(5.0);
        assert_eq!(state.generation(), 3);

        state.set_speed_multiple(1.0);
        assert_eq!(state.generation(), 3);
        state.set_speed_multiple(2.0);
        assert_eq!(state.generation(), 4);
        assert!((state.rate() - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_projected_sites_respect_keep() {
        let movement = MovementConfig::default();
        let mut state = RobotState::standing(&movement);
        state.set_target(LegId::RearLeft, SiteTarget::new(KEEP, 80.0, KEEP));
        let projected = state.projected_sites();
        assert_eq!(projected[LegId::RearLeft], Site::new(62.0, 80.0, -50.0));
        assert_eq!(projected[LegId::FrontLeft], state.site_now()[LegId::FrontLeft]);
    }
}
