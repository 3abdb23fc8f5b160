//! Waypoint following on top of a movement agent

use glam::Vec3;

/// What a path follower needs from the agent it drives
pub trait Trackable {
    /// Current world position
    fn position(&self) -> Vec3;

    /// Current velocity
    fn velocity(&self) -> Vec3;

    /// Has the agent reached the point it is tracking?
    fn has_arrived(&self) -> bool;

    /// Start tracking a new point
    fn track(&mut self, point: Vec3);
}

/// Walks an agent along a list of waypoints
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    waypoints: Vec<Vec3>,
    index: usize,
}

impl PathFollower {
    /// Create a follower. The first waypoint is where the agent already
    /// stands, so following starts at the second one.
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        let index = 1.min(waypoints.len().saturating_sub(1));
        Self { waypoints, index }
    }

    /// Waypoint currently targeted
    #[must_use]
    pub fn current_target(&self) -> Option<Vec3> {
        self.waypoints.get(self.index).copied()
    }

    /// Index of the current waypoint
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// All waypoints
    #[must_use]
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Is the current waypoint the last one?
    #[must_use]
    pub fn is_on_last(&self) -> bool {
        self.index + 1 >= self.waypoints.len()
    }

    /// Point the agent at the current waypoint
    pub fn start<T: Trackable + ?Sized>(&self, agent: &mut T) {
        if let Some(target) = self.current_target() {
            agent.track(target);
        }
    }

    /// Advance to the next waypoint once the agent has arrived.
    ///
    /// Returns the new target when the index moved. Stays on the final
    /// waypoint.
    pub fn update<T: Trackable + ?Sized>(&mut self, agent: &mut T) -> Option<Vec3> {
        if self.is_on_last() || !agent.has_arrived() {
            return None;
        }

        self.index += 1;
        let target = self.current_target()?;
        agent.track(target);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Dummy {
        tracked: Option<Vec3>,
        arrived: bool,
    }

    impl Trackable for Dummy {
        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }

        fn velocity(&self) -> Vec3 {
            Vec3::ZERO
        }

        fn has_arrived(&self) -> bool {
            self.arrived
        }

        fn track(&mut self, point: Vec3) {
            self.tracked = Some(point);
        }
    }

    #[test]
    fn test_starts_at_second_waypoint() {
        let follower = PathFollower::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z]);
        assert_eq!(follower.index(), 1);
        assert_eq!(follower.current_target(), Some(Vec3::X));

        let mut agent = Dummy::default();
        follower.start(&mut agent);
        assert_eq!(agent.tracked, Some(Vec3::X));
    }

    #[test]
    fn test_advances_only_on_arrival() {
        let mut follower = PathFollower::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z]);
        let mut agent = Dummy::default();

        assert_eq!(follower.update(&mut agent), None);
        assert_eq!(follower.index(), 1);

        agent.arrived = true;
        assert_eq!(follower.update(&mut agent), Some(Vec3::Z));
        assert_eq!(agent.tracked, Some(Vec3::Z));

        // No looping past the end
        assert_eq!(follower.update(&mut agent), None);
        assert_eq!(follower.index(), 2);
        assert!(follower.is_on_last());
    }

    #[test]
    fn test_degenerate_paths() {
        let empty = PathFollower::new(Vec::new());
        assert_eq!(empty.current_target(), None);
        assert!(empty.is_on_last());

        let single = PathFollower::new(vec![Vec3::Y]);
        assert_eq!(single.current_target(), Some(Vec3::Y));
        assert!(single.is_on_last());
    }
}
