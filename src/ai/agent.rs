//! Movement agents driven by steering behaviors

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::follower::Trackable;
use super::steering::{
    AgentView, Arrive, Behavior, BehaviorKind, SteeringBehavior, SteeringOutput, wrap_angle,
};

/// How an agent turns behavior outputs into motion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionModel {
    /// Velocity is set directly from the averaged desired velocities
    Kinematic,
    /// Accelerations are summed and integrated
    #[default]
    Steering,
}

/// What an agent is tracking
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Point(Vec3),
    /// Another entity, resolved by the session every tick
    Entity(hecs::Entity),
}

/// Active behaviors of an agent, at most one per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviorSet {
    active: SmallVec<[Behavior; 4]>,
}

impl BehaviorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a behavior, replacing any active one of the same kind
    pub fn insert(&mut self, behavior: Behavior) {
        let kind = behavior.kind();
        match self.active.iter_mut().find(|b| b.kind() == kind) {
            Some(existing) => *existing = behavior,
            None => self.active.push(behavior),
        }
    }

    pub fn remove(&mut self, kind: BehaviorKind) -> Option<Behavior> {
        let index = self.active.iter().position(|b| b.kind() == kind)?;
        Some(self.active.remove(index))
    }

    pub fn contains(&self, kind: BehaviorKind) -> bool {
        self.active.iter().any(|b| b.kind() == kind)
    }

    pub fn get(&self, kind: BehaviorKind) -> Option<&Behavior> {
        self.active.iter().find(|b| b.kind() == kind)
    }

    /// The active arrive behavior, if any
    pub fn arrive(&self) -> Option<&Arrive> {
        self.active.iter().find_map(|b| match b {
            Behavior::Arrive(arrive) => Some(arrive),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Swap the whole set for `behaviors`
    pub fn replace(&mut self, behaviors: impl IntoIterator<Item = Behavior>) {
        self.clear();
        for behavior in behaviors {
            self.insert(behavior);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Behavior> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    fn prepare<R: Rng + ?Sized>(&mut self, view: &AgentView, dt: f32, rng: &mut R) {
        for behavior in &mut self.active {
            if let Behavior::Wander(wander) = behavior {
                let delta = rng.gen_range(-1.0..=1.0);
                wander.update(view, dt, delta);
            }
        }
    }

    /// Average of the kinematic outputs, or None when nothing is active
    fn kinematic_average(&self, view: &AgentView) -> Option<SteeringOutput> {
        if self.active.is_empty() {
            return None;
        }
        let total = self
            .active
            .iter()
            .fold(SteeringOutput::ZERO, |acc, b| acc.combine(b.kinematic(view)));
        Some(total.scale(1.0 / self.active.len() as f32))
    }

    fn steering_sum(&self, view: &AgentView) -> SteeringOutput {
        self.active
            .iter()
            .fold(SteeringOutput::ZERO, |acc, b| acc.combine(b.steering(view)))
    }
}

impl FromIterator<Behavior> for BehaviorSet {
    fn from_iter<I: IntoIterator<Item = Behavior>>(iter: I) -> Self {
        let mut set = Self::new();
        set.replace(iter);
        set
    }
}

/// A moving agent on the XZ plane
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading in radians around +Y, 0 facing +Z
    pub yaw: f32,
    pub max_speed: f32,
    /// Largest heading change per second under the steering model
    pub max_degrees_delta: f32,
    pub model: MotionModel,
    pub behaviors: BehaviorSet,
    /// Positions past +-bound on X or Z wrap to the opposite side
    pub bound: Option<f32>,
    target: Option<Target>,
    target_position: Vec3,
    target_velocity: Vec3,
}

impl Agent {
    pub fn new(position: Vec3, max_speed: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            max_speed,
            max_degrees_delta: 360.0,
            model: MotionModel::default(),
            behaviors: BehaviorSet::new(),
            bound: None,
            target: None,
            target_position: position,
            target_velocity: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: MotionModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_turn_rate(mut self, max_degrees_delta: f32) -> Self {
        self.max_degrees_delta = max_degrees_delta;
        self
    }

    #[must_use]
    pub fn with_bound(mut self, bound: Option<f32>) -> Self {
        self.bound = bound;
        self
    }

    #[must_use]
    pub fn with_behaviors(mut self, behaviors: impl IntoIterator<Item = Behavior>) -> Self {
        self.behaviors.replace(behaviors);
        self
    }

    /// Change motion model and behaviors together
    pub fn switch_to(&mut self, model: MotionModel, behaviors: impl IntoIterator<Item = Behavior>) {
        log::debug!("Agent switching to {:?}", model);
        self.model = model;
        self.behaviors.replace(behaviors);
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn set_target(&mut self, target: Target) {
        self.target = Some(target);
        if let Target::Point(point) = target {
            self.target_position = point;
            self.target_velocity = Vec3::ZERO;
        }
    }

    pub fn clear_target(&mut self) {
        self.target = None;
        self.target_velocity = Vec3::ZERO;
    }

    /// Feed the current state of an entity target
    pub fn resolve_target(&mut self, position: Vec3, velocity: Vec3) {
        self.target_position = position;
        self.target_velocity = velocity;
    }

    /// What the behaviors see this tick
    pub fn view(&self) -> AgentView {
        let tracking = self.target.is_some();
        AgentView {
            position: self.position,
            velocity: self.velocity,
            yaw: self.yaw,
            max_speed: self.max_speed,
            target_position: if tracking { self.target_position } else { self.position },
            target_velocity: if tracking { self.target_velocity } else { Vec3::ZERO },
        }
    }

    /// Advance the agent by `dt` seconds
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        let view = self.view();
        self.behaviors.prepare(&view, dt, rng);
        let view = self.view();

        match self.model {
            MotionModel::Kinematic => {
                // No behaviors keeps the previous velocity and heading
                if let Some(average) = self.behaviors.kinematic_average(&view) {
                    self.velocity = average.linear.normalize_or_zero() * self.max_speed;
                    self.yaw = wrap_angle(average.angular);
                }
            }
            MotionModel::Steering => {
                let output = self.behaviors.steering_sum(&view);
                self.velocity =
                    (self.velocity + output.linear * dt).clamp_length_max(self.max_speed);

                let max_turn = self.max_degrees_delta.to_radians() * dt;
                self.yaw = wrap_angle(self.yaw + output.angular.clamp(-max_turn, max_turn));
            }
        }

        self.position += self.velocity * dt;
        if let Some(bound) = self.bound {
            self.position.x = wrap_axis(self.position.x, bound);
            self.position.z = wrap_axis(self.position.z, bound);
        }
    }
}

fn wrap_axis(value: f32, bound: f32) -> f32 {
    if value < -bound {
        bound - 1.0
    } else if value > bound {
        -bound + 1.0
    } else {
        value
    }
}

impl Trackable for Agent {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn has_arrived(&self) -> bool {
        self.behaviors
            .arrive()
            .is_some_and(|arrive| arrive.has_arrived(&self.view()))
    }

    fn track(&mut self, point: Vec3) {
        self.set_target(Target::Point(point));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::steering::{LookWhereYouAreGoing, Seek, Stop, Wander};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn test_behavior_set_one_per_kind() {
        let mut set = BehaviorSet::new();
        set.insert(Behavior::Arrive(Arrive::new(2.0, 0.5)));
        set.insert(Behavior::Arrive(Arrive::new(3.0, 0.5)));
        set.insert(Behavior::Seek(Seek));

        assert_eq!(set.len(), 2);
        assert_eq!(set.arrive().map(|a| a.slow_radius), Some(3.0));

        assert!(set.remove(BehaviorKind::Seek).is_some());
        assert!(!set.contains(BehaviorKind::Seek));
        assert!(set.remove(BehaviorKind::Seek).is_none());
    }

    #[test]
    fn test_kinematic_seek_moves_at_max_speed() {
        let mut agent = Agent::new(Vec3::ZERO, 4.0)
            .with_model(MotionModel::Kinematic)
            .with_behaviors([Behavior::Seek(Seek)]);
        agent.set_target(Target::Point(Vec3::new(10.0, 0.0, 0.0)));

        agent.update(0.5, &mut rng());

        assert!((agent.velocity - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
        assert!((agent.position.x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_kinematic_without_behaviors_keeps_velocity() {
        let mut agent = Agent::new(Vec3::ZERO, 4.0).with_model(MotionModel::Kinematic);
        agent.velocity = Vec3::new(0.0, 0.0, 1.0);

        agent.update(1.0, &mut rng());

        assert_eq!(agent.velocity, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(agent.position, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_steering_clamps_speed() {
        let mut agent = Agent::new(Vec3::ZERO, 2.0).with_behaviors([Behavior::Seek(Seek)]);
        agent.set_target(Target::Point(Vec3::new(100.0, 0.0, 0.0)));

        for _ in 0..20 {
            agent.update(0.5, &mut rng());
        }
        assert!(agent.velocity.length() <= 2.0 + 1e-4);
        assert!(agent.position.x > 0.0);
    }

    #[test]
    fn test_steering_limits_turn_rate() {
        let mut agent = Agent::new(Vec3::ZERO, 2.0)
            .with_turn_rate(90.0)
            .with_behaviors([Behavior::LookWhereYouAreGoing(LookWhereYouAreGoing)]);
        agent.velocity = Vec3::new(0.0, 0.0, -1.0);

        agent.update(0.5, &mut rng());

        assert!((agent.yaw.abs() - 45f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_stop_brakes() {
        let mut agent = Agent::new(Vec3::ZERO, 2.0).with_behaviors([Behavior::Stop(Stop)]);
        agent.velocity = Vec3::new(1.0, 0.0, 0.0);

        agent.update(1.0, &mut rng());

        assert!(agent.velocity.length() < 1e-4);
    }

    #[test]
    fn test_wander_keeps_moving() {
        let mut agent = Agent::new(Vec3::ZERO, 3.0)
            .with_model(MotionModel::Kinematic)
            .with_behaviors([Behavior::Wander(Wander::new(45.0, 0.1))]);
        let mut rng = rng();

        for _ in 0..10 {
            agent.update(0.2, &mut rng);
        }
        assert!((agent.velocity.length() - 3.0).abs() < 1e-3);
        assert_ne!(agent.position, Vec3::ZERO);
    }

    #[test]
    fn test_position_wraps_at_bound() {
        let mut agent = Agent::new(Vec3::new(39.5, 0.0, -39.5), 2.0)
            .with_model(MotionModel::Kinematic)
            .with_bound(Some(40.0));
        agent.velocity = Vec3::new(1.0, 0.0, -1.0);

        agent.update(1.0, &mut rng());

        assert_eq!(agent.position.x, -39.0);
        assert_eq!(agent.position.z, 39.0);
    }

    #[test]
    fn test_has_arrived_needs_arrive() {
        let mut agent = Agent::new(Vec3::ZERO, 2.0);
        agent.track(Vec3::new(0.1, 0.0, 0.0));
        assert!(!agent.has_arrived());

        agent.switch_to(MotionModel::Steering, [Behavior::Arrive(Arrive::new(2.0, 0.25))]);
        assert!(agent.has_arrived());

        agent.track(Vec3::new(5.0, 0.0, 0.0));
        assert!(!agent.has_arrived());
    }

    #[test]
    fn test_untracked_view_targets_self() {
        let mut agent = Agent::new(Vec3::new(1.0, 0.0, 2.0), 2.0);
        assert_eq!(agent.view().target_position, agent.position);

        agent.set_target(Target::Point(Vec3::X));
        agent.clear_target();
        assert_eq!(agent.view().target_position, agent.position);
    }
}
