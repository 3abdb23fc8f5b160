//! Steering behaviors for AI movement
//!
//! Every behavior offers two outputs. The kinematic output is a desired
//! velocity plus an absolute heading; the steering output is an
//! acceleration plus a heading change. Headings are yaw angles in radians
//! around +Y, with yaw 0 facing +Z.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

/// Output from a steering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringOutput {
    /// Desired velocity (kinematic) or acceleration (steering)
    pub linear: Vec3,
    /// Absolute yaw (kinematic) or yaw change (steering)
    pub angular: f32,
}

impl SteeringOutput {
    /// Zero steering
    pub const ZERO: Self = Self {
        linear: Vec3::ZERO,
        angular: 0.0,
    };

    /// Combine with another steering output
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            linear: self.linear + other.linear,
            angular: self.angular + other.angular,
        }
    }

    /// Scale the output
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self {
            linear: self.linear * factor,
            angular: self.angular * factor,
        }
    }
}

/// Snapshot of an agent and its target that behaviors read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub max_speed: f32,
    /// Tracked point, or the agent's own position when nothing is tracked
    pub target_position: Vec3,
    pub target_velocity: Vec3,
}

/// Yaw that faces along `direction` on the XZ plane
#[must_use]
pub fn heading(direction: Vec3) -> Option<f32> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    (flat.length_squared() > f32::EPSILON).then(|| flat.x.atan2(flat.z))
}

/// Unit forward vector for a yaw
#[must_use]
pub fn forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Wrap an angle into (-PI, PI]
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Trait for steering behaviors
pub trait SteeringBehavior {
    /// Desired velocity and absolute heading
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput;

    /// Acceleration and heading change
    fn steering(&self, agent: &AgentView) -> SteeringOutput;
}

fn toward(from: Vec3, to: Vec3, speed: f32) -> Vec3 {
    (to - from).normalize_or_zero() * speed
}

/// Seek behavior - move towards the target
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Seek;

impl SteeringBehavior for Seek {
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: toward(agent.position, agent.target_position, agent.max_speed),
            angular: agent.yaw,
        }
    }

    fn steering(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: self.kinematic(agent).linear - agent.velocity,
            angular: 0.0,
        }
    }
}

/// Flee behavior - move away from the target
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flee;

impl SteeringBehavior for Flee {
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: toward(agent.target_position, agent.position, agent.max_speed),
            angular: agent.yaw,
        }
    }

    fn steering(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: self.kinematic(agent).linear - agent.velocity,
            angular: 0.0,
        }
    }
}

/// Arrive behavior - move towards the target and slow down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrive {
    /// Distance at which the agent starts slowing
    pub slow_radius: f32,
    /// Distance counted as arrived
    pub stop_radius: f32,
}

impl Arrive {
    /// Create a new arrive behavior
    #[must_use]
    pub fn new(slow_radius: f32, stop_radius: f32) -> Self {
        Self {
            slow_radius,
            stop_radius,
        }
    }

    /// Is the agent within the stop radius of its target?
    #[must_use]
    pub fn has_arrived(&self, agent: &AgentView) -> bool {
        agent.position.distance(agent.target_position) <= self.stop_radius
    }
}

impl Default for Arrive {
    fn default() -> Self {
        Self::new(2.0, 0.25)
    }
}

impl SteeringBehavior for Arrive {
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput {
        let distance = agent.position.distance(agent.target_position);
        let mut desired = toward(agent.position, agent.target_position, agent.max_speed);

        if distance <= self.stop_radius {
            desired = Vec3::ZERO;
        } else if distance < self.slow_radius {
            desired *= distance / self.slow_radius;
        }

        SteeringOutput {
            linear: desired,
            angular: agent.yaw,
        }
    }

    fn steering(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: self.kinematic(agent).linear - agent.velocity,
            angular: 0.0,
        }
    }
}

/// Pursue behavior - seek where the target will be
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pursue;

impl Pursue {
    /// Predicted target position, looking ahead a tenth of the distance
    #[must_use]
    pub fn predicted_target(agent: &AgentView) -> Vec3 {
        let ahead = agent.position.distance(agent.target_position) / 10.0;
        agent.target_position + agent.target_velocity * ahead
    }
}

impl SteeringBehavior for Pursue {
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: toward(agent.position, Self::predicted_target(agent), agent.max_speed),
            angular: agent.yaw,
        }
    }

    fn steering(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: self.kinematic(agent).linear - agent.velocity,
            angular: 0.0,
        }
    }
}

/// Wander behavior - random drift
///
/// The heading is re-rolled every `interval` seconds by `update`; between
/// rolls the last desired velocity is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wander {
    /// Largest heading change per roll, in degrees
    pub degrees_delta: f32,
    /// Seconds between rolls
    pub interval: f32,
    timer: f32,
    direction: Vec3,
    desired: Vec3,
}

impl Wander {
    /// Create a new wander behavior
    #[must_use]
    pub fn new(degrees_delta: f32, interval: f32) -> Self {
        Self {
            degrees_delta,
            interval: interval.max(0.0),
            timer: 0.0,
            direction: Vec3::ZERO,
            desired: Vec3::ZERO,
        }
    }

    /// Advance the timer and re-roll the heading when it expires.
    ///
    /// `random_delta` is expected in [-1, 1].
    pub fn update(&mut self, agent: &AgentView, dt: f32, random_delta: f32) {
        self.timer += dt;

        if self.direction == Vec3::ZERO {
            self.direction = forward(agent.yaw);
        }
        if self.desired == Vec3::ZERO {
            self.desired = forward(agent.yaw);
        }

        if self.timer > self.interval {
            let angle = (random_delta * self.degrees_delta).to_radians();
            let direction = Quat::from_rotation_y(angle) * self.direction.normalize_or_zero();
            // Point on a unit circle projected ahead of the agent
            let destination = agent.position + self.desired + direction;

            self.desired = toward(agent.position, destination, agent.max_speed);
            self.direction = direction;
            self.timer = 0.0;
        }
    }

    /// Current desired velocity
    #[must_use]
    pub fn desired(&self) -> Vec3 {
        self.desired
    }
}

impl Default for Wander {
    fn default() -> Self {
        Self::new(45.0, 0.75)
    }
}

impl SteeringBehavior for Wander {
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: self.desired,
            angular: agent.yaw,
        }
    }

    fn steering(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: self.desired - agent.velocity,
            angular: 0.0,
        }
    }
}

/// Stop behavior - bring the agent to rest
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stop;

impl SteeringBehavior for Stop {
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: Vec3::ZERO,
            angular: agent.yaw,
        }
    }

    fn steering(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: -agent.velocity,
            angular: 0.0,
        }
    }
}

/// Face the direction of travel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LookWhereYouAreGoing;

impl SteeringBehavior for LookWhereYouAreGoing {
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: Vec3::ZERO,
            angular: heading(agent.velocity).unwrap_or(agent.yaw),
        }
    }

    fn steering(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: Vec3::ZERO,
            angular: wrap_angle(self.kinematic(agent).angular - agent.yaw),
        }
    }
}

/// Face away from the target
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FaceAway;

impl SteeringBehavior for FaceAway {
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: Vec3::ZERO,
            angular: heading(agent.position - agent.target_position).unwrap_or(agent.yaw),
        }
    }

    fn steering(&self, agent: &AgentView) -> SteeringOutput {
        SteeringOutput {
            linear: Vec3::ZERO,
            angular: wrap_angle(self.kinematic(agent).angular - agent.yaw),
        }
    }
}

/// Discriminant of [`Behavior`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    Seek,
    Flee,
    Arrive,
    Pursue,
    Wander,
    Stop,
    LookWhereYouAreGoing,
    FaceAway,
}

/// Any steering behavior an agent can run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Seek(Seek),
    Flee(Flee),
    Arrive(Arrive),
    Pursue(Pursue),
    Wander(Wander),
    Stop(Stop),
    LookWhereYouAreGoing(LookWhereYouAreGoing),
    FaceAway(FaceAway),
}

impl Behavior {
    /// Which kind of behavior this is
    #[must_use]
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Self::Seek(_) => BehaviorKind::Seek,
            Self::Flee(_) => BehaviorKind::Flee,
            Self::Arrive(_) => BehaviorKind::Arrive,
            Self::Pursue(_) => BehaviorKind::Pursue,
            Self::Wander(_) => BehaviorKind::Wander,
            Self::Stop(_) => BehaviorKind::Stop,
            Self::LookWhereYouAreGoing(_) => BehaviorKind::LookWhereYouAreGoing,
            Self::FaceAway(_) => BehaviorKind::FaceAway,
        }
    }

    fn as_behavior(&self) -> &dyn SteeringBehavior {
        match self {
            Self::Seek(b) => b,
            Self::Flee(b) => b,
            Self::Arrive(b) => b,
            Self::Pursue(b) => b,
            Self::Wander(b) => b,
            Self::Stop(b) => b,
            Self::LookWhereYouAreGoing(b) => b,
            Self::FaceAway(b) => b,
        }
    }
}

impl SteeringBehavior for Behavior {
    fn kinematic(&self, agent: &AgentView) -> SteeringOutput {
        self.as_behavior().kinematic(agent)
    }

    fn steering(&self, agent: &AgentView) -> SteeringOutput {
        self.as_behavior().steering(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(position: Vec3, velocity: Vec3, target: Vec3) -> AgentView {
        AgentView {
            position,
            velocity,
            yaw: 0.0,
            max_speed: 5.0,
            target_position: target,
            target_velocity: Vec3::ZERO,
        }
    }

    #[test]
    fn test_seek() {
        let agent = view(Vec3::ZERO, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        let output = Seek.kinematic(&agent);

        assert!(output.linear.x > 0.0);
        assert!((output.linear.length() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_seek_steering_subtracts_velocity() {
        let agent = view(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
        let output = Seek.steering(&agent);
        assert!(output.linear.length() < 0.01);
    }

    #[test]
    fn test_flee() {
        let agent = view(Vec3::ZERO, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        let output = Flee.kinematic(&agent);

        assert!(output.linear.x < 0.0); // Flee in opposite direction
    }

    #[test]
    fn test_arrive_slowing() {
        let arrive = Arrive::new(2.0, 0.25);

        let far = arrive.kinematic(&view(Vec3::ZERO, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)));
        assert!((far.linear.length() - 5.0).abs() < 0.01);

        let near = arrive.kinematic(&view(Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)));
        assert!((near.linear.length() - 2.5).abs() < 0.01);

        let inside = view(Vec3::ZERO, Vec3::ZERO, Vec3::new(0.2, 0.0, 0.0));
        assert_eq!(arrive.kinematic(&inside).linear, Vec3::ZERO);
        assert!(arrive.has_arrived(&inside));
    }

    #[test]
    fn test_pursue_leads_moving_target() {
        let mut agent = view(Vec3::ZERO, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        agent.target_velocity = Vec3::new(0.0, 0.0, 5.0);

        let predicted = Pursue::predicted_target(&agent);
        assert!((predicted - Vec3::new(10.0, 0.0, 5.0)).length() < 0.01);
        assert!(Pursue.kinematic(&agent).linear.z > 0.0);
    }

    #[test]
    fn test_wander() {
        let agent = view(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);
        let mut wander = Wander::new(45.0, 0.5);

        // Before the interval elapses the agent keeps its forward drift
        wander.update(&agent, 0.1, 1.0);
        assert_eq!(wander.desired(), Vec3::Z);

        wander.update(&agent, 0.5, 1.0);
        let output = wander.kinematic(&agent);
        assert!((output.linear.length() - 5.0).abs() < 0.01);
        // Turned right (towards +X) from +Z
        assert!(output.linear.x > 0.0);
    }

    #[test]
    fn test_stop() {
        let agent = view(Vec3::ZERO, Vec3::new(1.0, 0.0, 2.0), Vec3::X);
        assert_eq!(Stop.kinematic(&agent).linear, Vec3::ZERO);
        assert_eq!(Stop.steering(&agent).linear, Vec3::new(-1.0, 0.0, -2.0));
    }

    #[test]
    fn test_look_where_you_are_going() {
        let agent = view(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
        let output = LookWhereYouAreGoing.kinematic(&agent);
        assert!((output.angular - PI / 2.0).abs() < 1e-4);

        let turn = LookWhereYouAreGoing.steering(&agent);
        assert!((turn.angular - PI / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_face_away() {
        let agent = view(Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0));
        let output = FaceAway.kinematic(&agent);
        assert!((output.angular.abs() - PI).abs() < 1e-4);
    }

    #[test]
    fn test_behavior_dispatch() {
        let behavior = Behavior::Arrive(Arrive::default());
        assert_eq!(behavior.kind(), BehaviorKind::Arrive);

        let agent = view(Vec3::ZERO, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(behavior.kinematic(&agent), Arrive::default().kinematic(&agent));
    }

    #[test]
    fn test_angles() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-4);
        assert!((wrap_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-4);
        assert_eq!(heading(Vec3::Y), None);
        let diagonal = Vec3::new(1.0, 0.0, 1.0);
        assert!((forward(heading(diagonal).unwrap()) - diagonal.normalize()).length() < 1e-4);
    }

    #[test]
    fn test_steering_output_combine() {
        let a = SteeringOutput {
            linear: Vec3::X,
            angular: 1.0,
        };
        let b = SteeringOutput {
            linear: Vec3::Y,
            angular: 2.0,
        };

        let combined = a.combine(b);
        assert!((combined.linear - Vec3::new(1.0, 1.0, 0.0)).length() < 0.01);
        assert!((combined.angular - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_steering_output_scale() {
        let output = SteeringOutput {
            linear: Vec3::X * 2.0,
            angular: 4.0,
        };
        let scaled = output.scale(0.5);

        assert!((scaled.linear.x - 1.0).abs() < 0.01);
        assert!((scaled.angular - 2.0).abs() < 0.01);
    }
}
