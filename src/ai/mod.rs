//! AI and navigation module
//!
//! Provides grid pathfinding, path following, steering behaviors, and the
//! agents that run them.

mod agent;
mod follower;
pub mod pathfinding;
mod steering;

pub use agent::{Agent, BehaviorSet, MotionModel, Target};
pub use follower::{PathFollower, Trackable};
pub use steering::{
    AgentView, Arrive, Behavior, BehaviorKind, FaceAway, Flee, LookWhereYouAreGoing, Pursue, Seek,
    SteeringBehavior, SteeringOutput, Stop, Wander, forward, heading, wrap_angle,
};
