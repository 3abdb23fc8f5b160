//! Navigation event queue
//!
//! A double-buffered queue that lets the session report what happened
//! during a tick without callers polling every agent. Events pushed during
//! tick N are readable during tick N+1.
//!
//! # Example
//!
//! ```ignore
//! for event in sim.events().iter() {
//!     if let NavEvent::PathCompleted { entity } = event {
//!         log::info!("{entity:?} is done");
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec3;
use hecs::Entity;

use crate::ai::pathfinding::SearchStatus;

/// Something that happened in the navigation world
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum NavEvent {
    /// The grid graph was rebuilt.
    GraphRegenerated {
        nodes: usize,
        edges: usize,
        clusters: usize,
    },

    /// A route was found.
    PathPlanned {
        /// Waypoints after smoothing
        waypoints: usize,
        cost: f32,
    },

    /// A search ended without a route.
    PathFailed { status: SearchStatus },

    /// An agent moved on to its next waypoint.
    WaypointReached {
        entity: Entity,
        index: usize,
        position: Vec3,
    },

    /// An agent arrived at the last waypoint of its path.
    PathCompleted { entity: Entity },
}

/// Double-buffered event queue for tick-consistent event processing.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this tick
    pending: VecDeque<NavEvent>,
    /// Events from the previous tick, ready for processing
    processing: VecDeque<NavEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 64;

    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
            processing: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
        }
    }

    /// Push an event to be processed next tick.
    #[inline]
    pub fn push(&mut self, event: NavEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues. Called once per tick.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous tick.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &NavEvent> {
        self.processing.iter()
    }

    /// Take ownership of the events from the previous tick.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = NavEvent> + '_ {
        self.processing.drain(..)
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Number of events waiting for the next swap.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear both buffers.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
