//! Collision probing boundary used by graph generation and smoothing

use glam::Vec3;

/// Black-box obstacle predicate.
///
/// Graph generation uses `box_blocked` to skip cells and `segment_blocked`
/// to prune edges; path smoothing uses `segment_blocked` for line of sight.
pub trait ObstacleProbe {
    /// Does an axis-aligned box overlap any obstacle?
    fn box_blocked(&self, center: Vec3, half_extents: Vec3) -> bool;

    /// Does the straight segment between two points hit any obstacle?
    fn segment_blocked(&self, from: Vec3, to: Vec3) -> bool;
}

/// A probe with no obstacles at all
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl ObstacleProbe for OpenField {
    fn box_blocked(&self, _center: Vec3, _half_extents: Vec3) -> bool {
        false
    }

    fn segment_blocked(&self, _from: Vec3, _to: Vec3) -> bool {
        false
    }
}

impl<P: ObstacleProbe + ?Sized> ObstacleProbe for &P {
    fn box_blocked(&self, center: Vec3, half_extents: Vec3) -> bool {
        (**self).box_blocked(center, half_extents)
    }

    fn segment_blocked(&self, from: Vec3, to: Vec3) -> bool {
        (**self).segment_blocked(from, to)
    }
}
