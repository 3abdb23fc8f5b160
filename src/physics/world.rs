//! Obstacle world using rapier3d's query pipeline

use glam::Vec3;
use rapier3d::parry::shape::Cuboid;
use rapier3d::prelude::*;

use super::ObstacleProbe;

/// Collision group every obstacle collider belongs to
const OBSTACLE_GROUP: Group = Group::GROUP_1;

/// Handle to an obstacle collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

/// Physics world holding static obstacles.
///
/// Nothing here is simulated; the world only answers overlap and ray
/// queries against the obstacle layer.
pub struct Physics {
    /// Rigid body set (stays empty, required by queries)
    rigid_body_set: RigidBodySet,
    /// Collider set
    collider_set: ColliderSet,
    /// Island manager, needed to remove colliders
    island_manager: IslandManager,
    /// Query pipeline for raycasting and overlap tests
    query_pipeline: QueryPipeline,
}

impl Physics {
    /// Create an empty obstacle world
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Add a box obstacle centred at `center`
    pub fn add_obstacle(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![center.x, center.y, center.z])
            .collision_groups(InteractionGroups::new(OBSTACLE_GROUP, Group::ALL))
            .build();

        let handle = ColliderHandle(self.collider_set.insert(collider));
        self.refresh_queries();
        log::trace!("Added obstacle at {center} (half extents {half_extents})");
        handle
    }

    /// Remove an obstacle. Returns `false` if the handle was unknown.
    pub fn remove_obstacle(&mut self, handle: ColliderHandle) -> bool {
        let removed = self
            .collider_set
            .remove(
                handle.0,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                false,
            )
            .is_some();

        if removed {
            self.refresh_queries();
        }
        removed
    }

    /// Number of obstacles in the world
    pub fn obstacle_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Cast a ray against obstacles and return the first hit
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                Self::obstacle_filter(),
            )
            .map(|(handle, distance)| {
                let point = ray.point_at(distance);
                RaycastHit {
                    collider: ColliderHandle(handle),
                    point: Vec3::new(point.x, point.y, point.z),
                    distance,
                }
            })
    }

    /// Find an obstacle overlapping an axis-aligned box
    pub fn overlap_box(&self, center: Vec3, half_extents: Vec3) -> Option<ColliderHandle> {
        let shape = Cuboid::new(vector![half_extents.x, half_extents.y, half_extents.z]);
        let shape_pos = Isometry::translation(center.x, center.y, center.z);

        self.query_pipeline
            .intersection_with_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape,
                Self::obstacle_filter(),
            )
            .map(ColliderHandle)
    }

    fn obstacle_filter() -> QueryFilter<'static> {
        QueryFilter::default().groups(InteractionGroups::new(Group::ALL, OBSTACLE_GROUP))
    }

    fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleProbe for Physics {
    fn box_blocked(&self, center: Vec3, half_extents: Vec3) -> bool {
        self.overlap_box(center, half_extents).is_some()
    }

    fn segment_blocked(&self, from: Vec3, to: Vec3) -> bool {
        let direction = to - from;
        self.raycast(from, direction, direction.length()).is_some()
    }
}

/// Result of a raycast
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// The point of intersection
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_pillar() -> Physics {
        let mut physics = Physics::new();
        physics.add_obstacle(Vec3::ZERO, Vec3::new(0.25, 1.0, 0.25));
        physics
    }

    #[test]
    fn test_raycast_hits_obstacle() {
        let physics = world_with_pillar();
        let hit = physics
            .raycast(Vec3::new(-2.0, 0.0, 0.0), Vec3::X, 10.0)
            .expect("ray should hit the pillar");

        assert!((hit.distance - 1.75).abs() < 0.01);
        assert!((hit.point.x + 0.25).abs() < 0.01);
    }

    #[test]
    fn test_segment_probe() {
        let physics = world_with_pillar();

        assert!(physics.segment_blocked(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)));
        assert!(!physics.segment_blocked(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 1.0)));
        // Segment stops short of the pillar
        assert!(!physics.segment_blocked(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_box_probe() {
        let physics = world_with_pillar();

        assert!(physics.box_blocked(Vec3::ZERO, Vec3::splat(0.5)));
        assert!(!physics.box_blocked(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5)));
    }

    #[test]
    fn test_remove_obstacle() {
        let mut physics = Physics::new();
        let handle = physics.add_obstacle(Vec3::ZERO, Vec3::splat(0.5));
        assert_eq!(physics.obstacle_count(), 1);

        assert!(physics.remove_obstacle(handle));
        assert!(!physics.remove_obstacle(handle));
        assert_eq!(physics.obstacle_count(), 0);
        assert!(!physics.box_blocked(Vec3::ZERO, Vec3::splat(0.5)));
    }
}
