use glam::Vec2;
use rapier2d::prelude::*;

use super::collision::{CollisionEvent as GameCollisionEvent, CollisionEventQueue};

/// Physics world that manages the simulation for one level
///
/// Positions are in simulation units (metres) with y pointing down, matching
/// screen space once converted to pixels.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    collision_event_queue: CollisionEventQueue,
}

impl PhysicsWorld {
    /// A top-down world without gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec2::ZERO)
    }

    pub fn with_gravity(gravity: Vec2) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: vector![gravity.x, gravity.y],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    ///
    /// Collision events accumulate until drained with [`Self::drain_collision_events`].
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.collision_event_queue,
        );
    }

    /// Insert a body together with its collider
    pub fn add_body(&mut self, body: RigidBody, collider: Collider) -> (RigidBodyHandle, ColliderHandle) {
        let body_handle = self.rigid_body_set.insert(body);
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        (body_handle, collider_handle)
    }
    /// Remove a rigid body and all its attached colliders

    #[cfg(test)]
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    #[cfg(test)]
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    #[cfg(test)]
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }
    /// Body a collider is attached to

    #[cfg(test)]
    pub fn collider_body(&self, handle: ColliderHandle) -> Option<RigidBodyHandle> {
        self.collider_set.get(handle).and_then(|c| c.parent())
    }

    /// Body position in simulation units
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set.get(handle).map(|body| {
            let t = body.translation();
            Vec2::new(t.x, t.y)
        })
    }

    /// Body rotation in radians
    pub fn body_rotation(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set
            .get(handle)
            .map(|body| body.rotation().angle())
    }

    /// Move a body instantly, clearing its velocity
    pub fn teleport(&mut self, handle: RigidBodyHandle, position: Vec2) {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return;
        };
        body.set_translation(vector![position.x, position.y], true);
        body.set_linvel(Vector::zeros(), true);
    }

    /// Apply a linear impulse to a body, waking it up
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec2) {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return;
        };
        body.apply_impulse(vector![impulse.x, impulse.y], true);
    }

    /// Take the collision events gathered since the last call
    pub fn drain_collision_events(&mut self) -> Vec<GameCollisionEvent> {
        self.collision_event_queue.drain()
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    #[cfg(test)]
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::{presets, ColliderBuilder2D};
    use crate::engine::physics::CollisionGroups;

    #[test]
    fn test_world_has_no_gravity() {
        let world = PhysicsWorld::new();
        assert_eq!(world.gravity(), Vec2::ZERO);
        assert!((world.timestep() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_impulse_moves_body_and_damping_slows_it() {
        let mut world = PhysicsWorld::new();
        let (body, _) = world.add_body(
            presets::character_body(Vec2::ZERO),
            ColliderBuilder2D::box_shape(0.5, 0.5).build(),
        );

        world.apply_impulse(body, Vec2::new(0.0, 0.6));
        world.step();
        let after_one = world.body_position(body).unwrap();
        assert!(after_one.y > 0.0, "down impulse moves towards +y");
        assert!(after_one.x.abs() < 1e-6);

        let speed_before = world.get_rigid_body(body).unwrap().linvel().norm();
        for _ in 0..30 {
            world.step();
        }
        let speed_after = world.get_rigid_body(body).unwrap().linvel().norm();
        assert!(speed_after < speed_before);
    }

    #[test]
    fn test_static_body_does_not_move() {
        let mut world = PhysicsWorld::new();
        let (body, _) = world.add_body(
            presets::scenery_body(Vec2::new(3.0, 4.0)),
            ColliderBuilder2D::box_shape(1.0, 1.0).build(),
        );
        world.apply_impulse(body, Vec2::new(10.0, 0.0));
        world.step();
        assert_eq!(world.body_position(body), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_teleport_and_remove() {
        let mut world = PhysicsWorld::new();
        let (body, collider) = world.add_body(
            presets::character_body(Vec2::ZERO),
            ColliderBuilder2D::circle(0.5).build(),
        );
        assert_eq!(world.collider_body(collider), Some(body));

        world.teleport(body, Vec2::new(5.0, -2.0));
        assert_eq!(world.body_position(body), Some(Vec2::new(5.0, -2.0)));

        world.remove_rigid_body(body);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
        assert!(world.body_position(body).is_none());
    }

    #[test]
    fn test_sensor_reports_player_entering() {
        let mut world = PhysicsWorld::new();
        let (_, portal) = world.add_body(
            presets::portal_body(Vec2::ZERO),
            ColliderBuilder2D::circle(1.0)
                .collision_groups(CollisionGroups::Portal)
                .mass(1.0)
                .build(),
        );
        let (_, player) = world.add_body(
            presets::character_body(Vec2::new(0.5, 0.0)),
            ColliderBuilder2D::circle(0.5)
                .collision_groups(CollisionGroups::Player)
                .build(),
        );

        world.step();
        let events = world.drain_collision_events();
        assert!(events.iter().any(|e| matches!(e, GameCollisionEvent::Started { .. })
            && e.other(portal) == Some(player)));
        assert!(world.drain_collision_events().is_empty());
    }
}
