use super::collision::CollisionGroups;
use glam::Vec2;
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Builder for rigid bodies used by the demo's entities
pub struct BodyBuilder {
    body_type: RigidBodyType,
    translation: Vector<Real>,
    linear_damping: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    /// A dynamic body, moved by impulses and collisions
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            translation: Vector::zeros(),
            linear_damping: 0.0,
            can_sleep: true,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// A fixed (static) body that never moves
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            ..Self::new_dynamic()
        }
    }

    /// Initial position in simulation units
    pub fn position(mut self, position: Vec2) -> Self {
        self.translation = vector![position.x, position.y];
        self
    }

    pub fn linear_damping(mut self, damping: Real) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation so the body never spins
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .translation(self.translation)
            .linear_damping(self.linear_damping)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

const DEFAULT_FRICTION: Real = 0.2;

/// Builder for colliders with the demo's defaults
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    density: Option<Real>,
    mass: Option<Real>,
}

impl ColliderBuilder2D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Default,
            density: Some(1.0),
            mass: None,
        }
    }
    /// Axis-aligned box given by half extents

    #[cfg(test)]
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self::with_shape(SharedShape::cuboid(half_width, half_height))
    }

    #[cfg(test)]
    pub fn circle(radius: Real) -> Self {
        Self::with_shape(SharedShape::ball(radius))
    }

    /// Compound of convex parts given in simulation units relative to the body
    ///
    /// Parts whose hull is degenerate are skipped. Returns `None` when no part
    /// survives.
    pub fn convex_parts(parts: &[Vec<Vec2>]) -> Option<Self> {
        let shapes: Vec<(Isometry<Real>, SharedShape)> = parts
            .iter()
            .filter_map(|part| {
                let points: Vec<Point<Real>> = part.iter().map(|v| point![v.x, v.y]).collect();
                SharedShape::convex_hull(&points)
            })
            .map(|shape| (Isometry::identity(), shape))
            .collect();

        match shapes.len() {
            0 => None,
            1 => shapes.into_iter().next().map(|(_, shape)| Self::with_shape(shape)),
            _ => Some(Self::with_shape(SharedShape::compound(shapes))),
        }
    }

    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Set mass directly (overrides density)
    pub fn mass(mut self, mass: Real) -> Self {
        self.mass = Some(mass);
        self.density = None;
        self
    }

    /// Build the collider. Trigger groups become sensors.
    pub fn build(self) -> Collider {
        let mut builder = ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .sensor(self.collision_groups.is_trigger())
            .friction(DEFAULT_FRICTION)
            .active_events(ActiveEvents::COLLISION_EVENTS);

        if let Some(mass) = self.mass {
            builder = builder.mass(mass);
        } else if let Some(density) = self.density {
            builder = builder.density(density);
        }

        builder.build()
    }
}

/// Body configurations for the demo's entities
pub mod presets {
    use super::*;

    /// Damping shared by the character and portals
    pub const ENTITY_DAMPING: Real = 10.0;

    /// Player character: dynamic, heavily damped, never rotates or sleeps
    pub fn character_body(position: Vec2) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(position)
            .linear_damping(ENTITY_DAMPING)
            .lock_rotation()
            .can_sleep(false)
            .build()
    }

    /// Portal: dynamic and damped like the character but only a trigger
    pub fn portal_body(position: Vec2) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(position)
            .linear_damping(ENTITY_DAMPING)
            .lock_rotation()
            .build()
    }

    /// Buildings, log piles and other props
    pub fn scenery_body(position: Vec2) -> RigidBody {
        BodyBuilder::new_fixed().position(position).build()
    }
}
