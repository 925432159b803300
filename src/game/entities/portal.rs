// Animated portals that move the character from an In portal to its Out portal

use super::{BodyShape, EntityError};
use crate::core::ConvertUnits;
use crate::engine::assets::{AssetManager, TextureInfo};
use crate::engine::physics::{
    presets, ColliderHandle, CollisionEvent, CollisionGroups, PhysicsWorld, RigidBodyHandle,
};
use crate::engine::renderer::SpriteBatch;
use crate::game::drawing::{FrameLayout, SpriteAnimation};
use glam::Vec2;
use log::info;

pub const SCALE: f32 = 0.25;
pub const FRAMES_PER_SECOND: f32 = 10.0;
const SHEET_COLUMNS: u32 = 4;
const SHEET_ROWS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalKind {
    In,
    Out,
}

impl PortalKind {
    pub fn texture_name(self) -> &'static str {
        match self {
            PortalKind::In => "CharacterSprites/Portal/InPortal0",
            PortalKind::Out => "CharacterSprites/Portal/OutPortal0",
        }
    }
}

#[derive(Debug)]
pub struct Portal {
    kind: PortalKind,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    animation: SpriteAnimation,
    texture: TextureInfo,
}

impl Portal {
    /// Create a portal at `position` (simulation units) and start its animation
    pub fn new(
        kind: PortalKind,
        assets: &mut AssetManager,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> Result<Self, EntityError> {
        let name = kind.texture_name();
        let texture = assets.load_texture(name)?;
        let layout = FrameLayout::Grid {
            columns: SHEET_COLUMNS,
            rows: SHEET_ROWS,
        };
        let mut animation = SpriteAnimation::new(name, texture, layout, FRAMES_PER_SECOND, true)?;

        // The outline of the first frame gives both the trigger and the pivot
        let frame = animation.current_frame_bounds();
        let shape = BodyShape::from_texture(assets, name, texture, Some(frame), Vec2::splat(SCALE))?;
        animation.set_origin(shape.origin);
        animation.scale = Vec2::splat(SCALE);
        animation.play();

        let collider = shape
            .collider(name)?
            .collision_groups(CollisionGroups::Portal)
            .mass(1.0)
            .build();
        let (body, collider) = physics.add_body(presets::portal_body(position), collider);

        Ok(Self {
            kind,
            body,
            collider,
            animation,
            texture,
        })
    }

    pub fn update(&mut self, dt: f32) {
        self.animation.update(dt);
    }

    pub fn draw(&self, batch: &mut SpriteBatch, physics: &PhysicsWorld) {
        if let Some(position) = physics.body_position(self.body) {
            self.animation.draw(batch, ConvertUnits::vec_to_display(position));
        }
    }

    pub fn kind(&self) -> PortalKind {
        self.kind
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    pub fn texture(&self) -> TextureInfo {
        self.texture
    }

    pub fn animation(&self) -> &SpriteAnimation {
        &self.animation
    }
}

/// An In portal linked to the Out portal it sends the character to
#[derive(Debug)]
pub struct PortalPair {
    pub entry: Portal,
    pub exit: Portal,
}

impl PortalPair {
    pub fn new(
        assets: &mut AssetManager,
        physics: &mut PhysicsWorld,
        entry: Vec2,
        exit: Vec2,
    ) -> Result<Self, EntityError> {
        Ok(Self {
            entry: Portal::new(PortalKind::In, assets, physics, entry)?,
            exit: Portal::new(PortalKind::Out, assets, physics, exit)?,
        })
    }

    /// Teleport `traveller` when one of `events` starts contact between it
    /// and the entry portal. Returns true if it was moved.
    pub fn resolve(
        &self,
        events: &[CollisionEvent],
        traveller: (RigidBodyHandle, ColliderHandle),
        physics: &mut PhysicsWorld,
    ) -> bool {
        let (body, collider) = traveller;
        let entered = events.iter().any(|event| {
            matches!(event, CollisionEvent::Started { .. })
                && event.other(self.entry.collider()) == Some(collider)
        });
        if !entered {
            return false;
        }

        let Some(target) = physics.body_position(self.exit.body()) else {
            return false;
        };
        info!("Portal: teleporting to {:?}", target);
        physics.teleport(body, target);
        true
    }

    pub fn update(&mut self, dt: f32) {
        self.entry.update(dt);
        self.exit.update(dt);
    }

    pub fn draw(&self, batch: &mut SpriteBatch, physics: &PhysicsWorld) {
        self.entry.draw(batch, physics);
        self.exit.draw(batch, physics);
    }

    pub fn textures(&self) -> [TextureInfo; 2] {
        [self.entry.texture(), self.exit.texture()]
    }

    pub fn bodies(&self) -> [RigidBodyHandle; 2] {
        [self.entry.body(), self.exit.body()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::ColliderBuilder2D;
    use crate::game::drawing::AnimationState;
    use crate::game::entities::test_support::insert_block;

    fn assets() -> AssetManager {
        let mut assets = AssetManager::new("unused");
        insert_block(&mut assets, PortalKind::In.texture_name(), 128, 64);
        insert_block(&mut assets, PortalKind::Out.texture_name(), 128, 64);
        assets
    }

    #[test]
    fn test_portal_starts_animated_and_scaled() {
        let mut assets = assets();
        let mut physics = PhysicsWorld::new();
        let portal = Portal::new(PortalKind::In, &mut assets, &mut physics, Vec2::ZERO).unwrap();

        assert_eq!(portal.animation().state(), AnimationState::Running);
        assert_eq!(portal.animation().frame_count(), 8);
        assert_eq!(portal.animation().scale, Vec2::splat(SCALE));
        assert!(portal.animation().is_looping());
        // Pivot lies inside the first 32x32 frame
        let origin = portal.animation().origin();
        assert!(origin.x < 32.0 && origin.y < 32.0);

        let collider = physics.get_collider(portal.collider()).unwrap();
        assert!(collider.is_sensor());
    }

    #[test]
    fn test_missing_portal_texture_is_an_error() {
        let mut assets = AssetManager::new("unused");
        let mut physics = PhysicsWorld::new();
        let err = Portal::new(PortalKind::Out, &mut assets, &mut physics, Vec2::ZERO).unwrap_err();
        assert!(matches!(err, EntityError::Asset(ref e) if e.is_missing()));
    }

    #[test]
    fn test_entering_in_portal_teleports_to_out_portal() {
        let mut assets = assets();
        let mut physics = PhysicsWorld::new();
        let exit = Vec2::new(10.0, -4.0);
        let pair = PortalPair::new(&mut assets, &mut physics, Vec2::ZERO, exit).unwrap();

        let (body, collider) = physics.add_body(
            presets::character_body(Vec2::new(0.05, 0.0)),
            ColliderBuilder2D::box_shape(0.5, 0.5)
                .collision_groups(CollisionGroups::Player)
                .build(),
        );

        let mut moved = false;
        for _ in 0..3 {
            physics.step();
            let events = physics.drain_collision_events();
            moved |= pair.resolve(&events, (body, collider), &mut physics);
        }

        assert!(moved);
        let position = physics.body_position(body).unwrap();
        assert!(position.distance(exit) < 1e-3, "at {:?}", position);
    }

    #[test]
    fn test_unrelated_contacts_do_not_teleport() {
        let mut assets = assets();
        let mut physics = PhysicsWorld::new();
        let pair = PortalPair::new(&mut assets, &mut physics, Vec2::ZERO, Vec2::new(10.0, 0.0)).unwrap();

        let (body, collider) = physics.add_body(
            presets::character_body(Vec2::new(50.0, 50.0)),
            ColliderBuilder2D::box_shape(0.5, 0.5).build(),
        );
        let stopped = CollisionEvent::Stopped {
            collider1: pair.entry.collider(),
            collider2: collider,
        };

        assert!(!pair.resolve(&[stopped], (body, collider), &mut physics));
        assert_eq!(physics.body_position(body), Some(Vec2::new(50.0, 50.0)));
    }
}
