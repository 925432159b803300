// Log pile with a fire and smoke particle emitter on top

use super::{BodyShape, EntityError};
use crate::core::ConvertUnits;
use crate::engine::assets::{AssetManager, TextureInfo};
use crate::engine::physics::{presets, CollisionGroups, PhysicsWorld, RigidBodyHandle};
use crate::engine::renderer::{DrawCommand, SpriteBatch};
use crate::game::drawing::Sprite;
use crate::game::effects::FireEmitter;
use glam::Vec2;

pub const LOGS_TEXTURE: &str = "EnvironmentObjects/logs";
pub const FIRE_TEXTURE: &str = "Textures/Fire";
pub const SMOKE_TEXTURE: &str = "Textures/Smoke";

/// The logs are scaled down at draw time rather than in the image
pub const LOGS_SCALE: Vec2 = Vec2::new(0.5, 0.45);

#[derive(Debug)]
pub struct Campfire {
    logs: Sprite,
    body: RigidBodyHandle,
    fire: FireEmitter,
    textures: Vec<TextureInfo>,
}

impl Campfire {
    pub fn new(
        assets: &mut AssetManager,
        physics: &mut PhysicsWorld,
        position: Vec2,
        seed: u64,
    ) -> Result<Self, EntityError> {
        let logs = assets.load_texture(LOGS_TEXTURE)?;
        let shape = BodyShape::from_texture(assets, LOGS_TEXTURE, logs, None, LOGS_SCALE)?;
        let collider = shape
            .collider(LOGS_TEXTURE)?
            .collision_groups(CollisionGroups::Scenery)
            .build();
        let (body, _) = physics.add_body(presets::scenery_body(position), collider);

        let white = assets.white_texture();
        let fire_texture = assets.load_texture_or(FIRE_TEXTURE, white);
        let smoke_texture = assets.load_texture_or(SMOKE_TEXTURE, white);

        let mut textures = vec![logs];
        textures.extend([fire_texture, smoke_texture].into_iter().filter(|t| *t != white));

        Ok(Self {
            logs: Sprite::with_origin(LOGS_TEXTURE, logs, shape.origin),
            body,
            fire: FireEmitter::new(ConvertUnits::vec_to_display(position), fire_texture, smoke_texture, seed),
            textures,
        })
    }

    /// Keep the emitter on the logs and advance the particles
    pub fn update(&mut self, dt: f32, physics: &PhysicsWorld) {
        if let Some(position) = physics.body_position(self.body) {
            self.fire.position = ConvertUnits::vec_to_display(position);
        }
        self.fire.update(dt);
    }

    pub fn draw_logs(&self, batch: &mut SpriteBatch, physics: &PhysicsWorld) {
        if let Some(position) = physics.body_position(self.body) {
            batch.draw(
                DrawCommand::new(self.logs.texture(), ConvertUnits::vec_to_display(position))
                    .origin(self.logs.origin())
                    .scale(LOGS_SCALE),
            );
        }
    }

    pub fn draw_fire(&self, batch: &mut SpriteBatch) {
        self.fire.draw(batch);
    }

    pub fn fire(&self) -> &FireEmitter {
        &self.fire
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn textures(&self) -> &[TextureInfo] {
        &self.textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::test_support::insert_block;

    #[test]
    fn test_campfire_burns_without_particle_textures() {
        let mut assets = AssetManager::new("unused");
        insert_block(&mut assets, LOGS_TEXTURE, 96, 64);
        let mut physics = PhysicsWorld::new();

        let mut campfire = Campfire::new(&mut assets, &mut physics, Vec2::ZERO, 1).unwrap();
        assert_eq!(campfire.textures().len(), 1);

        for _ in 0..30 {
            campfire.update(1.0 / 60.0, &physics);
        }
        assert!(!campfire.fire().fire_particles().is_empty());

        let mut batch = SpriteBatch::new();
        campfire.draw_logs(&mut batch, &physics);
        assert_eq!(batch.commands()[0].scale, LOGS_SCALE);
        campfire.draw_fire(&mut batch);
        assert!(batch.len() > 1);
    }

    #[test]
    fn test_fire_follows_body() {
        let mut assets = AssetManager::new("unused");
        insert_block(&mut assets, LOGS_TEXTURE, 96, 64);
        let mut physics = PhysicsWorld::new();
        let mut campfire = Campfire::new(&mut assets, &mut physics, Vec2::new(1.0, 1.0), 1).unwrap();

        campfire.update(0.0, &physics);
        assert_eq!(campfire.fire().position, Vec2::new(24.0, 24.0));
    }
}
