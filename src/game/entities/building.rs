// Static scenery with a collision outline traced from a texture

use super::{BodyShape, EntityError};
use crate::core::ConvertUnits;
use crate::engine::assets::{AssetManager, TextureInfo};
use crate::engine::physics::{presets, CollisionGroups, PhysicsWorld, RigidBodyHandle};
use crate::engine::renderer::{DrawCommand, SpriteBatch};
use crate::game::drawing::Sprite;
use glam::Vec2;
use log::warn;

/// Buildings are drawn and collide at twice their texture size
pub const SCALE: f32 = 2.0;

/// Suffix of the optional texture holding a building's collision outline
pub const COLLISION_SUFFIX: &str = "_collisions";

#[derive(Debug)]
pub struct Building {
    sprite: Sprite,
    body: RigidBodyHandle,
    textures: Vec<TextureInfo>,
    pub rotation: f32,
    pub layer_depth: f32,
}

impl Building {
    /// Load `name` and `name_collisions` and add a static body at `position`
    /// (simulation units). Without a collision texture the drawn texture is
    /// traced instead.
    pub fn new(
        assets: &mut AssetManager,
        physics: &mut PhysicsWorld,
        name: &str,
        position: Vec2,
    ) -> Result<Self, EntityError> {
        let texture = assets.load_texture(name)?;
        let mut textures = vec![texture];

        let collision_name = format!("{}{}", name, COLLISION_SUFFIX);
        let (shape_name, shape_texture) = match assets.load_texture(&collision_name) {
            Ok(collision) => {
                textures.push(collision);
                (collision_name.as_str(), collision)
            }
            Err(err) if err.is_missing() => {
                warn!("Resource missing, tracing {} instead: {}", name, err);
                (name, texture)
            }
            Err(err) => return Err(err.into()),
        };

        let shape = BodyShape::from_texture(assets, shape_name, shape_texture, None, Vec2::splat(SCALE))?;
        let collider = shape
            .collider(shape_name)?
            .collision_groups(CollisionGroups::Scenery)
            .build();
        let (body, _) = physics.add_body(presets::scenery_body(position), collider);

        Ok(Self {
            sprite: Sprite::with_origin(name, texture, shape.origin),
            body,
            textures,
            rotation: 0.0,
            layer_depth: 0.0,
        })
    }

    pub fn draw(&self, batch: &mut SpriteBatch, physics: &PhysicsWorld) {
        let Some(position) = physics.body_position(self.body) else {
            return;
        };
        let rotation = physics.body_rotation(self.body).unwrap_or(0.0) + self.rotation;
        batch.draw(
            DrawCommand::new(self.sprite.texture(), ConvertUnits::vec_to_display(position))
                .origin(self.sprite.origin())
                .scale(Vec2::splat(SCALE))
                .rotation(rotation)
                .layer_depth(self.layer_depth),
        );
    }

    pub fn name(&self) -> &str {
        self.sprite.name()
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
    use crate::game::entities::test_support::{inset_block, insert_block};

    #[test]
    fn test_collision_texture_preferred() {
        let mut assets = AssetManager::new("unused");
        insert_block(&mut assets, "EnvironmentObjects/Tents/hunter_45", 64, 64);
        // Collision outline is much smaller than the drawn tent
        assets
            .insert_image("EnvironmentObjects/Tents/hunter_45_collisions", inset_block(64, 64, 24))
            .unwrap();

        let mut physics = PhysicsWorld::new();
        let building = Building::new(&mut assets, &mut physics, "EnvironmentObjects/Tents/hunter_45", Vec2::ZERO).unwrap();

        assert_eq!(building.textures().len(), 2);
        let body = physics.get_rigid_body(building.body()).unwrap();
        assert!(body.is_fixed());
    }

    #[test]
    fn test_missing_collision_texture_traces_draw_texture() {
        let mut assets = AssetManager::new("unused");
        insert_block(&mut assets, "EnvironmentObjects/Tents/pavilion_45", 48, 48);

        let mut physics = PhysicsWorld::new();
        let building = Building::new(
            &mut assets,
            &mut physics,
            "EnvironmentObjects/Tents/pavilion_45",
            Vec2::new(13.0, 0.0),
        )
        .unwrap();

        assert_eq!(building.textures().len(), 1);
        assert_eq!(physics.body_count(), 1);

        let mut batch = SpriteBatch::new();
        building.draw(&mut batch, &physics);
        let command = batch.commands()[0];
        assert_eq!(command.position, Vec2::new(13.0 * 24.0, 0.0));
        assert_eq!(command.scale, Vec2::splat(SCALE));
    }

    #[test]
    fn test_missing_draw_texture_is_an_error() {
        let mut assets = AssetManager::new("unused");
        let mut physics = PhysicsWorld::new();
        assert!(Building::new(&mut assets, &mut physics, "EnvironmentObjects/Tents/none", Vec2::ZERO).is_err());
        assert_eq!(physics.body_count(), 0);
    }
}
