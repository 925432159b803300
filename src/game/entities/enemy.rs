// Stationary creature with an orbiting particle aura

use super::{BodyShape, EntityError};
use crate::core::ConvertUnits;
use crate::engine::assets::{AssetManager, TextureInfo};
use crate::engine::physics::{presets, CollisionGroups, PhysicsWorld, RigidBodyHandle};
use crate::engine::renderer::SpriteBatch;
use crate::game::drawing::{FrameLayout, SpriteAnimation};
use crate::game::effects::AuraEmitter;
use glam::Vec2;

pub const TEXTURE: &str = "Textures/RedCircle";
pub const AURA_TEXTURE: &str = "Textures/Spark";

/// Gap between the creature's outline and its aura
const AURA_MARGIN: f32 = 8.0;

#[derive(Debug)]
pub struct Enemy {
    body: RigidBodyHandle,
    animation: SpriteAnimation,
    aura: AuraEmitter,
    textures: Vec<TextureInfo>,
}

impl Enemy {
    /// Spawn with a single-frame sheet
    pub fn new(
        assets: &mut AssetManager,
        physics: &mut PhysicsWorld,
        position: Vec2,
        seed: u64,
    ) -> Result<Self, EntityError> {
        Self::with_sheet(assets, physics, TEXTURE, FrameLayout::Grid { columns: 1, rows: 1 }, 1.0, position, seed)
    }

    pub fn with_sheet(
        assets: &mut AssetManager,
        physics: &mut PhysicsWorld,
        name: &str,
        layout: FrameLayout,
        frames_per_second: f32,
        position: Vec2,
        seed: u64,
    ) -> Result<Self, EntityError> {
        let texture = assets.load_texture(name)?;
        let mut animation = SpriteAnimation::new(name, texture, layout, frames_per_second, true)?;

        let frame = animation.current_frame_bounds();
        let shape = BodyShape::from_texture(assets, name, texture, Some(frame), Vec2::ONE)?;
        animation.set_origin(shape.origin);
        animation.play();

        let collider = shape
            .collider(name)?
            .collision_groups(CollisionGroups::Creature)
            .build();
        let (body, _) = physics.add_body(presets::scenery_body(position), collider);

        let white = assets.white_texture();
        let aura_texture = assets.load_texture_or(AURA_TEXTURE, white);
        let mut textures = vec![texture];
        if aura_texture != white {
            textures.push(aura_texture);
        }

        let radius = animation.frame_size().max_element() * 0.5 + AURA_MARGIN;
        let aura = AuraEmitter::new(ConvertUnits::vec_to_display(position), radius, aura_texture, seed);

        Ok(Self {
            body,
            animation,
            aura,
            textures,
        })
    }

    pub fn update(&mut self, dt: f32, physics: &PhysicsWorld) {
        self.animation.update(dt);
        if let Some(position) = physics.body_position(self.body) {
            self.aura.center = ConvertUnits::vec_to_display(position);
        }
        self.aura.update(dt);
    }

    pub fn draw(&self, batch: &mut SpriteBatch, physics: &PhysicsWorld) {
        if let Some(position) = physics.body_position(self.body) {
            self.animation.draw(batch, ConvertUnits::vec_to_display(position));
        }
        self.aura.draw(batch);
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn animation(&self) -> &SpriteAnimation {
        &self.animation
    }

    pub fn aura(&self) -> &AuraEmitter {
        &self.aura
    }

    pub fn textures(&self) -> &[TextureInfo] {
        &self.textures
    }
}
