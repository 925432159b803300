// The playable camp: tents around a campfire, a portal pair and a creature

use super::{Screen, ScreenCommand, Transition};
use crate::core::{ConvertUnits, Rect};
use crate::engine::assets::TextureInfo;
use crate::engine::input::{Action, InputState};
use crate::engine::physics::PhysicsWorld;
use crate::engine::renderer::Frame;
use crate::game::effects::{BlurConfig, VariableBlurEffect};
use crate::game::entities::{Building, Campfire, Character, Enemy, MovementIntent, PortalPair};
use crate::game::settings::GameContext;
use anyhow::Context;
use glam::{Vec2, Vec4};
use log::info;
use std::f32::consts::TAU;

pub const BUILDINGS: [&str; 6] = [
    "pavilion_45",
    "hunter_315",
    "hunter_225",
    "storagetent_135",
    "lumberjack_45",
    "hunter_45",
];
pub const BUILDING_DIRECTORY: &str = "EnvironmentObjects/Tents";
/// Distance of the tents from the campfire, in metres
pub const BUILDING_RING_RADIUS: f32 = 13.0;

pub const HEARTBEAT_SOUND: &str = "SoundEffects/doublebeat";
/// Blur progress at which the heartbeat sound plays
const HEARTBEAT_PROGRESS: f32 = 0.25;
const HEARTBEAT_TOLERANCE: f32 = 0.05;

const CHARACTER_START: Vec2 = Vec2::new(0.0, 2.5);
const PORTAL_IN: Vec2 = Vec2::new(-5.0, 5.0);
const PORTAL_OUT: Vec2 = Vec2::new(5.0, -6.0);
const ENEMY_START: Vec2 = Vec2::new(7.0, 4.0);

/// Whether a blur progress value should trigger the heartbeat
pub fn is_heartbeat(progress: f32) -> bool {
    (progress - HEARTBEAT_PROGRESS).abs() < HEARTBEAT_TOLERANCE
}

/// Building centre `index` of `count` on the ring, in metres
pub fn ring_position(index: usize, count: usize) -> Vec2 {
    let angle = index as f32 / count as f32 * TAU;
    Vec2::new(angle.cos(), angle.sin()) * BUILDING_RING_RADIUS
}

/// Everything that exists only while the level is loaded
struct CampWorld {
    physics: PhysicsWorld,
    character: Character,
    buildings: Vec<Building>,
    campfire: Campfire,
    portals: PortalPair,
    enemy: Enemy,
    blur: VariableBlurEffect,
    camera_focus: Vec2,
    /// Held inputs, applied once per fixed step
    intent: MovementIntent,
}

impl CampWorld {
    fn load(ctx: &mut GameContext) -> anyhow::Result<Self> {
        let mut physics = PhysicsWorld::new();
        let assets = &mut ctx.assets;

        let buildings = BUILDINGS
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let path = format!("{}/{}", BUILDING_DIRECTORY, name);
                Building::new(assets, &mut physics, &path, ring_position(i, BUILDINGS.len()))
                    .with_context(|| format!("loading building {}", path))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let campfire_seed = ctx.next_seed();
        let enemy_seed = ctx.next_seed();
        let assets = &mut ctx.assets;

        let campfire = Campfire::new(assets, &mut physics, Vec2::ZERO, campfire_seed).context("loading campfire")?;
        let character = Character::new(assets, &mut physics, CHARACTER_START).context("loading character")?;
        let portals = PortalPair::new(assets, &mut physics, PORTAL_IN, PORTAL_OUT).context("loading portals")?;
        let enemy = Enemy::new(assets, &mut physics, ENEMY_START, enemy_seed).context("loading enemy")?;
        let blur = VariableBlurEffect::new(BlurConfig::HEARTBEAT)?;

        Ok(Self {
            camera_focus: ConvertUnits::vec_to_display(CHARACTER_START),
            intent: MovementIntent::default(),
            physics,
            character,
            buildings,
            campfire,
            portals,
            enemy,
            blur,
        })
    }

    fn textures(&self) -> Vec<TextureInfo> {
        let mut textures: Vec<TextureInfo> = self
            .buildings
            .iter()
            .flat_map(|b| b.textures().iter().copied())
            .collect();
        textures.extend_from_slice(self.campfire.textures());
        textures.extend_from_slice(self.character.textures());
        textures.extend(self.portals.textures());
        textures.extend_from_slice(self.enemy.textures());
        textures
    }

    fn tick(&mut self, dt: f32, ctx: &mut GameContext) {
        self.character.apply_intent(self.intent, &mut self.physics);
        self.physics.step();
        let events = self.physics.drain_collision_events();
        let traveller = (self.character.body(), self.character.collider());
        self.portals.resolve(&events, traveller, &mut self.physics);

        self.character.update(dt);
        self.portals.update(dt);
        self.campfire.update(dt, &self.physics);
        self.enemy.update(dt, &self.physics);

        if is_heartbeat(self.blur.update()) {
            ctx.audio.play_effect(HEARTBEAT_SOUND);
        }

        if let Some(position) = self.character.display_position(&self.physics) {
            self.camera_focus = position;
        }
    }
}

/// The gameplay screen
pub struct CampLevel {
    world: Option<CampWorld>,
}

impl CampLevel {
    pub const TITLE: &'static str = "Campfire Camp";

    pub fn new() -> Self {
        Self { world: None }
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.world.is_some()
    }

    #[cfg(test)]
    pub fn character_position(&self) -> Option<Vec2> {
        let world = self.world.as_ref()?;
        world.physics.body_position(world.character.body())
    }

    pub fn camera_focus(&self) -> Option<Vec2> {
        self.world.as_ref().map(|world| world.camera_focus)
    }

    #[cfg(test)]
    pub fn blur_progress(&self) -> Option<f32> {
        self.world.as_ref().map(|world| world.blur.progress())
    }
}

impl Default for CampLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for CampLevel {
    fn name(&self) -> &str {
        Self::TITLE
    }

    fn load(&mut self, ctx: &mut GameContext) -> anyhow::Result<()> {
        let world = CampWorld::load(ctx)?;
        info!(
            "{} loaded: {} bodies, {} textures",
            Self::TITLE,
            world.physics.body_count(),
            world.textures().len()
        );
        self.world = Some(world);
        ctx.start_music();
        Ok(())
    }

    fn unload(&mut self, ctx: &mut GameContext) {
        ctx.audio.stop_music();
        if let Some(world) = self.world.take() {
            for texture in world.textures() {
                ctx.assets.release(texture.handle);
            }
        }
    }

    fn handle_input(&mut self, input: &InputState, _ctx: &mut GameContext) -> Option<ScreenCommand> {
        if input.just_pressed(Action::Cancel) {
            return Some(ScreenCommand::ExitSelf);
        }
        if let Some(world) = self.world.as_mut() {
            world.intent = MovementIntent::from_input(input);
        }
        None
    }

    fn update(&mut self, dt: f32, ctx: &mut GameContext, covered: bool) -> Option<ScreenCommand> {
        if covered {
            return None;
        }
        if let Some(world) = self.world.as_mut() {
            world.tick(dt, ctx);
        }
        None
    }

    fn draw(&self, frame: &mut Frame, _ctx: &GameContext, transition: Transition) {
        let Some(world) = self.world.as_ref() else {
            return;
        };

        frame.clear_color = Vec4::new(0.0, 0.0, 0.0, 1.0);
        frame.camera_focus = Some(world.camera_focus);
        frame.blur = Some(world.blur.active_frame().clone());

        let scene = &mut frame.scene;
        for building in &world.buildings {
            building.draw(scene, &world.physics);
        }
        world.campfire.draw_logs(scene, &world.physics);
        world.portals.draw(scene, &world.physics);
        world.enemy.draw(scene, &world.physics);
        world.character.draw(scene, &world.physics);
        world.campfire.draw_fire(scene);

        if transition.position > 0.0 {
            let viewport = frame.viewport();
            frame.overlay.fill(
                Rect::new(0.0, 0.0, viewport.x, viewport.y),
                Vec4::new(0.0, 0.0, 0.0, transition.position),
            );
        }
    }
}
