// Player character: a walk cycle per facing on a damped physics body

use super::{BodyShape, EntityError};
use crate::core::ConvertUnits;
use crate::engine::assets::{AssetManager, TextureInfo};
use crate::engine::input::{Action, InputState};
use crate::engine::physics::{
    presets, ColliderHandle, CollisionGroups, PhysicsWorld, RigidBodyHandle,
};
use crate::engine::renderer::SpriteBatch;
use crate::game::drawing::{AnimationState, FrameLayout, SpriteAnimation};
use glam::Vec2;
use log::{debug, warn};

pub const SHEET: &str = "CharacterSprites/chrono";
pub const ACTION_SHEET: &str = "CharacterSprites/chrono_action";
pub const COLLISION_TEXTURE: &str = "CharacterSprites/chrono_collisionBox_Small";

/// Impulse applied per held direction each tick
pub const MOVE_IMPULSE: f32 = 0.6;

/// Walk cycle rate: one frame every nine ticks at 60 Hz
pub const WALK_FRAMES_PER_SECOND: f32 = 60.0 / 9.0;

const SHEET_COLUMNS: u32 = 4;
const SHEET_ROWS: u32 = 4;

/// Offset from a walk animation index to its action variant
const ACTION_OFFSET: usize = 4;

/// Direction the character looks in. The discriminant is the sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Down = 0,
    Left = 1,
    Right = 2,
    Up = 3,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Down, Facing::Left, Facing::Right, Facing::Up];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// What the held inputs ask the character to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementIntent {
    /// Sum of the per-direction impulses, y down
    pub impulse: Vec2,
    /// Facing picked from the held directions, left > right > up > down
    pub facing: Option<Facing>,
    pub action: bool,
}

impl MovementIntent {
    pub fn from_input(input: &InputState) -> Self {
        let up = input.is_pressed(Action::MoveUp);
        let down = input.is_pressed(Action::MoveDown);
        let left = input.is_pressed(Action::MoveLeft);
        let right = input.is_pressed(Action::MoveRight);

        let mut impulse = Vec2::ZERO;
        if up {
            impulse.y -= MOVE_IMPULSE;
        }
        if down {
            impulse.y += MOVE_IMPULSE;
        }
        if left {
            impulse.x -= MOVE_IMPULSE;
        }
        if right {
            impulse.x += MOVE_IMPULSE;
        }

        let facing = if left {
            Some(Facing::Left)
        } else if right {
            Some(Facing::Right)
        } else if up {
            Some(Facing::Up)
        } else if down {
            Some(Facing::Down)
        } else {
            None
        };

        Self {
            impulse,
            facing,
            action: input.is_pressed(Action::CharacterAction),
        }
    }
}

/// The player-controlled character
#[derive(Debug)]
pub struct Character {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    /// Four walk animations indexed by facing, optionally followed by four
    /// action animations
    animations: Vec<SpriteAnimation>,
    current: usize,
    facing: Facing,
    textures: Vec<TextureInfo>,
}

impl Character {
    /// Load the sheets and add the body at `position` (simulation units)
    pub fn new(
        assets: &mut AssetManager,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> Result<Self, EntityError> {
        let sheet = assets.load_texture(SHEET)?;
        let mut textures = vec![sheet];
        let mut animations = walk_cycle("walk", sheet)?;
        let frame_size = animations[0].frame_size();

        match assets.load_texture(ACTION_SHEET) {
            Ok(action_sheet) => {
                textures.push(action_sheet);
                animations.extend(walk_cycle("action", action_sheet)?);
            }
            Err(err) if err.is_missing() => {
                warn!("Resource missing, character has no action animations: {}", err);
            }
            Err(err) => return Err(err.into()),
        }

        let shape = match assets.load_texture(COLLISION_TEXTURE) {
            Ok(texture) => {
                textures.push(texture);
                BodyShape::from_texture(assets, COLLISION_TEXTURE, texture, None, Vec2::ONE)?
            }
            Err(err) if err.is_missing() => {
                warn!("Resource missing, using a frame-sized collision box: {}", err);
                BodyShape::rectangle(frame_size, Vec2::ONE)
            }
            Err(err) => return Err(err.into()),
        };

        for animation in &mut animations {
            animation.set_origin(shape.origin);
        }

        let collider = shape
            .collider(COLLISION_TEXTURE)?
            .collision_groups(CollisionGroups::Player)
            .build();
        let (body, collider) = physics.add_body(presets::character_body(position), collider);
        debug!("Character spawned at {:?}", position);

        Ok(Self {
            body,
            collider,
            animations,
            current: Facing::Down.index(),
            facing: Facing::Down,
            textures,
        })
    }

    pub fn has_action_animations(&self) -> bool {
        self.animations.len() > ACTION_OFFSET
    }

    /// Apply one fixed step of held inputs: push the body and pick the animation
    pub fn apply_intent(&mut self, intent: MovementIntent, physics: &mut PhysicsWorld) {
        if intent.action {
            let index = if self.has_action_animations() {
                self.facing.index() + ACTION_OFFSET
            } else {
                self.facing.index()
            };
            self.select(index);
            return;
        }

        if intent.impulse != Vec2::ZERO {
            physics.apply_impulse(self.body, intent.impulse);
        }

        match intent.facing {
            Some(facing) => {
                self.facing = facing;
                self.select(facing.index());
            }
            None => self.animations[self.current].stop(),
        }
    }

    /// Switch to an animation, restarting it only when it changed or was stopped
    fn select(&mut self, index: usize) {
        let animation = &mut self.animations[index];
        if index != self.current || animation.state() == AnimationState::Stopped {
            animation.play();
        }
        self.current = index;
    }

    pub fn update(&mut self, dt: f32) {
        self.animations[self.current].update(dt);
    }

    pub fn draw(&self, batch: &mut SpriteBatch, physics: &PhysicsWorld) {
        if let Some(position) = self.display_position(physics) {
            self.animations[self.current].draw(batch, position);
        }
    }

    pub fn display_position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.body_position(self.body).map(ConvertUnits::vec_to_display)
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[cfg(test)]
    pub fn current_animation(&self) -> &SpriteAnimation {
        &self.animations[self.current]
    }

    #[cfg(test)]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Textures this character loaded, for release on unload
    pub fn textures(&self) -> &[TextureInfo] {
        &self.textures
    }
}

/// One looping row animation per facing
fn walk_cycle(prefix: &str, sheet: TextureInfo) -> Result<Vec<SpriteAnimation>, EntityError> {
    Facing::ALL
        .iter()
        .map(|facing| {
            SpriteAnimation::new(
                &format!("{}_{:?}", prefix, facing).to_lowercase(),
                sheet,
                FrameLayout::Row {
                    columns: SHEET_COLUMNS,
                    rows: SHEET_ROWS,
                    row: facing.index() as u32,
                },
                WALK_FRAMES_PER_SECOND,
                true,
            )
            .map_err(EntityError::from)
        })
        .collect()
}
