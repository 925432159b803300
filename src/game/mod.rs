// Demo content built on the engine: drawing, effects, entities and screens

pub mod drawing;
pub mod effects;
pub mod entities;
pub mod screens;
pub mod settings;

pub use settings::{GameContext, GameSettings};
