// Engine modules: renderer, physics, geometry, input, audio

pub mod assets;
pub mod audio;
pub mod game_loop;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod renderer;
