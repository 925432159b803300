// Campfire Demo entry point: window, event loop and screen stack

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Fullscreen, WindowBuilder},
};

mod core;
mod engine;
mod game;

use engine::assets::AssetManager;
use engine::audio::{AudioSystem, LogAudioSink, MusicPlaylist};
use engine::game_loop::GameLoop;
use engine::input::{InputConfig, InputManager};
use engine::renderer::Renderer;
use game::screens::{main_menu, ScreenManager};
use game::{GameContext, GameSettings};

#[derive(Parser, Debug)]
#[command(name = "campfire-demo", about = "A small top-down campfire scene")]
struct Cli {
    /// Directory holding the content (textures, sounds, music)
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Start in borderless fullscreen
    #[arg(long)]
    fullscreen: bool,

    #[arg(long)]
    no_music: bool,

    #[arg(long)]
    no_sound: bool,
}

impl Cli {
    fn settings(&self) -> GameSettings {
        GameSettings {
            music_on: !self.no_music,
            sound_effects_on: !self.no_sound,
            fullscreen: self.fullscreen,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Starting Campfire Demo...");

    let event_loop = EventLoop::new()?;
    let mut builder = WindowBuilder::new()
        .with_title("Campfire Demo")
        .with_inner_size(winit::dpi::PhysicalSize::new(cli.width, cli.height))
        .with_resizable(true);
    if cli.fullscreen {
        builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = Arc::new(builder.build(&event_loop)?);
    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;

    let audio = AudioSystem::new(Box::new(LogAudioSink), MusicPlaylist::numbered());
    let mut ctx = GameContext::new(
        cli.settings(),
        AssetManager::new(&cli.assets),
        audio,
        renderer.viewport(),
    );
    let mut input = InputManager::new(InputConfig::default());
    let mut game_loop = GameLoop::new();
    let mut screens = ScreenManager::new();
    screens.add_screen(Box::new(main_menu()), &mut ctx);

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    screens.clear(&mut ctx);
                    elwt.exit();
                }
                WindowEvent::Resized(size) => {
                    renderer.resize(size);
                    ctx.viewport = renderer.viewport();
                }
                WindowEvent::Focused(focused) => {
                    if focused {
                        game_loop.resume();
                    } else {
                        game_loop.pause();
                        input.reset();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => input.process_keyboard_event(&event),
                WindowEvent::MouseInput { state, button, .. } => {
                    input.process_mouse_button(button, state)
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.process_cursor_moved(Vec2::new(position.x as f32, position.y as f32))
                }
                WindowEvent::CursorLeft { .. } => input.process_cursor_left(),
                WindowEvent::RedrawRequested => {
                    let steps = game_loop.begin_frame();
                    if !game_loop.is_paused() {
                        screens.handle_input(input.state(), &mut ctx);
                    }
                    for _ in 0..steps {
                        screens.update(game_loop.fixed_timestep(), &mut ctx);
                    }
                    input.end_frame();

                    if screens.should_quit() {
                        info!("Screen stack empty, shutting down...");
                        screens.clear(&mut ctx);
                        elwt.exit();
                        return;
                    }

                    let mut frame = renderer.begin_frame();
                    screens.draw(&mut frame, &ctx);
                    match renderer.render(&frame, &ctx.assets) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.reconfigure()
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("Out of GPU memory, shutting down");
                            elwt.exit();
                        }
                        Err(e) => warn!("Dropped frame: {:?}", e),
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
