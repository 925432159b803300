// CPU particle emitters: campfire flames with smoke, and a creature aura
//
// Positions and sizes are in display pixels. Each emitter owns a seeded
// `StdRng` so runs can be replayed.

use crate::core::math::lerp;
use crate::engine::assets::TextureInfo;
use crate::engine::renderer::{DrawCommand, SpriteBatch};
use glam::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// Live particles per emitter
pub const MAX_PARTICLES: usize = 1000;

/// The flame tuning values are authored at four times display size
const FIRE_SCALE: f32 = 0.25;

/// Fade in over the first tenth of life, fade out over the rest
pub fn quick_fade_in_slow_fade_out(t: f32) -> f32 {
    if t < 0.1 {
        t / 0.1
    } else {
        (1.0 - (t - 0.1) / 0.9).max(0.0)
    }
}

/// A single billboard with linear motion and size interpolation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub rotational_velocity: f32,
    pub age: f32,
    pub lifetime: f32,
    pub start_size: f32,
    pub end_size: f32,
    pub size: f32,
    pub alpha: f32,
}

impl Particle {
    /// Age as a fraction of lifetime, in `[0, 1]`
    pub fn normalized_age(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).min(1.0)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    fn step(&mut self, dt: f32) {
        self.age += dt;
        self.position += self.velocity * dt;
        self.rotation += self.rotational_velocity * dt;
        let t = self.normalized_age();
        self.size = lerp(self.start_size, self.end_size, t);
        self.alpha = quick_fade_in_slow_fade_out(t);
    }

    fn draw_command(&self, texture: TextureInfo) -> DrawCommand {
        let extent = texture.size().max_element().max(1.0);
        DrawCommand::new(texture, self.position)
            .origin(texture.center())
            .rotation(self.rotation)
            .scale(Vec2::splat(self.size / extent))
            .tint(Vec4::new(1.0, 1.0, 1.0, self.alpha))
    }
}

/// Accumulates time and returns how many particles are due
fn due(accumulator: &mut f32, rate: f32, dt: f32) -> usize {
    if rate <= 0.0 {
        return 0;
    }
    *accumulator += dt;
    let period = 1.0 / rate;
    let mut count = 0;
    while *accumulator >= period {
        *accumulator -= period;
        count += 1;
    }
    count
}

/// Flames rising from a point, shedding smoke half way through their life
#[derive(Debug)]
pub struct FireEmitter {
    pub position: Vec2,
    particles_per_second: f32,
    smoke_chance: f32,
    fire: Vec<Particle>,
    smoke: Vec<Particle>,
    fire_texture: TextureInfo,
    smoke_texture: TextureInfo,
    accumulator: f32,
    rng: StdRng,
}

impl FireEmitter {
    pub const PARTICLES_PER_SECOND: f32 = 40.0;
    pub const DEFAULT_SMOKE_AMOUNT: f32 = 0.25;

    pub fn new(position: Vec2, fire_texture: TextureInfo, smoke_texture: TextureInfo, seed: u64) -> Self {
        let mut emitter = Self {
            position,
            particles_per_second: Self::PARTICLES_PER_SECOND,
            smoke_chance: 0.0,
            fire: Vec::new(),
            smoke: Vec::new(),
            fire_texture,
            smoke_texture,
            accumulator: 0.0,
            rng: StdRng::seed_from_u64(seed),
        };
        emitter.set_smoke_amount(Self::DEFAULT_SMOKE_AMOUNT);
        emitter
    }

    /// Share of flames that turn into smoke, clamped to `[0, 1]`. Half of
    /// the amount is used as the per-flame probability.
    pub fn set_smoke_amount(&mut self, amount: f32) {
        self.smoke_chance = amount.clamp(0.0, 1.0) / 2.0;
    }

    #[cfg(test)]
    pub fn smoke_amount(&self) -> f32 {
        self.smoke_chance * 2.0
    }

    #[cfg(test)]
    pub fn set_particles_per_second(&mut self, rate: f32) {
        self.particles_per_second = rate.max(0.0);
    }

    fn spawn_fire(&mut self) -> Particle {
        let rng = &mut self.rng;
        let offset = Vec2::new(rng.gen_range(-50.0..=50.0), rng.gen_range(-10.0..=10.0)) * FIRE_SCALE;
        let start_size = rng.gen_range(150.0..=200.0) * FIRE_SCALE;
        Particle {
            position: self.position + offset,
            velocity: Vec2::new(rng.gen_range(-10.0..=10.0), rng.gen_range(-100.0..=-50.0)) * FIRE_SCALE,
            rotation: rng.gen_range(0.0..TAU),
            rotational_velocity: rng.gen_range(-TAU..=TAU),
            age: 0.0,
            lifetime: rng.gen_range(0.1..=2.0),
            start_size,
            end_size: rng.gen_range(4.0..=20.0) * FIRE_SCALE,
            size: start_size,
            alpha: 0.0,
        }
    }

    fn spawn_smoke(&mut self, position: Vec2) -> Particle {
        let rng = &mut self.rng;
        let start_size = rng.gen_range(30.0..=60.0) * FIRE_SCALE;
        Particle {
            position,
            velocity: Vec2::new(rng.gen_range(0.0..=30.0), rng.gen_range(-30.0..=-10.0)) * FIRE_SCALE,
            rotation: 0.0,
            rotational_velocity: rng.gen_range(-PI..=PI),
            age: 0.0,
            lifetime: rng.gen_range(1.0..=5.0),
            start_size,
            end_size: rng.gen_range(150.0..=200.0) * FIRE_SCALE,
            size: start_size,
            alpha: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        let mut smoke_sources = Vec::new();
        for particle in &mut self.fire {
            let before = particle.normalized_age();
            particle.step(dt);
            if before < 0.5 && particle.normalized_age() >= 0.5 {
                smoke_sources.push(particle.position);
            }
        }

        for position in smoke_sources {
            if self.rng.gen::<f32>() < self.smoke_chance && self.smoke.len() < MAX_PARTICLES {
                let smoke = self.spawn_smoke(position);
                self.smoke.push(smoke);
            }
        }

        for particle in &mut self.smoke {
            particle.step(dt);
        }

        self.fire.retain(Particle::is_alive);
        self.smoke.retain(Particle::is_alive);

        let due = due(&mut self.accumulator, self.particles_per_second, dt);
        for _ in 0..due {
            if self.fire.len() >= MAX_PARTICLES {
                break;
            }
            let particle = self.spawn_fire();
            self.fire.push(particle);
        }
    }

    /// Smoke first so flames draw over it
    pub fn draw(&self, batch: &mut SpriteBatch) {
        for particle in &self.smoke {
            batch.draw(particle.draw_command(self.smoke_texture));
        }
        for particle in &self.fire {
            batch.draw(particle.draw_command(self.fire_texture));
        }
    }

    #[cfg(test)]
    pub fn fire_particles(&self) -> &[Particle] {
        &self.fire
    }

    #[cfg(test)]
    pub fn smoke_particles(&self) -> &[Particle] {
        &self.smoke
    }

    pub fn clear(&mut self) {
        self.fire.clear();
        self.smoke.clear();
        self.accumulator = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Orbiter {
    angle: f32,
    radius: f32,
    angular_velocity: f32,
    drift: f32,
    age: f32,
    lifetime: f32,
    size: f32,
}

impl Orbiter {
    fn particle(&self, center: Vec2) -> Particle {
        let (sin, cos) = self.angle.sin_cos();
        Particle {
            position: center + Vec2::new(cos, sin) * self.radius,
            velocity: Vec2::ZERO,
            rotation: self.angle,
            rotational_velocity: self.angular_velocity,
            age: self.age,
            lifetime: self.lifetime,
            start_size: self.size,
            end_size: self.size,
            size: self.size,
            alpha: quick_fade_in_slow_fade_out((self.age / self.lifetime).min(1.0)),
        }
    }
}

/// Particles circling a creature and slowly drifting outwards
#[derive(Debug)]
pub struct AuraEmitter {
    pub center: Vec2,
    pub tint: Vec4,
    radius: f32,
    particles_per_second: f32,
    orbiters: Vec<Orbiter>,
    texture: TextureInfo,
    accumulator: f32,
    rng: StdRng,
}

impl AuraEmitter {
    pub const PARTICLES_PER_SECOND: f32 = 24.0;
    const DRIFT: std::ops::RangeInclusive<f32> = 2.0..=6.0;

    pub fn new(center: Vec2, radius: f32, texture: TextureInfo, seed: u64) -> Self {
        Self {
            center,
            tint: Vec4::new(0.6, 0.8, 1.0, 1.0),
            radius: radius.max(1.0),
            particles_per_second: Self::PARTICLES_PER_SECOND,
            orbiters: Vec::new(),
            texture,
            accumulator: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn spawn(&mut self) -> Orbiter {
        let rng = &mut self.rng;
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Orbiter {
            angle: rng.gen_range(0.0..TAU),
            radius: self.radius * rng.gen_range(0.8..=1.2),
            angular_velocity: direction * rng.gen_range(0.5..=1.5),
            drift: rng.gen_range(Self::DRIFT),
            age: 0.0,
            lifetime: rng.gen_range(1.5..=3.0),
            size: rng.gen_range(3.0..=6.0),
        }
    }

    pub fn update(&mut self, dt: f32) {
        for orbiter in &mut self.orbiters {
            orbiter.age += dt;
            orbiter.angle = (orbiter.angle + orbiter.angular_velocity * dt).rem_euclid(TAU);
            orbiter.radius += orbiter.drift * dt;
        }
        self.orbiters.retain(|o| o.age < o.lifetime);

        let due = due(&mut self.accumulator, self.particles_per_second, dt);
        for _ in 0..due {
            if self.orbiters.len() >= MAX_PARTICLES {
                break;
            }
            let orbiter = self.spawn();
            self.orbiters.push(orbiter);
        }
    }

    /// Current particles in world space
    pub fn particles(&self) -> Vec<Particle> {
        self.orbiters.iter().map(|o| o.particle(self.center)).collect()
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        for particle in self.particles() {
            let tint = self.tint * Vec4::new(1.0, 1.0, 1.0, particle.alpha);
            batch.draw(particle.draw_command(self.texture).tint(tint));
        }
    }

    pub fn len(&self) -> usize {
        self.orbiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbiters.is_empty()
    }
}
