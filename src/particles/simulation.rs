use super::config::PhysicsConfig;
use super::pool::{LiveSet, ParticlePool};
use super::render::Color;

/// One star. Records are recycled through [`ParticlePool`], so every field is
/// overwritten on spawn and nothing here relies on identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Velocity in surface units per nominal frame.
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub life: f32,
    pub age: f32,
    pub color: Color,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            size: 0.0,
            life: 0.0,
            age: 0.0,
            color: Color::STAR,
        }
    }
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.age < self.life
    }

    /// Fraction of the lifespan already used, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.life <= 0.0 {
            return 1.0;
        }
        (self.age / self.life).clamp(0.0, 1.0)
    }

    /// Returns `(alpha, draw_size)` for the current age.
    pub fn fade(&self, shrink: f32) -> (f32, f32) {
        let t = self.progress();
        (1.0 - t, self.size * (1.0 - t * shrink))
    }

    /// Damps velocity once, then moves by `dt` worth of nominal frames.
    ///
    /// The damping factor is per call, not per millisecond, so a long frame
    /// damps exactly as much as a short one.
    pub fn integrate(&mut self, dt_ms: f32, physics: &PhysicsConfig) {
        let frames = dt_ms / physics.frame_ms;
        self.vx *= physics.damping;
        self.vy *= physics.damping;
        self.x += self.vx * frames;
        self.y += self.vy * frames + physics.drift * frames;
    }
}

/// Ages every live particle by `dt_ms`, newest first, moving expired ones to
/// `pool`. Returns how many expired.
pub fn step_particles(
    live: &mut LiveSet,
    pool: &mut ParticlePool,
    dt_ms: f32,
    physics: &PhysicsConfig,
) -> usize {
    let mut expired = 0;

    for i in (0..live.len()).rev() {
        let Some(particle) = live.get_mut(i) else {
            continue;
        };
        particle.age += dt_ms;
        if !particle.is_alive() {
            if let Some(dead) = live.remove(i) {
                pool.release(dead);
                expired += 1;
            }
            continue;
        }
        particle.integrate(dt_ms, physics);
    }

    expired
}

/// Tracks the previous animation-frame timestamp and turns each new one into a
/// bounded step length.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_frame_ms: f64,
    max_dt_ms: f32,
}

impl FrameClock {
    pub fn new(start_ms: f64, max_dt_ms: f32) -> Self {
        Self {
            last_frame_ms: start_ms,
            max_dt_ms,
        }
    }

    pub fn last_frame_ms(&self) -> f64 {
        self.last_frame_ms
    }

    pub fn reset(&mut self, now_ms: f64) {
        if now_ms.is_finite() {
            self.last_frame_ms = now_ms;
        }
    }

    /// Elapsed milliseconds since the previous tick, clamped to `[0, max_dt]`
    /// so a backgrounded tab does not produce one huge physics step.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = (now_ms - self.last_frame_ms).max(0.0).min(f64::from(self.max_dt_ms));
        self.reset(now_ms);
        dt as f32
    }
}
