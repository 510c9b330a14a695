use super::config::FieldConfig;
use super::pool::{LiveSet, ParticlePool};
use super::render::{draw_particles, DrawingContext};
use super::simulation::{step_particles, FrameClock, Particle};
use super::spawner::Spawner;
use super::surface::{Surface, SurfaceMetrics, Viewport};
use super::trail::{PointerTrail, TrailSample, TrailStroke};

/// Seed used by [`ParticleField::new`]. Hosts that want a different field on
/// every mount pass their own seed to [`ParticleField::with_seed`].
pub const DEFAULT_SEED: u64 = 0x5eed_57a2;

/// Running totals kept by a [`ParticleField`].
///
/// `created` counts records that did not come from the pool and therefore
/// always equals `live + pooled`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldStats {
    pub created: u64,
    pub recycled: u64,
    pub expired: u64,
    pub evicted: u64,
}

impl FieldStats {
    pub fn spawned(&self) -> u64 {
        self.created + self.recycled
    }
}

/// The whole effect: live particles, their pool, the spawner and the timing
/// and pointer state the host feeds in.
///
/// Every method runs to completion on the caller's thread; hosts call
/// [`resize`](Self::resize) and [`on_pointer_move`](Self::on_pointer_move)
/// between frames and [`frame`](Self::frame) once per animation frame.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    live: LiveSet,
    pool: ParticlePool,
    spawner: Spawner,
    trail: PointerTrail,
    clock: FrameClock,
    metrics: SurfaceMetrics,
    stats: FieldStats,
    staging: Vec<Particle>,
}

#[derive(Debug, Clone, Copy)]
enum Origin {
    Anywhere((f32, f32)),
    At(f32, f32),
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

impl ParticleField {
    pub fn new(config: FieldConfig) -> Self {
        Self::with_seed(config, DEFAULT_SEED)
    }

    pub fn with_seed(mut config: FieldConfig, seed: u64) -> Self {
        if config.max_particles == 0 {
            log::warn!("max_particles of 0 raised to 1");
            config.max_particles = 1;
        }
        Self {
            live: LiveSet::new(config.max_particles),
            pool: ParticlePool::new(),
            spawner: Spawner::new(config.spawn, config.render.color, seed),
            trail: PointerTrail::new(),
            clock: FrameClock::new(0.0, config.physics.max_dt_ms),
            metrics: SurfaceMetrics::default(),
            stats: FieldStats::default(),
            staging: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn max_particles(&self) -> usize {
        self.live.max_particles()
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.live.iter()
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn stats(&self) -> FieldStats {
        self.stats
    }

    pub fn metrics(&self) -> SurfaceMetrics {
        self.metrics
    }

    pub fn last_pointer(&self) -> Option<TrailSample> {
        self.trail.last()
    }

    pub fn last_frame_ms(&self) -> f64 {
        self.clock.last_frame_ms()
    }

    /// Starts frame timing at `now_ms`, normally the host clock at mount.
    pub fn reset_clock(&mut self, now_ms: f64) {
        self.clock.reset(now_ms);
    }

    /// Sizes `surface` for `viewport`, rescales its transform by the device
    /// pixel ratio and seeds a fresh batch of ambient particles. Existing
    /// particles are kept.
    pub fn resize<S: Surface + ?Sized>(&mut self, viewport: Viewport, surface: &mut S) -> SurfaceMetrics {
        let metrics = SurfaceMetrics::for_viewport(viewport);
        surface.set_backing_size(metrics.backing_width, metrics.backing_height);
        surface.set_display_size(metrics.display_width, metrics.display_height);
        surface.set_transform(metrics.dpr, 0.0, 0.0, metrics.dpr, 0.0, 0.0);
        self.metrics = metrics;

        log::debug!(
            "surface resized to {}x{} css px at dpr {} ({}x{} backing)",
            metrics.display_width,
            metrics.display_height,
            metrics.dpr,
            metrics.backing_width,
            metrics.backing_height
        );

        self.spawn_ambient(self.config.spawn.reseed_count);
        metrics
    }

    /// Spawns `count` particles at random positions across the surface.
    pub fn spawn_ambient(&mut self, count: usize) {
        let extent = self.metrics.spawn_extent(self.config.spawn.edge_margin_ratio);
        self.spawn_batch(count, Origin::Anywhere(extent), 1.0, None);
    }

    /// Spawns `count` particles around `(x, y)`, heading away from `reference`
    /// with base speed multiplied by `speed_bias`.
    pub fn spawn_at_point(
        &mut self,
        x: f32,
        y: f32,
        count: usize,
        speed_bias: f32,
        reference: Option<(f32, f32)>,
    ) {
        self.spawn_batch(count, Origin::At(x, y), speed_bias, reference);
    }

    /// Inserts a caller-built particle as if it had just been spawned.
    pub fn adopt(&mut self, particle: Particle) {
        self.stats.created += 1;
        self.push_live(particle);
    }

    /// Feeds a pointer sample in CSS pixels. The first sample spawns at the
    /// pointer; later ones spawn along the stroke from the previous sample.
    /// Returns the number of spawn points used, at most `max_particles` per
    /// stroke since earlier points would be evicted by later ones anyway.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, now_ms: f64) -> usize {
        let spawn = *self.spawner.config();

        match self.trail.record(x, y, now_ms, spawn.trail_step_px) {
            TrailStroke::First { x, y } => {
                self.spawn_at_point(x, y, spawn.first_touch_count, 1.0, None);
                1
            }
            TrailStroke::Segment(segment) => {
                let speed = segment.speed(self.config.physics.frame_ms);
                let bias = (1.0 + speed).min(spawn.speed_bias_max);
                let reference = Some((segment.from.x, segment.from.y));
                let limit = segment.steps.min(self.live.max_particles());
                for (px, py) in segment.last_points(limit) {
                    let burst = self.spawner.trail_burst();
                    self.spawn_at_point(px, py, burst, bias, reference);
                }
                limit
            }
        }
    }

    /// Advances the simulation to `now_ms` and returns how many particles
    /// expired. Each expiry is replaced by one ambient spawn.
    pub fn advance(&mut self, now_ms: f64) -> usize {
        let dt = self.clock.tick(now_ms);
        let expired = step_particles(&mut self.live, &mut self.pool, dt, &self.config.physics);
        if expired > 0 {
            self.stats.expired += expired as u64;
            log::trace!("{expired} particle(s) expired, respawning");
            self.spawn_ambient(expired);
        }
        expired
    }

    pub fn draw<C: DrawingContext + ?Sized>(&self, ctx: &mut C) {
        let (width, height) = self.metrics.clear_extent();
        draw_particles(ctx, width, height, self.live.iter().rev(), &self.config.render);
    }

    /// One animation frame: [`advance`](Self::advance) then [`draw`](Self::draw).
    pub fn frame<C: DrawingContext + ?Sized>(&mut self, now_ms: f64, ctx: &mut C) -> usize {
        let expired = self.advance(now_ms);
        self.draw(ctx);
        expired
    }

    /// Takes every record the batch needs before pushing any of them, so
    /// records evicted by this batch stay pooled for the next one.
    fn spawn_batch(
        &mut self,
        count: usize,
        origin: Origin,
        speed_bias: f32,
        reference: Option<(f32, f32)>,
    ) {
        let mut staged = std::mem::take(&mut self.staging);
        staged.clear();
        for _ in 0..count {
            let record = match self.pool.try_acquire() {
                Some(recycled) => {
                    self.stats.recycled += 1;
                    recycled
                }
                None => {
                    self.stats.created += 1;
                    Particle::default()
                }
            };
            staged.push(record);
        }

        for mut particle in staged.drain(..) {
            let point = match origin {
                Origin::Anywhere(extent) => self.spawner.random_point(extent),
                Origin::At(x, y) => (x, y),
            };
            self.spawner.emit(&mut particle, point, speed_bias, reference);
            self.push_live(particle);
        }
        self.staging = staged;
    }

    fn push_live(&mut self, particle: Particle) {
        if let Some(evicted) = self.live.push(particle) {
            self.stats.evicted += 1;
            self.pool.release(evicted);
        }
    }
}
