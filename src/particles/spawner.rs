use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SpawnConfig;
use super::render::Color;
use super::simulation::Particle;

/// Randomised particle construction shared by ambient and trail spawns.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: StdRng,
    config: SpawnConfig,
    color: Color,
}

impl Spawner {
    pub fn new(config: SpawnConfig, color: Color, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
            color,
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Uniform point in `[0, width) x [0, height)`.
    pub fn random_point(&mut self, (width, height): (f32, f32)) -> (f32, f32) {
        (self.unit() * width, self.unit() * height)
    }

    /// How many particles one interpolated trail point emits.
    pub fn trail_burst(&mut self) -> usize {
        let SpawnConfig {
            trail_burst_min: min,
            trail_burst_max: max,
            ..
        } = self.config;
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    /// Overwrites every field of `slot` with a fresh particle near `(x, y)`.
    ///
    /// The heading points away from `reference` (the previous pointer sample
    /// for trails), with noise on both gradient components. Without a
    /// reference the gradient is pure noise.
    pub fn emit(
        &mut self,
        slot: &mut Particle,
        (x, y): (f32, f32),
        speed_bias: f32,
        reference: Option<(f32, f32)>,
    ) {
        let cfg = self.config;
        let (ref_x, ref_y) = reference.unwrap_or((x, y));

        let gy = y - ref_y + self.centered(cfg.direction_jitter);
        let gx = x - ref_x + self.centered(cfg.direction_jitter);
        let angle = gy.atan2(gx);
        let speed = (cfg.speed_min + self.unit() * cfg.speed_spread) * speed_bias;

        *slot = Particle {
            x: x + self.centered(cfg.position_jitter),
            y: y + self.centered(cfg.position_jitter),
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            size: cfg.size_min + self.unit() * cfg.size_spread,
            life: cfg.life_min_ms + self.unit() * cfg.life_spread_ms,
            age: 0.0,
            color: self.color,
        };
    }

    fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn centered(&mut self, width: f32) -> f32 {
        (self.unit() - 0.5) * width
    }
}

#[cfg(test)]
mod tests {
    use super::Spawner;
    use crate::particles::{Color, Particle, SpawnConfig};

    fn spawner(seed: u64) -> Spawner {
        Spawner::new(SpawnConfig::default(), Color::STAR, seed)
    }

    #[test]
    fn emitted_fields_stay_in_documented_ranges() {
        let mut spawner = spawner(7);
        let mut slot = Particle {
            age: 9_999.0,
            ..Particle::default()
        };

        for _ in 0..500 {
            spawner.emit(&mut slot, (100.0, 100.0), 1.0, None);
            assert_eq!(slot.age, 0.0);
            assert!((3.0..9.0).contains(&slot.size));
            assert!((2_500.0..2_600.0).contains(&slot.life));
            assert!((slot.x - 100.0).abs() <= 3.0 && (slot.y - 100.0).abs() <= 3.0);
            let speed = slot.vx.hypot(slot.vy);
            assert!((0.05 - 1e-5..1.25 + 1e-5).contains(&speed), "speed {speed}");
        }
    }

    #[test]
    fn speed_bias_scales_speed() {
        let mut plain = spawner(3);
        let mut biased = spawner(3);
        let (mut a, mut b) = (Particle::default(), Particle::default());

        plain.emit(&mut a, (0.0, 0.0), 1.0, None);
        biased.emit(&mut b, (0.0, 0.0), 3.0, None);

        let ratio = b.vx.hypot(b.vy) / a.vx.hypot(a.vy);
        assert!((ratio - 3.0).abs() < 1e-4);
    }

    #[test]
    fn far_reference_sets_heading() {
        let mut spawner = spawner(11);
        let mut slot = Particle::default();
        for _ in 0..100 {
            spawner.emit(&mut slot, (500.0, 0.0), 1.0, Some((0.0, 0.0)));
            assert!(slot.vx > 0.0, "particle should head away from the reference");
        }
    }

    #[test]
    fn random_points_fall_inside_extent() {
        let mut spawner = spawner(5);
        for _ in 0..200 {
            let (x, y) = spawner.random_point((40.0, 10.0));
            assert!((0.0..40.0).contains(&x) && (0.0..10.0).contains(&y));
        }
    }

    #[test]
    fn trail_burst_respects_configured_range() {
        let mut spawner = spawner(9);
        let bursts: Vec<usize> = (0..200).map(|_| spawner.trail_burst()).collect();
        assert!(bursts.iter().all(|n| (1..=2).contains(n)));
        assert!(bursts.contains(&1) && bursts.contains(&2));

        let fixed = SpawnConfig {
            trail_burst_min: 1,
            trail_burst_max: 1,
            ..SpawnConfig::default()
        };
        let mut spawner = Spawner::new(fixed, Color::STAR, 9);
        assert_eq!(spawner.trail_burst(), 1);
    }
}
