use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::render::Color;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read field config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse field config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid field config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level settings for a [`ParticleField`](super::ParticleField).
///
/// Every table is optional in TOML; missing keys fall back to the defaults
/// below, so an empty document yields `FieldConfig::default()`.
///
/// ```toml
/// max_particles = 80
///
/// [spawn]
/// trail_step_px = 6.0
///
/// [render]
/// color = "#a6d8f9"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Soft cap on the live set; pushes past it evict the oldest particle.
    pub max_particles: usize,
    pub spawn: SpawnConfig,
    pub physics: PhysicsConfig,
    pub render: RenderConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_particles: 50,
            spawn: SpawnConfig::default(),
            physics: PhysicsConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl FieldConfig {
    pub fn with_max_particles(max_particles: usize) -> Self {
        Self {
            max_particles,
            ..Self::default()
        }
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded field config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_particles == 0 {
            return Err(invalid("max_particles must be at least 1"));
        }
        self.spawn.validate()?;
        self.physics.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Ambient particles seeded by every resize.
    pub reseed_count: usize,
    pub speed_min: f32,
    pub speed_spread: f32,
    /// Full width of the noise added to each gradient component before `atan2`.
    pub direction_jitter: f32,
    /// Full width of the positional jitter, in CSS pixels.
    pub position_jitter: f32,
    pub size_min: f32,
    pub size_spread: f32,
    pub life_min_ms: f32,
    pub life_spread_ms: f32,
    /// Distance between interpolated points along a pointer stroke.
    pub trail_step_px: f32,
    pub trail_burst_min: usize,
    pub trail_burst_max: usize,
    /// Particles emitted by the first pointer move, which has no stroke to follow.
    pub first_touch_count: usize,
    pub speed_bias_max: f32,
    /// Fraction of the device pixel ratio kept free at the far edges.
    pub edge_margin_ratio: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            reseed_count: 50,
            speed_min: 0.05,
            speed_spread: 1.2,
            direction_jitter: 1.2,
            position_jitter: 6.0,
            size_min: 3.0,
            size_spread: 6.0,
            life_min_ms: 2_500.0,
            life_spread_ms: 100.0,
            trail_step_px: 8.0,
            trail_burst_min: 1,
            trail_burst_max: 2,
            first_touch_count: 1,
            speed_bias_max: 3.0,
            edge_margin_ratio: 0.2,
        }
    }
}

impl SpawnConfig {
    fn validate(&self) -> ConfigResult<()> {
        let spreads = [
            ("speed_spread", self.speed_spread),
            ("direction_jitter", self.direction_jitter),
            ("position_jitter", self.position_jitter),
            ("size_spread", self.size_spread),
            ("life_spread_ms", self.life_spread_ms),
            ("edge_margin_ratio", self.edge_margin_ratio),
        ];
        for (name, value) in spreads {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("spawn.{name} must be a finite, non-negative number")));
            }
        }
        if !(self.life_min_ms.is_finite() && self.life_min_ms > 0.0) {
            return Err(invalid("spawn.life_min_ms must be positive"));
        }
        if !(self.trail_step_px.is_finite() && self.trail_step_px > 0.0) {
            return Err(invalid("spawn.trail_step_px must be positive"));
        }
        if self.trail_burst_min > self.trail_burst_max {
            return Err(invalid(format!(
                "spawn.trail_burst_min ({}) exceeds spawn.trail_burst_max ({})",
                self.trail_burst_min, self.trail_burst_max
            )));
        }
        if !(self.speed_bias_max.is_finite() && self.speed_bias_max >= 1.0) {
            return Err(invalid("spawn.speed_bias_max must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-frame velocity multiplier. Applied once per step regardless of dt.
    pub damping: f32,
    /// Constant downward drift per nominal frame.
    pub drift: f32,
    /// Length of one nominal frame in milliseconds.
    pub frame_ms: f32,
    pub max_dt_ms: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 0.995,
            drift: 0.02,
            frame_ms: 16.0,
            max_dt_ms: 50.0,
        }
    }
}

impl PhysicsConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !(self.frame_ms.is_finite() && self.frame_ms > 0.0) {
            return Err(invalid("physics.frame_ms must be positive"));
        }
        if !(self.max_dt_ms.is_finite() && self.max_dt_ms > 0.0) {
            return Err(invalid("physics.max_dt_ms must be positive"));
        }
        if !self.damping.is_finite() || !self.drift.is_finite() {
            return Err(invalid("physics.damping and physics.drift must be finite"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub color: Color,
    pub glow_blur: f64,
    /// Fraction of the base size lost by the end of a particle's life.
    pub shrink: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: Color::STAR,
            glow_blur: 10.0,
            shrink: 0.8,
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
