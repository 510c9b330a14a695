pub mod binding;
pub mod particles;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use particles::{
    Color, ConfigError, DrawingContext, FieldConfig, FieldStats, Particle, ParticleField,
    PhysicsConfig, RenderConfig, SpawnConfig, Surface, SurfaceMetrics, Viewport,
};
