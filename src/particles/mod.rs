pub mod config;
pub mod field;
pub mod pool;
pub mod recording;
pub mod render;
pub mod simulation;
pub mod spawner;
pub mod surface;
pub mod trail;

pub use config::{ConfigError, FieldConfig, PhysicsConfig, RenderConfig, SpawnConfig};
pub use field::{FieldStats, ParticleField, DEFAULT_SEED};
pub use pool::{LiveSet, ParticlePool};
pub use recording::{DrawCommand, RecordingCanvas};
pub use render::{draw_particles, Color, ColorParseError, DrawingContext};
pub use simulation::{step_particles, FrameClock, Particle};
pub use spawner::Spawner;
pub use surface::{Surface, SurfaceMetrics, Viewport};
pub use trail::{PointerTrail, TrailSample, TrailSegment, TrailStroke};
