#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use star_particle_canvas::particles::{
        DrawCommand, FieldConfig, ParticleField, RecordingCanvas, Viewport, DEFAULT_SEED,
    };

    /// Runs the star field without a browser, sweeping a synthetic pointer in
    /// a circle and logging particle counts.
    #[derive(Parser, Debug)]
    #[command(version, about)]
    struct Args {
        #[arg(long, default_value_t = 5.0)]
        seconds: f64,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Overrides `max_particles` from the config file.
        #[arg(long)]
        max_particles: Option<usize>,
        /// TOML field config.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        #[arg(long, default_value_t = 1.0)]
        dpr: f64,
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let mut config = match &args.config {
            Some(path) => FieldConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => FieldConfig::default(),
        };
        if let Some(max) = args.max_particles {
            config.max_particles = max;
        }
        config.validate()?;

        let fps = args.fps.max(1.0);
        let frame_ms = 1_000.0 / fps;
        let mut field = ParticleField::with_seed(config, args.seed);
        let mut canvas = RecordingCanvas::new();

        let viewport = Viewport::new(args.width, args.height, args.dpr);
        let metrics = field.resize(viewport, &mut canvas);
        field.reset_clock(0.0);

        log::info!(
            "star field smoke run: {:.1}s @ {:.1}fps (max_particles={}, backing={}x{})",
            args.seconds,
            fps,
            field.max_particles(),
            metrics.backing_width,
            metrics.backing_height
        );

        let (cx, cy) = (args.width as f32 / 2.0, args.height as f32 / 2.0);
        let radius = cx.min(cy) * 0.6;
        let mut now = 0.0;
        let mut next_report = 0.5;
        let mut rects = 0usize;

        while now < args.seconds * 1_000.0 {
            now += frame_ms;

            let phase = (now / 1_000.0) as f32 * std::f32::consts::TAU * 0.25;
            field.on_pointer_move(cx + radius * phase.cos(), cy + radius * phase.sin(), now);

            canvas.clear();
            field.frame(now, &mut canvas);
            rects = canvas.count(|c| matches!(c, DrawCommand::Rect { .. }));

            if now / 1_000.0 >= next_report {
                let stats = field.stats();
                log::info!(
                    "t={:.2}s live={} pooled={} expired={} evicted={}",
                    now / 1_000.0,
                    field.live_len(),
                    field.pool_len(),
                    stats.expired,
                    stats.evicted
                );
                next_report += 0.5;
            }
        }

        let stats = field.stats();
        log::info!(
            "done: live={} pooled={} records={} spawned={} last frame drew {} particles",
            field.live_len(),
            field.pool_len(),
            stats.created,
            stats.spawned(),
            rects
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
