use star_particle_canvas::particles::{FieldConfig, ParticleField, RecordingCanvas, Viewport};

fn main() {
    let config = FieldConfig::from_toml_str(include_str!("field.toml")).unwrap_or_else(|err| {
        eprintln!("demos/field.toml rejected ({err}), using defaults");
        FieldConfig::default()
    });
    let mut field = ParticleField::new(config);
    let mut canvas = RecordingCanvas::new();
    field.resize(Viewport::new(800.0, 600.0, 2.0), &mut canvas);
    field.reset_clock(0.0);

    println!(
        "Seeded {} particles (cap {}), dragging pointer left to right",
        field.live_len(),
        field.max_particles()
    );

    let mut now = 0.0;
    for step in 0..=40 {
        now += 16.0;
        let x = 40.0 + step as f32 * 18.0;
        let points = field.on_pointer_move(x, 300.0, now);
        field.frame(now, &mut canvas);
        canvas.clear();

        if step % 10 == 0 {
            println!(
                "  t={:>4.0}ms x={:>5.1} trail_points={} live={} pooled={}",
                now,
                x,
                points,
                field.live_len(),
                field.pool_len()
            );
        }
    }

    for _ in 0..200 {
        now += 16.0;
        field.frame(now, &mut canvas);
        canvas.clear();
    }

    let stats = field.stats();
    println!(
        "\nAfter {:.1}s: live={} expired={} evicted={} records={}",
        now / 1_000.0,
        field.live_len(),
        stats.expired,
        stats.evicted,
        stats.created
    );
}
