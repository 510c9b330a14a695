use star_particle_canvas::particles::{
    FieldConfig, Particle, ParticleField, RecordingCanvas, SpawnConfig, Viewport,
};

fn single_burst_config(max_particles: usize) -> FieldConfig {
    FieldConfig {
        max_particles,
        spawn: SpawnConfig {
            trail_burst_min: 1,
            trail_burst_max: 1,
            ..SpawnConfig::default()
        },
        ..FieldConfig::default()
    }
}

fn short_lived(life: f32) -> Particle {
    Particle {
        x: 10.0,
        y: 10.0,
        size: 4.0,
        life,
        ..Particle::default()
    }
}

#[test]
fn ambient_burst_past_cap_evicts_into_pool() {
    let mut field = ParticleField::new(FieldConfig::with_max_particles(5));
    field.spawn_ambient(10);

    assert_eq!(field.live_len(), 5);
    assert_eq!(field.pool_len(), 5);
    assert_eq!(field.stats().evicted, 5);
}

#[test]
fn expired_particle_is_recycled_into_its_replacement() {
    let mut field = ParticleField::default();
    field.adopt(short_lived(100.0));
    field.reset_clock(0.0);

    // Frame dt is capped at 50ms, so a 100ms life takes two steps.
    assert_eq!(field.advance(50.0), 0);
    assert_eq!(field.advance(100.0), 1);

    let stats = field.stats();
    assert_eq!(field.live_len(), 1);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.recycled, 1, "replacement should reuse the released record");
    assert_eq!(field.pool_len(), 0);
    assert_eq!(stats.created, 1);

    let replacement = field.particles().next().unwrap();
    assert_eq!(replacement.age, 0.0);
    assert!(replacement.life >= 2_500.0);
}

#[test]
fn repeated_resize_stays_at_cap() {
    let mut field = ParticleField::default();
    let mut canvas = RecordingCanvas::new();
    let viewport = Viewport::new(1_024.0, 768.0, 1.5);

    field.resize(viewport, &mut canvas);
    assert_eq!(field.live_len(), 50);
    assert_eq!(field.pool_len(), 0);

    field.resize(viewport, &mut canvas);
    assert_eq!(field.live_len(), 50);
    assert_eq!(field.pool_len(), 50);
}

#[test]
fn particle_expires_when_dt_sum_reaches_life() {
    let mut field = ParticleField::default();
    field.adopt(short_lived(1_000.0));
    field.reset_clock(0.0);

    for frame in 1..25 {
        assert_eq!(field.advance(f64::from(frame) * 40.0), 0, "frame {frame}");
    }
    assert_eq!(field.advance(1_000.0), 1);
    assert!(field.particles().all(|p| p.age < p.life));
}

#[test]
fn stalled_tab_moves_particles_at_most_one_capped_step() {
    let mut field = ParticleField::default();
    field.adopt(Particle {
        vx: 1.0,
        ..short_lived(5_000.0)
    });
    field.reset_clock(0.0);

    field.advance(60_000.0);

    let p = field.particles().next().unwrap();
    assert_eq!(p.age, 50.0);
    assert!((p.x - (10.0 + 0.995 * 50.0 / 16.0)).abs() < 1e-4);
}

#[test]
fn first_pointer_move_spawns_one_particle_at_the_pointer() {
    let mut field = ParticleField::new(single_burst_config(50));
    assert_eq!(field.on_pointer_move(200.0, 120.0, 5.0), 1);

    assert_eq!(field.live_len(), 1);
    let p = field.particles().next().unwrap();
    assert!((p.x - 200.0).abs() <= 3.0);
    assert!((p.y - 120.0).abs() <= 3.0);
}

#[test]
fn pointer_stroke_interpolates_every_eight_pixels() {
    for (distance, expected) in [(1.0f32, 1usize), (8.0, 1), (8.5, 2), (100.0, 13)] {
        let mut field = ParticleField::new(single_burst_config(1_000));
        field.on_pointer_move(0.0, 0.0, 0.0);
        let before = field.live_len();

        let points = field.on_pointer_move(distance, 0.0, 16.0);

        assert_eq!(points, expected, "distance {distance}");
        assert_eq!(field.live_len() - before, expected, "distance {distance}");
    }
}

#[test]
fn quiescent_field_settles_within_cap() {
    let mut field = ParticleField::new(single_burst_config(20));
    let mut canvas = RecordingCanvas::new();
    field.resize(Viewport::new(400.0, 300.0, 1.0), &mut canvas);
    field.reset_clock(0.0);

    let mut now = 0.0;
    for i in 0..30 {
        now += 16.0;
        field.on_pointer_move(i as f32 * 12.0, 150.0, now);
    }
    for _ in 0..400 {
        now += 16.0;
        field.frame(now, &mut canvas);
        canvas.clear();
        assert!(field.live_len() <= 20);
    }

    let stats = field.stats();
    assert!(stats.expired > 0);
    assert_eq!(stats.created as usize, field.live_len() + field.pool_len());
}
