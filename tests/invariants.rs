use proptest::prelude::*;
use star_particle_canvas::particles::{FieldConfig, ParticleField, RecordingCanvas, Viewport};

#[derive(Debug, Clone)]
enum Op {
    Ambient(usize),
    Pointer { x: f32, y: f32, dt: f64 },
    Advance(f64),
    Resize { width: f64, height: f64, dpr: f64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..40).prop_map(Op::Ambient),
        (0.0f32..800.0, 0.0f32..600.0, 0.0f64..40.0).prop_map(|(x, y, dt)| Op::Pointer { x, y, dt }),
        (0.0f64..400.0).prop_map(Op::Advance),
        (0.0f64..1_200.0, 0.0f64..900.0, 0.5f64..3.0)
            .prop_map(|(width, height, dpr)| Op::Resize { width, height, dpr }),
    ]
}

proptest! {
    #[test]
    fn field_invariants_hold_after_every_operation(
        max_particles in 1usize..60,
        seed in any::<u64>(),
        ops in prop::collection::vec(op(), 1..80),
    ) {
        let mut field = ParticleField::with_seed(FieldConfig::with_max_particles(max_particles), seed);
        let mut canvas = RecordingCanvas::new();
        let mut now = 0.0f64;
        field.reset_clock(now);

        for op in ops {
            match op {
                Op::Ambient(count) => field.spawn_ambient(count),
                Op::Pointer { x, y, dt } => {
                    now += dt;
                    field.on_pointer_move(x, y, now);
                }
                Op::Advance(dt) => {
                    now += dt;
                    let records_before = field.live_len() + field.pool_len();
                    field.frame(now, &mut canvas);
                    canvas.clear();
                    prop_assert!(field.live_len() + field.pool_len() >= records_before);
                }
                Op::Resize { width, height, dpr } => {
                    field.resize(Viewport::new(width, height, dpr), &mut canvas);
                }
            }

            prop_assert!(field.live_len() <= max_particles);
            prop_assert!(field.particles().all(|p| p.age >= 0.0 && p.age < p.life));
            prop_assert_eq!(field.stats().created as usize, field.live_len() + field.pool_len());
        }
    }
}
