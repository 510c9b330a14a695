/// Pointer position as last seen by the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    pub x: f32,
    pub y: f32,
    pub at_ms: f64,
}

/// What a single pointer move contributes to the trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrailStroke {
    /// No earlier sample to interpolate from.
    First { x: f32, y: f32 },
    Segment(TrailSegment),
}

/// Straight stroke from the previous sample to the current one, cut into
/// `steps` evenly spaced points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    pub from: TrailSample,
    pub to: TrailSample,
    pub steps: usize,
}

impl TrailSegment {
    pub fn dx(&self) -> f32 {
        self.to.x - self.from.x
    }

    pub fn dy(&self) -> f32 {
        self.to.y - self.from.y
    }

    pub fn distance(&self) -> f32 {
        self.dx().hypot(self.dy())
    }

    /// Elapsed time between samples, never below 1ms.
    pub fn dt_ms(&self) -> f32 {
        ((self.to.at_ms - self.from.at_ms) as f32).max(1.0)
    }

    /// Pointer speed in pixels per nominal frame, quartered so that ordinary
    /// strokes land in the low single digits.
    pub fn speed(&self, frame_ms: f32) -> f32 {
        self.distance() / self.dt_ms() * frame_ms / 4.0
    }

    /// Interpolated points, excluding the start and including the end.
    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.last_points(self.steps)
    }

    /// The `limit` points closest to the end of the stroke, in stroke order.
    pub fn last_points(&self, limit: usize) -> impl Iterator<Item = (f32, f32)> + '_ {
        let steps = self.steps as f32;
        let first = self.steps.saturating_sub(limit) + 1;
        (first..=self.steps).map(move |i| {
            let k = i as f32 / steps;
            (self.from.x + self.dx() * k, self.from.y + self.dy() * k)
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct PointerTrail {
    last: Option<TrailSample>,
}

impl PointerTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<TrailSample> {
        self.last
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Records the pointer at `(x, y)` and returns the stroke since the
    /// previous sample, split every `step_px` pixels.
    pub fn record(&mut self, x: f32, y: f32, now_ms: f64, step_px: f32) -> TrailStroke {
        let to = TrailSample { x, y, at_ms: now_ms };
        match self.last.replace(to) {
            None => TrailStroke::First { x, y },
            Some(from) => {
                let distance = (x - from.x).hypot(y - from.y);
                let steps = (distance / step_px).ceil();
                TrailStroke::Segment(TrailSegment {
                    from,
                    to,
                    steps: if steps.is_finite() && steps > 0.0 { steps as usize } else { 0 },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PointerTrail, TrailStroke};

    #[test]
    fn first_sample_has_nothing_to_interpolate() {
        let mut trail = PointerTrail::new();
        assert_eq!(trail.record(5.0, 6.0, 0.0, 8.0), TrailStroke::First { x: 5.0, y: 6.0 });
        assert_eq!(trail.last().map(|s| (s.x, s.y)), Some((5.0, 6.0)));
    }

    #[test]
    fn segment_steps_round_up() {
        let mut trail = PointerTrail::new();
        trail.record(0.0, 0.0, 0.0, 8.0);
        let TrailStroke::Segment(segment) = trail.record(30.0, 40.0, 10.0, 8.0) else {
            panic!("expected a segment");
        };

        assert_eq!(segment.distance(), 50.0);
        assert_eq!(segment.steps, 7);
        let points: Vec<(f32, f32)> = segment.points().collect();
        assert_eq!(points.len(), 7);
        let (lx, ly) = points[6];
        assert!((lx - 30.0).abs() < 1e-4 && (ly - 40.0).abs() < 1e-4);
    }

    #[test]
    fn last_points_keep_the_end_of_the_stroke() {
        let mut trail = PointerTrail::new();
        trail.record(0.0, 0.0, 0.0, 8.0);
        let TrailStroke::Segment(segment) = trail.record(80.0, 0.0, 10.0, 8.0) else {
            panic!("expected a segment");
        };

        let tail: Vec<(f32, f32)> = segment.last_points(3).collect();
        assert_eq!(tail.len(), 3);
        assert!((tail[0].0 - 64.0).abs() < 1e-4);
        assert!((tail[2].0 - 80.0).abs() < 1e-4);
        assert_eq!(segment.last_points(100).count(), 10);
    }

    #[test]
    fn stationary_pointer_produces_no_points() {
        let mut trail = PointerTrail::new();
        trail.record(3.0, 3.0, 0.0, 8.0);
        let TrailStroke::Segment(segment) = trail.record(3.0, 3.0, 16.0, 8.0) else {
            panic!("expected a segment");
        };
        assert_eq!(segment.steps, 0);
        assert_eq!(segment.points().count(), 0);
    }

    #[test]
    fn speed_uses_one_millisecond_floor() {
        let mut trail = PointerTrail::new();
        trail.record(0.0, 0.0, 100.0, 8.0);
        let TrailStroke::Segment(segment) = trail.record(8.0, 0.0, 100.0, 8.0) else {
            panic!("expected a segment");
        };
        assert_eq!(segment.dt_ms(), 1.0);
        assert_eq!(segment.speed(16.0), 32.0);
    }
}
