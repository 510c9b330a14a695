use std::collections::VecDeque;

use super::simulation::Particle;

/// Free list of retired particle records.
#[derive(Debug, Default)]
pub struct ParticlePool {
    free: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops a retired record, or `None` when the caller must create one.
    pub fn try_acquire(&mut self) -> Option<Particle> {
        self.free.pop()
    }

    /// Pops a retired record or hands out a blank one. Callers overwrite every
    /// field they read.
    pub fn acquire(&mut self) -> Particle {
        self.try_acquire().unwrap_or_default()
    }

    pub fn release(&mut self, particle: Particle) {
        self.free.push(particle);
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}

/// Live particles in spawn order, oldest at the front.
#[derive(Debug)]
pub struct LiveSet {
    particles: VecDeque<Particle>,
    max_particles: usize,
}

impl LiveSet {
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: VecDeque::with_capacity(max_particles + 1),
            max_particles,
        }
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    /// Appends `particle`; if that takes the set past its cap the oldest
    /// entry is evicted and returned so the caller can recycle it.
    pub fn push(&mut self, particle: Particle) -> Option<Particle> {
        self.particles.push_back(particle);
        if self.particles.len() > self.max_particles {
            self.particles.pop_front()
        } else {
            None
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Particle> {
        self.particles.remove(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Particle> + ExactSizeIterator + '_ {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{LiveSet, ParticlePool};
    use crate::particles::Particle;

    fn tagged(size: f32) -> Particle {
        Particle {
            size,
            ..Particle::default()
        }
    }

    #[test]
    fn acquire_prefers_released_records() {
        let mut pool = ParticlePool::new();
        assert!(pool.try_acquire().is_none());

        pool.release(tagged(7.0));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.acquire().size, 7.0);
        assert!(pool.is_empty());
        assert_eq!(pool.acquire(), Particle::default());
    }

    #[test]
    fn push_past_cap_evicts_oldest() {
        let mut live = LiveSet::new(2);
        assert!(live.push(tagged(1.0)).is_none());
        assert!(live.push(tagged(2.0)).is_none());

        let evicted = live.push(tagged(3.0)).unwrap();
        assert_eq!(evicted.size, 1.0);
        let sizes: Vec<f32> = live.iter().map(|p| p.size).collect();
        assert_eq!(sizes, vec![2.0, 3.0]);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut live = LiveSet::new(4);
        live.push(tagged(1.0));
        assert!(live.remove(3).is_none());
        assert_eq!(live.len(), 1);
    }
}
