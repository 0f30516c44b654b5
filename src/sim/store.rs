//! Ordered particle storage with a soft capacity

use serde::{Deserialize, Serialize};

use super::particle::Particle;

/// Live particles in stable iteration order.
///
/// `push` never refuses; callers that may overshoot (splits, bursts) finish
/// with `truncate_to_capacity` so the count is back under the cap before the
/// next render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticleStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the cap (e.g. after a breakpoint change) and trim if needed
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.truncate_to_capacity();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_over_capacity(&self) -> bool {
        self.particles.len() > self.capacity
    }

    /// Room left before the cap
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.particles.len())
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Overwrite the slot at `index`; out-of-range indices are ignored
    pub fn replace_at(&mut self, index: usize, particle: Particle) {
        if let Some(slot) = self.particles.get_mut(index) {
            *slot = particle;
        }
    }

    /// Remove preserving order of the remaining particles
    pub fn remove_at(&mut self, index: usize) -> Option<Particle> {
        if index < self.particles.len() {
            Some(self.particles.remove(index))
        } else {
            None
        }
    }

    /// Drop the newest particles beyond the cap
    pub fn truncate_to_capacity(&mut self) {
        self.particles.truncate(self.capacity);
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }
}

impl<'a> IntoIterator for &'a ParticleStore {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
