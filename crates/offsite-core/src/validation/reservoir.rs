//! Single-pass uniform sampling

use rand::Rng;

/// Fixed-capacity uniform sample over a stream of unknown length.
///
/// The first `capacity` items are kept. The n-th item after that replaces a
/// random slot with probability `capacity / n`, so every item seen has the
/// same chance of ending up in the sample.
#[derive(Debug, Clone)]
pub struct Reservoir<T> {
    capacity: usize,
    seen: usize,
    items: Vec<T>,
}

impl<T> Reservoir<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seen: 0,
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn offer<R: Rng + ?Sized>(&mut self, item: T, rng: &mut R) {
        self.seen += 1;
        if self.items.len() < self.capacity {
            self.items.push(item);
            return;
        }

        let index = rng.random_range(0..self.seen);
        if index < self.capacity {
            self.items[index] = item;
        }
    }

    /// Number of items offered so far
    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}
