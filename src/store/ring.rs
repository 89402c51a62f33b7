//! Fixed-capacity FIFO ring buffer, discarding the oldest element on overflow.

use std::collections::VecDeque;

#[derive(Debug)]
pub struct RingBuffer<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T: Clone> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            items: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Most recent `n` elements (or all of them) in chronological order.
    pub fn most_recent(&self, n: Option<usize>) -> Vec<T> {
        match n {
            None => self.items.iter().cloned().collect(),
            Some(n) => {
                let len = self.items.len();
                self.items
                    .iter()
                    .skip(len.saturating_sub(n))
                    .cloned()
                    .collect()
            }
        }
    }
}
