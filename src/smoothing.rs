use std::collections::VecDeque;

/// Bounded FIFO of the most recent gaze ratios.
///
/// Holds at most `capacity` values in arrival order; pushing onto a full
/// history evicts the oldest value.
#[derive(Debug, Clone)]
pub struct RatioHistory {
    values: VecDeque<f32>,
    capacity: usize,
}

impl RatioHistory {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Arithmetic mean of everything currently held
    pub fn mean(&self) -> Option<f32> {
        if self.values.is_empty() {
            return None;
        }
        let sum: f32 = self.values.iter().sum();
        Some(sum / self.values.len() as f32)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Default for RatioHistory {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut history = RatioHistory::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            history.push(v);
        }
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(history.mean(), Some(3.0));
    }

    #[test]
    fn mean_of_partial_window() {
        let mut history = RatioHistory::default();
        assert_eq!(history.mean(), None);
        history.push(0.5);
        history.push(1.5);
        assert_eq!(history.len(), 2);
        assert_eq!(history.mean(), Some(1.0));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = RatioHistory::new(0);
        history.push(1.0);
        history.push(2.0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.mean(), Some(2.0));
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity(values in proptest::collection::vec(0.0f32..3.0, 0..64)) {
            let mut history = RatioHistory::new(5);
            for v in &values {
                history.push(*v);
                prop_assert!(history.len() <= 5);
            }
            let tail: Vec<f32> = values.iter().rev().take(5).rev().copied().collect();
            prop_assert_eq!(history.iter().collect::<Vec<_>>(), tail);
        }
    }
}
