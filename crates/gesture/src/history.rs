use gesture_base::Vec2;
use std::collections::{BTreeMap, VecDeque, vec_deque};

/// Default window length for both histories.
pub const HISTORY_LENGTH: usize = 16;

/// Gesture id meaning "no gesture"; also the vote result of an empty window.
pub const NO_GESTURE: usize = 0;

/// Bounded FIFO: pushing onto a full buffer evicts the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        Self {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append `item`, returning the evicted entry if the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.items.push_back(item);
        if self.items.len() > self.capacity {
            self.items.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> History<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a History<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Recent fingertip positions; `(0, 0)` marks frames without the tracked sign.
pub type PointHistory = History<Vec2<i32>>;

/// Recent temporal-gesture ids, reduced by majority vote.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureHistory {
    ids: History<usize>,
}

impl GestureHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            ids: History::new(capacity),
        }
    }

    pub fn record(&mut self, gesture_id: usize) {
        self.ids.push(gesture_id);
    }

    /// The most frequent id in the window. Ties go to the smallest id; an
    /// empty window yields `NO_GESTURE`.
    pub fn most_common(&self) -> usize {
        let mut counts = BTreeMap::new();
        for &id in &self.ids {
            *counts.entry(id).or_insert(0usize) += 1;
        }
        // BTreeMap iterates in ascending id order, so the first maximum wins
        let mut best = None;
        for (id, count) in counts {
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((id, count)),
            }
        }
        best.map_or(NO_GESTURE, |(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ids.capacity()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, usize> {
        self.ids.iter()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl Default for GestureHistory {
    fn default() -> Self {
        Self::new(HISTORY_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_reports_evicted_item() {
        let mut history = History::new(2);
        assert_eq!(history.push(1), None);
        assert_eq!(history.push(2), None);
        assert_eq!(history.push(3), Some(1));
        assert_eq!(history.to_vec(), vec![2, 3]);
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_panics() {
        let _ = History::<u8>::new(0);
    }
}
