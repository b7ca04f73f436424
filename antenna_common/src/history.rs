//! Fixed-capacity, insertion-ordered sample window.
//!
//! Backs the per-tick histories of the PID controller (time stamps,
//! commands, errors). The window always holds exactly `capacity` values: a
//! fresh history is filled with a sentinel (NaN for `f64`) and every push
//! evicts the oldest entry.

use std::collections::VecDeque;

/// Ring buffer of the last `capacity` values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedHistory<T = f64> {
    values: VecDeque<T>,
    capacity: usize,
    fill: T,
}

impl BoundedHistory<f64> {
    /// History of `capacity` unset (NaN) samples.
    pub fn new(capacity: usize) -> Self {
        Self::filled(capacity, f64::NAN)
    }

    /// Whether the most recent sample is the unset sentinel.
    #[inline]
    pub fn is_unset(&self) -> bool {
        self.last().is_nan()
    }
}

impl<T: Copy> BoundedHistory<T> {
    /// History of `capacity` copies of `fill`.
    pub fn filled(capacity: usize, fill: T) -> Self {
        let mut values = VecDeque::with_capacity(capacity);
        values.extend(std::iter::repeat_n(fill, capacity));
        Self {
            values,
            capacity,
            fill,
        }
    }

    /// Append `value`, dropping the oldest entry. O(1).
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Value `n` steps back from the most recent (0 = most recent).
    #[inline]
    pub fn back(&self, n: usize) -> Option<T> {
        self.values.len().checked_sub(n + 1).map(|i| self.values[i])
    }

    /// Most recent value; the fill value if the window is empty.
    #[inline]
    pub fn last(&self) -> T {
        self.back(0).unwrap_or(self.fill)
    }

    /// Value before the most recent; the fill value if there is none.
    #[inline]
    pub fn previous(&self) -> T {
        self.back(1).unwrap_or(self.fill)
    }

    /// Overwrite the most recent value.
    #[inline]
    pub fn set_last(&mut self, value: T) {
        if let Some(v) = self.values.back_mut() {
            *v = value;
        }
    }

    /// Re-fill the whole window with the fill value.
    pub fn reset(&mut self) {
        for v in self.values.iter_mut() {
            *v = self.fill;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-to-newest iterator.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + ExactSizeIterator + '_ {
        self.values.iter().copied()
    }

    /// Oldest-to-newest copy of the window.
    pub fn to_vec(&self) -> Vec<T> {
        self.values.iter().copied().collect()
    }

    /// New history with `func` applied element-wise (fill value included).
    pub fn map<U: Copy, F: Fn(T) -> U>(&self, func: F) -> BoundedHistory<U> {
        BoundedHistory {
            values: self.values.iter().map(|&v| func(v)).collect(),
            capacity: self.capacity,
            fill: func(self.fill),
        }
    }
}
