#![forbid(unsafe_code)]

//! Stack indentation: fractional stack depth to pixel offset.
//!
//! Both stack edges compress the items entering them. How far an item has
//! moved into a stack is expressed as a fractional "items already stacked"
//! value; [`IndentationFunctor`] turns that value into a pixel offset.
//!
//! The curve is a blend of two piecewise-linear shapes over
//! `[0, max_stacked_count]`:
//!
//! - a *weighted* shape whose per-item increments shrink quadratically, so
//!   every additional stacked card adds fewer pixels than the previous one;
//! - a *linear* shape with equal increments.
//!
//! `shape_factor` selects the blend (0 = fully weighted, 1 = fully linear).
//!
//! # Invariants
//!
//! 1. `value(x) == peek_size` for every `x <= 0`.
//! 2. `value(x) == peek_size + slow_down_length` for every
//!    `x >= max_stacked_count`.
//! 3. `value` is continuous on `[0, max_stacked_count]` and non-decreasing
//!    over its whole domain.
//!
//! # Failure Modes
//!
//! None. A `max_stacked_count` of zero degenerates into a step at 0.

/// Piecewise-linear compression curve shared by the top and bottom stacks.
#[derive(Debug, Clone, PartialEq)]
pub struct IndentationFunctor {
    max_stacked_count: usize,
    peek_size: i32,
    slow_down_length: i32,
    shape_factor: f32,
    /// Cumulative weighted progress at each whole item, `base[0] == 0` and
    /// `base[max_stacked_count] == 1`.
    base_values: Vec<f32>,
}

impl IndentationFunctor {
    /// Create a functor for a stack window of `max_stacked_count` items.
    ///
    /// `shape_factor` is clamped into `[0, 1]`.
    #[must_use]
    pub fn new(
        max_stacked_count: usize,
        peek_size: i32,
        slow_down_length: i32,
        shape_factor: f32,
    ) -> Self {
        Self {
            max_stacked_count,
            peek_size,
            slow_down_length,
            shape_factor: shape_factor.clamp(0.0, 1.0),
            base_values: weighted_base_values(max_stacked_count),
        }
    }

    /// Pixel offset for `fractional_index` items already in the stack.
    #[must_use]
    pub fn value(&self, fractional_index: f32) -> f32 {
        let peek = self.peek_size as f32;
        if fractional_index.is_nan() || fractional_index <= 0.0 {
            return peek;
        }
        let max = self.max_stacked_count as f32;
        if fractional_index >= max {
            return self.total_distance();
        }

        let below = fractional_index as usize;
        let partial = fractional_index - below as f32;
        let weighted =
            self.base_values[below] * (1.0 - partial) + self.base_values[below + 1] * partial;
        let linear = fractional_index / max;
        let progress = weighted * (1.0 - self.shape_factor) + linear * self.shape_factor;
        peek + progress * self.slow_down_length as f32
    }

    /// Distance moved past the stack entry point: `value - peek_size`.
    ///
    /// Zero at entry, `slow_down_length` once the window is full, so an item
    /// placed with it keeps the position it had just before entering.
    #[must_use]
    pub fn travel(&self, fractional_index: f32) -> f32 {
        self.value(fractional_index) - self.peek_size as f32
    }

    /// Offset reached once the stack window is full.
    #[must_use]
    pub fn total_distance(&self) -> f32 {
        (self.peek_size + self.slow_down_length) as f32
    }

    #[must_use]
    pub const fn max_stacked_count(&self) -> usize {
        self.max_stacked_count
    }

    #[must_use]
    pub const fn peek_size(&self) -> i32 {
        self.peek_size
    }

    #[must_use]
    pub const fn slow_down_length(&self) -> i32 {
        self.slow_down_length
    }
}

/// Normalized running sum of `(n - k)^2` for `k = 0..n`.
fn weighted_base_values(n: usize) -> Vec<f32> {
    let mut values = Vec::with_capacity(n + 1);
    values.push(0.0);
    if n == 0 {
        return values;
    }
    // Sum of squares 1..=n.
    let total = (n * (n + 1) * (2 * n + 1) / 6) as f32;
    let mut running = 0usize;
    for k in 0..n {
        running += (n - k) * (n - k);
        values.push(running as f32 / total);
    }
    values
}
