#![forbid(unsafe_code)]

//! Output of a layout pass.
//!
//! # Invariants
//!
//! 1. A [`StackScrollState`] is built fresh by every pass; nothing in it
//!    survives into the next pass.
//! 2. `order()` lists the visible items in pass order; nested children only
//!    appear in the map.
//! 3. After a pass every visible item carries exactly one [`StackLocation`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// Where an item ended up relative to the two stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StackLocation {
    /// The first item, always fully visible.
    FirstCard,
    /// Entering the top stack and still peeking out.
    TopStackPeeking,
    /// Fully behind the front card of the top stack.
    TopStackHidden,
    /// Regular scroll area (including the item transitioning into the
    /// bottom stack).
    #[default]
    MainArea,
    BottomStackPeeking,
    BottomStackHidden,
}

impl StackLocation {
    pub const ALL: [Self; 6] = [
        Self::FirstCard,
        Self::TopStackPeeking,
        Self::TopStackHidden,
        Self::MainArea,
        Self::BottomStackPeeking,
        Self::BottomStackHidden,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstCard => "first",
            Self::TopStackPeeking => "top-peeking",
            Self::TopStackHidden => "top-hidden",
            Self::MainArea => "main",
            Self::BottomStackPeeking => "bottom-peeking",
            Self::BottomStackHidden => "bottom-hidden",
        }
    }

    #[must_use]
    pub const fn is_top_stack(self) -> bool {
        matches!(self, Self::TopStackPeeking | Self::TopStackHidden)
    }

    #[must_use]
    pub const fn is_bottom_stack(self) -> bool {
        matches!(self, Self::BottomStackPeeking | Self::BottomStackHidden)
    }
}

impl std::fmt::Display for StackLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Target presentation of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometricState {
    pub y_translation: f32,
    pub z_translation: f32,
    pub height: i32,
    pub scale: f32,
    pub alpha: f32,
    /// Pixels hidden at the top of the item's background.
    pub clip_top_amount: i32,
    /// Pixels of content overlapped by the item above.
    pub top_overlap: i32,
    pub location: StackLocation,
    pub below_speed_bump: bool,
    pub dimmed: bool,
    pub dark: bool,
    pub hide_sensitive: bool,
    /// Position among non-hidden items, nested children included.
    pub not_gone_index: usize,
}

impl GeometricState {
    /// Starting state of an item at the beginning of a pass.
    #[must_use]
    pub fn initial(height: i32, not_gone_index: usize) -> Self {
        Self {
            y_translation: 0.0,
            z_translation: 0.0,
            height,
            scale: 1.0,
            alpha: 1.0,
            clip_top_amount: 0,
            top_overlap: 0,
            location: StackLocation::MainArea,
            below_speed_bump: false,
            dimmed: false,
            dark: false,
            hide_sensitive: false,
            not_gone_index,
        }
    }

    /// Bottom edge of the item before scaling.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y_translation + self.height as f32
    }
}

/// Scratch values a pass ended with, kept for inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PassSummary {
    /// Scroll position the pass worked with (clamped, shifted by the
    /// collapsed size and bottom overscroll).
    pub scroll_y: i32,
    /// Whole and fractional number of items in the top stack.
    pub items_in_top_stack: f32,
    /// How far the item entering the top stack has moved in.
    pub partial_in_top: f32,
    /// Index of the deepest item in the top stack. -1 when the first item
    /// has not reached the top edge; 0 when the scan ran past every item.
    pub last_top_stack_index: i32,
    pub items_in_bottom_stack: f32,
    pub partial_in_bottom: f32,
}

/// Per-item results of one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackScrollState {
    states: FxHashMap<ItemId, GeometricState>,
    order: Vec<ItemId>,
    summary: PassSummary,
}

impl StackScrollState {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: Vec::with_capacity(capacity),
            summary: PassSummary::default(),
        }
    }

    /// State of an item, visible or nested.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&GeometricState> {
        self.states.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut GeometricState> {
        self.states.get_mut(&id)
    }

    /// Insert or replace a state, e.g. for a nested child.
    pub fn insert(&mut self, id: ItemId, state: GeometricState) {
        self.states.insert(id, state);
    }

    /// Visible items in pass order.
    #[must_use]
    pub fn order(&self) -> &[ItemId] {
        &self.order
    }

    /// Visible items with their states, in pass order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &GeometricState)> {
        self.order
            .iter()
            .filter_map(|id| self.states.get(id).map(|state| (*id, state)))
    }

    /// Number of states, nested children included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> &PassSummary {
        &self.summary
    }

    pub(crate) fn push_visible(&mut self, id: ItemId, state: GeometricState) {
        self.order.push(id);
        self.states.insert(id, state);
    }

    pub(crate) fn set_summary(&mut self, summary: PassSummary) {
        self.summary = summary;
    }
}
