#![forbid(unsafe_code)]

//! Per-pass ambient snapshot supplied by the host.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// Everything about the surrounding container a pass depends on.
///
/// The snapshot is read-only for the duration of a pass. Setters follow the
/// builder pattern so a host can assemble it in one expression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientState {
    /// Scroll offset of the list; negative values come from overscroll at the
    /// top and are treated as 0.
    pub scroll_y: i32,
    /// Overscroll past the bottom edge.
    pub overscroll_bottom: f32,
    pub dragged_items: FxHashSet<ItemId>,
    /// Index of the first visible item below the speed bump.
    pub speed_bump_index: Option<usize>,
    pub dimmed: bool,
    pub dark: bool,
    pub hide_sensitive: bool,
    pub shade_expanded: bool,
    pub dismiss_all_in_progress: bool,
    pub activated_item: Option<ItemId>,
    pub top_overlay_item: Option<ItemId>,
    /// Viewport height available to the list.
    pub inner_height: i32,
    pub top_padding: f32,
    /// Extra translation applied to the whole stack, e.g. while the panel
    /// is being pulled down.
    pub stack_translation: f32,
    /// Lowest position the bottom of an overlay item may reach.
    pub max_overlay_translation: f32,
}

impl AmbientState {
    /// A snapshot for a viewport of `inner_height` pixels.
    #[must_use]
    pub fn new(inner_height: i32) -> Self {
        Self {
            inner_height,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn scroll_y(mut self, scroll_y: i32) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    #[must_use]
    pub fn overscroll_bottom(mut self, amount: f32) -> Self {
        self.overscroll_bottom = amount;
        self
    }

    /// Mark an item as being dragged.
    #[must_use]
    pub fn dragging(mut self, id: ItemId) -> Self {
        self.dragged_items.insert(id);
        self
    }

    #[must_use]
    pub fn speed_bump_index(mut self, index: Option<usize>) -> Self {
        self.speed_bump_index = index;
        self
    }

    #[must_use]
    pub fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    #[must_use]
    pub fn dark(mut self, dark: bool) -> Self {
        self.dark = dark;
        self
    }

    #[must_use]
    pub fn hide_sensitive(mut self, hide_sensitive: bool) -> Self {
        self.hide_sensitive = hide_sensitive;
        self
    }

    #[must_use]
    pub fn shade_expanded(mut self, expanded: bool) -> Self {
        self.shade_expanded = expanded;
        self
    }

    #[must_use]
    pub fn dismiss_all_in_progress(mut self, in_progress: bool) -> Self {
        self.dismiss_all_in_progress = in_progress;
        self
    }

    #[must_use]
    pub fn activated_item(mut self, id: Option<ItemId>) -> Self {
        self.activated_item = id;
        self
    }

    #[must_use]
    pub fn top_overlay_item(mut self, id: Option<ItemId>) -> Self {
        self.top_overlay_item = id;
        self
    }

    #[must_use]
    pub fn top_padding(mut self, padding: f32) -> Self {
        self.top_padding = padding;
        self
    }

    #[must_use]
    pub fn stack_translation(mut self, translation: f32) -> Self {
        self.stack_translation = translation;
        self
    }

    #[must_use]
    pub fn max_overlay_translation(mut self, translation: f32) -> Self {
        self.max_overlay_translation = translation;
        self
    }

    /// Whether `id` is being dragged.
    #[must_use]
    pub fn is_dragged(&self, id: ItemId) -> bool {
        self.dragged_items.contains(&id)
    }
}
