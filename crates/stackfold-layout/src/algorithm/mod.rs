#![forbid(unsafe_code)]

//! The stack-scroll layout engine.
//!
//! [`StackScrollAlgorithm::compute`] maps the host's items and an
//! [`AmbientState`] snapshot to a [`StackScrollState`]. A pass runs its phases
//! in a fixed order against scratch state local to the call:
//!
//! 1. visible-item indexing
//! 2. top-stack sizing ([`top_stack`])
//! 3. positioning with the overlay shift ([`positions`])
//! 4. overlay (heads-up) adjustment ([`overlay`])
//! 5. depth ordering ([`z_order`])
//! 6. drag, dimming, clipping and speed bump ([`post`])
//! 7. nested children
//!
//! # Invariants
//!
//! 1. Two calls with identical inputs and no lifecycle call in between
//!    produce identical output.
//! 2. Every visible item leaves the pass with `height >= collapsed_size`,
//!    `alpha` in `[0, 1]`, non-negative clip amounts and depth.
//! 3. The expansion transition is the only state a pass reads that an
//!    earlier call wrote.
//!
//! # Failure Modes
//!
//! Passes never fail. An item whose location stays unresolved after
//! positioning is a logic error: it is logged with `tracing::error!`, trips a
//! debug assertion, and falls back to [`StackLocation::MainArea`] in release
//! builds.

mod overlay;
mod positions;
mod post;
mod top_stack;
mod z_order;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, debug_span, error};

use crate::ambient::AmbientState;
use crate::config::{PaddingState, StackLayoutConfig};
use crate::debug::{PassRecord, StackDebugger};
use crate::error::ConfigError;
use crate::item::{HeightContext, StackItem, max_allowed_height};
use crate::state::{GeometricState, PassSummary, StackLocation, StackScrollState};
use crate::transition::{ExpansionTransition, PendingMeasurement};
use crate::visible::index_visible_items;

/// Per-pass geometry solver for a list that folds into top and bottom stacks.
#[derive(Debug, Clone)]
pub struct StackScrollAlgorithm {
    config: StackLayoutConfig,
    padding: PaddingState,
    is_expanded: bool,
    is_small_screen: bool,
    transition: ExpansionTransition,
    debugger: Option<Arc<StackDebugger>>,
}

impl StackScrollAlgorithm {
    /// Build an engine after validating `config`.
    pub fn new(config: StackLayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let padding = PaddingState::derive(&config, false);
        Ok(Self {
            config,
            padding,
            is_expanded: false,
            is_small_screen: false,
            transition: ExpansionTransition::default(),
            debugger: None,
        })
    }

    /// Attach a recorder that receives one [`PassRecord`] per pass.
    #[must_use]
    pub fn with_debugger(mut self, debugger: Arc<StackDebugger>) -> Self {
        self.debugger = Some(debugger);
        self
    }

    #[must_use]
    pub fn config(&self) -> &StackLayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn padding_state(&self) -> &PaddingState {
        &self.padding
    }

    #[must_use]
    pub fn transition(&self) -> &ExpansionTransition {
        &self.transition
    }

    /// Whether dimming also scales items on the configured display.
    #[must_use]
    pub fn should_scale_dimmed(&self) -> bool {
        self.config.scale_dimmed()
    }

    #[must_use]
    pub fn bottom_stack_slow_down_length(&self) -> i32 {
        self.padding.bottom_stack_slow_down_length()
    }

    #[must_use]
    pub fn is_small_screen(&self) -> bool {
        self.is_small_screen
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    // ---- lifecycle ----

    pub fn set_is_expanded(&mut self, expanded: bool) {
        self.is_expanded = expanded;
    }

    /// Swap the padding between items and rebuild the derived stack spans.
    pub fn set_dimmed(&mut self, dimmed: bool) {
        self.padding = PaddingState::derive(&self.config, dimmed);
    }

    /// Reclassify the screen from the panel's fully open height.
    pub fn update_is_small_screen(&mut self, panel_height: i32) {
        self.is_small_screen = self.config.is_small_screen(panel_height);
        debug!(
            panel_height,
            small = self.is_small_screen,
            "small screen classification"
        );
    }

    /// Snapshot the first visible item at the start of an expand/collapse
    /// gesture.
    ///
    /// Returns a ticket when the item's maximum height has to wait for a
    /// measurement; hand it back through [`complete_measurement`].
    ///
    /// [`complete_measurement`]: Self::complete_measurement
    pub fn on_expansion_started<I: StackItem>(&mut self, items: &[I]) -> Option<PendingMeasurement> {
        let ticket = self
            .transition
            .start(items, self.is_expanded, self.config.collapsed_size);
        debug!(
            first = ?self.transition.first_item(),
            expanded = self.is_expanded,
            pending = ticket.is_some(),
            "expansion started"
        );
        ticket
    }

    pub fn on_expansion_stopped(&mut self) {
        self.transition.stop();
        debug!("expansion stopped");
    }

    /// Re-derive the transition snapshot after the item list changed.
    pub fn notify_children_changed<I: StackItem>(
        &mut self,
        items: &[I],
    ) -> Option<PendingMeasurement> {
        self.transition
            .children_changed(items, self.config.collapsed_size)
    }

    /// Re-measure `item` if it is the one the transition tracks.
    pub fn on_reset<I: StackItem + ?Sized>(&mut self, item: &I) -> Option<PendingMeasurement> {
        self.transition.reset(item, self.config.collapsed_size)
    }

    /// Resolve a pending first-item measurement.
    ///
    /// Returns `false` if the ticket is stale or was already used.
    pub fn complete_measurement<I: StackItem + ?Sized>(
        &mut self,
        ticket: PendingMeasurement,
        item: &I,
    ) -> bool {
        self.transition
            .complete(ticket, item, self.config.collapsed_size)
    }

    // ---- pass ----

    /// Compute the geometric state of every visible item.
    pub fn compute<I: StackItem>(&self, items: &[I], ambient: &AmbientState) -> StackScrollState {
        let span = debug_span!("stack_pass", items = items.len(), scroll_y = ambient.scroll_y);
        let _guard = span.enter();
        let started = self
            .debugger
            .as_ref()
            .filter(|debugger| debugger.enabled())
            .map(|_| Instant::now());

        let mut result = StackScrollState::with_capacity(items.len());
        let visible = index_visible_items(items, self.config.collapsed_size, &mut result);
        let pass = Pass {
            config: &self.config,
            padding: &self.padding,
            transition: &self.transition,
            is_expanded: self.is_expanded,
            is_small_screen: self.is_small_screen,
            items,
            indices: visible.indices,
            ambient,
        };
        let mut states = visible.states;
        let mut scratch = PassScratch::new(internal_scroll(ambient, self.config.collapsed_size));

        pass.find_items_in_top_stack(&mut scratch, &mut states);
        let locations = pass.update_positions(&mut scratch, &mut states);
        pass.resolve_locations(locations, &mut states);
        pass.update_overlay_states(&mut states);
        pass.update_z_values(&scratch, &mut states);
        pass.handle_dragged_items(&mut states);
        pass.update_dimmed_activated_hide_sensitive(&mut states);
        pass.update_clipping(&mut states);
        pass.update_speed_bump(&mut states);
        pass.settle_bounds(&mut states);

        for (position, state) in states.into_iter().enumerate() {
            result.push_visible(pass.item(position).id(), state);
        }
        pass.layout_nested_children(&mut result);
        result.set_summary(scratch.summary());

        if let (Some(debugger), Some(started)) = (&self.debugger, started) {
            debugger.record(PassRecord::from_state(&result, Some(started.elapsed())));
        }
        result
    }
}

/// Scroll position in pass coordinates: clamped at 0, shifted down by the
/// collapsed size and by any bottom overscroll.
fn internal_scroll(ambient: &AmbientState, collapsed_size: i32) -> i32 {
    let scroll = ambient.scroll_y.max(0) as f32;
    (scroll + collapsed_size as f32 + ambient.overscroll_bottom) as i32
}

/// `numerator / denominator`, or 0 for an empty span.
fn ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Scratch values of one pass. Starts zeroed on every call.
#[derive(Debug, Clone, Default)]
struct PassScratch {
    scroll_y: i32,
    items_in_top_stack: f32,
    partial_in_top: f32,
    scrolled_pixels_top: f32,
    last_top_stack_index: i32,
    items_in_bottom_stack: f32,
    partial_in_bottom: f32,
}

impl PassScratch {
    fn new(scroll_y: i32) -> Self {
        Self {
            scroll_y,
            ..Default::default()
        }
    }

    fn summary(&self) -> PassSummary {
        PassSummary {
            scroll_y: self.scroll_y,
            items_in_top_stack: self.items_in_top_stack,
            partial_in_top: self.partial_in_top,
            last_top_stack_index: self.last_top_stack_index,
            items_in_bottom_stack: self.items_in_bottom_stack,
            partial_in_bottom: self.partial_in_bottom,
        }
    }
}

/// Read-only inputs of one pass.
struct Pass<'a, I> {
    config: &'a StackLayoutConfig,
    padding: &'a PaddingState,
    transition: &'a ExpansionTransition,
    is_expanded: bool,
    is_small_screen: bool,
    items: &'a [I],
    /// Positions of the visible items in `items`.
    indices: Vec<usize>,
    ambient: &'a AmbientState,
}

impl<'a, I: StackItem> Pass<'a, I> {
    /// The visible item at `position`.
    fn item(&self, position: usize) -> &'a I {
        &self.items[self.indices[position]]
    }

    fn len(&self) -> usize {
        self.indices.len()
    }

    /// Height the item is positioned with.
    fn child_height(&self, item: &I) -> i32 {
        let context = HeightContext::Pass {
            top_overlay: self.ambient.top_overlay_item,
        };
        max_allowed_height(item, context, self.config.collapsed_size)
    }

    fn padding_px(&self) -> f32 {
        self.padding.padding as f32
    }

    fn collapsed_px(&self) -> f32 {
        self.config.collapsed_size as f32
    }

    fn resolve_locations(&self, locations: Vec<Option<StackLocation>>, states: &mut [GeometricState]) {
        for (position, (location, state)) in locations.into_iter().zip(states).enumerate() {
            debug_assert!(
                location.is_some(),
                "failed to assign location for item {position}"
            );
            state.location = location.unwrap_or_else(|| {
                let id = self.item(position).id();
                error!(index = position, item = %id, "failed to assign location");
                StackLocation::MainArea
            });
        }
    }

    fn layout_nested_children(&self, result: &mut StackScrollState) {
        for position in 0..self.len() {
            let item = self.item(position);
            let Some(nested) = item.nested() else {
                continue;
            };
            let Some(parent) = result.get(item.id()).cloned() else {
                continue;
            };
            nested.layout_children(&parent, result);
        }
    }
}
