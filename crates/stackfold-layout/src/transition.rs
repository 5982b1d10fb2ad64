#![forbid(unsafe_code)]

//! Expand/collapse transition snapshot.
//!
//! The only engine state that survives between passes. While the list is
//! being opened or closed, the first visible item is capped at a maximum
//! height fixed when the gesture started.
//!
//! Measuring that maximum may have to wait for the host: an item that has not
//! yet been laid out at its full size cannot report it. The snapshot then
//! becomes [`FirstItemMaxHeight::Pending`] and the caller receives a
//! [`PendingMeasurement`] ticket, which it hands back through
//! `StackScrollAlgorithm::complete_measurement` once the item is measured.
//!
//! # Invariants
//!
//! 1. Outside a transition the snapshot tracks no item and caps nothing.
//! 2. Every re-derivation bumps the generation, so at most one ticket is live.
//! 3. A ticket resolves the snapshot at most once.

use tracing::debug;

use crate::item::{HeightContext, ItemId, StackItem, max_allowed_height};

/// Maximum height of the first item during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstItemMaxHeight {
    Resolved(i32),
    /// Waiting for the host to measure the item.
    Pending,
}

/// Ticket for a deferred first-item measurement.
///
/// Must be handed back once the item reports its full size; a ticket issued
/// before a newer start or a stop is ignored.
#[must_use = "the pending measurement must be completed once the item is measured"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMeasurement {
    item: ItemId,
    generation: u64,
}

impl PendingMeasurement {
    /// Item that needs to be measured.
    #[must_use]
    pub fn item(&self) -> ItemId {
        self.item
    }
}

/// Snapshot of an in-progress expand/collapse gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionTransition {
    changing: bool,
    expanded_on_start: bool,
    first_item: Option<ItemId>,
    max_height: FirstItemMaxHeight,
    generation: u64,
}

impl Default for ExpansionTransition {
    fn default() -> Self {
        Self {
            changing: false,
            expanded_on_start: false,
            first_item: None,
            max_height: FirstItemMaxHeight::Resolved(0),
            generation: 0,
        }
    }
}

impl ExpansionTransition {
    #[must_use]
    pub fn is_changing(&self) -> bool {
        self.changing
    }

    /// Item whose height is capped, if any.
    #[must_use]
    pub fn first_item(&self) -> Option<ItemId> {
        self.first_item
    }

    #[must_use]
    pub fn max_height(&self) -> FirstItemMaxHeight {
        self.max_height
    }

    /// Whether the list was open when the gesture started.
    #[must_use]
    pub fn expanded_on_start(&self) -> bool {
        self.expanded_on_start
    }

    /// Cap applied to `id` by the current pass, `None` when uncapped.
    pub(crate) fn cap_for(&self, id: ItemId) -> Option<i32> {
        if !self.changing || self.first_item != Some(id) {
            return None;
        }
        match self.max_height {
            FirstItemMaxHeight::Resolved(height) => Some(height),
            FirstItemMaxHeight::Pending => None,
        }
    }

    pub(crate) fn start<I: StackItem>(
        &mut self,
        items: &[I],
        is_expanded: bool,
        collapsed_size: i32,
    ) -> Option<PendingMeasurement> {
        self.changing = true;
        self.expanded_on_start = is_expanded;
        self.derive(first_visible(items), collapsed_size)
    }

    pub(crate) fn stop(&mut self) {
        self.changing = false;
        self.first_item = None;
        self.max_height = FirstItemMaxHeight::Resolved(0);
        self.generation += 1;
    }

    pub(crate) fn children_changed<I: StackItem>(
        &mut self,
        items: &[I],
        collapsed_size: i32,
    ) -> Option<PendingMeasurement> {
        if !self.changing {
            return None;
        }
        self.derive(first_visible(items), collapsed_size)
    }

    pub(crate) fn reset<I: StackItem + ?Sized>(
        &mut self,
        item: &I,
        collapsed_size: i32,
    ) -> Option<PendingMeasurement> {
        if self.first_item != Some(item.id()) {
            return None;
        }
        self.generation += 1;
        self.measure_expanding(item, collapsed_size)
    }

    /// Resolve a pending measurement. Returns whether the ticket was used.
    pub(crate) fn complete<I: StackItem + ?Sized>(
        &mut self,
        ticket: PendingMeasurement,
        item: &I,
        collapsed_size: i32,
    ) -> bool {
        let live = ticket.generation == self.generation
            && self.first_item == Some(ticket.item)
            && item.id() == ticket.item
            && self.max_height == FirstItemMaxHeight::Pending;
        if !live {
            debug!(
                item = %ticket.item,
                generation = ticket.generation,
                current = self.generation,
                "stale measurement ticket dropped"
            );
            return false;
        }
        let height = max_allowed_height(item, HeightContext::Detached, collapsed_size);
        self.max_height = FirstItemMaxHeight::Resolved(height);
        debug!(item = %ticket.item, height, "pending measurement resolved");
        true
    }

    fn derive<I: StackItem + ?Sized>(
        &mut self,
        first: Option<&I>,
        collapsed_size: i32,
    ) -> Option<PendingMeasurement> {
        self.generation += 1;
        let Some(item) = first else {
            self.first_item = None;
            self.max_height = FirstItemMaxHeight::Resolved(0);
            return None;
        };
        self.first_item = Some(item.id());
        if !self.expanded_on_start {
            return self.measure_expanding(item, collapsed_size);
        }
        // Closing: the item may not grow past the size it is animating to.
        let mut height = item.final_height();
        if let Some(overlay) = item.overlay().filter(|overlay| overlay.active) {
            height += collapsed_size - overlay.overlay_height;
        }
        self.max_height = FirstItemMaxHeight::Resolved(height);
        None
    }

    fn measure_expanding<I: StackItem + ?Sized>(
        &mut self,
        item: &I,
        collapsed_size: i32,
    ) -> Option<PendingMeasurement> {
        if !item.is_max_height_initialized() {
            self.max_height = FirstItemMaxHeight::Pending;
            return Some(PendingMeasurement {
                item: item.id(),
                generation: self.generation,
            });
        }
        let height = max_allowed_height(item, HeightContext::Detached, collapsed_size);
        self.max_height = FirstItemMaxHeight::Resolved(height);
        None
    }
}

fn first_visible<I: StackItem>(items: &[I]) -> Option<&I> {
    items.iter().find(|item| !item.is_gone())
}
