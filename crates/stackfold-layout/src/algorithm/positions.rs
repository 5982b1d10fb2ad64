#![forbid(unsafe_code)]

//! Positioning, the core phase.
//!
//! One forward pass keeps two coordinates: the item's hypothetical position
//! in an unstacked scroll view and the actual output position, which the
//! stacks compress. Each item falls into exactly one region:
//!
//! - top stack (index up to `last_top_stack_index`)
//! - transitioning into the bottom stack
//! - fully inside the bottom stack
//! - the plain scroll area
//!
//! The first item is always drawn, fully opaque, as [`StackLocation::FirstCard`].
//! After the region rules, every item except the top overlay is pushed down
//! by the overlay's extra height, then by the top padding and the stack
//! translation.

use super::{Pass, PassScratch, ratio};
use crate::item::{ItemId, StackItem};
use crate::state::{GeometricState, StackLocation};

/// Edges of the bottom stack in viewport coordinates.
#[derive(Debug, Clone, Copy)]
struct BottomEdges {
    /// Where the bottom peek begins.
    peek_start: f32,
    /// Where items start being compressed.
    stack_start: f32,
}

impl<I: StackItem> Pass<'_, I> {
    /// Place every item. Returns the location each item resolved to.
    pub(super) fn update_positions(
        &self,
        scratch: &mut PassScratch,
        states: &mut [GeometricState],
    ) -> Vec<Option<StackLocation>> {
        let collapsed = self.config.collapsed_size;
        let padding = self.padding_px();
        let peek_start = self.ambient.inner_height as f32 - self.config.bottom_peek_size as f32;
        let edges = BottomEdges {
            peek_start,
            stack_start: peek_start - self.config.bottom_slow_down_length as f32,
        };
        let overlay_shift = self.top_overlay_shift();
        let top_shift = self.ambient.top_padding + self.ambient.stack_translation;
        let completely_in = if scratch.partial_in_top == 1.0 {
            scratch.last_top_stack_index
        } else {
            scratch.items_in_top_stack as i32
        };

        let mut locations = vec![None; states.len()];
        let mut current_y = 0.0f32;
        let mut y_in_scroll_view = 0.0f32;

        for (i, state) in states.iter_mut().enumerate() {
            let item = self.item(i);
            let child_height = self.child_height(item);
            let height_px = child_height as f32;
            let index = i as i32;
            let y_after = y_in_scroll_view + height_px + padding;
            let scroll_offset = y_in_scroll_view - scratch.scroll_y as f32 + self.collapsed_px();

            if index == scratch.last_top_stack_index + 1 {
                // Pushed further up when both stacks are close together.
                current_y = scroll_offset.min(edges.stack_start);
            }
            state.y_translation = current_y;
            let next_y = current_y + height_px + padding;

            let location = if index <= scratch.last_top_stack_index {
                let mut location =
                    self.top_stack_child(scratch, completely_in, i, child_height, state, scroll_offset);
                self.clamp_to_top_stack_end(state, child_height);
                let overlaps_bottom = state.y_translation + height_px + padding >= edges.stack_start;
                if overlaps_bottom
                    && !self.transition.is_changing()
                    && i != 0
                    && self.is_small_screen
                {
                    let gap = edges.stack_start - padding - state.y_translation;
                    state.height = (gap as i32).max(collapsed);
                    let y = state.y_translation;
                    location = self.transitioning_in_bottom(scratch, edges, y, state, child_height);
                }
                let height = state.height;
                self.clamp_to_bottom_stack_start(state, height);
                location
            } else if next_y >= edges.stack_start {
                if current_y >= edges.stack_start {
                    self.fully_in_bottom_stack(scratch, edges, state, child_height)
                } else {
                    self.transitioning_in_bottom(scratch, edges, current_y, state, child_height)
                }
            } else {
                self.clamp_to_bottom_stack_start(state, child_height);
                self.clamp_to_top_stack_end(state, child_height);
                StackLocation::MainArea
            };
            locations[i] = Some(location);

            if i == 0 {
                state.alpha = 1.0;
                state.y_translation = (self.collapsed_px() - scratch.scroll_y as f32).max(0.0);
                let limit = edges.peek_start - self.config.collapse_second_card_padding as f32;
                if state.y_translation + state.height as f32 > limit {
                    state.height = ((limit - state.y_translation) as i32).max(collapsed);
                }
                locations[i] = Some(StackLocation::FirstCard);
            }

            current_y = state.y_translation + height_px + padding;
            y_in_scroll_view = y_after;

            if let Some((_, shift)) = overlay_shift.filter(|(top_id, _)| *top_id != item.id()) {
                state.y_translation += shift;
            }
            state.y_translation += top_shift;
        }
        locations
    }

    /// The designated top overlay and how far it pushes the other items down,
    /// while the list is open.
    ///
    /// The overlay height comes from the item's overlay facet, so a
    /// designated id that is not a visible overlay-capable item shifts
    /// nothing.
    fn top_overlay_shift(&self) -> Option<(ItemId, f32)> {
        if !self.ambient.shade_expanded {
            return None;
        }
        let top_id = self.ambient.top_overlay_item?;
        let overlay = (0..self.len())
            .map(|position| self.item(position))
            .find(|item| item.id() == top_id)?
            .overlay()?;
        Some((top_id, (overlay.overlay_height - self.config.collapsed_size) as f32))
    }

    fn top_stack_child(
        &self,
        scratch: &PassScratch,
        completely_in: i32,
        i: usize,
        child_height: i32,
        state: &mut GeometricState,
        scroll_offset: f32,
    ) -> StackLocation {
        let padding = self.padding_px();
        let height_px = child_height as f32;
        let max_in_stack = self.config.max_items_in_top_stack as i32;
        // Index relative to the window of items still peeking out.
        let padded_index = i as i32 - 1 - (completely_in - max_in_stack).max(0);

        if padded_index < 0 {
            state.alpha = if padded_index == -1 {
                1.0 - scratch.partial_in_top
            } else {
                0.0
            };
            state.y_translation = self.collapsed_px() - height_px;
            return StackLocation::TopStackHidden;
        }

        let total_size = self.padding.top_stack_total_size as f32;
        let distance_to_stack = height_px + padding - scratch.scrolled_pixels_top;
        let is_entering = i as i32 == scratch.last_top_stack_index;
        if is_entering && distance_to_stack > total_size + padding {
            // Not in the slow-down zone yet, scrolls like a plain list.
            state.y_translation = scroll_offset;
        } else {
            let items_before = if is_entering {
                1.0 - ratio(distance_to_stack, total_size + padding)
            } else {
                scratch.items_in_top_stack - i as f32
            };
            let child_end =
                self.collapsed_px() + total_size - self.padding.top_functor.travel(items_before);
            state.y_translation = child_end - height_px;
        }
        StackLocation::TopStackPeeking
    }

    fn transitioning_in_bottom(
        &self,
        scratch: &mut PassScratch,
        edges: BottomEdges,
        current_y: f32,
        state: &mut GeometricState,
        child_height: i32,
    ) -> StackLocation {
        let collapsed = self.config.collapsed_size;
        let padding = self.padding_px();
        let start = edges.stack_start;

        scratch.partial_in_bottom =
            1.0 - ratio(start - current_y, child_height as f32 + padding);
        let offset = self.padding.bottom_functor.travel(scratch.partial_in_bottom);
        scratch.items_in_bottom_stack += scratch.partial_in_bottom;

        let mut new_height = child_height;
        if child_height > collapsed && self.is_small_screen {
            let available = (start + offset - padding - current_y).min(child_height as f32);
            new_height = (available as i32).max(collapsed);
            state.height = new_height;
        }
        state.y_translation = start + offset - new_height as f32 - padding;
        self.clamp_to_top_stack_end(state, new_height);
        StackLocation::MainArea
    }

    fn fully_in_bottom_stack(
        &self,
        scratch: &mut PassScratch,
        edges: BottomEdges,
        state: &mut GeometricState,
        child_height: i32,
    ) -> StackLocation {
        let max_in_stack = self.config.max_items_in_bottom_stack as f32;
        scratch.items_in_bottom_stack += 1.0;

        let (bottom, location) = if scratch.items_in_bottom_stack < max_in_stack {
            let bottom = edges.stack_start
                + self
                    .padding
                    .bottom_functor
                    .travel(scratch.items_in_bottom_stack)
                - self.padding_px();
            (bottom, StackLocation::BottomStackPeeking)
        } else {
            if scratch.items_in_bottom_stack > max_in_stack + 2.0 {
                state.alpha = 0.0;
            } else if scratch.items_in_bottom_stack > max_in_stack + 1.0 {
                state.alpha = 1.0 - scratch.partial_in_bottom;
            }
            (
                self.ambient.inner_height as f32,
                StackLocation::BottomStackHidden,
            )
        };
        state.y_translation = bottom - child_height as f32;
        self.clamp_to_top_stack_end(state, child_height);
        location
    }

    /// Keep the item's bottom edge at or below the end of the top stack.
    fn clamp_to_top_stack_end(&self, state: &mut GeometricState, height: i32) {
        state.y_translation = state
            .y_translation
            .max((self.config.collapsed_size - height) as f32);
    }

    /// Keep the item's bottom edge above the bottom peek.
    fn clamp_to_bottom_stack_start(&self, state: &mut GeometricState, height: i32) {
        let limit = self.ambient.inner_height
            - self.config.bottom_peek_size
            - self.config.collapse_second_card_padding
            - height;
        state.y_translation = state.y_translation.min(limit as f32);
    }
}
