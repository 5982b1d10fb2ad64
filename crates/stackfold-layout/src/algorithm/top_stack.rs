#![forbid(unsafe_code)]

//! Top-stack sizing.
//!
//! Walks the items as if they were laid out in a plain scroll view and counts
//! how many have scrolled past the top edge. The scan stops at the first item
//! that has not been fully scrolled past; that item contributes the
//! fractional part of the count.
//!
//! When every item has scrolled past, `last_top_stack_index` keeps its
//! starting value of 0: only the front card counts as stacked and the rest
//! take the main-area rules, parked behind it.

use super::{Pass, PassScratch, ratio};
use crate::item::StackItem;
use crate::state::GeometricState;

impl<I: StackItem> Pass<'_, I> {
    pub(super) fn find_items_in_top_stack(
        &self,
        scratch: &mut PassScratch,
        states: &mut [GeometricState],
    ) {
        let collapsed = self.config.collapsed_size;
        let padding = self.padding_px();
        let scroll = scratch.scroll_y as f32;
        let mut y_in_scroll_view = 0.0f32;

        for (i, state) in states.iter_mut().enumerate() {
            let item = self.item(i);
            let child_height = self.child_height(item);
            let y_after = y_in_scroll_view + child_height as f32 + padding;

            if y_in_scroll_view >= scroll {
                scratch.last_top_stack_index = i as i32 - 1;
                return;
            }

            if i == 0 && scratch.scroll_y <= collapsed {
                // Not scrolled yet: the first item collapses and expands with
                // the list instead.
                let peek_start = self.ambient.inner_height
                    - self.config.bottom_peek_size
                    - self.config.collapse_second_card_padding;
                let max_height = self
                    .transition
                    .cap_for(item.id())
                    .unwrap_or(child_height);
                state.height = peek_start.min(max_height).max(collapsed);
                scratch.items_in_top_stack = 1.0;
            } else if y_after < scroll {
                scratch.items_in_top_stack += 1.0;
                if i == 0 {
                    state.height = collapsed;
                }
            } else {
                scratch.scrolled_pixels_top = scroll - y_in_scroll_view;
                // An expanded item can make this negative.
                scratch.partial_in_top =
                    ratio(scratch.scrolled_pixels_top, child_height as f32 + padding).max(0.0);
                scratch.items_in_top_stack += scratch.partial_in_top;
                if i == 0 {
                    let new_size = y_after - padding - scroll + collapsed as f32;
                    state.height = (new_size.max(collapsed as f32)) as i32;
                    scratch.items_in_top_stack = 1.0;
                }
                scratch.last_top_stack_index = i as i32;
                return;
            }
            y_in_scroll_view = y_after;
        }
    }
}
