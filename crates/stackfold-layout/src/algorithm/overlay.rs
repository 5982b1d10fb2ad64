#![forbid(unsafe_code)]

//! Overlay (heads-up) adjustment.
//!
//! Only the leading run of active overlay items is touched; the walk stops at
//! the first item that is not one. The first overlay found is the top
//! overlay, every later one is kept from extending past it.

use super::Pass;
use crate::item::StackItem;
use crate::state::GeometricState;

impl<I: StackItem> Pass<'_, I> {
    pub(super) fn update_overlay_states(&self, states: &mut [GeometricState]) {
        let collapsed = self.config.collapsed_size;
        let mut top: Option<usize> = None;

        for i in 0..states.len() {
            let Some(overlay) = self.item(i).overlay().filter(|overlay| overlay.active) else {
                break;
            };
            let top_index = *top.get_or_insert(i);
            let is_top = top_index == i;
            let top_bottom = states[top_index].bottom();
            let state = &mut states[i];

            if self.is_expanded {
                if is_top {
                    state.height += overlay.overlay_height - collapsed;
                }
                state.height = state.height.max(overlay.overlay_height).max(collapsed);
                // Stay visible even when scrolled off at the bottom.
                let lowest = self.ambient.max_overlay_translation - state.height as f32;
                state.y_translation = state.y_translation.min(lowest);
            }
            if overlay.pinned {
                state.y_translation = state
                    .y_translation
                    .max(self.config.pinned_top_padding as f32);
                state.height = overlay.overlay_height.max(collapsed);
                if !is_top {
                    state.y_translation = top_bottom - state.height as f32;
                }
            }
        }
    }
}
