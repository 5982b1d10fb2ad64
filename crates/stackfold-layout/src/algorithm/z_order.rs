#![forbid(unsafe_code)]

//! Depth ordering.
//!
//! Items in the top stack rise above the base depth the deeper they are,
//! items in the bottom stack sink below it. Everything else shares the base.

use super::{Pass, PassScratch};
use crate::item::StackItem;
use crate::state::GeometricState;

impl<I: StackItem> Pass<'_, I> {
    pub(super) fn update_z_values(&self, scratch: &PassScratch, states: &mut [GeometricState]) {
        let z_distance = self.config.z_distance as f32;
        let max_top = self.config.max_items_in_top_stack as f32;
        let z_basic = (self.config.max_items_in_bottom_stack as f32 + 1.0) * z_distance;
        let bottom_boundary = states.len() as f32 - 1.0 - scratch.items_in_bottom_stack;

        for (i, state) in states.iter_mut().enumerate() {
            let index = i as f32;
            let z = if index < scratch.items_in_top_stack {
                // The front card sits a little higher so swiping it out never
                // draws it under its neighbour.
                let cap = max_top + if i == 0 { 2.5 } else { 2.0 };
                let mut stack_index = (scratch.items_in_top_stack - index).min(cap);
                if i == 0 && scratch.items_in_top_stack < 2.0 {
                    // Ramp from 0 to 2 while the second item slides in.
                    stack_index -= 1.0;
                    if scratch.scroll_y > self.config.collapsed_size {
                        stack_index = 0.1 + stack_index * 1.9;
                    }
                }
                z_basic + stack_index * z_distance
            } else if index > bottom_boundary {
                z_basic - (index - bottom_boundary) * z_distance
            } else {
                z_basic
            };
            state.z_translation = z.max(0.0);
        }
    }
}
