#![forbid(unsafe_code)]

//! Phases that decorate the placed items: drag handling, dimming and
//! activation, clipping, the speed bump and the final bounds.

use super::{Pass, clamp_unit};
use crate::item::StackItem;
use crate::state::GeometricState;

/// Whole pixels of `real` that stick out past `reference`, unscaled.
fn overhang(real: f32, reference: f32, scale: f32) -> i32 {
    if real > reference {
        ((real - reference) / scale).floor() as i32
    } else {
        0
    }
}

impl<I: StackItem> Pass<'_, I> {
    /// Items being dragged keep the alpha the gesture gave them; the item
    /// right below one is shown fully so no gap opens up. The last visible
    /// item has nothing below it and keeps its computed alpha.
    pub(super) fn handle_dragged_items(&self, states: &mut [GeometricState]) {
        let ambient = self.ambient;
        if ambient.dragged_items.is_empty() {
            return;
        }
        for i in 0..states.len().saturating_sub(1) {
            let item = self.item(i);
            if !ambient.is_dragged(item.id()) {
                continue;
            }
            if ambient.shade_expanded && !ambient.is_dragged(self.item(i + 1).id()) {
                states[i + 1].alpha = 1.0;
            }
            states[i].alpha = clamp_unit(item.current_alpha());
        }
    }

    pub(super) fn update_dimmed_activated_hide_sensitive(&self, states: &mut [GeometricState]) {
        let ambient = self.ambient;
        let scale_dimmed = self.config.scale_dimmed();
        let z_boost = 2.0 * self.config.z_distance as f32;
        for (i, state) in states.iter_mut().enumerate() {
            state.dimmed = ambient.dimmed;
            state.dark = ambient.dark;
            state.hide_sensitive = ambient.hide_sensitive;
            let activated = ambient.activated_item == Some(self.item(i).id());
            state.scale = if !scale_dimmed || !ambient.dimmed || activated {
                1.0
            } else {
                self.config.dimmed_scale
            };
            if ambient.dimmed && activated {
                state.z_translation += z_boost;
            }
        }
    }

    /// Clip each item against the one drawn above it.
    pub(super) fn update_clipping(&self, states: &mut [GeometricState]) {
        let dismiss_all = self.ambient.dismiss_all_in_progress;
        let corner_radius = self.config.corner_radius as f32;
        let mut previous_end = 0.0f32;
        let mut previous_start = 0.0f32;
        let mut previous_swiped = false;

        for (i, state) in states.iter_mut().enumerate() {
            let item = self.item(i);
            let scale = state.scale;
            let new_y = state.y_translation + state.height as f32 * (1.0 - scale) / 2.0;
            let new_height = state.height as f32 * scale;
            let new_end = new_y + new_height;

            let clip_height = if previous_swiped {
                new_height
            } else {
                let gap = (new_end - previous_end).max(0.0);
                if gap != 0.0 && !state.dimmed {
                    // Rounded corners need a little more room.
                    gap + corner_radius * scale
                } else {
                    gap
                }
            };
            let background_height = new_height - (previous_start - new_y);
            state.top_overlap = overhang(new_height, clip_height, scale);
            state.clip_top_amount = overhang(new_height, background_height, scale);
            if dismiss_all {
                state.clip_top_amount = state.clip_top_amount.max(item.min_clip_top_amount());
            }

            // Transparent items never become the clip reference.
            if item.is_transparent() {
                continue;
            }
            if dismiss_all && item.is_dismissable() {
                previous_swiped = true;
            } else {
                previous_swiped = self.ambient.is_dragged(item.id());
                previous_end = new_end;
                previous_start = new_y + state.clip_top_amount as f32 * scale;
            }
        }
    }

    pub(super) fn update_speed_bump(&self, states: &mut [GeometricState]) {
        let speed_bump = self.ambient.speed_bump_index;
        for (i, state) in states.iter_mut().enumerate() {
            state.below_speed_bump = speed_bump.is_some_and(|index| i >= index);
        }
    }

    pub(super) fn settle_bounds(&self, states: &mut [GeometricState]) {
        let collapsed = self.config.collapsed_size;
        for state in states {
            state.height = state.height.max(collapsed);
            state.alpha = clamp_unit(state.alpha);
            state.z_translation = state.z_translation.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::overhang;
    use crate::ambient::AmbientState;
    use crate::config::StackLayoutConfig;
    use crate::item::{ItemId, StackEntry};
    use crate::{StackScrollAlgorithm, StackScrollState};

    fn engine(config: StackLayoutConfig) -> StackScrollAlgorithm {
        StackScrollAlgorithm::new(config).expect("valid config")
    }

    fn padded() -> StackLayoutConfig {
        StackLayoutConfig {
            padding_normal: 8,
            ..Default::default()
        }
    }

    fn state(out: &StackScrollState, id: u64) -> &crate::GeometricState {
        out.get(ItemId(id)).expect("item")
    }

    #[test]
    fn overhang_is_floored_and_unscaled() {
        assert_eq!(overhang(10.0, 12.0, 1.0), 0);
        assert_eq!(overhang(10.0, 4.5, 1.0), 5);
        assert_eq!(overhang(9.5, 5.0, 0.5), 9);
    }

    #[test]
    fn dragged_item_keeps_its_alpha() {
        let items = vec![
            StackEntry::new(0, 100),
            StackEntry::new(1, 100).alpha(0.4),
            StackEntry::new(2, 100),
        ];
        let ambient = AmbientState::new(800)
            .dragging(ItemId(1))
            .shade_expanded(true);
        let out = engine(padded()).compute(&items, &ambient);
        assert_eq!(state(&out, 1).alpha, 0.4);
        assert_eq!(state(&out, 2).alpha, 1.0);
    }

    #[test]
    fn dragged_last_item_keeps_its_computed_alpha() {
        let items = vec![StackEntry::new(0, 100), StackEntry::new(1, 100).alpha(0.4)];
        let ambient = AmbientState::new(800)
            .dragging(ItemId(1))
            .shade_expanded(true);
        let out = engine(padded()).compute(&items, &ambient);
        assert_eq!(state(&out, 1).alpha, 1.0);
    }

    #[test]
    fn transparent_items_are_not_a_clip_reference() {
        // Item 7 (688..788) enters the bottom stack over item 6 (648..748);
        // item 8 is hidden at 700..800.
        let opaque: Vec<_> = (0..10).map(|id| StackEntry::new(id, 100)).collect();
        let out = engine(padded()).compute(&opaque, &AmbientState::new(800));
        assert_eq!(state(&out, 7).y_translation, 688.0);
        assert_eq!(state(&out, 8).y_translation, 700.0);
        // Clipped against item 7: gap 12 plus the 2px corner.
        assert_eq!(state(&out, 8).top_overlap, 86);

        let mut see_through = opaque.clone();
        see_through[7] = StackEntry::new(7, 100).transparent(true);
        let out = engine(padded()).compute(&see_through, &AmbientState::new(800));
        // Item 7 itself is clipped as before.
        assert_eq!(state(&out, 7).top_overlap, 58);
        // Item 8 is clipped against item 6 instead: gap 52 plus the corner.
        assert_eq!(state(&out, 8).top_overlap, 46);
        assert_eq!(state(&out, 8).clip_top_amount, 0);
    }

    #[test]
    fn dimmed_items_scale_except_the_activated_one() {
        let config = StackLayoutConfig {
            density_dpi: 480,
            ..padded()
        };
        let items = vec![StackEntry::new(0, 100), StackEntry::new(1, 100)];
        let ambient = AmbientState::new(800)
            .dimmed(true)
            .dark(true)
            .activated_item(Some(ItemId(1)));
        let out = engine(config).compute(&items, &ambient);
        assert_eq!(state(&out, 0).scale, 0.95);
        assert_eq!(state(&out, 1).scale, 1.0);
        assert!(state(&out, 1).z_translation > state(&out, 0).z_translation);
        assert!(state(&out, 0).dimmed && state(&out, 0).dark);
        assert!(!state(&out, 0).hide_sensitive);
    }

    #[test]
    fn dimming_on_low_density_keeps_scale() {
        let items = vec![StackEntry::new(0, 100)];
        let out = engine(padded()).compute(&items, &AmbientState::new(800).dimmed(true));
        assert_eq!(state(&out, 0).scale, 1.0);
    }

    #[test]
    fn touching_items_do_not_clip() {
        let items = vec![StackEntry::new(0, 100), StackEntry::new(1, 100)];
        let out = engine(padded()).compute(&items, &AmbientState::new(800));
        assert_eq!(state(&out, 1).clip_top_amount, 0);
        assert_eq!(state(&out, 1).top_overlap, 0);
    }

    #[test]
    fn stacked_items_clip_under_the_card_above() {
        // Internal scroll 374: items 1..=3 hide behind the front card.
        let items: Vec<_> = (0..5).map(|id| StackEntry::new(id, 100)).collect();
        let out = engine(padded()).compute(&items, &AmbientState::new(800).scroll_y(310));
        let hidden = state(&out, 1);
        assert!(hidden.clip_top_amount > 0);
        assert!(hidden.top_overlap > 0);
    }

    #[test]
    fn dismiss_all_applies_minimum_clip() {
        let items = vec![
            StackEntry::new(0, 100).dismissable(true),
            StackEntry::new(1, 100).min_clip(30),
        ];
        let ambient = AmbientState::new(800).dismiss_all_in_progress(true);
        let out = engine(padded()).compute(&items, &ambient);
        let follower = state(&out, 1);
        assert_eq!(follower.clip_top_amount, 30);
        // Following a swiped item: clipped to its own height, no overlap.
        assert_eq!(follower.top_overlap, 0);
    }

    #[test]
    fn speed_bump_marks_items_from_its_index() {
        let items: Vec<_> = (0..4).map(|id| StackEntry::new(id, 100)).collect();
        let out = engine(padded()).compute(
            &items,
            &AmbientState::new(800).speed_bump_index(Some(2)),
        );
        let flags: Vec<bool> = out.iter().map(|(_, s)| s.below_speed_bump).collect();
        assert_eq!(flags, vec![false, false, true, true]);

        let out = engine(padded()).compute(&items, &AmbientState::new(800));
        assert!(out.iter().all(|(_, s)| !s.below_speed_bump));
    }
}
