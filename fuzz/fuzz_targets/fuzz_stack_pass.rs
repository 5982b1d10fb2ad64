#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stackfold_layout::{
    AmbientState, ItemId, OverlayInfo, StackEntry, StackItem, StackLayoutConfig,
    StackScrollAlgorithm,
};

#[derive(Arbitrary, Debug)]
struct Item {
    height: u16,
    gone: bool,
    transparent: bool,
    dismissable: bool,
    alpha: u8,
    overlay: Option<(bool, u16)>,
    min_clip: u8,
}

#[derive(Arbitrary, Debug)]
struct Input {
    items: Vec<Item>,
    scroll_y: i16,
    overscroll: u8,
    inner_height: u16,
    panel_height: u16,
    padding: u8,
    collapsed: u8,
    max_in_top: u8,
    max_in_bottom: u8,
    high_density: bool,
    expanded: bool,
    dimmed: bool,
    shade_expanded: bool,
    dismiss_all: bool,
    dragged: Option<u8>,
    activated: Option<u8>,
    top_overlay: Option<u8>,
    speed_bump: Option<u8>,
    top_padding: u8,
    translation: i8,
}

fuzz_target!(|input: Input| {
    if input.items.len() > 256 {
        return;
    }
    let config = StackLayoutConfig {
        padding_normal: i32::from(input.padding % 32),
        collapsed_size: i32::from(input.collapsed),
        density_dpi: if input.high_density { 480 } else { 160 },
        max_items_in_top_stack: usize::from(input.max_in_top % 8),
        max_items_in_bottom_stack: usize::from(input.max_in_bottom % 8),
        ..Default::default()
    };
    let Ok(mut engine) = StackScrollAlgorithm::new(config.clone()) else {
        return;
    };
    engine.set_is_expanded(input.expanded);
    engine.update_is_small_screen(i32::from(input.panel_height));

    let items: Vec<StackEntry> = input
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut entry = StackEntry::new(i as u64, i32::from(item.height % 2048))
                .gone(item.gone)
                .transparent(item.transparent)
                .dismissable(item.dismissable)
                .alpha(f32::from(item.alpha) / 255.0)
                .min_clip(i32::from(item.min_clip));
            if let Some((pinned, overlay_height)) = item.overlay {
                entry = entry.with_overlay(OverlayInfo {
                    active: true,
                    pinned,
                    overlay_height: i32::from(overlay_height % 2048),
                });
            }
            entry
        })
        .collect();

    let id = |raw: Option<u8>| raw.map(|raw| ItemId(u64::from(raw)));
    let mut ambient = AmbientState::new(i32::from(input.inner_height % 4096))
        .scroll_y(i32::from(input.scroll_y))
        .overscroll_bottom(f32::from(input.overscroll))
        .dimmed(input.dimmed)
        .shade_expanded(input.shade_expanded)
        .dismiss_all_in_progress(input.dismiss_all)
        .activated_item(id(input.activated))
        .top_overlay_item(id(input.top_overlay))
        .speed_bump_index(input.speed_bump.map(usize::from))
        .top_padding(f32::from(input.top_padding))
        .stack_translation(f32::from(input.translation))
        .max_overlay_translation(f32::from(input.inner_height));
    if let Some(dragged) = id(input.dragged) {
        ambient = ambient.dragging(dragged);
    }

    let out = engine.compute(&items, &ambient);

    // Post-conditions that must always hold:
    let visible = items.iter().filter(|item| !item.is_gone()).count();
    assert_eq!(out.order().len(), visible, "visible count changed");
    for (id, state) in out.iter() {
        assert!(state.height >= config.collapsed_size, "{id}: height below collapsed");
        assert!((0.0..=1.0).contains(&state.alpha), "{id}: alpha out of range");
        assert!(state.z_translation >= 0.0, "{id}: negative z");
        assert!(state.clip_top_amount >= 0, "{id}: negative clip");
        assert!(state.top_overlap >= 0, "{id}: negative overlap");
    }
    assert_eq!(out, engine.compute(&items, &ambient), "pass not reproducible");
});
