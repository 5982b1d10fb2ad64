//! Property invariants for full layout passes.
//!
//! Random item lists, ambient snapshots and configurations are pushed through
//! the public engine API; every pass must keep its output inside the legal
//! bounds and be reproducible.

use proptest::prelude::*;
use stackfold_layout::{
    AmbientState, ItemId, OverlayInfo, StackEntry, StackItem, StackLayoutConfig, StackLocation,
    StackScrollAlgorithm, StackScrollState,
};

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = (max - min) as u64 + 1;
        min + ((self.next_u64() >> 33) % span) as i32
    }

    fn chance(&mut self, one_in: u64) -> bool {
        (self.next_u64() >> 40) % one_in == 0
    }
}

// ============================================================================
// Strategies
// ============================================================================

type ItemShape = (i32, bool, bool, bool, f32, Option<(bool, i32)>, i32);

fn build_item(id: u64, shape: ItemShape) -> StackEntry {
    let (height, gone, transparent, dismissable, alpha, overlay, min_clip) = shape;
    let mut item = StackEntry::new(id, height)
        .gone(gone)
        .transparent(transparent)
        .dismissable(dismissable)
        .alpha(alpha)
        .min_clip(min_clip);
    if let Some((pinned, overlay_height)) = overlay {
        item = item.with_overlay(OverlayInfo {
            active: true,
            pinned,
            overlay_height,
        });
    }
    item
}

fn arb_items(max_len: usize) -> impl Strategy<Value = Vec<StackEntry>> {
    prop::collection::vec(
        (
            0i32..400,
            prop::bool::weighted(0.15),
            prop::bool::weighted(0.1),
            any::<bool>(),
            0.0f32..=1.0,
            prop::option::weighted(0.2, (any::<bool>(), 0i32..200)),
            -10i32..40,
        ),
        0..max_len,
    )
    .prop_map(|shapes| {
        shapes
            .into_iter()
            .enumerate()
            .map(|(i, shape)| build_item(i as u64, shape))
            .collect()
    })
}

/// Items without overlays and at least `min_height` tall.
fn arb_plain_items(min_height: i32) -> impl Strategy<Value = Vec<StackEntry>> {
    prop::collection::vec(min_height..400, 0..20).prop_map(|heights| {
        heights
            .into_iter()
            .enumerate()
            .map(|(i, height)| StackEntry::new(i as u64, height))
            .collect()
    })
}

fn arb_config() -> impl Strategy<Value = StackLayoutConfig> {
    (
        0i32..16,
        16i32..96,
        0i32..8,
        prop::sample::select(vec![160u32, 480]),
        0usize..4,
        0usize..4,
        0.0f32..=1.0,
    )
        .prop_map(
            |(padding, collapsed, z_distance, density, max_top, max_bottom, shape)| {
                StackLayoutConfig {
                    padding_normal: padding,
                    collapsed_size: collapsed,
                    z_distance,
                    density_dpi: density,
                    max_items_in_top_stack: max_top,
                    max_items_in_bottom_stack: max_bottom,
                    shape_factor: shape,
                    ..Default::default()
                }
            },
        )
}

fn arb_ambient() -> impl Strategy<Value = AmbientState> {
    let scroll = (-100i32..3000, 0.0f32..50.0, 0i32..1200);
    let sets = (
        prop::collection::vec(0u64..24, 0..3),
        prop::option::of(0usize..30),
        prop::option::of(0u64..24),
        prop::option::of(0u64..4),
    );
    let flags = (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    );
    let shifts = (0.0f32..64.0, -50.0f32..50.0, 0.0f32..1200.0);
    (scroll, sets, flags, shifts).prop_map(
        |(
            (scroll_y, overscroll, inner),
            (dragged, speed_bump, activated, top_overlay),
            (dimmed, dark, hide_sensitive, shade_expanded, dismiss_all),
            (top_padding, translation, max_overlay),
        )| {
            let mut ambient = AmbientState::new(inner)
                .scroll_y(scroll_y)
                .overscroll_bottom(overscroll)
                .speed_bump_index(speed_bump)
                .activated_item(activated.map(ItemId))
                .top_overlay_item(top_overlay.map(ItemId))
                .dimmed(dimmed)
                .dark(dark)
                .hide_sensitive(hide_sensitive)
                .shade_expanded(shade_expanded)
                .dismiss_all_in_progress(dismiss_all)
                .top_padding(top_padding)
                .stack_translation(translation)
                .max_overlay_translation(max_overlay);
            for id in dragged {
                ambient = ambient.dragging(ItemId(id));
            }
            ambient
        },
    )
}

fn engine_for(config: StackLayoutConfig, expanded: bool, panel_height: i32) -> StackScrollAlgorithm {
    let mut engine = StackScrollAlgorithm::new(config).expect("generated config is valid");
    engine.set_is_expanded(expanded);
    engine.update_is_small_screen(panel_height);
    engine
}

// ============================================================================
// Checks
// ============================================================================

fn assert_bounds(out: &StackScrollState, items: &[StackEntry], collapsed: i32) {
    let visible = items.iter().filter(|item| !item.is_gone()).count();
    assert_eq!(out.order().len(), visible);
    for (id, state) in out.iter() {
        assert!(
            state.height >= collapsed,
            "{id}: height {} below {collapsed}",
            state.height
        );
        assert!((0.0..=1.0).contains(&state.alpha), "{id}: alpha {}", state.alpha);
        assert!(state.clip_top_amount >= 0, "{id}: clip {}", state.clip_top_amount);
        assert!(state.top_overlap >= 0, "{id}: overlap {}", state.top_overlap);
        assert!(state.z_translation >= 0.0, "{id}: z {}", state.z_translation);
        assert!(state.scale > 0.0 && state.scale <= 1.0);
        assert!(StackLocation::ALL.contains(&state.location));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn passes_stay_within_bounds(
        items in arb_items(24),
        ambient in arb_ambient(),
        config in arb_config(),
        expanded in any::<bool>(),
        panel_height in 0i32..1200,
    ) {
        let collapsed = config.collapsed_size;
        let engine = engine_for(config, expanded, panel_height);
        let out = engine.compute(&items, &ambient);
        assert_bounds(&out, &items, collapsed);
    }

    #[test]
    fn passes_are_reproducible(
        items in arb_items(24),
        ambient in arb_ambient(),
        config in arb_config(),
        expanded in any::<bool>(),
    ) {
        let engine = engine_for(config, expanded, 1000);
        let first = engine.compute(&items, &ambient);
        let second = engine.compute(&items, &ambient);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn speed_bump_splits_the_list(
        items in arb_items(24),
        speed_bump in prop::option::of(0usize..30),
    ) {
        let engine = engine_for(StackLayoutConfig::default(), false, 1000);
        let ambient = AmbientState::new(800).speed_bump_index(speed_bump);
        let out = engine.compute(&items, &ambient);
        for (i, (_, state)) in out.iter().enumerate() {
            let expected = speed_bump.is_some_and(|index| i >= index);
            prop_assert_eq!(state.below_speed_bump, expected);
        }
    }

    #[test]
    fn plain_main_area_items_keep_their_order(
        items in arb_plain_items(64),
        scroll_y in 0i32..3000,
        inner in 200i32..1200,
        padding in 0i32..16,
    ) {
        let config = StackLayoutConfig {
            padding_normal: padding,
            collapsed_size: 64,
            ..Default::default()
        };
        let stack_start = (inner - config.bottom_peek_size - config.bottom_slow_down_length) as f32;
        let engine = engine_for(config, false, 1000);
        let out = engine.compute(&items, &AmbientState::new(inner).scroll_y(scroll_y));
        let last_top = out.summary().last_top_stack_index;
        let states: Vec<_> = out.iter().map(|(_, state)| state).collect();

        for (i, pair) in states.windows(2).enumerate() {
            let (upper, lower) = (pair[0], pair[1]);
            let clear_of_bottom = |y: f32, h: i32| y + h as f32 + (padding as f32) < stack_start;
            if (i as i32) > last_top
                && upper.location == StackLocation::MainArea
                && lower.location == StackLocation::MainArea
                && clear_of_bottom(upper.y_translation, upper.height)
                && clear_of_bottom(lower.y_translation, lower.height)
            {
                prop_assert!(
                    lower.y_translation >= upper.y_translation + upper.height as f32,
                    "item {} at {} overlaps item {} ending at {}",
                    i + 1,
                    lower.y_translation,
                    i,
                    upper.y_translation + upper.height as f32
                );
            }
        }
    }
}

#[test]
fn degenerate_inputs_are_well_defined() {
    let engine = engine_for(StackLayoutConfig::default(), true, 0);
    let empty: Vec<StackEntry> = Vec::new();
    assert!(engine.compute(&empty, &AmbientState::new(0)).is_empty());

    let zero_heights: Vec<_> = (0..6).map(|id| StackEntry::new(id, 0)).collect();
    let padding_free = StackScrollAlgorithm::new(StackLayoutConfig {
        padding_normal: 0,
        ..Default::default()
    })
    .expect("valid config");
    let out = padding_free.compute(&zero_heights, &AmbientState::new(0).scroll_y(500));
    assert_bounds(&out, &zero_heights, 64);
}

/// Drives a sequence of passes with lifecycle calls in between.
fn run_sequence(seed: u64, steps: usize) {
    let mut rng = Lcg::new(seed);
    let mut engine = engine_for(StackLayoutConfig::default(), false, rng.next_i32_range(0, 1200));
    let count = rng.next_i32_range(0, 30) as u64;
    let mut items: Vec<StackEntry> = (0..count)
        .map(|id| StackEntry::new(id, rng.next_i32_range(0, 360)).measured(!rng.chance(4)))
        .collect();
    let mut tickets = Vec::new();

    for _ in 0..steps {
        match rng.next_i32_range(0, 5) {
            0 => tickets.extend(engine.on_expansion_started(&items)),
            1 => engine.on_expansion_stopped(),
            2 => engine.set_is_expanded(rng.chance(2)),
            3 => {
                if let Some(ticket) = tickets.pop() {
                    let height = rng.next_i32_range(0, 400);
                    engine.complete_measurement(ticket, &StackEntry::new(ticket.item().0, height));
                }
            }
            4 => {
                if !items.is_empty() && rng.chance(3) {
                    items.remove(0);
                }
                tickets.extend(engine.notify_children_changed(&items));
            }
            _ => engine.set_dimmed(rng.chance(2)),
        }
        let ambient = AmbientState::new(rng.next_i32_range(0, 1200))
            .scroll_y(rng.next_i32_range(-50, 4000))
            .dimmed(rng.chance(3));
        let out = engine.compute(&items, &ambient);
        assert_bounds(&out, &items, 64);
        assert_eq!(out, engine.compute(&items, &ambient), "seed {seed} not reproducible");
    }
}

#[test]
fn lifecycle_seed_corpus_preserves_invariants() {
    let seeds = [0_u64, 1, 2, 3, 5, 8, 13, 21, 34, 55, 0xDEAD_BEEF, 0x5EED];
    for seed in seeds {
        run_sequence(seed, 120);
    }
}
