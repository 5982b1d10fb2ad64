#![forbid(unsafe_code)]

//! Visible-item indexing, the first phase of a pass.
//!
//! Walks the host's items once, skips hidden ones, seeds a fresh state for
//! every visible item and assigns `not_gone_index` values. Expanded nested
//! children are numbered right after their parent so the index stays stable
//! across flattening.

use crate::item::StackItem;
use crate::state::{GeometricState, StackScrollState};

/// Visible items of one pass, in display order.
#[derive(Debug, Default)]
pub(crate) struct VisibleItems {
    /// Positions of the visible items in the host's slice.
    pub(crate) indices: Vec<usize>,
    /// Working state of each visible item, parallel to `indices`.
    pub(crate) states: Vec<GeometricState>,
}

/// Index the visible items and seed nested children into `result`.
pub(crate) fn index_visible_items<I: StackItem>(
    items: &[I],
    collapsed_size: i32,
    result: &mut StackScrollState,
) -> VisibleItems {
    let mut visible = VisibleItems {
        indices: Vec::with_capacity(items.len()),
        states: Vec::with_capacity(items.len()),
    };
    let mut not_gone_index = 0usize;
    for (index, item) in items.iter().enumerate() {
        if item.is_gone() {
            continue;
        }
        let height = item.intrinsic_height().max(collapsed_size);
        visible.indices.push(index);
        visible
            .states
            .push(GeometricState::initial(height, not_gone_index));
        not_gone_index += 1;

        let Some(nested) = item.nested() else {
            continue;
        };
        if !nested.children_expanded() {
            continue;
        }
        for child in nested.children().iter().filter(|child| !child.gone) {
            result.insert(
                child.id,
                GeometricState::initial(child.intrinsic_height, not_gone_index),
            );
            not_gone_index += 1;
        }
    }
    visible
}
