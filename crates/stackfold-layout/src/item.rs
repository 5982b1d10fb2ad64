#![forbid(unsafe_code)]

//! Items as the layout pass sees them.
//!
//! The host owns and measures its items. The engine only reads them through
//! [`StackItem`], a single capability interface. Optional behaviour is
//! discovered by querying facets instead of inspecting concrete types:
//!
//! - [`StackItem::overlay`] reports overlay (heads-up) capability.
//! - [`StackItem::nested`] exposes nested children of a composite item.
//!
//! [`StackEntry`] is a plain owned implementation for hosts without a richer
//! item type.

use serde::{Deserialize, Serialize};

use crate::state::{GeometricState, StackScrollState};

/// Stable identity of an item across passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Overlay facet of an item that can be shown as a heads-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverlayInfo {
    /// The item is currently shown as an overlay.
    pub active: bool,
    /// The overlay stays fixed regardless of scroll.
    pub pinned: bool,
    /// Height of the item while presented as an overlay.
    pub overlay_height: i32,
}

/// One nested child of a composite item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedChild {
    pub id: ItemId,
    pub intrinsic_height: i32,
    /// Hidden children take no `not_gone_index`.
    pub gone: bool,
}

/// Facet of a composite item that lays out its own children.
pub trait NestedItems {
    /// Whether the children are currently expanded (and thus indexed).
    fn children_expanded(&self) -> bool;

    /// Children in display order.
    fn children(&self) -> &[NestedChild];

    /// Write the children's states once the parent's state is fixed.
    ///
    /// The output already holds a default state for every expanded, non-gone
    /// child with its `not_gone_index` assigned.
    fn layout_children(&self, parent: &GeometricState, result: &mut StackScrollState);
}

/// Read-only view of a host item.
pub trait StackItem {
    fn id(&self) -> ItemId;

    /// Measured height of the item's content.
    fn intrinsic_height(&self) -> i32;

    /// Hidden items are skipped by the pass entirely.
    fn is_gone(&self) -> bool {
        false
    }

    /// Transparent items never serve as the clip reference for the next item.
    fn is_transparent(&self) -> bool {
        false
    }

    fn is_dismissable(&self) -> bool {
        false
    }

    /// Smallest top clip the item needs while everything is being dismissed.
    fn min_clip_top_amount(&self) -> i32 {
        0
    }

    /// Alpha currently applied by the gesture driver; kept while dragged.
    fn current_alpha(&self) -> f32 {
        1.0
    }

    /// Height the item settles at once running animations finish.
    fn final_height(&self) -> i32 {
        self.intrinsic_height()
    }

    /// Whether the item has been measured at its full expanded size.
    fn is_max_height_initialized(&self) -> bool {
        true
    }

    fn overlay(&self) -> Option<OverlayInfo> {
        None
    }

    fn nested(&self) -> Option<&dyn NestedItems> {
        None
    }
}

impl<T: StackItem + ?Sized> StackItem for &T {
    fn id(&self) -> ItemId {
        (**self).id()
    }
    fn intrinsic_height(&self) -> i32 {
        (**self).intrinsic_height()
    }
    fn is_gone(&self) -> bool {
        (**self).is_gone()
    }
    fn is_transparent(&self) -> bool {
        (**self).is_transparent()
    }
    fn is_dismissable(&self) -> bool {
        (**self).is_dismissable()
    }
    fn min_clip_top_amount(&self) -> i32 {
        (**self).min_clip_top_amount()
    }
    fn current_alpha(&self) -> f32 {
        (**self).current_alpha()
    }
    fn final_height(&self) -> i32 {
        (**self).final_height()
    }
    fn is_max_height_initialized(&self) -> bool {
        (**self).is_max_height_initialized()
    }
    fn overlay(&self) -> Option<OverlayInfo> {
        (**self).overlay()
    }
    fn nested(&self) -> Option<&dyn NestedItems> {
        (**self).nested()
    }
}

impl<T: StackItem + ?Sized> StackItem for Box<T> {
    fn id(&self) -> ItemId {
        (**self).id()
    }
    fn intrinsic_height(&self) -> i32 {
        (**self).intrinsic_height()
    }
    fn is_gone(&self) -> bool {
        (**self).is_gone()
    }
    fn is_transparent(&self) -> bool {
        (**self).is_transparent()
    }
    fn is_dismissable(&self) -> bool {
        (**self).is_dismissable()
    }
    fn min_clip_top_amount(&self) -> i32 {
        (**self).min_clip_top_amount()
    }
    fn current_alpha(&self) -> f32 {
        (**self).current_alpha()
    }
    fn final_height(&self) -> i32 {
        (**self).final_height()
    }
    fn is_max_height_initialized(&self) -> bool {
        (**self).is_max_height_initialized()
    }
    fn overlay(&self) -> Option<OverlayInfo> {
        (**self).overlay()
    }
    fn nested(&self) -> Option<&dyn NestedItems> {
        (**self).nested()
    }
}

/// Where a positioning height is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeightContext {
    /// Inside a pass, with the ambient top overlay designation.
    Pass { top_overlay: Option<ItemId> },
    /// Outside a pass, e.g. while snapshotting a transition.
    Detached,
}

/// Height the pass positions an item with.
///
/// The designated top overlay is positioned as if collapsed; the overlay
/// area above it is added back by the overlay adjustment. Outside a pass any
/// active overlay is treated the same way.
pub(crate) fn max_allowed_height<I: StackItem + ?Sized>(
    item: &I,
    context: HeightContext,
    collapsed_size: i32,
) -> i32 {
    let intrinsic = item.intrinsic_height();
    let Some(overlay) = item.overlay() else {
        return intrinsic;
    };
    let reduced = match context {
        HeightContext::Pass { top_overlay } => top_overlay == Some(item.id()),
        HeightContext::Detached => overlay.active,
    };
    if reduced {
        collapsed_size + intrinsic - overlay.overlay_height
    } else {
        intrinsic
    }
}

/// A plain owned item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    pub id: ItemId,
    pub intrinsic_height: i32,
    pub gone: bool,
    pub transparent: bool,
    pub dismissable: bool,
    pub min_clip_top_amount: i32,
    pub alpha: f32,
    pub final_height: Option<i32>,
    pub max_height_initialized: bool,
    pub overlay: Option<OverlayInfo>,
}

impl StackEntry {
    /// A visible, opaque, measured item.
    #[must_use]
    pub fn new(id: u64, intrinsic_height: i32) -> Self {
        Self {
            id: ItemId(id),
            intrinsic_height,
            gone: false,
            transparent: false,
            dismissable: false,
            min_clip_top_amount: 0,
            alpha: 1.0,
            final_height: None,
            max_height_initialized: true,
            overlay: None,
        }
    }

    #[must_use]
    pub fn gone(mut self, gone: bool) -> Self {
        self.gone = gone;
        self
    }

    #[must_use]
    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    #[must_use]
    pub fn dismissable(mut self, dismissable: bool) -> Self {
        self.dismissable = dismissable;
        self
    }

    #[must_use]
    pub fn min_clip(mut self, amount: i32) -> Self {
        self.min_clip_top_amount = amount;
        self
    }

    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn settles_at(mut self, height: i32) -> Self {
        self.final_height = Some(height);
        self
    }

    #[must_use]
    pub fn measured(mut self, initialized: bool) -> Self {
        self.max_height_initialized = initialized;
        self
    }

    #[must_use]
    pub fn with_overlay(mut self, overlay: OverlayInfo) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

impl StackItem for StackEntry {
    fn id(&self) -> ItemId {
        self.id
    }
    fn intrinsic_height(&self) -> i32 {
        self.intrinsic_height
    }
    fn is_gone(&self) -> bool {
        self.gone
    }
    fn is_transparent(&self) -> bool {
        self.transparent
    }
    fn is_dismissable(&self) -> bool {
        self.dismissable
    }
    fn min_clip_top_amount(&self) -> i32 {
        self.min_clip_top_amount
    }
    fn current_alpha(&self) -> f32 {
        self.alpha
    }
    fn final_height(&self) -> i32 {
        self.final_height.unwrap_or(self.intrinsic_height)
    }
    fn is_max_height_initialized(&self) -> bool {
        self.max_height_initialized
    }
    fn overlay(&self) -> Option<OverlayInfo> {
        self.overlay
    }
}
