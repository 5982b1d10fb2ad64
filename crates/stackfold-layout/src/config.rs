#![forbid(unsafe_code)]

//! Pixel-dimension constants and the state derived from them.
//!
//! [`StackLayoutConfig`] is supplied once when the engine is built. The only
//! configuration that changes afterwards is the dimmed flag, which swaps the
//! padding between items and therefore rebuilds [`PaddingState`].
//!
//! # Invariants
//!
//! 1. Every pixel dimension is non-negative (checked by [`validate`]).
//! 2. `dimmed_scale` lies in `(0, 1]`, `shape_factor` in `[0, 1]`.
//! 3. [`PaddingState`] is a pure function of the config and the dimmed flag.
//!
//! [`validate`]: StackLayoutConfig::validate

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::indentation::IndentationFunctor;

/// Constants the layout pass is parameterized by.
///
/// Deserializes from partial documents; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackLayoutConfig {
    /// Gap between consecutive items.
    pub padding_normal: i32,
    /// Gap between items while dimmed on a scaling display.
    pub padding_dimmed: i32,
    /// Lowest translation a pinned overlay item may take.
    pub pinned_top_padding: i32,
    /// Height of a fully collapsed item; also the top stack's front-card size.
    pub collapsed_size: i32,
    /// Tallest an item can get; used for the small-screen classification.
    pub max_item_height: i32,
    pub top_peek_size: i32,
    pub bottom_peek_size: i32,
    pub top_slow_down_length: i32,
    pub bottom_slow_down_length: i32,
    /// Rounded-corner radius, added to the clip of non-dimmed items.
    pub corner_radius: i32,
    /// Depth step between stacked items.
    pub z_distance: i32,
    /// Room kept below the first item for the second card's peek.
    pub collapse_second_card_padding: i32,
    /// Display density of the target surface.
    pub density_dpi: u32,
    /// Density at and above which dimming also scales items down.
    pub scale_dimmed_min_density: u32,
    pub dimmed_scale: f32,
    /// Blend between the weighted and linear indentation curves.
    pub shape_factor: f32,
    pub max_items_in_top_stack: usize,
    pub max_items_in_bottom_stack: usize,
}

impl Default for StackLayoutConfig {
    fn default() -> Self {
        Self {
            padding_normal: 4,
            padding_dimmed: 2,
            pinned_top_padding: 8,
            collapsed_size: 64,
            max_item_height: 256,
            top_peek_size: 12,
            bottom_peek_size: 12,
            top_slow_down_length: 12,
            bottom_slow_down_length: 12,
            corner_radius: 2,
            z_distance: 1,
            collapse_second_card_padding: 8,
            density_dpi: 160,
            scale_dimmed_min_density: 480,
            dimmed_scale: 0.95,
            shape_factor: 0.5,
            max_items_in_top_stack: 0,
            max_items_in_bottom_stack: 0,
        }
    }
}

impl StackLayoutConfig {
    /// Check every constant for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dimensions = [
            ("padding_normal", self.padding_normal),
            ("padding_dimmed", self.padding_dimmed),
            ("pinned_top_padding", self.pinned_top_padding),
            ("collapsed_size", self.collapsed_size),
            ("max_item_height", self.max_item_height),
            ("top_peek_size", self.top_peek_size),
            ("bottom_peek_size", self.bottom_peek_size),
            ("top_slow_down_length", self.top_slow_down_length),
            ("bottom_slow_down_length", self.bottom_slow_down_length),
            ("corner_radius", self.corner_radius),
            ("z_distance", self.z_distance),
            (
                "collapse_second_card_padding",
                self.collapse_second_card_padding,
            ),
        ];
        if let Some(&(name, value)) = dimensions.iter().find(|(_, value)| *value < 0) {
            return Err(ConfigError::NegativeDimension { name, value });
        }
        if !(self.dimmed_scale > 0.0 && self.dimmed_scale <= 1.0) {
            return Err(ConfigError::DimmedScaleOutOfRange(self.dimmed_scale));
        }
        if !(0.0..=1.0).contains(&self.shape_factor) {
            return Err(ConfigError::ShapeFactorOutOfRange(self.shape_factor));
        }
        Ok(())
    }

    /// Whether dimming also scales items on this display.
    #[must_use]
    pub fn scale_dimmed(&self) -> bool {
        self.density_dpi >= self.scale_dimmed_min_density
    }

    /// Whether a panel of `panel_height` is too short to hold both stacks and
    /// one item of maximum height at the same time.
    #[must_use]
    pub fn is_small_screen(&self, panel_height: i32) -> bool {
        panel_height
            < self.collapsed_size
                + self.bottom_slow_down_length
                + self.bottom_peek_size
                + self.max_item_height
    }
}

/// Padding and the quantities that depend on it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddingState {
    /// Active gap between items.
    pub padding: i32,
    /// Span of the top stack: slow-down, padding and peek.
    pub top_stack_total_size: i32,
    pub top_functor: IndentationFunctor,
    pub bottom_functor: IndentationFunctor,
}

impl PaddingState {
    /// Derive the padding state for the given dimmed flag.
    #[must_use]
    pub fn derive(config: &StackLayoutConfig, dimmed: bool) -> Self {
        let padding = if dimmed && config.scale_dimmed() {
            config.padding_dimmed
        } else {
            config.padding_normal
        };
        let top_stack_total_size = config.top_slow_down_length + padding + config.top_peek_size;
        let top_functor = IndentationFunctor::new(
            config.max_items_in_top_stack,
            config.top_peek_size,
            top_stack_total_size - config.top_peek_size,
            config.shape_factor,
        );
        let bottom_functor = IndentationFunctor::new(
            config.max_items_in_bottom_stack,
            config.bottom_peek_size,
            config.bottom_slow_down_length + padding,
            config.shape_factor,
        );
        Self {
            padding,
            top_stack_total_size,
            top_functor,
            bottom_functor,
        }
    }

    /// Slow-down span of the bottom stack including the active padding.
    #[must_use]
    pub fn bottom_stack_slow_down_length(&self) -> i32 {
        self.bottom_functor.slow_down_length()
    }
}
