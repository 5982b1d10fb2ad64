#![forbid(unsafe_code)]

//! Stack-scroll layout.
//!
//! Computes, once per pass, the geometry of every visible item in a
//! vertically scrolling list whose items fold into a card pile at the top and
//! the bottom edge instead of scrolling off-screen.
//!
//! ```
//! use stackfold_layout::{AmbientState, StackEntry, StackLayoutConfig, StackScrollAlgorithm};
//!
//! let engine = StackScrollAlgorithm::new(StackLayoutConfig::default()).unwrap();
//! let items: Vec<_> = (0..5).map(|id| StackEntry::new(id, 100)).collect();
//! let out = engine.compute(&items, &AmbientState::new(800).scroll_y(120));
//! assert_eq!(out.order().len(), 5);
//! ```

pub mod algorithm;
pub mod ambient;
pub mod config;
pub mod debug;
pub mod error;
pub mod indentation;
pub mod item;
pub mod state;
pub mod transition;
mod visible;

pub use algorithm::StackScrollAlgorithm;
pub use ambient::AmbientState;
pub use config::{PaddingState, StackLayoutConfig};
pub use debug::{PassRecord, StackDebugger};
pub use error::ConfigError;
pub use indentation::IndentationFunctor;
pub use item::{ItemId, NestedChild, NestedItems, OverlayInfo, StackEntry, StackItem};
pub use state::{GeometricState, PassSummary, StackLocation, StackScrollState};
pub use transition::{ExpansionTransition, FirstItemMaxHeight, PendingMeasurement};
