#![forbid(unsafe_code)]

//! Pass debugging utilities.
//!
//! Provides introspection into layout passes:
//! - Recording of the scratch summary each pass ended with
//! - Per-item location tags and hidden-item counts
//! - A human-readable report
//!
//! # Feature Gating
//!
//! This module is always compiled (the types are useful for testing),
//! but recording is a no-op unless explicitly enabled at runtime.
//!
//! # Usage
//!
//! ```ignore
//! use stackfold_layout::debug::StackDebugger;
//!
//! let debugger = StackDebugger::new();
//! debugger.set_enabled(true);
//! let engine = StackScrollAlgorithm::new(config)?.with_debugger(debugger.clone());
//!
//! // ... run passes ...
//!
//! print!("{}", debugger.report());
//! ```

use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::item::ItemId;
use crate::state::{PassSummary, StackLocation, StackScrollState};

/// A record of a single layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassRecord {
    /// Number of visible items laid out.
    pub item_count: usize,
    /// Scratch values the pass ended with.
    pub summary: PassSummary,
    /// Location of every visible item, in pass order.
    pub locations: Vec<(ItemId, StackLocation)>,
    /// Visible items that ended fully transparent.
    pub hidden_items: usize,
    /// Time taken by the pass (if measured).
    pub solve_time: Option<Duration>,
}

impl PassRecord {
    /// Capture a finished pass.
    #[must_use]
    pub fn from_state(state: &StackScrollState, solve_time: Option<Duration>) -> Self {
        let locations: Vec<_> = state.iter().map(|(id, s)| (id, s.location)).collect();
        let hidden_items = state.iter().filter(|(_, s)| s.alpha == 0.0).count();
        Self {
            item_count: locations.len(),
            summary: *state.summary(),
            locations,
            hidden_items,
            solve_time,
        }
    }

    /// How many items ended in `location`.
    #[must_use]
    pub fn count(&self, location: StackLocation) -> usize {
        self.locations
            .iter()
            .filter(|(_, tag)| *tag == location)
            .count()
    }

    /// Generate a human-readable summary.
    #[must_use]
    pub fn summary_text(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(
            s,
            "pass: {} items, scroll {}",
            self.item_count, self.summary.scroll_y
        );
        let _ = writeln!(
            s,
            "  top stack: {:.2} items (partial {:.2}, last index {})",
            self.summary.items_in_top_stack,
            self.summary.partial_in_top,
            self.summary.last_top_stack_index
        );
        let _ = writeln!(
            s,
            "  bottom stack: {:.2} items (partial {:.2})",
            self.summary.items_in_bottom_stack, self.summary.partial_in_bottom
        );
        for location in StackLocation::ALL {
            let count = self.count(location);
            if count > 0 {
                let _ = writeln!(s, "  {location}: {count}");
            }
        }
        if self.hidden_items > 0 {
            let _ = writeln!(s, "  hidden: {}", self.hidden_items);
        }
        if let Some(t) = self.solve_time {
            let _ = writeln!(s, "  Solve time: {:?}", t);
        }
        s
    }
}

/// Layout pass debugger.
///
/// Collects pass records for introspection. Thread-safe via internal
/// synchronization; can be shared with the engine through an `Arc`.
#[derive(Debug)]
pub struct StackDebugger {
    enabled: AtomicBool,
    records: Mutex<Vec<PassRecord>>,
}

impl StackDebugger {
    /// Create a new debugger wrapped in Arc (disabled by default).
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            enabled: AtomicBool::new(false),
            records: Mutex::new(Vec::new()),
        })
    }

    /// Check if debugging is enabled.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Toggle debugging on/off. Returns the new state.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::Relaxed)
    }

    /// Clear all recorded data.
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }

    /// Record a pass.
    pub fn record(&self, record: PassRecord) {
        if !self.enabled() {
            return;
        }
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    /// Get a snapshot of all pass records.
    pub fn snapshot(&self) -> Vec<PassRecord> {
        self.records
            .lock()
            .ok()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Generate a summary report of all recorded passes.
    pub fn report(&self) -> String {
        let records = self.snapshot();

        let mut s = String::new();
        let _ = writeln!(s, "=== Stack Debug Report ({} passes) ===", records.len());

        let fading: Vec<_> = records.iter().filter(|r| r.hidden_items > 0).collect();
        if !fading.is_empty() {
            let _ = writeln!(s, "\n{} passes hide items:", fading.len());
            for r in &fading {
                let _ = writeln!(s, "  - {} of {} hidden", r.hidden_items, r.item_count);
            }
        }

        for record in &records {
            let _ = write!(s, "\n{}", record.summary_text());
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GeometricState;

    fn record(locations: &[StackLocation], hidden_items: usize) -> PassRecord {
        PassRecord {
            item_count: locations.len(),
            summary: PassSummary::default(),
            locations: locations
                .iter()
                .enumerate()
                .map(|(i, l)| (ItemId(i as u64), *l))
                .collect(),
            hidden_items,
            solve_time: None,
        }
    }

    #[test]
    fn debugger_disabled_by_default() {
        let debugger = StackDebugger::new();
        assert!(!debugger.enabled());
    }

    #[test]
    fn debugger_toggle() {
        let debugger = StackDebugger::new();
        assert!(debugger.toggle());
        assert!(debugger.enabled());
        assert!(!debugger.toggle());
        assert!(!debugger.enabled());
    }

    #[test]
    fn debugger_record_when_disabled() {
        let debugger = StackDebugger::new();
        debugger.record(record(&[StackLocation::FirstCard], 0));
        assert!(debugger.snapshot().is_empty());
    }

    #[test]
    fn debugger_record_and_clear() {
        let debugger = StackDebugger::new();
        debugger.set_enabled(true);
        debugger.record(record(&[StackLocation::FirstCard], 0));
        debugger.record(record(&[StackLocation::FirstCard], 0));
        assert_eq!(debugger.snapshot().len(), 2);
        debugger.clear();
        assert!(debugger.snapshot().is_empty());
    }

    #[test]
    fn record_from_state() {
        let mut out = StackScrollState::default();
        let mut hidden = GeometricState::initial(100, 1);
        hidden.alpha = 0.0;
        hidden.location = StackLocation::TopStackHidden;
        let mut first = GeometricState::initial(100, 0);
        first.location = StackLocation::FirstCard;
        out.push_visible(ItemId(1), first);
        out.push_visible(ItemId(2), hidden);

        let record = PassRecord::from_state(&out, Some(Duration::from_micros(3)));
        assert_eq!(record.item_count, 2);
        assert_eq!(record.hidden_items, 1);
        assert_eq!(record.count(StackLocation::TopStackHidden), 1);
        assert_eq!(record.locations[0], (ItemId(1), StackLocation::FirstCard));
    }

    #[test]
    fn summary_lists_locations() {
        let r = record(
            &[
                StackLocation::FirstCard,
                StackLocation::MainArea,
                StackLocation::MainArea,
            ],
            0,
        );
        let text = r.summary_text();
        assert!(text.contains("3 items"));
        assert!(text.contains("main: 2"));
        assert!(text.contains("first: 1"));
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn report_mentions_hidden_items() {
        let debugger = StackDebugger::new();
        debugger.set_enabled(true);
        debugger.record(record(&[StackLocation::BottomStackHidden], 1));
        let report = debugger.report();
        assert!(report.contains("1 passes"));
        assert!(report.contains("1 of 1 hidden"));
    }
}
