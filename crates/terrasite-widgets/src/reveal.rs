#![forbid(unsafe_code)]

//! One-shot "reveal on scroll" tracking.
//!
//! Elements marked for scroll animation start out pending. The first
//! intersection entry that reports an element as intersecting reveals it for
//! good: the element leaves the pending set, gains the `in-view` class, and is
//! never reconsidered.
//!
//! # Invariants
//!
//! 1. pending → revealed is the only transition; revealed is terminal.
//! 2. A non-intersecting entry never hides a revealed element.
//! 3. Entries for elements that were never observed are ignored.

use ahash::AHashSet;
use terrasite_core::event::{IntersectionEntry, NodeId};

/// Observer settings the host uses when wiring its intersection observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Bottom root margin in pixels; negative shrinks the viewport.
    pub root_margin_bottom_px: f64,
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin_bottom_px: -50.0,
        }
    }
}

impl IntersectionOptions {
    /// CSS `rootMargin` string (`top right bottom left`).
    #[must_use]
    pub fn root_margin(&self) -> String {
        format!("0px 0px {}px 0px", self.root_margin_bottom_px)
    }
}

/// Tracks which animated elements have been revealed.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    options: IntersectionOptions,
    pending: AHashSet<NodeId>,
    revealed: AHashSet<NodeId>,
}

impl RevealTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new(options: IntersectionOptions) -> Self {
        Self {
            options,
            pending: AHashSet::new(),
            revealed: AHashSet::new(),
        }
    }

    /// Start watching an element.
    ///
    /// Returns `false` if it is already pending or revealed.
    pub fn observe(&mut self, element: NodeId) -> bool {
        if self.revealed.contains(&element) {
            return false;
        }
        self.pending.insert(element)
    }

    /// Apply one batch of intersection entries.
    ///
    /// Returns the elements revealed by this batch, in entry order.
    pub fn on_intersections(&mut self, entries: &[IntersectionEntry]) -> Vec<NodeId> {
        entries
            .iter()
            .filter(|entry| entry.is_intersecting)
            .filter_map(|entry| {
                self.pending.remove(&entry.element).then(|| {
                    self.revealed.insert(entry.element);
                    entry.element
                })
            })
            .collect()
    }

    /// Whether an element has been revealed.
    #[must_use]
    pub fn is_revealed(&self, element: NodeId) -> bool {
        self.revealed.contains(&element)
    }

    /// Whether an element is still waiting to be revealed.
    #[must_use]
    pub fn is_pending(&self, element: NodeId) -> bool {
        self.pending.contains(&element)
    }

    /// Revealed elements, in no particular order.
    pub fn revealed(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.revealed.iter().copied()
    }

    /// Number of elements still waiting.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of revealed elements.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Observer settings.
    #[must_use]
    pub const fn options(&self) -> IntersectionOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(ids: &[u32]) -> RevealTracker {
        let mut tracker = RevealTracker::default();
        for &id in ids {
            tracker.observe(NodeId(id));
        }
        tracker
    }

    #[test]
    fn intersecting_entry_reveals() {
        let mut tracker = tracker_with(&[1, 2]);
        let revealed = tracker.on_intersections(&[IntersectionEntry::new(NodeId(1), true)]);
        assert_eq!(revealed, vec![NodeId(1)]);
        assert!(tracker.is_revealed(NodeId(1)));
        assert!(tracker.is_pending(NodeId(2)));
    }

    #[test]
    fn leaving_viewport_does_not_unreveal() {
        let mut tracker = tracker_with(&[1]);
        tracker.on_intersections(&[IntersectionEntry::new(NodeId(1), true)]);
        let revealed = tracker.on_intersections(&[IntersectionEntry::new(NodeId(1), false)]);
        assert!(revealed.is_empty());
        assert!(tracker.is_revealed(NodeId(1)));
    }

    #[test]
    fn revealed_element_does_not_fire_again() {
        let mut tracker = tracker_with(&[1]);
        tracker.on_intersections(&[IntersectionEntry::new(NodeId(1), true)]);
        let again = tracker.on_intersections(&[IntersectionEntry::new(NodeId(1), true)]);
        assert!(again.is_empty());
        assert!(!tracker.observe(NodeId(1)));
        assert_eq!(tracker.pending_count(), 0);
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let mut tracker = tracker_with(&[1]);
        let revealed = tracker.on_intersections(&[IntersectionEntry::new(NodeId(9), true)]);
        assert!(revealed.is_empty());
        assert_eq!(tracker.revealed_count(), 0);
    }

    #[test]
    fn batch_preserves_entry_order() {
        let mut tracker = tracker_with(&[1, 2, 3]);
        let revealed = tracker.on_intersections(&[
            IntersectionEntry::new(NodeId(3), true),
            IntersectionEntry::new(NodeId(2), false),
            IntersectionEntry::new(NodeId(1), true),
        ]);
        assert_eq!(revealed, vec![NodeId(3), NodeId(1)]);
    }

    #[test]
    fn default_options_match_observer_setup() {
        let options = IntersectionOptions::default();
        assert_eq!(options.threshold, 0.1);
        assert_eq!(options.root_margin(), "0px 0px -50px 0px");
    }
}
