#![forbid(unsafe_code)]

//! Active navigation link tracking.
//!
//! The current section is the **last** section (in source order) whose top,
//! minus a lookahead, is at or above the scroll position. The lookahead lets
//! a section light up slightly before it reaches the top of the viewport.
//!
//! A link is active when its href is `#<current>`. Near the top of the page
//! the home link takes over: while `scroll_y < home_threshold`, home links are
//! the only active links.
//!
//! # Failure Modes
//!
//! None. Overlapping sections are a layout precondition; the scan still
//! returns the last qualifying one.

use terrasite_core::event::NodeId;
use terrasite_core::layout::{NavLinkRecord, SectionRecord};

/// Tuning for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSectionConfig {
    /// How far ahead of a section's top the section becomes current.
    pub lookahead: f64,
    /// Href of the home link.
    pub home_href: String,
    /// Home link wins while the scroll offset is below this.
    pub home_threshold: f64,
}

impl Default for ActiveSectionConfig {
    fn default() -> Self {
        Self {
            lookahead: 100.0,
            home_href: "index.html".to_owned(),
            home_threshold: 100.0,
        }
    }
}

/// Find the current section for a scroll position.
#[must_use]
pub fn current_section(
    sections: &[SectionRecord],
    scroll_y: f64,
    lookahead: f64,
) -> Option<&SectionRecord> {
    sections
        .iter()
        .filter(|section| scroll_y >= section.top - lookahead)
        .last()
}

/// Tracks the current section and which nav links are active.
#[derive(Debug, Clone, Default)]
pub struct ActiveSectionTracker {
    config: ActiveSectionConfig,
    current: Option<String>,
    active_links: Vec<NodeId>,
}

impl ActiveSectionTracker {
    /// Create a tracker.
    #[must_use]
    pub fn new(config: ActiveSectionConfig) -> Self {
        Self {
            config,
            current: None,
            active_links: Vec::new(),
        }
    }

    /// Recompute from a fresh layout snapshot.
    ///
    /// Returns `true` if the set of active links changed.
    pub fn update(
        &mut self,
        sections: &[SectionRecord],
        links: &[NavLinkRecord],
        scroll_y: f64,
    ) -> bool {
        self.current =
            current_section(sections, scroll_y, self.config.lookahead).map(|s| s.id.clone());

        let near_top = scroll_y < self.config.home_threshold
            && links.iter().any(|link| link.href == self.config.home_href);

        let active: Vec<NodeId> = links
            .iter()
            .filter(|link| self.is_active(link, near_top))
            .map(|link| link.id)
            .collect();

        if active == self.active_links {
            return false;
        }
        self.active_links = active;
        true
    }

    fn is_active(&self, link: &NavLinkRecord, near_top: bool) -> bool {
        if near_top {
            return link.href == self.config.home_href;
        }
        match (&self.current, link.href.strip_prefix('#')) {
            (Some(current), Some(fragment)) => fragment == current,
            _ => false,
        }
    }

    /// Identifier of the current section, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Links currently marked active, in layout order.
    #[must_use]
    pub fn active_links(&self) -> &[NodeId] {
        &self.active_links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionRecord> {
        vec![
            SectionRecord::new("a", 0.0, 500.0),
            SectionRecord::new("b", 500.0, 500.0),
        ]
    }

    fn links() -> Vec<NavLinkRecord> {
        vec![
            NavLinkRecord::new(NodeId(1), "index.html"),
            NavLinkRecord::new(NodeId(2), "#a"),
            NavLinkRecord::new(NodeId(3), "#b"),
        ]
    }

    #[test]
    fn resolves_second_section_mid_page() {
        let s = sections();
        assert_eq!(current_section(&s, 550.0, 100.0).map(|s| s.id.as_str()), Some("b"));
    }

    #[test]
    fn resolves_first_section_at_top() {
        let s = sections();
        assert_eq!(current_section(&s, 0.0, 100.0).map(|s| s.id.as_str()), Some("a"));
    }

    #[test]
    fn lookahead_pre_highlights_next_section() {
        let s = sections();
        assert_eq!(current_section(&s, 400.0, 100.0).map(|s| s.id.as_str()), Some("b"));
        assert_eq!(current_section(&s, 399.0, 100.0).map(|s| s.id.as_str()), Some("a"));
    }

    #[test]
    fn nothing_qualifies_above_first_section() {
        let s = vec![SectionRecord::new("late", 1000.0, 200.0)];
        assert!(current_section(&s, 0.0, 100.0).is_none());
        assert!(current_section(&[], 0.0, 100.0).is_none());
    }

    #[test]
    fn overscroll_marks_home_link_only() {
        let mut tracker = ActiveSectionTracker::default();
        tracker.update(&sections(), &links(), -10.0);
        assert_eq!(tracker.active_links(), &[NodeId(1)]);
    }

    #[test]
    fn home_link_overrides_section_match_near_top() {
        let mut tracker = ActiveSectionTracker::default();
        tracker.update(&sections(), &links(), 0.0);
        assert_eq!(tracker.current(), Some("a"));
        assert_eq!(tracker.active_links(), &[NodeId(1)]);
    }

    #[test]
    fn fragment_link_active_past_home_threshold() {
        let mut tracker = ActiveSectionTracker::default();
        assert!(tracker.update(&sections(), &links(), 550.0));
        assert_eq!(tracker.active_links(), &[NodeId(3)]);
        assert!(!tracker.update(&sections(), &links(), 560.0));
    }

    #[test]
    fn without_home_link_section_match_applies_at_top() {
        let mut tracker = ActiveSectionTracker::default();
        let links = vec![
            NavLinkRecord::new(NodeId(2), "#a"),
            NavLinkRecord::new(NodeId(3), "#b"),
        ];
        tracker.update(&sections(), &links, 0.0);
        assert_eq!(tracker.active_links(), &[NodeId(2)]);
    }

    #[test]
    fn no_current_section_means_no_fragment_link() {
        let mut tracker = ActiveSectionTracker::default();
        let s = vec![SectionRecord::new("late", 1000.0, 200.0)];
        tracker.update(&s, &links(), 300.0);
        assert!(tracker.active_links().is_empty());
        assert_eq!(tracker.current(), None);
    }
}
