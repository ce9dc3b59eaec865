#![forbid(unsafe_code)]

//! The page's visual state as one value, and the patches between states.
//!
//! Controllers never mutate the DOM. After each event the runtime collects
//! their state into a [`UiState`], diffs it against the previous one, and
//! hands the resulting [`UiPatch`] to the host. The host applies class
//! toggles and effects and nothing else.
//!
//! # Invariants
//!
//! 1. `UiState::default().diff(&UiState::default())` is empty.
//! 2. Diffing is deterministic: changes come out in field order, and link and
//!    reveal changes in ascending node order.
//! 3. A notification change is either a removal, a show, an exit, or a
//!    removal followed by a show (eviction).

use std::collections::BTreeSet;

use terrasite_core::event::NodeId;

use crate::chrome::ChromeFlags;
use crate::menu::MenuState;
use crate::notification_queue::{Notification, NotificationId, NotificationPhase, Severity};

/// What the host needs to render a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    /// Identifier.
    pub id: NotificationId,
    /// Text content.
    pub message: String,
    /// Severity, for class name and colour.
    pub severity: Severity,
    /// Lifecycle phase.
    pub phase: NotificationPhase,
}

impl From<&Notification> for NotificationView {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            message: n.message.clone(),
            severity: n.severity,
            phase: n.phase,
        }
    }
}

/// Every visual flag the page controllers own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    /// `<body>` carries `loaded`.
    pub body_loaded: bool,
    /// Header and back-to-top toggles.
    pub chrome: ChromeFlags,
    /// Hero background translation in pixels.
    pub hero_offset: Option<f64>,
    /// Mobile navigation state.
    pub menu: MenuState,
    /// Nav links carrying `active`.
    pub active_links: BTreeSet<NodeId>,
    /// Animated elements carrying `in-view`.
    pub revealed: BTreeSet<NodeId>,
    /// The toast on screen.
    pub notification: Option<NotificationView>,
}

/// One visual change.
#[derive(Debug, Clone, PartialEq)]
pub enum UiChange {
    /// Add `loaded` to `<body>`.
    BodyLoaded,
    /// Toggle `scrolled` on the header.
    HeaderScrolled(bool),
    /// Toggle `show` on the back-to-top button.
    BackToTopVisible(bool),
    /// Set the hero background's `translateY`.
    HeroOffset(f64),
    /// Toggle `active` on the nav menu and its toggle.
    MenuOpen(bool),
    /// Toggle `active` on a nav link.
    NavLinkActive {
        /// The link.
        link: NodeId,
        /// New state.
        active: bool,
    },
    /// Add `in-view` to an animated element.
    Revealed(NodeId),
    /// Render a notification with its entrance animation.
    NotificationShown(NotificationView),
    /// Start a notification's exit animation.
    NotificationExiting(NotificationId),
    /// Remove a notification element.
    NotificationRemoved(NotificationId),
}

impl UiChange {
    /// CSS class this change toggles, when it is a class toggle.
    #[must_use]
    pub const fn class_name(&self) -> Option<&'static str> {
        match self {
            Self::BodyLoaded => Some("loaded"),
            Self::HeaderScrolled(_) => Some("scrolled"),
            Self::BackToTopVisible(_) => Some("show"),
            Self::MenuOpen(_) | Self::NavLinkActive { .. } => Some("active"),
            Self::Revealed(_) => Some("in-view"),
            Self::HeroOffset(_)
            | Self::NotificationShown(_)
            | Self::NotificationExiting(_)
            | Self::NotificationRemoved(_) => None,
        }
    }
}

/// One-shot side effects that are not state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Scroll the window.
    ScrollTo {
        /// Document offset.
        top: f64,
        /// Animate the scroll.
        smooth: bool,
    },
    /// Call `preventDefault()` on the current event.
    PreventDefault,
    /// Clear the email input of a newsletter form.
    ClearInput(NodeId),
}

/// Changes plus effects for one handled event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiPatch {
    /// Visual changes, in application order.
    pub changes: Vec<UiChange>,
    /// Side effects, in emission order.
    pub effects: Vec<Effect>,
}

impl UiPatch {
    /// Whether the patch does nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.effects.is_empty()
    }
}

impl UiState {
    /// Changes that turn `self` into `next`.
    #[must_use]
    pub fn diff(&self, next: &UiState) -> Vec<UiChange> {
        let mut changes = Vec::new();

        if next.body_loaded && !self.body_loaded {
            changes.push(UiChange::BodyLoaded);
        }

        let scrolled = next.chrome.contains(ChromeFlags::HEADER_SCROLLED);
        if scrolled != self.chrome.contains(ChromeFlags::HEADER_SCROLLED) {
            changes.push(UiChange::HeaderScrolled(scrolled));
        }
        let back_to_top = next.chrome.contains(ChromeFlags::BACK_TO_TOP_VISIBLE);
        if back_to_top != self.chrome.contains(ChromeFlags::BACK_TO_TOP_VISIBLE) {
            changes.push(UiChange::BackToTopVisible(back_to_top));
        }

        if let Some(offset) = next.hero_offset
            && self.hero_offset != Some(offset)
        {
            changes.push(UiChange::HeroOffset(offset));
        }

        if next.menu != self.menu {
            changes.push(UiChange::MenuOpen(next.menu.is_open()));
        }

        for &link in self.active_links.difference(&next.active_links) {
            changes.push(UiChange::NavLinkActive {
                link,
                active: false,
            });
        }
        for &link in next.active_links.difference(&self.active_links) {
            changes.push(UiChange::NavLinkActive { link, active: true });
        }

        for &element in next.revealed.difference(&self.revealed) {
            changes.push(UiChange::Revealed(element));
        }

        match (&self.notification, &next.notification) {
            (Some(old), Some(new)) if old.id == new.id => {
                if old.phase != new.phase && new.phase == NotificationPhase::Exiting {
                    changes.push(UiChange::NotificationExiting(new.id));
                }
            }
            (old, new) => {
                if let Some(old) = old {
                    changes.push(UiChange::NotificationRemoved(old.id));
                }
                if let Some(new) = new {
                    changes.push(UiChange::NotificationShown(new.clone()));
                    if new.phase == NotificationPhase::Exiting {
                        changes.push(UiChange::NotificationExiting(new.id));
                    }
                }
            }
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view(id: u64, message: &str, phase: NotificationPhase) -> NotificationView {
        NotificationView {
            id: NotificationId::new(id),
            message: message.to_owned(),
            severity: Severity::Info,
            phase,
        }
    }

    #[test]
    fn identical_states_produce_no_changes() {
        let state = UiState::default();
        assert!(state.diff(&state.clone()).is_empty());
    }

    #[test]
    fn chrome_and_menu_changes_in_field_order() {
        let before = UiState::default();
        let after = UiState {
            body_loaded: true,
            chrome: ChromeFlags::HEADER_SCROLLED,
            hero_offset: Some(40.0),
            menu: MenuState::Open,
            ..UiState::default()
        };
        assert_eq!(
            before.diff(&after),
            vec![
                UiChange::BodyLoaded,
                UiChange::HeaderScrolled(true),
                UiChange::HeroOffset(40.0),
                UiChange::MenuOpen(true),
            ]
        );
    }

    #[test]
    fn nav_link_switch_deactivates_then_activates() {
        let before = UiState {
            active_links: BTreeSet::from([NodeId(1)]),
            ..UiState::default()
        };
        let after = UiState {
            active_links: BTreeSet::from([NodeId(3)]),
            ..UiState::default()
        };
        assert_eq!(
            before.diff(&after),
            vec![
                UiChange::NavLinkActive {
                    link: NodeId(1),
                    active: false
                },
                UiChange::NavLinkActive {
                    link: NodeId(3),
                    active: true
                },
            ]
        );
    }

    #[test]
    fn frozen_hero_offset_emits_nothing() {
        let before = UiState {
            hero_offset: Some(100.0),
            ..UiState::default()
        };
        assert!(before.diff(&before.clone()).is_empty());
    }

    #[test]
    fn eviction_removes_then_shows() {
        let before = UiState {
            notification: Some(view(1, "old", NotificationPhase::Shown)),
            ..UiState::default()
        };
        let after = UiState {
            notification: Some(view(2, "new", NotificationPhase::Shown)),
            ..UiState::default()
        };
        assert_eq!(
            before.diff(&after),
            vec![
                UiChange::NotificationRemoved(NotificationId::new(1)),
                UiChange::NotificationShown(view(2, "new", NotificationPhase::Shown)),
            ]
        );
    }

    #[test]
    fn exit_phase_is_reported_once() {
        let shown = UiState {
            notification: Some(view(1, "x", NotificationPhase::Shown)),
            ..UiState::default()
        };
        let exiting = UiState {
            notification: Some(view(1, "x", NotificationPhase::Exiting)),
            ..UiState::default()
        };
        assert_eq!(
            shown.diff(&exiting),
            vec![UiChange::NotificationExiting(NotificationId::new(1))]
        );
        assert!(exiting.diff(&exiting.clone()).is_empty());
    }

    #[test]
    fn class_names_match_stylesheet() {
        assert_eq!(UiChange::Revealed(NodeId(1)).class_name(), Some("in-view"));
        assert_eq!(UiChange::BackToTopVisible(true).class_name(), Some("show"));
        assert_eq!(UiChange::HeroOffset(1.0).class_name(), None);
    }
}
