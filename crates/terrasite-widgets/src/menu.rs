#![forbid(unsafe_code)]

//! Mobile navigation open/closed state machine.
//!
//! # State Machine
//!
//! ```text
//!            toggle click
//!   Closed ───────────────▶ Open
//!     ▲                      │
//!     └──────────────────────┘
//!      toggle click | nav link click | click outside menu and toggle
//! ```
//!
//! # Invariants
//!
//! 1. Initial state is `Closed`; there is no terminal state.
//! 2. Every click is classified exactly once, so at most one transition runs
//!    per user action.
//! 3. Classification uses containment over the click path, so clicks on
//!    markup nested inside the toggle or menu are attributed correctly.

use terrasite_core::event::{ClickEvent, ElementRole};

/// Whether the mobile navigation is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuState {
    /// Navigation hidden.
    #[default]
    Closed,
    /// Navigation shown.
    Open,
}

impl MenuState {
    /// The other state.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    /// Whether this is [`MenuState::Open`].
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Where a click landed, relative to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// On or inside the toggle button.
    Toggle,
    /// On or inside a navigation link.
    NavLink,
    /// Inside the navigation container, but not on a link.
    InsideMenu,
    /// Anywhere else.
    Outside,
}

impl ClickTarget {
    /// Classify a click by containment. The toggle wins over everything else.
    #[must_use]
    pub fn classify(click: &ClickEvent) -> Self {
        if click.is_within(ElementRole::MenuToggle) {
            Self::Toggle
        } else if click.is_within(ElementRole::NavLink) {
            Self::NavLink
        } else if click.is_within(ElementRole::NavMenu) {
            Self::InsideMenu
        } else {
            Self::Outside
        }
    }
}

/// A state change caused by one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuTransition {
    /// State before the click.
    pub from: MenuState,
    /// State after the click.
    pub to: MenuState,
    /// What the click hit.
    pub cause: ClickTarget,
}

/// Mobile navigation controller.
#[derive(Debug, Clone, Default)]
pub struct MenuController {
    state: MenuState,
}

impl MenuController {
    /// Create a controller in the `Closed` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.state
    }

    /// Whether the menu is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Apply a click. Returns the transition if the state changed.
    pub fn on_click(&mut self, click: &ClickEvent) -> Option<MenuTransition> {
        let cause = ClickTarget::classify(click);
        let next = match cause {
            ClickTarget::Toggle => self.state.flipped(),
            ClickTarget::NavLink => MenuState::Closed,
            ClickTarget::Outside if self.state.is_open() => MenuState::Closed,
            ClickTarget::Outside | ClickTarget::InsideMenu => self.state,
        };
        if next == self.state {
            return None;
        }
        let transition = MenuTransition {
            from: self.state,
            to: next,
            cause,
        };
        self.state = next;
        Some(transition)
    }
}
