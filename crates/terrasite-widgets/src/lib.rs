#![forbid(unsafe_code)]

//! Page controllers for terrasite.
//!
//! Each module owns one visual concern and exposes plain state plus the
//! operations that change it. None of them touch the DOM or a clock: the
//! runtime feeds them events and `now`, then renders their state through
//! [`ui_state::UiState`].

pub mod active_section;
pub mod anchor;
pub mod chrome;
pub mod menu;
pub mod notification_queue;
pub mod reveal;
pub mod ui_state;

pub use active_section::{ActiveSectionConfig, ActiveSectionTracker, current_section};
pub use anchor::{AnchorOutcome, resolve_anchor};
pub use chrome::{ChromeConfig, ChromeController, ChromeFeatures, ChromeFlags};
pub use menu::{ClickTarget, MenuController, MenuState, MenuTransition};
pub use notification_queue::{
    Notification, NotificationId, NotificationPhase, NotificationQueue, QueueAction, QueueConfig,
    QueueStats, Severity,
};
pub use reveal::{IntersectionOptions, RevealTracker};
pub use ui_state::{Effect, NotificationView, UiChange, UiPatch, UiState};
