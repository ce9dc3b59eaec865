#![forbid(unsafe_code)]

//! Runtime: the page controller and the services it leans on.
//!
//! - [`page::PageController`] composes every widget controller over a
//!   [`Host`](terrasite_backend::Host), routes events, and presents one
//!   [`UiPatch`](terrasite_widgets::UiPatch) per event.
//! - [`action_log::ActionLogger`] keeps the newsletter and affiliate-click
//!   lists in the host's key-value store.
//! - [`config::PageConfig`] carries every threshold as data.
//! - `logging` (feature `logging`) installs a `tracing-subscriber`.

pub mod action_log;
pub mod config;
#[cfg(feature = "logging")]
pub mod logging;
pub mod page;

pub use action_log::{
    AFFILIATE_CLICKS_KEY, ActionLogError, ActionLogResult, ActionLogger, AffiliateClick,
    SUBSCRIBERS_KEY, SubscriptionOutcome, UNKNOWN_PRODUCT, is_valid_email,
};
pub use config::{
    ActiveSectionPolicy, AnchorPolicy, ChromePolicy, ConfigError, NotificationPolicy, PageConfig,
    RevealPolicy,
};
pub use page::{PageController, PageLayout, STORE_FAILURE_MESSAGE};
