#![forbid(unsafe_code)]

//! terrasite public facade crate.
//!
//! This crate re-exports the page controllers, the runtime, and (with the
//! default `web` feature) the headless host, and offers a prelude for the
//! common case of driving one page:
//!
//! ```rust,ignore
//! use terrasite::prelude::*;
//!
//! let mut page = PageController::with_defaults(WebHost::new());
//! page.attach(layout);
//! page.handle(Event::Load(None))?;
//! ```

pub mod error;

pub use error::{DegradationAction, Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use terrasite_core::event::{
    ClickEvent, Element, ElementRole, Event, IntersectionEntry, NodeId, ScrollSnapshot,
};
pub use terrasite_core::layout::{NavLinkRecord, SectionRecord};
pub use terrasite_core::rate_limit::{Debounce, Throttle};

// --- Backend re-exports ----------------------------------------------------

pub use terrasite_backend::{Host, HostClock, KeyValueStore, StoreError, UiPresenter};

// --- Widget re-exports -----------------------------------------------------

pub use terrasite_widgets::{
    Effect, MenuState, NotificationQueue, Severity, UiChange, UiPatch, UiState,
};

// --- Runtime re-exports ----------------------------------------------------

pub use terrasite_runtime::{
    ActionLogger, PageConfig, PageController, PageLayout, SubscriptionOutcome,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use terrasite_web::{DeterministicClock, MemoryStore, WebHost};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ClickEvent, Effect, Element, ElementRole, Error, Event, Host, KeyValueStore, NodeId,
        PageConfig, PageController, PageLayout, Result, ScrollSnapshot, Severity, UiChange,
        UiPatch,
    };

    #[cfg(feature = "web")]
    pub use crate::{MemoryStore, WebHost};

    pub use crate::{backend, core, runtime, widgets};
}

pub use terrasite_backend as backend;
pub use terrasite_core as core;
pub use terrasite_runtime as runtime;
#[cfg(feature = "web")]
pub use terrasite_web as web;
pub use terrasite_widgets as widgets;
