#![forbid(unsafe_code)]

//! Core: canonical page events, layout records, and rate limiters.
//!
//! # Role in terrasite
//! `terrasite-core` is the input layer. It owns the normalized event types
//! that the host pushes (scroll, click, intersection, form submit) and the
//! host-clocked [`Debounce`](rate_limit::Debounce) and
//! [`Throttle`](rate_limit::Throttle) wrappers used to tame high-frequency
//! streams.
//!
//! # How it fits in the system
//! The widgets (`terrasite-widgets`) consume these types to compute visual
//! state, and the runtime (`terrasite-runtime`) routes [`Event`](event::Event)
//! values to them. Nothing here performs I/O or reads a clock: time is always
//! passed in by the caller.

pub mod event;
pub mod layout;
pub mod rate_limit;

pub use event::{ClickEvent, Element, ElementRole, Event, IntersectionEntry, NodeId, ScrollSnapshot};
pub use layout::{NavLinkRecord, SectionRecord};
pub use rate_limit::{Debounce, DebounceTimer, Throttle, ThrottleWindow};
