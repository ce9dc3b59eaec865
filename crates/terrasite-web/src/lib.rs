#![forbid(unsafe_code)]

//! `terrasite-web` provides a headless, host-driven implementation of the
//! terrasite [`Host`] boundary.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes events and reads
//!   back patches.
//! - **Deterministic time**: the host advances both clocks explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The browser binding in `terrasite-wasm` reuses [`DeterministicClock`] and
//! [`RecordingPresenter`] and swaps in a `localStorage` store.

#[cfg(feature = "input-parser")]
pub mod input_parser;

use core::time::Duration;
use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use terrasite_backend::{Host, HostClock, KeyValueStore, StoreError, StoreResult, UiPresenter};
use terrasite_widgets::ui_state::UiPatch;

/// Web host error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebHostError {
    /// The presenter was closed (page unloaded) and accepts no more patches.
    Closed,
}

impl core::fmt::Display for WebHostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Closed => write!(f, "presenter closed"),
        }
    }
}

impl std::error::Error for WebHostError {}

/// Deterministic clocks controlled by the host.
///
/// Monotonic time starts at zero; wall time is `wall_origin` plus the
/// monotonic reading.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
    wall_origin: DateTime<Utc>,
}

impl DeterministicClock {
    /// Create a clock at `0` whose wall time starts at the Unix epoch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock whose wall time starts at `origin`.
    #[must_use]
    pub fn with_wall_origin(origin: DateTime<Utc>) -> Self {
        Self {
            now: Duration::ZERO,
            wall_origin: origin,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Move the wall clock origin (for hosts that sync to `Date.now()`).
    pub fn set_wall_origin(&mut self, origin: DateTime<Utc>) {
        self.wall_origin = origin;
    }
}

impl HostClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }

    fn now_utc(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.now)
            .ok()
            .and_then(|dt| self.wall_origin.checked_add_signed(dt))
            .unwrap_or(self.wall_origin)
    }
}

/// In-memory key-value store with an optional byte quota.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes past `bytes` in total.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: BTreeMap::new(),
            quota_bytes: Some(bytes),
        }
    }

    /// Write a raw value, bypassing the quota.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Read a raw value.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Total bytes of keys and values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.values.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(quota) = self.quota_bytes {
            let previous = self.values.get(key).map_or(0, |v| key.len() + v.len());
            let after = self.used_bytes() - previous + key.len() + value.len();
            if after > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_owned(),
                });
            }
        }
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Presenter that keeps every patch for the host to drain.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    patches: Vec<UiPatch>,
    closed: bool,
}

impl RecordingPresenter {
    /// Create an open presenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Patches presented since the last [`take_patches`](Self::take_patches).
    #[must_use]
    pub fn patches(&self) -> &[UiPatch] {
        &self.patches
    }

    /// Drain recorded patches.
    pub fn take_patches(&mut self) -> Vec<UiPatch> {
        std::mem::take(&mut self.patches)
    }

    /// Refuse further patches.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl UiPresenter for RecordingPresenter {
    type Error = WebHostError;

    fn present(&mut self, patch: &UiPatch) -> Result<(), Self::Error> {
        if self.closed {
            return Err(WebHostError::Closed);
        }
        self.patches.push(patch.clone());
        Ok(())
    }
}

/// A headless host, generic over its store.
///
/// This host is intended to be driven by tests or a JS shim:
/// - advance time via [`Self::clock_mut`]
/// - inspect persistence via [`Self::store_mut`]
/// - drain patches via [`Self::presenter_mut`]
#[derive(Debug, Clone, Default)]
pub struct WebHost<S = MemoryStore> {
    clock: DeterministicClock,
    store: S,
    presenter: RecordingPresenter,
}

impl WebHost<MemoryStore> {
    /// Create a host with an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl<S: KeyValueStore> WebHost<S> {
    /// Create a host over `store`.
    #[must_use]
    pub fn with_store(store: S) -> Self {
        Self {
            clock: DeterministicClock::new(),
            store,
            presenter: RecordingPresenter::new(),
        }
    }

    /// Mutably access the clock.
    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    /// Mutably access the store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Mutably access the presenter.
    pub fn presenter_mut(&mut self) -> &mut RecordingPresenter {
        &mut self.presenter
    }
}

impl<S: KeyValueStore> Host for WebHost<S> {
    type Error = WebHostError;

    type Clock = DeterministicClock;
    type Store = S;
    type Presenter = RecordingPresenter;

    fn clock(&self) -> &Self::Clock {
        &self.clock
    }

    fn store(&mut self) -> &mut Self::Store {
        &mut self.store
    }

    fn presenter(&mut self) -> &mut Self::Presenter {
        &mut self.presenter
    }
}
