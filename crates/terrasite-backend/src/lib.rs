#![forbid(unsafe_code)]
#![doc = "Host boundary traits for terrasite: time, persistence, and presentation."]
#![doc = ""]
#![doc = "This crate defines the boundary between the page runtime and whatever hosts it"]
#![doc = "(a browser through `terrasite-wasm`, or the headless `terrasite-web` host in tests)."]

use core::fmt;
use core::time::Duration;

use chrono::{DateTime, Utc};
use terrasite_widgets::ui_state::UiPatch;

/// Clock abstraction.
///
/// The runtime never calls `Instant::now()` or `Utc::now()` directly; all time
/// flows through this trait so hosts can drive it deterministically.
pub trait HostClock {
    /// Elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;

    /// Current wall-clock time, for record timestamps.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Errors from a [`KeyValueStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage medium is missing or refused access.
    Unavailable(String),
    /// The write would exceed the medium's quota.
    QuotaExceeded {
        /// Key being written.
        key: String,
    },
    /// A stored value could not be decoded.
    Corrupt {
        /// Key holding the bad value.
        key: String,
        /// Decoder message.
        detail: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            Self::QuotaExceeded { key } => write!(f, "storage quota exceeded writing {key:?}"),
            Self::Corrupt { key, detail } => write!(f, "stored value for {key:?} is corrupt: {detail}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// String-keyed, string-valued persistent store (`localStorage` semantics).
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

/// Presentation abstraction: applies UI patches to the real page.
pub trait UiPresenter {
    /// Platform-specific error type.
    type Error: fmt::Debug + fmt::Display;

    /// Apply one patch.
    fn present(&mut self, patch: &UiPatch) -> Result<(), Self::Error>;
}

/// Unified host combining clock, store, and presenter.
///
/// `PageController` is generic over this trait. Concrete implementations:
/// - `terrasite-web`: headless, host-driven, deterministic.
/// - `terrasite-wasm`: browser `localStorage` and JS patch consumer.
pub trait Host {
    /// Platform-specific presenter error type.
    type Error: fmt::Debug + fmt::Display;

    /// Clock implementation.
    type Clock: HostClock;

    /// Store implementation.
    type Store: KeyValueStore;

    /// Presenter implementation.
    type Presenter: UiPresenter<Error = Self::Error>;

    /// Access the clock.
    fn clock(&self) -> &Self::Clock;

    /// Access the store.
    fn store(&mut self) -> &mut Self::Store;

    /// Access the presenter.
    fn presenter(&mut self) -> &mut Self::Presenter;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Mock implementations for trait testing

    struct TestClock {
        elapsed: Duration,
    }

    impl HostClock for TestClock {
        fn now_mono(&self) -> Duration {
            self.elapsed
        }

        fn now_utc(&self) -> DateTime<Utc> {
            let millis = i64::try_from(self.elapsed.as_millis()).unwrap_or(i64::MAX);
            DateTime::from_timestamp_millis(millis).unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct TestStore {
        values: HashMap<String, String>,
        read_only: bool,
    }

    impl KeyValueStore for TestStore {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            Ok(self.values.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
            if self.read_only {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_owned(),
                });
            }
            self.values.insert(key.to_owned(), value.to_owned());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct TestError(String);

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "TestError: {}", self.0)
        }
    }

    #[derive(Default)]
    struct TestPresenter {
        patches: Vec<UiPatch>,
    }

    impl UiPresenter for TestPresenter {
        type Error = TestError;

        fn present(&mut self, patch: &UiPatch) -> Result<(), Self::Error> {
            self.patches.push(patch.clone());
            Ok(())
        }
    }

    struct TestHost {
        clock: TestClock,
        store: TestStore,
        presenter: TestPresenter,
    }

    impl Host for TestHost {
        type Error = TestError;
        type Clock = TestClock;
        type Store = TestStore;
        type Presenter = TestPresenter;

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

    fn make_test_host() -> TestHost {
        TestHost {
            clock: TestClock {
                elapsed: Duration::from_millis(1500),
            },
            store: TestStore::default(),
            presenter: TestPresenter::default(),
        }
    }

    #[test]
    fn clock_returns_elapsed() {
        let host = make_test_host();
        assert_eq!(host.clock().now_mono(), Duration::from_millis(1500));
        assert_eq!(host.clock().now_utc().timestamp_millis(), 1500);
    }

    #[test]
    fn store_round_trips_through_host() {
        let mut host = make_test_host();
        assert_eq!(host.store().get("k"), Ok(None));
        host.store().set("k", "v").unwrap();
        assert_eq!(host.store().get("k"), Ok(Some("v".to_owned())));
    }

    #[test]
    fn store_errors_surface() {
        let mut store = TestStore {
            read_only: true,
            ..TestStore::default()
        };
        let err = store.set("affiliate_clicks", "[]").unwrap_err();
        assert_eq!(err.to_string(), "storage quota exceeded writing \"affiliate_clicks\"");
    }

    fn write_through<S: KeyValueStore>(mut store: S) -> StoreResult<()> {
        store.set("a", "1")
    }

    #[test]
    fn mut_ref_store_delegates() {
        let mut store = TestStore::default();
        write_through(&mut store).unwrap();
        assert_eq!(store.get("a"), Ok(Some("1".to_owned())));
    }

    #[test]
    fn presenter_records_patches() {
        let mut host = make_test_host();
        host.presenter().present(&UiPatch::default()).unwrap();
        assert_eq!(host.presenter().patches.len(), 1);
    }

    #[test]
    fn corrupt_error_display() {
        let err = StoreError::Corrupt {
            key: "newsletter_subscribers".into(),
            detail: "expected value at line 1 column 1".into(),
        };
        assert!(err.to_string().contains("newsletter_subscribers"));
    }
}
