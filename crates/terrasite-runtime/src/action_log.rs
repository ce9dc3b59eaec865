#![forbid(unsafe_code)]

//! Client-local logging of newsletter signups and affiliate clicks.
//!
//! Both logs are JSON arrays stored whole under a fixed key. Every write is
//! a read-modify-write of the full array inside one `&mut self` call; a
//! logger shared across threads must sit behind a `Mutex`.
//!
//! # Invariants
//!
//! 1. The subscriber list never holds the same (trimmed) email twice.
//! 2. Both lists are append-only and keep insertion order.
//! 3. A stored value that does not decode is reported, never overwritten.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use terrasite_backend::{KeyValueStore, StoreError};
use terrasite_widgets::notification_queue::Severity;

/// Store key of the subscriber list.
pub const SUBSCRIBERS_KEY: &str = "newsletter_subscribers";

/// Store key of the affiliate click log.
pub const AFFILIATE_CLICKS_KEY: &str = "affiliate_clicks";

/// Product name recorded when a link carries none.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Syntactic email check: non-whitespace `@` non-whitespace `.` non-whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Result of a newsletter signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    /// Stored.
    Success,
    /// Already on the list; nothing written.
    Duplicate,
    /// Failed the syntax check; nothing written.
    Invalid,
}

impl SubscriptionOutcome {
    /// Text shown to the visitor.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Success => "Success! You'll be notified when we publish new content.",
            Self::Duplicate => "This email is already subscribed!",
            Self::Invalid => "Please enter a valid email address.",
        }
    }

    /// Toast severity for this outcome.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::Success => Severity::Success,
            Self::Duplicate => Severity::Info,
            Self::Invalid => Severity::Error,
        }
    }
}

/// One affiliate link click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateClick {
    /// Product name from the link.
    pub product: String,
    /// Link target.
    pub url: String,
    /// When the click happened, stored as RFC 3339 with milliseconds.
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
}

fn serialize_millis<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Errors from the action logger.
#[derive(Debug)]
pub enum ActionLogError {
    /// The store failed or held an undecodable value.
    Store(StoreError),
    /// A list could not be encoded for writing.
    Encode(serde_json::Error),
}

impl std::fmt::Display for ActionLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(e) => write!(f, "action log store error: {e}"),
            Self::Encode(e) => write!(f, "action log encode error: {e}"),
        }
    }
}

impl std::error::Error for ActionLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<StoreError> for ActionLogError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Result type for action logger operations.
pub type ActionLogResult<T> = Result<T, ActionLogError>;

/// Appends user actions to store-backed lists.
#[derive(Debug)]
pub struct ActionLogger<S> {
    store: S,
}

impl<S: KeyValueStore> ActionLogger<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a newsletter signup.
    ///
    /// The email is trimmed before validation and storage.
    pub fn record_subscription(&mut self, email: &str) -> ActionLogResult<SubscriptionOutcome> {
        let email = email.trim();
        if !is_valid_email(email) {
            tracing::debug!(outcome = "invalid", "newsletter signup rejected");
            return Ok(SubscriptionOutcome::Invalid);
        }

        let mut subscribers: Vec<String> = self.read_list(SUBSCRIBERS_KEY)?;
        if subscribers.iter().any(|existing| existing == email) {
            tracing::debug!(outcome = "duplicate", "newsletter signup already present");
            return Ok(SubscriptionOutcome::Duplicate);
        }

        subscribers.push(email.to_owned());
        self.write_list(SUBSCRIBERS_KEY, &subscribers)?;
        tracing::info!(
            outcome = "success",
            subscribers = subscribers.len(),
            "newsletter signup recorded"
        );
        Ok(SubscriptionOutcome::Success)
    }

    /// Record an affiliate link click. Always appends.
    pub fn record_affiliate_click(
        &mut self,
        product: Option<&str>,
        url: &str,
        timestamp: DateTime<Utc>,
    ) -> ActionLogResult<AffiliateClick> {
        let click = AffiliateClick {
            product: product
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN_PRODUCT)
                .to_owned(),
            url: url.to_owned(),
            timestamp,
        };

        let mut clicks: Vec<AffiliateClick> = self.read_list(AFFILIATE_CLICKS_KEY)?;
        clicks.push(click.clone());
        self.write_list(AFFILIATE_CLICKS_KEY, &clicks)?;
        tracing::info!(
            product = %click.product,
            url = %click.url,
            timestamp = %click.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "affiliate link clicked"
        );
        Ok(click)
    }

    /// Current subscriber list.
    pub fn subscribers(&self) -> ActionLogResult<Vec<String>> {
        self.read_list(SUBSCRIBERS_KEY)
    }

    /// Current affiliate click log.
    pub fn affiliate_clicks(&self) -> ActionLogResult<Vec<AffiliateClick>> {
        self.read_list(AFFILIATE_CLICKS_KEY)
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn read_list<T>(&self, key: &str) -> ActionLogResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let Some(raw) = self.store.get(key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| {
            ActionLogError::Store(StoreError::Corrupt {
                key: key.to_owned(),
                detail: e.to_string(),
            })
        })
    }

    fn write_list<T: Serialize>(&mut self, key: &str, list: &[T]) -> ActionLogResult<()> {
        let encoded = serde_json::to_string(list).map_err(ActionLogError::Encode)?;
        self.store.set(key, &encoded)?;
        Ok(())
    }
}
