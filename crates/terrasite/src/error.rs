#![forbid(unsafe_code)]

//! terrasite error model and graceful degradation.
//!
//! # Design Principles
//!
//! 1. **Result everywhere**: no panics in an event handler.
//! 2. **Domain-specific errors**: each crate keeps its own typed error
//!    (`StoreError`, `ConfigError`, `ActionLogError`, `InputParseError`) and
//!    this module only unifies them.
//! 3. **Graceful degradation**: every error maps to a [`DegradationAction`]
//!    so the page keeps working. A page script never sees an exception.

use std::fmt;

use terrasite_backend::StoreError;
use terrasite_runtime::action_log::ActionLogError;
use terrasite_runtime::config::ConfigError;
#[cfg(feature = "input-parser")]
use terrasite_web::input_parser::InputParseError;

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for terrasite hosts.
///
/// Use [`Error::degradation`] to decide how to carry on.
#[derive(Debug)]
pub enum Error {
    /// The key-value store failed or held an undecodable value.
    Store(StoreError),
    /// An action record could not be written.
    ActionLog(ActionLogError),
    /// A page configuration failed to load or validate.
    Config(ConfigError),
    /// A host-encoded event or layout was malformed.
    #[cfg(feature = "input-parser")]
    InputParse(InputParseError),
    /// The host refused a patch (page unloading, detached document).
    Host(String),
}

/// Standard result type for terrasite APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Graceful Degradation ────────────────────────────────────────────────

/// What the host should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Abandon the current action; the page state is unchanged.
    SkipAction,
    /// Show an `error` notification and keep going.
    NotifyUser,
    /// Drop the malformed input and continue processing.
    DropInput,
    /// Run with the built-in thresholds.
    UseDefaults,
}

impl Error {
    /// Wrap a host presenter error.
    pub fn host(err: impl fmt::Display) -> Self {
        Self::Host(err.to_string())
    }

    /// Determine the graceful degradation action for this error.
    #[must_use]
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Store(_) | Self::ActionLog(_) => DegradationAction::NotifyUser,
            Self::Config(_) => DegradationAction::UseDefaults,
            #[cfg(feature = "input-parser")]
            Self::InputParse(_) => DegradationAction::DropInput,
            Self::Host(_) => DegradationAction::SkipAction,
        }
    }

    /// Error type label for tracing fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Store(_) => "store",
            Self::ActionLog(_) => "action_log",
            Self::Config(_) => "config",
            #[cfg(feature = "input-parser")]
            Self::InputParse(_) => "input_parse",
            Self::Host(_) => "host",
        }
    }

    /// Whether the user should be told about this error.
    #[must_use]
    pub fn notifies_user(&self) -> bool {
        self.degradation() == DegradationAction::NotifyUser
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::ActionLog(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "input-parser")]
            Self::InputParse(err) => write!(f, "{err}"),
            Self::Host(msg) => write!(f, "host: {msg}"),
        }
    }
}

impl fmt::Display for DegradationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkipAction => write!(f, "skip_action"),
            Self::NotifyUser => write!(f, "notify_user"),
            Self::DropInput => write!(f, "drop_input"),
            Self::UseDefaults => write!(f, "use_defaults"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::ActionLog(err) => Some(err),
            Self::Config(err) => Some(err),
            #[cfg(feature = "input-parser")]
            Self::InputParse(err) => Some(err),
            Self::Host(_) => None,
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ActionLogError> for Error {
    fn from(err: ActionLogError) -> Self {
        match err {
            ActionLogError::Store(err) => Self::Store(err),
            other => Self::ActionLog(other),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "input-parser")]
impl From<InputParseError> for Error {
    fn from(err: InputParseError) -> Self {
        Self::InputParse(err)
    }
}

#[cfg(feature = "web")]
impl From<terrasite_web::WebHostError> for Error {
    fn from(err: terrasite_web::WebHostError) -> Self {
        Self::host(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
