#![forbid(unsafe_code)]

//! Log subscriber installation for native hosts.
//!
//! The runtime itself only emits `tracing` events. Embedders that want them
//! printed call [`init`] once at startup. `RUST_LOG` overrides the filter
//! passed in.

use tracing_subscriber::EnvFilter;

/// Errors from [`init`].
#[derive(Debug)]
pub enum LoggingError {
    /// The filter directive did not parse.
    Filter(tracing_subscriber::filter::ParseError),
    /// A global subscriber is already installed.
    AlreadyInstalled(String),
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "invalid log filter: {e}"),
            Self::AlreadyInstalled(msg) => write!(f, "log subscriber already installed: {msg}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::AlreadyInstalled(_) => None,
        }
    }
}

/// Build the filter: `RUST_LOG` if set and valid, otherwise `default`.
pub fn env_filter(default: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default).map_err(LoggingError::Filter),
    }
}

/// Install a global fmt subscriber.
///
/// With the `logging-json` feature, events are written as JSON lines.
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    let filter = env_filter(default_filter)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    #[cfg(feature = "logging-json")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "logging-json"))]
    let result = builder.try_init();

    result.map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))?;
    tracing::debug!(filter = default_filter, "terrasite logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_directive_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(matches!(
            env_filter("terrasite=notalevel"),
            Err(LoggingError::Filter(_))
        ));
    }

    #[test]
    fn second_init_fails() {
        let first = init("terrasite=debug");
        let second = init("terrasite=debug");
        assert!(first.is_ok() || matches!(first, Err(LoggingError::AlreadyInstalled(_))));
        assert!(matches!(second, Err(LoggingError::AlreadyInstalled(_))));
    }
}
