#![forbid(unsafe_code)]

//! Policy-as-data configuration for the page controllers.
//!
//! Every threshold the controllers use lives in one [`PageConfig`] that can
//! be loaded from JSON (always) or TOML (feature `page-config`), so a site
//! can retune its header or notification timings without a rebuild.
//!
//! # Loading
//!
//! ```toml
//! [chrome]
//! header_threshold = 64.0
//!
//! [notification]
//! display_ms = 4000
//! ```
//!
//! ```rust,ignore
//! let config = PageConfig::from_json_str(json)?.validated()?;
//! ```
//!
//! # Defaults
//!
//! `PageConfig::default()` reproduces the built-in constants of each
//! controller exactly.

use core::time::Duration;

use serde::{Deserialize, Serialize};
use terrasite_widgets::active_section::ActiveSectionConfig;
use terrasite_widgets::anchor::DEFAULT_HEADER_OFFSET;
use terrasite_widgets::chrome::ChromeConfig;
use terrasite_widgets::notification_queue::QueueConfig;
use terrasite_widgets::reveal::IntersectionOptions;

// ---------------------------------------------------------------------------
// Top-level PageConfig
// ---------------------------------------------------------------------------

/// Every tunable parameter of the page runtime.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Header, back-to-top, and parallax thresholds.
    pub chrome: ChromePolicy,
    /// Active nav link resolution.
    pub active_section: ActiveSectionPolicy,
    /// In-page anchor scrolling.
    pub anchor: AnchorPolicy,
    /// Toast lifecycle.
    pub notification: NotificationPolicy,
    /// Reveal-on-scroll observer settings.
    pub reveal: RevealPolicy,
}

impl PageConfig {
    /// Parse from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Parse from a TOML string. Missing fields take their defaults.
    #[cfg(feature = "page-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Json)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let c = &self.chrome;
        if !c.header_threshold.is_finite() || c.header_threshold < 0.0 {
            errors.push(format!(
                "chrome.header_threshold must be a finite value >= 0, got {}",
                c.header_threshold
            ));
        }
        if !c.back_to_top_threshold.is_finite() || c.back_to_top_threshold < 0.0 {
            errors.push(format!(
                "chrome.back_to_top_threshold must be a finite value >= 0, got {}",
                c.back_to_top_threshold
            ));
        }
        if !c.parallax_speed.is_finite() {
            errors.push(format!(
                "chrome.parallax_speed must be finite, got {}",
                c.parallax_speed
            ));
        }

        let a = &self.active_section;
        if !a.lookahead.is_finite() || a.lookahead < 0.0 {
            errors.push(format!(
                "active_section.lookahead must be a finite value >= 0, got {}",
                a.lookahead
            ));
        }
        if a.home_href.is_empty() {
            errors.push("active_section.home_href must not be empty".to_owned());
        }
        if !a.home_threshold.is_finite() {
            errors.push(format!(
                "active_section.home_threshold must be finite, got {}",
                a.home_threshold
            ));
        }
        if a.throttle_ms == 0 {
            errors.push("active_section.throttle_ms must be > 0".to_owned());
        }

        if !self.anchor.header_offset.is_finite() {
            errors.push(format!(
                "anchor.header_offset must be finite, got {}",
                self.anchor.header_offset
            ));
        }

        let n = &self.notification;
        if n.display_ms == 0 {
            errors.push("notification.display_ms must be > 0".to_owned());
        }

        let r = &self.reveal;
        if !(r.threshold > 0.0 && r.threshold <= 1.0) {
            errors.push(format!(
                "reveal.threshold must be in (0, 1], got {}",
                r.threshold
            ));
        }
        if !r.root_margin_bottom_px.is_finite() {
            errors.push(format!(
                "reveal.root_margin_bottom_px must be finite, got {}",
                r.root_margin_bottom_px
            ));
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Convert to the chrome controller's config.
    #[must_use]
    pub fn to_chrome_config(&self) -> ChromeConfig {
        ChromeConfig {
            header_threshold: self.chrome.header_threshold,
            back_to_top_threshold: self.chrome.back_to_top_threshold,
            parallax_speed: self.chrome.parallax_speed,
        }
    }

    /// Convert to the active-section tracker's config.
    #[must_use]
    pub fn to_active_section_config(&self) -> ActiveSectionConfig {
        ActiveSectionConfig {
            lookahead: self.active_section.lookahead,
            home_href: self.active_section.home_href.clone(),
            home_threshold: self.active_section.home_threshold,
        }
    }

    /// Minimum spacing between active-section recomputations.
    #[must_use]
    pub fn section_throttle(&self) -> Duration {
        Duration::from_millis(self.active_section.throttle_ms)
    }

    /// Convert to the notification queue's config.
    #[must_use]
    pub fn to_queue_config(&self) -> QueueConfig {
        QueueConfig::new()
            .display_duration(Duration::from_millis(self.notification.display_ms))
            .exit_duration(Duration::from_millis(self.notification.exit_ms))
    }

    /// Convert to the reveal tracker's observer options.
    #[must_use]
    pub fn to_intersection_options(&self) -> IntersectionOptions {
        IntersectionOptions {
            threshold: self.reveal.threshold,
            root_margin_bottom_px: self.reveal.root_margin_bottom_px,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Scroll thresholds for the header and back-to-top button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromePolicy {
    /// Header gets `scrolled` strictly above this offset.
    pub header_threshold: f64,
    /// Back-to-top gets `show` strictly above this offset.
    pub back_to_top_threshold: f64,
    /// Hero translation per scrolled pixel.
    pub parallax_speed: f64,
}

impl Default for ChromePolicy {
    fn default() -> Self {
        let c = ChromeConfig::default();
        Self {
            header_threshold: c.header_threshold,
            back_to_top_threshold: c.back_to_top_threshold,
            parallax_speed: c.parallax_speed,
        }
    }
}

/// Active nav link resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveSectionPolicy {
    /// Pixels a section may still be below the top and count as current.
    pub lookahead: f64,
    /// Href of the home link.
    pub home_href: String,
    /// Home link wins below this offset.
    pub home_threshold: f64,
    /// Minimum milliseconds between recomputations on scroll.
    pub throttle_ms: u64,
}

impl Default for ActiveSectionPolicy {
    fn default() -> Self {
        let c = ActiveSectionConfig::default();
        Self {
            lookahead: c.lookahead,
            home_href: c.home_href,
            home_threshold: c.home_threshold,
            throttle_ms: 100,
        }
    }
}

/// In-page anchor scrolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorPolicy {
    /// Height of the fixed header to clear when scrolling to a target.
    pub header_offset: f64,
}

impl Default for AnchorPolicy {
    fn default() -> Self {
        Self {
            header_offset: DEFAULT_HEADER_OFFSET,
        }
    }
}

/// Toast lifecycle timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPolicy {
    /// Milliseconds a toast stays before its exit animation.
    pub display_ms: u64,
    /// Milliseconds of exit animation before removal.
    pub exit_ms: u64,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            display_ms: 5000,
            exit_ms: 300,
        }
    }
}

/// Reveal-on-scroll observer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealPolicy {
    /// Visible fraction that counts as intersecting.
    pub threshold: f64,
    /// Bottom root margin in pixels.
    pub root_margin_bottom_px: f64,
}

impl Default for RevealPolicy {
    fn default() -> Self {
        let o = IntersectionOptions::default();
        Self {
            threshold: o.threshold,
            root_margin_bottom_px: o.root_margin_bottom_px,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`PageConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// JSON parse or encode error.
    Json(serde_json::Error),
    /// TOML parse error.
    #[cfg(feature = "page-config")]
    Toml(toml::de::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            #[cfg(feature = "page-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            #[cfg(feature = "page-config")]
            Self::Toml(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_controller_constants() {
        let config = PageConfig::default();
        assert_eq!(config.to_chrome_config(), ChromeConfig::default());
        assert_eq!(config.to_active_section_config(), ActiveSectionConfig::default());
        assert_eq!(config.to_intersection_options(), IntersectionOptions::default());
        assert_eq!(config.to_queue_config(), QueueConfig::default());
        assert_eq!(config.section_throttle(), Duration::from_millis(100));
        assert_eq!(config.anchor.header_offset, 80.0);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(PageConfig::default().validate().is_empty());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            PageConfig::from_json_str(r#"{"chrome":{"header_threshold":64.0}}"#).unwrap();
        assert_eq!(config.chrome.header_threshold, 64.0);
        assert_eq!(config.chrome.back_to_top_threshold, 500.0);
        assert_eq!(config.notification.display_ms, 5000);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(PageConfig::from_json_str("{}").unwrap(), PageConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = PageConfig::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn json_round_trip() {
        let mut config = PageConfig::default();
        config.active_section.home_href = "/".to_owned();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(PageConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut config = PageConfig::default();
        config.active_section.throttle_ms = 0;
        config.reveal.threshold = 1.5;
        config.active_section.home_href.clear();
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Validation(list)) if list.len() == 3
        ));
    }

    #[cfg(feature = "page-config")]
    #[test]
    fn toml_overrides_notification_timing() {
        let config = PageConfig::from_toml_str(
            "[notification]\ndisplay_ms = 4000\nexit_ms = 250\n",
        )
        .unwrap();
        assert_eq!(
            config.to_queue_config().display_duration,
            Duration::from_millis(4000)
        );
        assert_eq!(config.notification.exit_ms, 250);
    }
}
