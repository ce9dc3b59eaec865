#![forbid(unsafe_code)]

//! Header, back-to-top, and hero parallax state driven by scroll position.
//!
//! Three independent toggles, each idempotent and re-evaluated on every
//! scroll event:
//!
//! | Toggle | Rule |
//! |---|---|
//! | header `scrolled` | `scroll_y > 50` |
//! | back-to-top `show` | `scroll_y > 500` |
//! | hero offset | `scroll_y * 0.5` while `scroll_y < viewport_height` |
//!
//! Past the viewport height the hero offset keeps its last value rather than
//! snapping back.

use bitflags::bitflags;
use terrasite_core::event::ScrollSnapshot;

bitflags! {
    /// Scroll-driven classes on the page chrome.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChromeFlags: u8 {
        /// Header carries the `scrolled` class.
        const HEADER_SCROLLED = 0b0000_0001;
        /// Back-to-top button carries the `show` class.
        const BACK_TO_TOP_VISIBLE = 0b0000_0010;
    }
}

/// Thresholds for the chrome toggles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeConfig {
    /// Header switches to its scrolled look past this offset.
    pub header_threshold: f64,
    /// Back-to-top appears past this offset.
    pub back_to_top_threshold: f64,
    /// Hero background moves at this fraction of the scroll speed.
    pub parallax_speed: f64,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            header_threshold: 50.0,
            back_to_top_threshold: 500.0,
            parallax_speed: 0.5,
        }
    }
}

/// Which optional chrome elements exist on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeFeatures {
    /// The page has a header element.
    pub header: bool,
    /// The page has a back-to-top button.
    pub back_to_top: bool,
    /// The page has a hero background layer.
    pub hero_background: bool,
}

impl ChromeFeatures {
    /// Every chrome element present.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            header: true,
            back_to_top: true,
            hero_background: true,
        }
    }
}

/// Scroll-driven chrome controller.
#[derive(Debug, Clone, Default)]
pub struct ChromeController {
    config: ChromeConfig,
    features: ChromeFeatures,
    flags: ChromeFlags,
    hero_offset: Option<f64>,
}

impl ChromeController {
    /// Create a controller for the elements in `features`.
    #[must_use]
    pub fn new(config: ChromeConfig, features: ChromeFeatures) -> Self {
        Self {
            config,
            features,
            flags: ChromeFlags::empty(),
            hero_offset: None,
        }
    }

    /// Re-evaluate every toggle for a scroll position.
    ///
    /// Returns `true` if any visible state changed.
    pub fn on_scroll(&mut self, scroll: ScrollSnapshot) -> bool {
        let before = (self.flags, self.hero_offset);
        let y = scroll.scroll_y;

        if self.features.header {
            self.flags
                .set(ChromeFlags::HEADER_SCROLLED, y > self.config.header_threshold);
        }
        if self.features.back_to_top {
            self.flags.set(
                ChromeFlags::BACK_TO_TOP_VISIBLE,
                y > self.config.back_to_top_threshold,
            );
        }
        if self.features.hero_background && y < scroll.viewport_height {
            self.hero_offset = Some(y * self.config.parallax_speed);
        }

        before != (self.flags, self.hero_offset)
    }

    /// Scroll target for a back-to-top click, if the button exists.
    #[must_use]
    pub fn back_to_top_target(&self) -> Option<f64> {
        self.features.back_to_top.then_some(0.0)
    }

    /// Current toggle flags.
    #[must_use]
    pub const fn flags(&self) -> ChromeFlags {
        self.flags
    }

    /// Current hero translation in pixels, once one has been computed.
    #[must_use]
    pub const fn hero_offset(&self) -> Option<f64> {
        self.hero_offset
    }

    /// Elements this controller drives.
    #[must_use]
    pub const fn features(&self) -> ChromeFeatures {
        self.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ChromeController {
        ChromeController::new(ChromeConfig::default(), ChromeFeatures::all())
    }

    fn at(y: f64) -> ScrollSnapshot {
        ScrollSnapshot::new(y, 800.0)
    }

    #[test]
    fn header_threshold_is_strict() {
        let mut chrome = controller();
        chrome.on_scroll(at(50.0));
        assert!(!chrome.flags().contains(ChromeFlags::HEADER_SCROLLED));
        chrome.on_scroll(at(50.5));
        assert!(chrome.flags().contains(ChromeFlags::HEADER_SCROLLED));
        chrome.on_scroll(at(10.0));
        assert!(!chrome.flags().contains(ChromeFlags::HEADER_SCROLLED));
    }

    #[test]
    fn back_to_top_threshold_is_strict() {
        let mut chrome = controller();
        chrome.on_scroll(at(500.0));
        assert!(!chrome.flags().contains(ChromeFlags::BACK_TO_TOP_VISIBLE));
        chrome.on_scroll(at(501.0));
        assert!(chrome.flags().contains(ChromeFlags::BACK_TO_TOP_VISIBLE));
    }

    #[test]
    fn parallax_tracks_half_speed_inside_viewport() {
        let mut chrome = controller();
        chrome.on_scroll(at(300.0));
        assert_eq!(chrome.hero_offset(), Some(150.0));
    }

    #[test]
    fn parallax_freezes_past_viewport() {
        let mut chrome = controller();
        chrome.on_scroll(at(790.0));
        chrome.on_scroll(at(1200.0));
        assert_eq!(chrome.hero_offset(), Some(395.0));
        chrome.on_scroll(at(100.0));
        assert_eq!(chrome.hero_offset(), Some(50.0));
    }

    #[test]
    fn repeated_scroll_reports_no_change() {
        let mut chrome = controller();
        assert!(chrome.on_scroll(at(600.0)));
        assert!(!chrome.on_scroll(at(600.0)));
    }

    #[test]
    fn missing_elements_are_never_toggled() {
        let mut chrome = ChromeController::new(ChromeConfig::default(), ChromeFeatures::default());
        assert!(!chrome.on_scroll(at(900.0)));
        assert!(chrome.flags().is_empty());
        assert_eq!(chrome.hero_offset(), None);
        assert_eq!(chrome.back_to_top_target(), None);
    }

    #[test]
    fn back_to_top_scrolls_to_origin() {
        assert_eq!(controller().back_to_top_target(), Some(0.0));
    }
}
