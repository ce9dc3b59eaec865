#![forbid(unsafe_code)]

//! In-page anchor navigation with a fixed-header offset.

use terrasite_core::layout::SectionRecord;

/// Height of the fixed header that in-page targets must clear.
pub const DEFAULT_HEADER_OFFSET: f64 = 80.0;

/// What a click on an anchor should do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorOutcome {
    /// Not an in-page link, or the target does not exist: let the browser
    /// handle it.
    Ignore,
    /// A bare `#` link: suppress the jump, do not scroll.
    PreventOnly,
    /// Suppress the jump and smooth-scroll to `top`.
    ScrollTo {
        /// Document offset to scroll to.
        top: f64,
    },
}

/// Resolve an anchor href against the page's targets. The first target with
/// a matching id wins.
#[must_use]
pub fn resolve_anchor<'a>(
    href: &str,
    targets: impl IntoIterator<Item = &'a SectionRecord>,
    header_offset: f64,
) -> AnchorOutcome {
    if href.is_empty() || href == "#" {
        return AnchorOutcome::PreventOnly;
    }
    let Some(fragment) = href.strip_prefix('#') else {
        return AnchorOutcome::Ignore;
    };
    targets
        .into_iter()
        .find(|target| target.id == fragment)
        .map_or(AnchorOutcome::Ignore, |target| AnchorOutcome::ScrollTo {
            top: target.top - header_offset,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionRecord> {
        vec![
            SectionRecord::new("services", 900.0, 600.0),
            SectionRecord::new("contact", 1500.0, 400.0),
        ]
    }

    #[test]
    fn bare_hash_prevents_without_scrolling() {
        assert_eq!(resolve_anchor("#", &sections(), 80.0), AnchorOutcome::PreventOnly);
        assert_eq!(resolve_anchor("", &sections(), 80.0), AnchorOutcome::PreventOnly);
    }

    #[test]
    fn known_target_scrolls_below_header() {
        assert_eq!(
            resolve_anchor("#contact", &sections(), DEFAULT_HEADER_OFFSET),
            AnchorOutcome::ScrollTo { top: 1420.0 }
        );
    }

    #[test]
    fn missing_target_falls_through() {
        assert_eq!(resolve_anchor("#pricing", &sections(), 80.0), AnchorOutcome::Ignore);
    }

    #[test]
    fn non_section_target_resolves_when_listed() {
        let extra = [SectionRecord::new("newsletter", 2100.0, 0.0)];
        assert_eq!(
            resolve_anchor("#newsletter", sections().iter().chain(&extra), 80.0),
            AnchorOutcome::ScrollTo { top: 2020.0 }
        );
    }

    #[test]
    fn external_link_falls_through() {
        assert_eq!(resolve_anchor("about.html", &sections(), 80.0), AnchorOutcome::Ignore);
    }
}
