#![forbid(unsafe_code)]

//! Canonical page events.
//!
//! The host (browser glue or a test harness) translates DOM activity into
//! these values and pushes them into the runtime. All events derive `Clone`
//! and `PartialEq` for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - Clicks carry the full element path from the target up to the root, so
//!   containment ("is this click inside the menu?") is answered without
//!   touching the DOM again.
//! - Scroll positions are `f64` CSS pixels and may be negative during
//!   overscroll bounce.
//! - Section offsets go stale whenever layout shifts. The host reports
//!   fresh geometry with [`Event::Relayout`].

use crate::layout::SectionRecord;

/// Opaque element handle assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a node id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Structural role of an element, as far as the page controllers care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementRole {
    /// The hamburger button that opens the mobile navigation.
    MenuToggle,
    /// The navigation container the toggle shows and hides.
    NavMenu,
    /// An entry inside the navigation.
    NavLink,
    /// The floating "back to top" button.
    BackToTop,
    /// An ordinary anchor.
    Anchor,
    /// An anchor marked as an affiliate link.
    AffiliateLink,
    /// A newsletter form.
    NewsletterForm,
    /// Anything else.
    #[default]
    Other,
}

/// One element on a click path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Host handle.
    pub id: NodeId,
    /// Structural role.
    pub role: ElementRole,
    /// The `href` attribute, for anchors.
    pub href: Option<String>,
    /// Product label for affiliate anchors.
    pub product_name: Option<String>,
}

impl Element {
    /// Create an element with a role and no attributes.
    #[must_use]
    pub fn new(id: NodeId, role: ElementRole) -> Self {
        Self {
            id,
            role,
            href: None,
            product_name: None,
        }
    }

    /// Set the `href` attribute.
    #[must_use]
    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Set the affiliate product label.
    #[must_use]
    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Whether this element links to an in-page fragment.
    #[must_use]
    pub fn is_fragment_link(&self) -> bool {
        self.href.as_deref().is_some_and(|href| href.starts_with('#'))
    }
}

/// A click, described by the path from the target element to the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClickEvent {
    path: Vec<Element>,
}

impl ClickEvent {
    /// Create a click from a target-first element path.
    #[must_use]
    pub fn new(path: Vec<Element>) -> Self {
        Self { path }
    }

    /// The element that received the click, if any.
    #[must_use]
    pub fn target(&self) -> Option<&Element> {
        self.path.first()
    }

    /// Target-first element path.
    #[must_use]
    pub fn path(&self) -> &[Element] {
        &self.path
    }

    /// Whether the click landed on or inside an element with `role`.
    #[must_use]
    pub fn is_within(&self, role: ElementRole) -> bool {
        self.closest(role).is_some()
    }

    /// Nearest element (target first) with `role`.
    #[must_use]
    pub fn closest(&self, role: ElementRole) -> Option<&Element> {
        self.path.iter().find(|el| el.role == role)
    }

    /// Nearest element matching `pred`.
    pub fn closest_by(&self, pred: impl Fn(&Element) -> bool) -> Option<&Element> {
        self.path.iter().find(|el| pred(*el))
    }
}

/// Scroll position and viewport height at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollSnapshot {
    /// Vertical scroll offset in CSS pixels.
    pub scroll_y: f64,
    /// Inner height of the viewport in CSS pixels.
    pub viewport_height: f64,
}

impl ScrollSnapshot {
    /// Create a snapshot.
    #[must_use]
    pub const fn new(scroll_y: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height,
        }
    }
}

/// One entry of a viewport-intersection batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    /// The observed element.
    pub element: NodeId,
    /// Whether the element currently meets the visibility threshold.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Create an entry.
    #[must_use]
    pub const fn new(element: NodeId, is_intersecting: bool) -> Self {
        Self {
            element,
            is_intersecting,
        }
    }
}

/// Canonical page event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The page finished loading, with the scroll position the browser
    /// restored if it is known.
    Load(Option<ScrollSnapshot>),
    /// The window scrolled.
    Scroll(ScrollSnapshot),
    /// Layout changed (fonts, images, resize); the host re-measured every
    /// section and anchor target.
    Relayout {
        /// Sections with identifiers, in document order.
        sections: Vec<SectionRecord>,
        /// Other in-page anchor targets.
        anchor_targets: Vec<SectionRecord>,
    },
    /// A click anywhere in the document.
    Click(ClickEvent),
    /// A batch of visibility changes from the intersection observer.
    Intersection(Vec<IntersectionEntry>),
    /// A newsletter form was submitted.
    Submit {
        /// The submitted form.
        form: NodeId,
        /// Raw value of the form's email input.
        email: String,
    },
    /// Time advanced; no user input.
    Tick,
}

impl Event {
    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Scroll(_) => "scroll",
            Self::Relayout { .. } => "relayout",
            Self::Click(_) => "click",
            Self::Intersection(_) => "intersection",
            Self::Submit { .. } => "submit",
            Self::Tick => "tick",
        }
    }
}
