#![forbid(unsafe_code)]

//! Layout snapshots supplied by the host.

use crate::event::NodeId;

/// A page section with an identifier and its measured box.
///
/// Snapshots are re-read from the host whenever layout may have changed;
/// controllers never cache them across navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRecord {
    /// The section's `id` attribute.
    pub id: String,
    /// Offset of the section's top edge from the document top.
    pub top: f64,
    /// Rendered height.
    pub height: f64,
}

impl SectionRecord {
    /// Create a section record.
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Fragment href that targets this section (`#id`).
    #[must_use]
    pub fn fragment(&self) -> String {
        format!("#{}", self.id)
    }
}

/// A navigation link and the href it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLinkRecord {
    /// Host handle.
    pub id: NodeId,
    /// The link's `href` attribute.
    pub href: String,
}

impl NavLinkRecord {
    /// Create a nav link record.
    #[must_use]
    pub fn new(id: NodeId, href: impl Into<String>) -> Self {
        Self {
            id,
            href: href.into(),
        }
    }
}
