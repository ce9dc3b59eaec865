#![forbid(unsafe_code)]

//! JSON input parser for host-encoded DOM events and page layouts.
//!
//! The JS shim serializes each DOM event it forwards into a small JSON
//! object with a `kind` tag; [`parse_event`] turns it into a canonical
//! [`Event`]. Kinds without an `Event` mapping return `Ok(None)`.
//!
//! ```json
//! {"kind":"load","scroll_y":900,"viewport_height":800}
//! {"kind":"scroll","scroll_y":120,"viewport_height":800}
//! {"kind":"relayout","sections":[{"id":"about","top":800,"height":600}]}
//! {"kind":"click","path":[{"id":3,"role":"nav_link","href":"#about"}]}
//! {"kind":"intersection","entries":[{"id":8,"intersecting":true}]}
//! {"kind":"submit","form":1,"email":"a@b.com"}
//! ```
//!
//! [`parse_layout`] reads the page description the shim collects once at
//! startup.
//!
//! # Design
//!
//! This parser lives here (not in `terrasite-wasm`) so native tests can
//! drive a page from recorded JSON without pulling in `js-sys`. It is
//! feature-gated behind `input-parser`.

use serde::Deserialize;
use terrasite_core::event::{
    ClickEvent, Element, ElementRole, Event, IntersectionEntry, NodeId, ScrollSnapshot,
};
use terrasite_core::layout::{NavLinkRecord, SectionRecord};
use terrasite_runtime::page::PageLayout;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawElement {
    id: u32,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: u32,
    intersecting: bool,
}

/// Internal deserialization target for event JSON.
#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    scroll_y: Option<f64>,
    #[serde(default)]
    viewport_height: Option<f64>,
    #[serde(default)]
    path: Option<Vec<RawElement>>,
    #[serde(default)]
    entries: Option<Vec<RawEntry>>,
    #[serde(default)]
    form: Option<u32>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    sections: Option<Vec<RawSection>>,
    #[serde(default)]
    anchor_targets: Vec<RawSection>,
}

/// Parse one JSON-encoded DOM event.
///
/// Returns `Ok(None)` for unknown kinds and `Err` for malformed JSON or
/// missing required fields.
pub fn parse_event(json: &str) -> Result<Option<Event>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "load" => parse_load(&raw).map(Some),
        "tick" => Ok(Some(Event::Tick)),
        "scroll" => parse_snapshot(&raw).map(|scroll| Some(Event::Scroll(scroll))),
        "relayout" => parse_relayout(raw).map(Some),
        "click" => parse_click(raw).map(Some),
        "intersection" => parse_intersection(raw).map(Some),
        "submit" => parse_submit(raw).map(Some),
        _ => Ok(None),
    }
}

fn parse_role(role: Option<&str>) -> ElementRole {
    match role {
        Some("menu_toggle") => ElementRole::MenuToggle,
        Some("nav_menu") => ElementRole::NavMenu,
        Some("nav_link") => ElementRole::NavLink,
        Some("back_to_top") => ElementRole::BackToTop,
        Some("anchor") => ElementRole::Anchor,
        Some("affiliate_link") => ElementRole::AffiliateLink,
        Some("newsletter_form") => ElementRole::NewsletterForm,
        _ => ElementRole::Other,
    }
}

fn sanitize_offset(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn parse_snapshot(raw: &RawInput) -> Result<ScrollSnapshot, InputParseError> {
    let scroll_y = raw.scroll_y.ok_or(InputParseError::MissingField("scroll_y"))?;
    let viewport_height = raw
        .viewport_height
        .ok_or(InputParseError::MissingField("viewport_height"))?;
    Ok(ScrollSnapshot::new(
        sanitize_offset(scroll_y),
        sanitize_offset(viewport_height),
    ))
}

/// A load without `scroll_y` starts at the top; with it, the viewport height
/// is required as for a scroll.
fn parse_load(raw: &RawInput) -> Result<Event, InputParseError> {
    let restored = match raw.scroll_y {
        Some(_) => Some(parse_snapshot(raw)?),
        None => None,
    };
    Ok(Event::Load(restored))
}

fn parse_relayout(raw: RawInput) -> Result<Event, InputParseError> {
    let sections = raw.sections.ok_or(InputParseError::MissingField("sections"))?;
    Ok(Event::Relayout {
        sections: to_sections(sections),
        anchor_targets: to_sections(raw.anchor_targets),
    })
}

fn to_sections(raw: Vec<RawSection>) -> Vec<SectionRecord> {
    raw.into_iter()
        .map(|s| SectionRecord::new(s.id, sanitize_offset(s.top), sanitize_offset(s.height)))
        .collect()
}

fn parse_click(raw: RawInput) -> Result<Event, InputParseError> {
    let path = raw.path.ok_or(InputParseError::MissingField("path"))?;
    let elements = path
        .into_iter()
        .map(|el| Element {
            id: NodeId(el.id),
            role: parse_role(el.role.as_deref()),
            href: el.href,
            product_name: el.product_name,
        })
        .collect();
    Ok(Event::Click(ClickEvent::new(elements)))
}

fn parse_intersection(raw: RawInput) -> Result<Event, InputParseError> {
    let entries = raw.entries.ok_or(InputParseError::MissingField("entries"))?;
    Ok(Event::Intersection(
        entries
            .into_iter()
            .map(|e| IntersectionEntry::new(NodeId(e.id), e.intersecting))
            .collect(),
    ))
}

fn parse_submit(raw: RawInput) -> Result<Event, InputParseError> {
    let form = raw.form.ok_or(InputParseError::MissingField("form"))?;
    Ok(Event::Submit {
        form: NodeId(form),
        email: raw.email.unwrap_or_default(),
    })
}

#[derive(Debug, Deserialize)]
struct RawNavLink {
    id: u32,
    href: String,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    id: String,
    top: f64,
    #[serde(default)]
    height: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLayout {
    header: bool,
    menu_toggle: Option<u32>,
    nav_menu: Option<u32>,
    back_to_top: Option<u32>,
    hero_background: Option<u32>,
    nav_links: Vec<RawNavLink>,
    sections: Vec<RawSection>,
    anchor_targets: Vec<RawSection>,
    animated: Vec<u32>,
    newsletter_forms: Vec<u32>,
}

/// Parse a JSON page layout. Absent elements disable their feature.
pub fn parse_layout(json: &str) -> Result<PageLayout, InputParseError> {
    let raw: RawLayout =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;
    Ok(PageLayout {
        header: raw.header,
        menu_toggle: raw.menu_toggle.map(NodeId),
        nav_menu: raw.nav_menu.map(NodeId),
        back_to_top: raw.back_to_top.map(NodeId),
        hero_background: raw.hero_background.map(NodeId),
        nav_links: raw
            .nav_links
            .into_iter()
            .map(|link| NavLinkRecord::new(NodeId(link.id), link.href))
            .collect(),
        sections: to_sections(raw.sections),
        anchor_targets: to_sections(raw.anchor_targets),
        animated: raw.animated.into_iter().map(NodeId).collect(),
        newsletter_forms: raw.newsletter_forms.into_iter().map(NodeId).collect(),
    })
}
