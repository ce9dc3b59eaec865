#![forbid(unsafe_code)]

//! The page controller: one object that owns every interaction concern.
//!
//! The host pushes [`Event`]s into [`PageController::handle`]. The controller
//! routes each event to the controllers that care about it, advances the
//! notification lifecycle, renders a fresh [`UiState`], and hands the diff to
//! the host's presenter as a single [`UiPatch`].
//!
//! # Presence guards
//!
//! [`PageLayout`] says which optional elements exist. A missing menu toggle
//! disables the menu controller; a missing header, back-to-top button, or
//! hero background disables only that chrome toggle. Nothing fails.
//!
//! # Click routing
//!
//! A click is offered to each concern once, in a fixed order: back-to-top,
//! in-page anchor, menu, affiliate logging. Each concern classifies the click
//! itself by containment over the click path.
//!
//! # Timers
//!
//! There are two deadlines: the notification lifecycle and the trailing
//! active-section refresh. [`PageController::next_deadline`] reports the
//! earliest; the host calls [`PageController::tick`] when it passes.

use std::collections::BTreeSet;
use std::time::Duration;

use terrasite_backend::{Host, HostClock, UiPresenter};
use terrasite_core::event::{ClickEvent, Element, ElementRole, Event, NodeId, ScrollSnapshot};
use terrasite_core::layout::{NavLinkRecord, SectionRecord};
use terrasite_core::rate_limit::ThrottleWindow;
use terrasite_widgets::active_section::ActiveSectionTracker;
use terrasite_widgets::anchor::{AnchorOutcome, resolve_anchor};
use terrasite_widgets::chrome::{ChromeController, ChromeFeatures};
use terrasite_widgets::menu::{MenuController, MenuState};
use terrasite_widgets::notification_queue::{NotificationQueue, QueueStats, Severity};
use terrasite_widgets::reveal::RevealTracker;
use terrasite_widgets::ui_state::{Effect, NotificationView, UiPatch, UiState};

use crate::action_log::{ActionLogger, SubscriptionOutcome};
use crate::config::PageConfig;

/// Message shown when a user action could not be saved.
pub const STORE_FAILURE_MESSAGE: &str = "Something went wrong saving that. Please try again.";

/// What the host found on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// The fixed header exists.
    pub header: bool,
    /// Mobile menu toggle button.
    pub menu_toggle: Option<NodeId>,
    /// Navigation container.
    pub nav_menu: Option<NodeId>,
    /// Back-to-top button.
    pub back_to_top: Option<NodeId>,
    /// Hero background layer.
    pub hero_background: Option<NodeId>,
    /// Navigation links, in document order.
    pub nav_links: Vec<NavLinkRecord>,
    /// Sections with identifiers, in document order.
    pub sections: Vec<SectionRecord>,
    /// Other elements an in-page link may target (a newsletter block, a
    /// footer), with their offsets.
    pub anchor_targets: Vec<SectionRecord>,
    /// Elements marked for reveal-on-scroll.
    pub animated: Vec<NodeId>,
    /// Newsletter forms.
    pub newsletter_forms: Vec<NodeId>,
}

impl PageLayout {
    /// Which chrome toggles have an element to drive.
    #[must_use]
    pub fn chrome_features(&self) -> ChromeFeatures {
        ChromeFeatures {
            header: self.header,
            back_to_top: self.back_to_top.is_some(),
            hero_background: self.hero_background.is_some(),
        }
    }

    /// The mobile menu needs both its toggle and its container.
    #[must_use]
    pub fn has_menu(&self) -> bool {
        self.menu_toggle.is_some() && self.nav_menu.is_some()
    }
}

/// Controllers that live only while a page is attached.
#[derive(Debug)]
struct AttachedPage {
    layout: PageLayout,
    loaded: bool,
    chrome: ChromeController,
    menu: Option<MenuController>,
    sections: ActiveSectionTracker,
    section_gate: ThrottleWindow,
    section_dirty: bool,
    reveal: RevealTracker,
    scroll: ScrollSnapshot,
}

impl AttachedPage {
    fn new(layout: PageLayout, config: &PageConfig) -> Self {
        let mut reveal = RevealTracker::new(config.to_intersection_options());
        for &element in &layout.animated {
            reveal.observe(element);
        }
        Self {
            chrome: ChromeController::new(config.to_chrome_config(), layout.chrome_features()),
            menu: layout.has_menu().then(MenuController::new),
            sections: ActiveSectionTracker::new(config.to_active_section_config()),
            section_gate: ThrottleWindow::new(config.section_throttle()),
            section_dirty: false,
            reveal,
            scroll: ScrollSnapshot::default(),
            loaded: false,
            layout,
        }
    }

    fn recompute_sections(&mut self) {
        let changed =
            self.sections
                .update(&self.layout.sections, &self.layout.nav_links, self.scroll.scroll_y);
        self.section_dirty = false;
        if changed {
            tracing::debug!(
                current = self.sections.current().unwrap_or(""),
                active_links = self.sections.active_links().len(),
                "active section changed"
            );
        }
    }

    /// Run a pending active-section refresh if the throttle window allows.
    fn flush_sections(&mut self, now: Duration) {
        if self.section_dirty && self.section_gate.try_acquire(now) {
            self.recompute_sections();
        }
    }

    fn on_load(&mut self, restored: Option<ScrollSnapshot>, now: Duration) {
        if let Some(scroll) = restored {
            self.on_scroll(scroll);
        }
        self.loaded = true;
        self.section_gate.try_acquire(now);
        self.recompute_sections();
    }

    fn on_relayout(&mut self, sections: Vec<SectionRecord>, anchor_targets: Vec<SectionRecord>) {
        tracing::debug!(
            sections = sections.len(),
            anchor_targets = anchor_targets.len(),
            "geometry refreshed"
        );
        self.layout.sections = sections;
        self.layout.anchor_targets = anchor_targets;
        self.section_dirty = true;
    }

    fn on_scroll(&mut self, scroll: ScrollSnapshot) {
        self.scroll = scroll;
        if self.chrome.on_scroll(scroll) {
            tracing::trace!(
                scroll_y = scroll.scroll_y,
                flags = self.chrome.flags().bits(),
                "chrome updated"
            );
        }
        self.section_dirty = true;
    }

    fn on_click(&mut self, click: &ClickEvent, header_offset: f64, effects: &mut Vec<Effect>) {
        if click.is_within(ElementRole::BackToTop)
            && let Some(top) = self.chrome.back_to_top_target()
        {
            effects.push(Effect::ScrollTo { top, smooth: true });
        }

        if let Some(href) = click
            .closest_by(Element::is_fragment_link)
            .and_then(|anchor| anchor.href.as_deref())
        {
            let targets = self.layout.sections.iter().chain(&self.layout.anchor_targets);
            match resolve_anchor(href, targets, header_offset) {
                AnchorOutcome::Ignore => {}
                AnchorOutcome::PreventOnly => effects.push(Effect::PreventDefault),
                AnchorOutcome::ScrollTo { top } => {
                    effects.push(Effect::PreventDefault);
                    effects.push(Effect::ScrollTo { top, smooth: true });
                }
            }
        }

        if let Some(menu) = self.menu.as_mut()
            && let Some(transition) = menu.on_click(click)
        {
            tracing::debug!(
                from = ?transition.from,
                to = ?transition.to,
                cause = ?transition.cause,
                "menu transition"
            );
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.section_dirty
            .then(|| self.section_gate.window_end().unwrap_or(Duration::ZERO))
    }

    fn render_into(&self, state: &mut UiState) {
        state.body_loaded = self.loaded;
        state.chrome = self.chrome.flags();
        state.hero_offset = self.chrome.hero_offset();
        state.menu = self
            .menu
            .as_ref()
            .map_or(MenuState::Closed, MenuController::state);
        state.active_links = self.sections.active_links().iter().copied().collect();
        state.revealed = self.reveal.revealed().collect::<BTreeSet<_>>();
    }
}

/// Composes every page controller over a [`Host`].
#[derive(Debug)]
pub struct PageController<H: Host> {
    host: H,
    config: PageConfig,
    page: Option<AttachedPage>,
    notifications: NotificationQueue,
    ui: UiState,
}

impl<H: Host> PageController<H> {
    /// Create a detached controller.
    pub fn new(host: H, config: PageConfig) -> Self {
        let notifications = NotificationQueue::new(config.to_queue_config());
        Self {
            host,
            config,
            page: None,
            notifications,
            ui: UiState::default(),
        }
    }

    /// Create a detached controller with default thresholds.
    pub fn with_defaults(host: H) -> Self {
        Self::new(host, PageConfig::default())
    }

    /// Wire the controllers for `layout`. Replaces any previous page.
    pub fn attach(&mut self, layout: PageLayout) {
        if self.page.is_some() {
            self.detach();
        }
        tracing::debug!(
            header = layout.header,
            menu = layout.has_menu(),
            back_to_top = layout.back_to_top.is_some(),
            hero_background = layout.hero_background.is_some(),
            sections = layout.sections.len(),
            anchor_targets = layout.anchor_targets.len(),
            nav_links = layout.nav_links.len(),
            animated = layout.animated.len(),
            forms = layout.newsletter_forms.len(),
            "page attached"
        );
        self.page = Some(AttachedPage::new(layout, &self.config));
    }

    /// Drop every controller and forget all visual state.
    pub fn detach(&mut self) {
        if self.page.take().is_some() {
            tracing::debug!("page detached");
        }
        self.notifications.clear();
        self.ui = UiState::default();
    }

    /// Whether a page is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.page.is_some()
    }

    /// Handle one event and present the resulting patch.
    ///
    /// Events arriving while detached only advance the notification clock.
    pub fn handle(&mut self, event: Event) -> Result<UiPatch, H::Error> {
        let now = self.host.clock().now_mono();
        let _span = tracing::debug_span!("page.handle", kind = event.kind()).entered();
        let mut effects = Vec::new();

        if let Some(page) = self.page.as_mut() {
            match event {
                Event::Load(restored) => {
                    page.on_load(restored, now);
                    tracing::info!(
                        load_ms = u64::try_from(now.as_millis()).unwrap_or(u64::MAX),
                        scroll_y = restored.map_or(0.0, |s| s.scroll_y),
                        "page loaded"
                    );
                }
                Event::Scroll(scroll) => page.on_scroll(scroll),
                Event::Relayout {
                    sections,
                    anchor_targets,
                } => page.on_relayout(sections, anchor_targets),
                Event::Click(click) => {
                    page.on_click(&click, self.config.anchor.header_offset, &mut effects);
                    if let Some(link) = click.closest(ElementRole::AffiliateLink) {
                        record_affiliate_click(
                            &mut self.host,
                            &mut self.notifications,
                            link,
                            now,
                        );
                    }
                }
                Event::Intersection(entries) => {
                    let revealed = page.reveal.on_intersections(&entries);
                    if !revealed.is_empty() {
                        tracing::trace!(count = revealed.len(), "elements revealed");
                    }
                }
                Event::Submit { form, email } => {
                    if page.layout.newsletter_forms.contains(&form) {
                        effects.push(Effect::PreventDefault);
                        submit_newsletter(
                            &mut self.host,
                            &mut self.notifications,
                            form,
                            &email,
                            now,
                            &mut effects,
                        );
                    } else {
                        tracing::debug!(form = form.get(), "submit from unknown form ignored");
                    }
                }
                Event::Tick => {}
            }
            page.flush_sections(now);
        } else {
            tracing::trace!(kind = event.kind(), "event ignored while detached");
        }

        self.notifications.tick(now);
        self.present(effects)
    }

    /// Advance timers without input.
    pub fn tick(&mut self) -> Result<UiPatch, H::Error> {
        self.handle(Event::Tick)
    }

    /// Show a toast directly.
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
    ) -> Result<UiPatch, H::Error> {
        let now = self.host.clock().now_mono();
        self.notifications.notify(message, severity, now);
        self.present(Vec::new())
    }

    /// Earliest moment a [`tick`](Self::tick) would change something.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        let sections = self.page.as_ref().and_then(AttachedPage::next_deadline);
        match (sections, self.notifications.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// The state most recently presented.
    #[must_use]
    pub fn ui_state(&self) -> &UiState {
        &self.ui
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Identifier of the current section, if any.
    #[must_use]
    pub fn current_section(&self) -> Option<&str> {
        self.page.as_ref().and_then(|page| page.sections.current())
    }

    /// Notification counters.
    #[must_use]
    pub fn notification_stats(&self) -> &QueueStats {
        self.notifications.stats()
    }

    /// Borrow the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutably borrow the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Take the host back.
    pub fn into_host(self) -> H {
        self.host
    }

    fn render(&self) -> UiState {
        let mut state = UiState {
            notification: self.notifications.visible().map(NotificationView::from),
            ..UiState::default()
        };
        if let Some(page) = &self.page {
            page.render_into(&mut state);
        }
        state
    }

    fn present(&mut self, effects: Vec<Effect>) -> Result<UiPatch, H::Error> {
        let next = self.render();
        let patch = UiPatch {
            changes: self.ui.diff(&next),
            effects,
        };
        self.ui = next;
        if !patch.is_empty() {
            self.host.presenter().present(&patch)?;
        }
        Ok(patch)
    }
}

fn record_affiliate_click<H: Host>(
    host: &mut H,
    notifications: &mut NotificationQueue,
    link: &Element,
    now: Duration,
) {
    let timestamp = host.clock().now_utc();
    let url = link.href.as_deref().unwrap_or_default();
    let result = ActionLogger::new(host.store()).record_affiliate_click(
        link.product_name.as_deref(),
        url,
        timestamp,
    );
    if let Err(error) = result {
        tracing::warn!(%error, "failed to record affiliate click");
        notifications.notify(STORE_FAILURE_MESSAGE, Severity::Error, now);
    }
}

fn submit_newsletter<H: Host>(
    host: &mut H,
    notifications: &mut NotificationQueue,
    form: NodeId,
    email: &str,
    now: Duration,
    effects: &mut Vec<Effect>,
) {
    match ActionLogger::new(host.store()).record_subscription(email) {
        Ok(outcome) => {
            notifications.notify(outcome.message(), outcome.severity(), now);
            if outcome == SubscriptionOutcome::Success {
                effects.push(Effect::ClearInput(form));
            }
        }
        Err(error) => {
            tracing::warn!(%error, form = form.get(), "failed to record newsletter signup");
            notifications.notify(STORE_FAILURE_MESSAGE, Severity::Error, now);
        }
    }
}
