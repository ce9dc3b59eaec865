//! Platform-independent runner logic.
//!
//! This module contains the core runner that wraps
//! `PageController<WebHost<S>>` and can be tested on native targets. The
//! `wasm` module only converts between JS values and these calls.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use terrasite_backend::{Host, HostClock, KeyValueStore};
use terrasite_core::event::Event;
use terrasite_runtime::config::PageConfig;
use terrasite_runtime::page::PageController;
use terrasite_web::WebHost;
use terrasite_web::input_parser::{parse_event, parse_layout};
use terrasite_widgets::notification_queue::Severity;
use terrasite_widgets::ui_state::{Effect, UiChange, UiPatch};

/// What one [`RunnerCore::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Events consumed from the queue.
    pub events_processed: u32,
    /// Whether a timer deadline had passed and was serviced.
    pub ticked: bool,
    /// Encoded patches, in presentation order.
    pub patches: Vec<Value>,
}

impl StepResult {
    /// `{"events":..,"ticked":..,"patches":[..]}`.
    #[must_use]
    pub fn to_json(&self) -> String {
        json!({
            "events": self.events_processed,
            "ticked": self.ticked,
            "patches": self.patches,
        })
        .to_string()
    }
}

/// Core runner: an event queue in front of a page controller.
pub struct RunnerCore<S: KeyValueStore> {
    controller: PageController<WebHost<S>>,
    pending: VecDeque<Event>,
    logs: Vec<String>,
}

impl<S: KeyValueStore> RunnerCore<S> {
    /// Create a detached runner over `store`.
    pub fn new(store: S, config: PageConfig) -> Self {
        Self {
            controller: PageController::new(WebHost::with_store(store), config),
            pending: VecDeque::new(),
            logs: Vec::new(),
        }
    }

    /// Like [`new`](Self::new), reading the config from JSON.
    ///
    /// An invalid config is logged and replaced by the defaults.
    pub fn from_config_json(store: S, config_json: &str) -> Self {
        let (config, log) = match PageConfig::from_json_str(config_json)
            .and_then(PageConfig::validated)
        {
            Ok(config) => (config, None),
            Err(err) => (PageConfig::default(), Some(format!("config_error: {err}"))),
        };
        let mut runner = Self::new(store, config);
        runner.logs.extend(log);
        runner
    }

    /// Attach the page described by `layout_json`.
    ///
    /// Returns `false` (and logs) if the layout is malformed.
    pub fn attach(&mut self, layout_json: &str) -> bool {
        match parse_layout(layout_json) {
            Ok(layout) => {
                self.pending.clear();
                self.controller.attach(layout);
                true
            }
            Err(err) => {
                self.logs.push(format!("layout_error: {err}"));
                false
            }
        }
    }

    /// Detach the page and drop queued events.
    pub fn detach(&mut self) {
        self.pending.clear();
        self.controller.detach();
    }

    /// Anchor wall-clock timestamps at `epoch_ms` (the host's `Date.now()`
    /// at monotonic zero).
    pub fn set_wall_origin_ms(&mut self, epoch_ms: f64) {
        let millis = if epoch_ms.is_finite() {
            epoch_ms as i64
        } else {
            0
        };
        let origin = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
        self.controller
            .host_mut()
            .clock_mut()
            .set_wall_origin(origin);
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // Hosts can pass NaN or negative deltas after a tab wakes up.
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let secs = (dt_ms / 1000.0).min(Duration::MAX.as_secs_f64());
        let duration = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        self.controller.host_mut().clock_mut().advance(duration);
    }

    /// Parse a JSON-encoded DOM event and queue it.
    ///
    /// Returns `true` if the event was accepted, `false` if it was
    /// malformed or had no `Event` mapping.
    pub fn push_input(&mut self, json: &str) -> bool {
        match parse_event(json) {
            Ok(Some(event)) => {
                self.pending.push_back(event);
                true
            }
            Ok(None) => false,
            Err(err) => {
                self.logs.push(format!("input_error: {err}"));
                false
            }
        }
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Show a toast on behalf of page script.
    pub fn notify(&mut self, message: &str, severity: &str) {
        if let Err(err) = self
            .controller
            .notify(message, Severity::from_name(severity))
        {
            self.logs.push(format!("present_error: {err}"));
        }
    }

    /// Process queued events, service an expired deadline, and drain the
    /// resulting patches.
    pub fn step(&mut self) -> StepResult {
        let mut events_processed = 0u32;
        while let Some(event) = self.pending.pop_front() {
            events_processed = events_processed.saturating_add(1);
            if let Err(err) = self.controller.handle(event) {
                self.logs.push(format!("present_error: {err}"));
            }
        }

        let now = self.controller.host().clock().now_mono();
        let ticked = self
            .controller
            .next_deadline()
            .is_some_and(|deadline| deadline <= now);
        if ticked && let Err(err) = self.controller.tick() {
            self.logs.push(format!("present_error: {err}"));
        }

        let patches = self
            .controller
            .host_mut()
            .presenter_mut()
            .take_patches()
            .iter()
            .map(encode_patch)
            .collect();
        StepResult {
            events_processed,
            ticked,
            patches,
        }
    }

    /// Milliseconds from now until the next timer deadline, if any.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        let now = self.controller.host().clock().now_mono();
        self.controller
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(now).as_secs_f64() * 1000.0)
    }

    /// Identifier of the section currently highlighted.
    #[must_use]
    pub fn current_section(&self) -> Option<&str> {
        self.controller.current_section()
    }

    /// Drain accumulated log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    /// The wrapped controller.
    pub fn controller(&self) -> &PageController<WebHost<S>> {
        &self.controller
    }
}

/// Encode one patch as the JSON the page shim applies.
#[must_use]
pub fn encode_patch(patch: &UiPatch) -> Value {
    json!({
        "changes": patch.changes.iter().map(encode_change).collect::<Vec<_>>(),
        "effects": patch.effects.iter().map(encode_effect).collect::<Vec<_>>(),
    })
}

fn class_op(target: Value, change: &UiChange, on: bool) -> Value {
    json!({
        "op": "class",
        "target": target,
        "class": change.class_name(),
        "on": on,
    })
}

fn encode_change(change: &UiChange) -> Value {
    match change {
        UiChange::BodyLoaded => class_op(json!("body"), change, true),
        UiChange::HeaderScrolled(on) => class_op(json!("header"), change, *on),
        UiChange::BackToTopVisible(on) => class_op(json!("back_to_top"), change, *on),
        UiChange::MenuOpen(on) => class_op(json!("menu"), change, *on),
        UiChange::NavLinkActive { link, active } => class_op(json!(link.get()), change, *active),
        UiChange::Revealed(node) => class_op(json!(node.get()), change, true),
        UiChange::HeroOffset(px) => json!({
            "op": "transform",
            "target": "hero_background",
            "value": format!("translateY({px}px)"),
        }),
        UiChange::NotificationShown(view) => json!({
            "op": "notification_show",
            "id": view.id.get(),
            "message": view.message,
            "class": format!("notification notification-{}", view.severity.as_str()),
            "background": view.severity.background(),
        }),
        UiChange::NotificationExiting(id) => json!({
            "op": "notification_exit",
            "id": id.get(),
        }),
        UiChange::NotificationRemoved(id) => json!({
            "op": "notification_remove",
            "id": id.get(),
        }),
    }
}

fn encode_effect(effect: &Effect) -> Value {
    match *effect {
        Effect::ScrollTo { top, smooth } => json!({
            "op": "scroll_to",
            "top": top,
            "behavior": if smooth { "smooth" } else { "auto" },
        }),
        Effect::PreventDefault => json!({ "op": "prevent_default" }),
        Effect::ClearInput(form) => json!({
            "op": "clear_input",
            "form": form.get(),
        }),
    }
}
