#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the page runner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly
//! types and backs it with `localStorage`. Only compiled on `wasm32`
//! targets.

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use terrasite_backend::{KeyValueStore, StoreError, StoreResult};
use terrasite_runtime::config::PageConfig;

use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &"message".into())
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "unknown error".to_owned())
}

/// `window.localStorage`, reached through `Reflect` so the module also loads
/// where storage is disabled (private mode, sandboxed iframes).
pub struct LocalStorageStore {
    storage: Option<JsValue>,
}

impl LocalStorageStore {
    fn open() -> Self {
        let storage = Reflect::get(&js_sys::global(), &"localStorage".into())
            .ok()
            .filter(|s| s.is_object());
        if storage.is_none() {
            console_error("terrasite: localStorage unavailable; actions will not persist");
        }
        Self { storage }
    }

    fn method(&self, name: &str) -> StoreResult<(&JsValue, Function)> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage missing".to_owned()))?;
        let method = Reflect::get(storage, &name.into())
            .map_err(|e| StoreError::Unavailable(js_message(&e)))?
            .dyn_into::<Function>()
            .map_err(|_| StoreError::Unavailable(format!("localStorage.{name} is not callable")))?;
        Ok((storage, method))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let (storage, get_item) = self.method("getItem")?;
        let value = get_item
            .call1(storage, &JsValue::from_str(key))
            .map_err(|e| StoreError::Unavailable(js_message(&e)))?;
        Ok(value.as_string())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let (storage, set_item) = self.method("setItem")?;
        set_item
            .call2(storage, &JsValue::from_str(key), &JsValue::from_str(value))
            .map(drop)
            .map_err(|e| {
                // Browsers report a full store as a `QuotaExceededError` DOMException.
                let name = Reflect::get(&e, &"name".into())
                    .ok()
                    .and_then(|n| n.as_string());
                if name.as_deref() == Some("QuotaExceededError") {
                    StoreError::QuotaExceeded {
                        key: key.to_owned(),
                    }
                } else {
                    StoreError::Unavailable(js_message(&e))
                }
            })
    }
}

/// Browser runner for the page controllers.
///
/// Host-driven: the page shim forwards DOM events as JSON, advances time
/// from `requestAnimationFrame` or timers, and applies the patches each
/// `step()` returns.
#[wasm_bindgen]
pub struct PageRunner {
    inner: RunnerCore<LocalStorageStore>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl PageRunner {
    /// Create a runner. `config_json` overrides the default thresholds.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Self {
        install_panic_hook();
        let store = LocalStorageStore::open();
        let mut inner = match config_json {
            Some(json) => RunnerCore::from_config_json(store, &json),
            None => RunnerCore::new(store, PageConfig::default()),
        };
        inner.set_wall_origin_ms(js_sys::Date::now());
        let mut runner = Self { inner };
        runner.flush_logs();
        runner
    }

    /// Attach the page described by `layout_json`.
    pub fn attach(&mut self, layout_json: &str) -> bool {
        let ok = self.inner.attach(layout_json);
        self.flush_logs();
        ok
    }

    /// Detach the page.
    pub fn detach(&mut self) {
        self.inner.detach();
    }

    /// Advance the clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Queue a JSON-encoded DOM event.
    /// Returns `true` if accepted, `false` if unsupported/malformed.
    #[wasm_bindgen(js_name = pushInput)]
    pub fn push_input(&mut self, json: &str) -> bool {
        let ok = self.inner.push_input(json);
        self.flush_logs();
        ok
    }

    /// Show a toast from page script.
    pub fn notify(&mut self, message: &str, severity: &str) {
        self.inner.notify(message, severity);
        self.flush_logs();
    }

    /// Process queued events and return `{ events, ticked, patches }`.
    pub fn step(&mut self) -> JsValue {
        let result = self.inner.step();
        self.flush_logs();
        match js_sys::JSON::parse(&result.to_json()) {
            Ok(value) => value,
            Err(err) => {
                console_error(&format!("terrasite: patch encode failed: {}", js_message(&err)));
                let obj = Object::new();
                set_js(&obj, "events", JsValue::from(result.events_processed));
                set_js(&obj, "ticked", JsValue::from(result.ticked));
                obj.into()
            }
        }
    }

    /// Milliseconds until the runner next needs a `step()` without input,
    /// or `undefined`.
    #[wasm_bindgen(js_name = nextDeadlineMs)]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.inner.next_deadline_ms()
    }

    /// Identifier of the highlighted section.
    #[wasm_bindgen(js_name = currentSection)]
    pub fn current_section(&self) -> Option<String> {
        self.inner.current_section().map(str::to_owned)
    }

    fn flush_logs(&mut self) {
        for line in self.inner.take_logs() {
            console_error(&format!("terrasite: {line}"));
        }
    }
}
