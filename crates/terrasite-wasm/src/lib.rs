#![forbid(unsafe_code)]

//! Browser runner for the terrasite page controllers.
//!
//! This crate provides [`PageRunner`], a `wasm-bindgen`-exported struct that
//! wraps `terrasite_runtime::PageController` over a `localStorage`-backed
//! host and exposes it to the page shim for host-driven execution:
//!
//! ```js
//! const runner = new PageRunner();
//! runner.attach(JSON.stringify(collectLayout(document)));
//! window.addEventListener("load", () => {
//!   runner.pushInput(JSON.stringify({ kind: "load", scroll_y: scrollY, viewport_height: innerHeight }));
//! });
//! window.addEventListener("scroll", () => {
//!   runner.pushInput(JSON.stringify({ kind: "scroll", scroll_y: scrollY, viewport_height: innerHeight }));
//! });
//! // Clicks and submits step synchronously so `prevent_default` lands
//! // before the browser acts on the event.
//! document.addEventListener("click", (event) => {
//!   runner.pushInput(JSON.stringify({ kind: "click", path: describePath(event) }));
//!   applyPatches(runner.step().patches, event);
//! });
//! form.addEventListener("submit", (event) => {
//!   runner.pushInput(JSON.stringify({ kind: "submit", form: nodeId(form), email: form.email.value }));
//!   applyPatches(runner.step().patches, event);
//! });
//! // each frame:
//! runner.advanceTime(dt);
//! applyPatches(runner.step().patches);
//! ```

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PageRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;
