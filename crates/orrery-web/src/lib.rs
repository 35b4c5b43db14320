//! Browser bridge: owns the session in a `thread_local!`, drives it from
//! `requestAnimationFrame`, and persists settings to `localStorage`.
//!
//! The JS side forwards pointer/resize events, uploads the vertex buffer at
//! `vertices_ptr()` (6 floats per vertex, triangle list) each frame, and calls
//! `store_settings()` on blur/unload.

pub mod runner;

pub use runner::OrreryRunner;

use std::cell::RefCell;

use orrery_engine::{EngineConfig, FrameHost, InputEvent, Settings};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// `localStorage` key holding the serialized settings blob.
pub const SETTINGS_KEY: &str = "settings";

thread_local! {
    static RUNNER: RefCell<Option<OrreryRunner>> = RefCell::new(None);
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut OrreryRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("orrery: not initialized, call init() first");
                None
            }
        }
    })
}

/// [`FrameHost`] backed by `window.requestAnimationFrame`.
struct AnimationFrameHost;

impl FrameHost for AnimationFrameHost {
    fn request_frame(&mut self) {
        let Some(window) = web_sys::window() else {
            log::error!("orrery: no window to schedule frames on");
            return;
        };
        FRAME_CALLBACK.with(|cell| {
            let mut slot = cell.borrow_mut();
            let callback = slot.get_or_insert_with(|| {
                Closure::<dyn FnMut(f64)>::new(|timestamp: f64| {
                    frame(timestamp);
                })
            });
            if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("orrery: requestAnimationFrame failed: {e:?}");
            }
        });
    }
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn load_settings() -> Settings {
    let stored = storage().and_then(|s| s.get_item(SETTINGS_KEY).ok().flatten());
    match stored {
        Some(json) => Settings::from_json(&json).unwrap_or_else(|e| {
            log::warn!("orrery: stored settings unreadable ({e}), using reset preset");
            reset_preset()
        }),
        None => reset_preset(),
    }
}

fn reset_preset() -> Settings {
    let mut settings = Settings::default();
    settings.reset();
    settings
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub fn init(width: f64, height: f64) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = EngineConfig {
        viewport_width: width,
        viewport_height: height,
        ..EngineConfig::default()
    };
    let runner = OrreryRunner::new(config, load_settings());
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("orrery: initialized ({width}x{height})");
}

/// Replace the bodies with those of a catalog document.
#[wasm_bindgen]
pub fn load_catalog(json: &str) -> Result<(), JsValue> {
    match with_runner(|r| r.load_catalog(json)) {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => {
            log::error!("orrery: {e}");
            Err(js_error(e))
        }
        None => Err(JsValue::from_str("orrery: not initialized")),
    }
}

#[wasm_bindgen]
pub fn load_builtin_catalog() -> Result<(), JsValue> {
    match with_runner(|r| r.load_builtin_catalog()) {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(js_error(e)),
        None => Err(JsValue::from_str("orrery: not initialized")),
    }
}

/// Start the animation frame loop. Calling it again does nothing.
#[wasm_bindgen]
pub fn start() {
    with_runner(|r| r.start(&mut AnimationFrameHost));
}

/// Animation frame entry point; `timestamp` is the rAF high-resolution time
/// in milliseconds. Returns the number of simulation steps run.
#[wasm_bindgen]
pub fn frame(timestamp: f64) -> u32 {
    with_runner(|r| r.frame(timestamp, &mut AnimationFrameHost)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn pointer_down(x: f64, y: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn pointer_up(x: f64, y: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn resize(width: f64, height: f64) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

/// Follow a body by name; an empty string returns to manual pan.
#[wasm_bindgen]
pub fn set_focus(name: &str) {
    with_runner(|r| r.set_focus(name));
}

/// Set a numeric or boolean (0/1) setting by its persisted key.
#[wasm_bindgen]
pub fn set_setting(key: &str, value: f64) -> bool {
    with_runner(|r| r.set_setting(key, value)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn reset_settings() {
    with_runner(|r| r.reset_settings());
}

#[wasm_bindgen]
pub fn settings_json() -> Result<String, JsValue> {
    match with_runner(|r| r.settings().to_json()) {
        Some(result) => result.map_err(js_error),
        None => Err(JsValue::from_str("orrery: not initialized")),
    }
}

/// Write the current settings to `localStorage`.
#[wasm_bindgen]
pub fn store_settings() -> Result<(), JsValue> {
    let json = settings_json()?;
    let storage = storage().ok_or_else(|| JsValue::from_str("orrery: localStorage unavailable"))?;
    storage.set_item(SETTINGS_KEY, &json)
}

/// Every body name, stars first, for a focus menu.
#[wasm_bindgen]
pub fn body_names() -> js_sys::Array {
    with_runner(|r| r.body_names())
        .unwrap_or_default()
        .into_iter()
        .map(JsValue::from)
        .collect()
}

// ---- Vertex buffer accessors ----

#[wasm_bindgen]
pub fn vertices_ptr() -> *const f32 {
    with_runner(|r| r.vertices_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn vertex_count() -> u32 {
    with_runner(|r| r.vertex_count()).unwrap_or(0)
}
