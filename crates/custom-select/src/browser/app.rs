//! WASM entry point.

use super::dom::{SharedController, WebDom};
use custom_select_core::{BindReport, DomHost, DropdownController, InitTiming, SelectConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

/// Page-wide controller and document handle.
#[derive(Clone)]
struct Runtime {
    dom: WebDom,
    controller: SharedController,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

impl Runtime {
    fn new() -> Result<Self, JsValue> {
        let dom = WebDom::from_window()?;
        let controller = Rc::new(RefCell::new(DropdownController::default()));
        dom.attach(&controller);
        Ok(Self { dom, controller })
    }

    /// The page runtime, created on first use.
    fn get() -> Result<Self, JsValue> {
        RUNTIME.with(|slot| {
            let mut slot = slot.borrow_mut();
            if let Some(runtime) = slot.as_ref() {
                return Ok(runtime.clone());
            }
            let runtime = Self::new()?;
            *slot = Some(runtime.clone());
            Ok(runtime)
        })
    }

    fn rebind(&self, root: Option<&Element>) -> Result<BindReport, JsValue> {
        let mut controller = self.controller.try_borrow_mut().map_err(|_| {
            JsValue::from_str("custom dropdown: re-initialization requested while handling a click")
        })?;
        Ok(match root {
            Some(root) => controller.rebind(&self.dom, root),
            None => controller.init(&self.dom),
        })
    }
}

/// Bind widgets on load and expose `window.initCustomDropdowns`.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let runtime = Runtime::get()?;
    install_global()?;

    match InitTiming::for_state(runtime.dom.ready_state()) {
        InitTiming::Immediate => {
            runtime.rebind(None)?;
        }
        InitTiming::OnContentLoaded => {
            let document = runtime.dom.document().clone();
            let on_ready = Closure::once_into_js(move || {
                if let Err(err) = runtime.rebind(None) {
                    web_sys::console::error_1(&err);
                }
            });
            document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        }
    }
    Ok(())
}

fn install_global() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let init = Closure::<dyn Fn()>::new(|| {
        if let Err(err) = rebind(None) {
            web_sys::console::warn_1(&err);
        }
    });
    js_sys::Reflect::set(&window, &JsValue::from_str("initCustomDropdowns"), init.as_ref())?;
    // Owned by the window for the page lifetime.
    init.forget();
    Ok(())
}

/// Bind widgets under `root` (the whole document when omitted).
///
/// Already bound widgets are skipped. Returns the number of widgets
/// bound by this call.
#[wasm_bindgen]
pub fn rebind(root: Option<Element>) -> Result<u32, JsValue> {
    let report = Runtime::get()?.rebind(root.as_ref())?;
    Ok(u32::try_from(report.bound.len()).unwrap_or(u32::MAX))
}

/// Replace the class and attribute names from a JSON object. Applies to
/// widgets bound afterwards; open and selected classes apply immediately.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = SelectConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let runtime = Runtime::get()?;
    let mut controller = runtime
        .controller
        .try_borrow_mut()
        .map_err(|_| JsValue::from_str("custom dropdown: configure called while handling a click"))?;
    controller.set_config(config);
    Ok(())
}
