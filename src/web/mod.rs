use crate::config::ThemeConfig;
use crate::rate_limit::{clamp_millis, Debounced, Throttled};
use crate::startup::{Request, Startup};
use crate::Behaviors;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod dom;

use dom::WebHost;

thread_local! {
    static MOUNTED: RefCell<Option<Behaviors>> = const { RefCell::new(None) };
    static STARTUP: RefCell<Startup> = RefCell::new(Startup::default());
}

// Closures cannot be variadic; this shim hands the receiver and the full
// argument list to Rust as a pair.
#[wasm_bindgen(inline_js = "export function capture_call(f) { return function (...args) { f(this, args); }; }")]
extern "C" {
    fn capture_call(f: &JsValue) -> js_sys::Function;
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn remount(config: &ThemeConfig) -> anyhow::Result<()> {
    // tear down first so code blocks are unwrapped before being wrapped again
    dispose_mounted();
    let host = Rc::new(WebHost::new()?);
    let mounted = crate::mount(host, config);
    MOUNTED.with(|m| *m.borrow_mut() = Some(mounted));
    Ok(())
}

fn dispose_mounted() -> bool {
    match MOUNTED.with(|m| m.borrow_mut().take()) {
        Some(previous) => {
            previous.dispose();
            true
        }
        None => false,
    }
}

fn apply(request: Request) -> anyhow::Result<()> {
    match request {
        Request::Mount(config) => remount(&config),
        Request::Unmount => {
            if dispose_mounted() {
                log::info!("theme-behaviors unmounted");
            }
            Ok(())
        }
    }
}

// Runs `request` now, or queues it until DOMContentLoaded.
fn submit(request: Request) -> anyhow::Result<()> {
    match STARTUP.with(|s| s.borrow_mut().request(request)) {
        Some(request) => apply(request),
        None => {
            log::debug!("document still loading, request queued");
            Ok(())
        }
    }
}

type Invocation = (JsValue, js_sys::Array);

fn invoke(func: &js_sys::Function, (this, args): Invocation, label: &str) {
    if let Err(e) = func.apply(&this, &args) {
        log::error!("[{}] callback threw: {:?}", label, e);
    }
}

fn wrap_debounce(func: js_sys::Function, wait_ms: u32) -> anyhow::Result<js_sys::Function> {
    let host = Rc::new(WebHost::new()?);
    let debounced = Debounced::new(host, wait_ms, move |call: Invocation| {
        invoke(&func, call, "debounce")
    });
    let closure = Closure::wrap(Box::new(move |this: JsValue, args: js_sys::Array| {
        debounced.call((this, args));
    }) as Box<dyn FnMut(_, _)>);
    Ok(capture_call(&closure.into_js_value()))
}

fn wrap_throttle(func: js_sys::Function, limit_ms: u32) -> anyhow::Result<js_sys::Function> {
    let host = Rc::new(WebHost::new()?);
    let throttled = Throttled::new(host, limit_ms, move |call: Invocation| {
        invoke(&func, call, "throttle")
    });
    let closure = Closure::wrap(Box::new(move |this: JsValue, args: js_sys::Array| {
        throttled.call((this, args));
    }) as Box<dyn FnMut(_, _)>);
    Ok(capture_call(&closure.into_js_value()))
}

// `window.ThemeUtils = { debounce, throttle }` for other scripts on the page
fn publish_theme_utils(window: &web::Window) -> anyhow::Result<()> {
    let utils = js_sys::Object::new();

    let debounce = Closure::wrap(Box::new(|func: js_sys::Function, wait: f64| -> JsValue {
        match wrap_debounce(func, clamp_millis(wait)) {
            Ok(f) => f.into(),
            Err(e) => {
                log::error!("[utils] debounce: {:?}", e);
                JsValue::UNDEFINED
            }
        }
    }) as Box<dyn FnMut(_, _) -> JsValue>);
    js_sys::Reflect::set(&utils, &"debounce".into(), &debounce.into_js_value()).map_err(js_err)?;

    let throttle = Closure::wrap(Box::new(|func: js_sys::Function, limit: f64| -> JsValue {
        match wrap_throttle(func, clamp_millis(limit)) {
            Ok(f) => f.into(),
            Err(e) => {
                log::error!("[utils] throttle: {:?}", e);
                JsValue::UNDEFINED
            }
        }
    }) as Box<dyn FnMut(_, _) -> JsValue>);
    js_sys::Reflect::set(&utils, &"throttle".into(), &throttle.into_js_value()).map_err(js_err)?;

    js_sys::Reflect::set(window, &"ThemeUtils".into(), &utils).map_err(js_err)?;
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("theme-behaviors starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    if let Err(e) = publish_theme_utils(&window) {
        log::warn!("ThemeUtils not published: {:?}", e);
    }

    let loading = document.ready_state() == "loading";
    STARTUP.with(|s| *s.borrow_mut() = Startup::new(loading));
    if loading {
        let on_ready = Closure::once_into_js(|| {
            if let Some(request) = STARTUP.with(|s| s.borrow_mut().document_ready()) {
                if let Err(e) = apply(request) {
                    log::error!("mount error: {:?}", e);
                }
            }
        });
        document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
            .map_err(js_err)?;
    } else {
        remount(&ThemeConfig::default())?;
    }
    Ok(())
}

/// Re-mount every behavior with a configuration object; missing fields keep
/// their defaults. Called before `DOMContentLoaded`, it replaces the default
/// mount that would otherwise run then.
#[wasm_bindgen(js_name = mountWithConfig)]
pub fn mount_with_config(config: JsValue) -> Result<(), JsValue> {
    let config = if config.is_undefined() || config.is_null() {
        ThemeConfig::default()
    } else {
        #[allow(deprecated)]
        let parsed: ThemeConfig = config
            .into_serde()
            .map_err(|e| JsValue::from_str(&format!("invalid theme config: {}", e)))?;
        parsed
    };
    submit(Request::Mount(config)).map_err(to_js)
}

/// Dispose every behavior. Before `DOMContentLoaded` this cancels the
/// pending mount.
#[wasm_bindgen]
pub fn unmount() {
    if let Err(e) = submit(Request::Unmount) {
        log::error!("unmount error: {:?}", e);
    }
}

/// `wait` is in milliseconds; negative or non-finite values mean 0. The
/// wrapped function is called with the `this` and arguments of the last call.
#[wasm_bindgen]
pub fn debounce(func: js_sys::Function, wait: f64) -> Result<js_sys::Function, JsValue> {
    wrap_debounce(func, clamp_millis(wait)).map_err(to_js)
}

/// `limit` is in milliseconds; negative or non-finite values mean 0. Calls
/// inside the window are dropped.
#[wasm_bindgen]
pub fn throttle(func: js_sys::Function, limit: f64) -> Result<js_sys::Function, JsValue> {
    wrap_throttle(func, clamp_millis(limit)).map_err(to_js)
}
