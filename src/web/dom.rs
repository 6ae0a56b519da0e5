use crate::host::{
    Clipboard, ClipboardDone, Dom, DomEvent, EventTarget, Events, Handler, HostError,
    Intersection, IntersectionCallback, ListenerId, ObserverId, TimerId, Timers,
    Viewport,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

type EventClosure = Closure<dyn FnMut(web::Event)>;
type ObserverClosure = Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>;

struct Listener {
    target: web::EventTarget,
    event: String,
    closure: EventClosure,
}

/// The live page. Owns every closure it hands to the browser so listeners
/// and observers can be released again.
pub struct WebHost {
    window: web::Window,
    document: web::Document,
    next_id: Cell<u32>,
    listeners: RefCell<HashMap<u32, Listener>>,
    observers: RefCell<HashMap<u32, (web::IntersectionObserver, ObserverClosure)>>,
}

impl WebHost {
    pub fn new() -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;
        Ok(Self {
            window,
            document,
            next_id: Cell::new(1),
            listeners: RefCell::new(HashMap::new()),
            observers: RefCell::new(HashMap::new()),
        })
    }

    fn allocate_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        id
    }

    fn event_target(&self, target: EventTarget<web::Element>) -> web::EventTarget {
        match target {
            EventTarget::Element(el) => el.into(),
            EventTarget::Document => self.document.clone().into(),
            EventTarget::Window => self.window.clone().into(),
        }
    }
}

#[inline]
fn as_element(target: Option<web::EventTarget>) -> Option<web::Element> {
    target.and_then(|t| t.dyn_into::<web::Element>().ok())
}

#[inline]
fn collect_elements(list: web::NodeList) -> Vec<web::Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web::Element>().ok())
        .collect()
}

impl Dom for WebHost {
    type Element = web::Element;

    fn query(&self, selector: &str) -> Option<web::Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(e) => {
                log::debug!("[dom] bad selector {:?}: {:?}", selector, e);
                None
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<web::Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => collect_elements(list),
            Err(e) => {
                log::debug!("[dom] bad selector {:?}: {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn query_within(&self, root: &web::Element, selector: &str) -> Vec<web::Element> {
        root.query_selector_all(selector)
            .map(collect_elements)
            .unwrap_or_default()
    }

    fn element_by_id(&self, id: &str) -> Option<web::Element> {
        self.document.get_element_by_id(id)
    }

    fn body(&self) -> Option<web::Element> {
        self.document.body().map(Into::into)
    }

    fn parent(&self, el: &web::Element) -> Option<web::Element> {
        el.parent_element()
    }

    fn create_element(&self, tag: &str) -> Option<web::Element> {
        self.document.create_element(tag).ok()
    }

    fn append_child(&self, parent: &web::Element, child: &web::Element) -> bool {
        parent.append_child(child).is_ok()
    }

    fn insert_before(&self, reference: &web::Element, node: &web::Element) -> bool {
        match reference.parent_node() {
            Some(parent) => {
                let reference: &web::Node = reference;
                parent.insert_before(node, Some(reference)).is_ok()
            }
            None => false,
        }
    }

    fn remove(&self, el: &web::Element) {
        el.remove();
    }

    fn attribute(&self, el: &web::Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&self, el: &web::Element, name: &str, value: &str) {
        _ = el.set_attribute(name, value);
    }

    fn has_class(&self, el: &web::Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn add_class(&self, el: &web::Element, class: &str) {
        _ = el.class_list().add_1(class);
    }

    fn remove_class(&self, el: &web::Element, class: &str) {
        _ = el.class_list().remove_1(class);
    }

    fn toggle_class(&self, el: &web::Element, class: &str) -> bool {
        el.class_list()
            .toggle(class)
            .unwrap_or_else(|_| el.class_list().contains(class))
    }

    fn set_style(&self, el: &web::Element, property: &str, value: &str) {
        if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
            _ = html.style().set_property(property, value);
        }
    }

    fn text_content(&self, el: &web::Element) -> String {
        el.text_content().unwrap_or_default()
    }

    fn set_text(&self, el: &web::Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn contains(&self, ancestor: &web::Element, node: &web::Element) -> bool {
        let node: &web::Node = node;
        ancestor.contains(Some(node))
    }

    fn focus(&self, el: &web::Element) {
        if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
            _ = html.focus();
        }
    }

    fn offset_height(&self, el: &web::Element) -> f64 {
        el.dyn_ref::<web::HtmlElement>()
            .map(|html| html.offset_height() as f64)
            .unwrap_or(0.0)
    }

    fn viewport_top(&self, el: &web::Element) -> f64 {
        el.get_bounding_client_rect().top()
    }
}

impl Viewport for WebHost {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let opts = web::ScrollToOptions::new();
        opts.set_top(top);
        opts.set_behavior(web::ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&opts);
    }

    fn push_fragment(&self, fragment: &str) {
        match self.window.history() {
            Ok(history) => {
                if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(fragment)) {
                    log::warn!("[history] pushState failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("[history] unavailable: {:?}", e),
        }
    }
}

impl Events for WebHost {
    fn listen(
        &self,
        target: EventTarget<web::Element>,
        event: &str,
        handler: Handler<web::Element>,
    ) -> ListenerId {
        let id = self.allocate_id();
        let target = self.event_target(target);
        let closure = Closure::wrap(Box::new(move |ev: web::Event| {
            let mut dom_ev = DomEvent::new(as_element(ev.target()));
            if let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() {
                dom_ev = dom_ev.with_key(kev.key());
            }
            if let Some(fev) = ev.dyn_ref::<web::FocusEvent>() {
                dom_ev = dom_ev.with_related(as_element(fev.related_target()));
            }
            handler(&dom_ev);
            if dom_ev.default_prevented() {
                ev.prevent_default();
            }
        }) as Box<dyn FnMut(_)>);
        _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        self.listeners.borrow_mut().insert(
            id,
            Listener {
                target,
                event: event.to_string(),
                closure,
            },
        );
        ListenerId(id)
    }

    fn unlisten(&self, id: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(&id.0);
        if let Some(l) = removed {
            _ = l
                .target
                .remove_event_listener_with_callback(&l.event, l.closure.as_ref().unchecked_ref());
        }
    }

    fn observe_intersections(
        &self,
        targets: &[web::Element],
        root_margin: &str,
        callback: IntersectionCallback<web::Element>,
    ) -> ObserverId {
        let id = self.allocate_id();
        let closure = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web::IntersectionObserver| {
                let batch: Vec<Intersection<web::Element>> = entries
                    .iter()
                    .filter_map(|v| v.dyn_into::<web::IntersectionObserverEntry>().ok())
                    .map(|entry| Intersection {
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                    })
                    .collect();
                callback(batch.as_slice());
            },
        ) as Box<dyn FnMut(_, _)>);

        let init = web::IntersectionObserverInit::new();
        init.set_root_margin(root_margin);
        match web::IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                for target in targets {
                    observer.observe(target);
                }
                self.observers.borrow_mut().insert(id, (observer, closure));
            }
            Err(e) => {
                let err = HostError::Js(format!("{:?}", e));
                log::error!("[observer] {}", err);
            }
        }
        ObserverId(id)
    }

    fn disconnect(&self, id: ObserverId) {
        let removed = self.observers.borrow_mut().remove(&id.0);
        if let Some((observer, _closure)) = removed {
            observer.disconnect();
        }
    }
}

impl Clipboard for WebHost {
    fn write_text(&self, text: String, done: ClipboardDone) {
        let navigator = self.window.navigator();
        // insecure contexts have no clipboard at all
        let available = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map(|v| !v.is_undefined() && !v.is_null())
            .unwrap_or(false);
        let promise = available.then(|| navigator.clipboard().write_text(&text));
        spawn_local(async move {
            let result = match promise {
                Some(p) => JsFuture::from(p)
                    .await
                    .map(|_| ())
                    .map_err(|e| HostError::ClipboardRejected(format!("{:?}", e))),
                None => Err(HostError::ClipboardUnavailable),
            };
            done(result);
        });
    }
}

impl Timers for WebHost {
    fn set_timeout(&self, delay_ms: u32, f: Box<dyn FnOnce()>) -> TimerId {
        let callback = Closure::once_into_js(move || f());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            Ok(handle) => TimerId(handle),
            Err(e) => {
                log::error!("[timer] setTimeout failed: {:?}", e);
                TimerId(-1)
            }
        }
    }

    fn clear_timeout(&self, id: TimerId) {
        if id.0 >= 0 {
            self.window.clear_timeout_with_handle(id.0);
        }
    }
}
