//! Capabilities the behaviors need from the page.
//!
//! The browser implementation lives in `web::dom`; host-side tests provide an
//! in-memory page instead.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("clipboard is not available in this context")]
    ClipboardUnavailable,
    #[error("clipboard write rejected: {0}")]
    ClipboardRejected(String),
    #[error("js error: {0}")]
    Js(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTarget<E> {
    Element(E),
    Document,
    Window,
}

/// The parts of a DOM event the behaviors look at.
pub struct DomEvent<E> {
    pub target: Option<E>,
    /// `relatedTarget` for focus events.
    pub related: Option<E>,
    /// `key` for keyboard events.
    pub key: Option<String>,
    default_prevented: Cell<bool>,
}

impl<E> DomEvent<E> {
    pub fn new(target: Option<E>) -> Self {
        Self {
            target,
            related: None,
            key: None,
            default_prevented: Cell::new(false),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_related(mut self, related: Option<E>) -> Self {
        self.related = related;
        self
    }

    /// Honoured by the host once the handler returns.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

pub struct Intersection<E> {
    pub target: E,
    pub is_intersecting: bool,
}

pub type Handler<E> = Rc<dyn Fn(&DomEvent<E>)>;
pub type IntersectionCallback<E> = Rc<dyn Fn(&[Intersection<E>])>;
pub type ClipboardDone = Box<dyn FnOnce(Result<(), HostError>)>;

pub trait Dom {
    type Element: Clone + PartialEq + 'static;

    fn query(&self, selector: &str) -> Option<Self::Element>;
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
    fn query_within(&self, root: &Self::Element, selector: &str) -> Vec<Self::Element>;
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;

    fn create_element(&self, tag: &str) -> Option<Self::Element>;
    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> bool;
    /// Insert `node` into `reference`'s parent, just before `reference`.
    fn insert_before(&self, reference: &Self::Element, node: &Self::Element) -> bool;
    fn remove(&self, el: &Self::Element);

    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str);
    fn has_class(&self, el: &Self::Element, class: &str) -> bool;
    fn add_class(&self, el: &Self::Element, class: &str);
    fn remove_class(&self, el: &Self::Element, class: &str);
    /// Returns whether the class is present afterwards.
    fn toggle_class(&self, el: &Self::Element, class: &str) -> bool;
    fn set_style(&self, el: &Self::Element, property: &str, value: &str);
    fn text_content(&self, el: &Self::Element) -> String;
    fn set_text(&self, el: &Self::Element, text: &str);

    /// True when `node` is `ancestor` or lies inside it.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;
    fn focus(&self, el: &Self::Element);
    fn offset_height(&self, el: &Self::Element) -> f64;
    /// Top edge relative to the viewport.
    fn viewport_top(&self, el: &Self::Element) -> f64;
}

pub trait Viewport {
    fn scroll_y(&self) -> f64;
    /// Smooth-scroll the window to the document offset `top`.
    fn smooth_scroll_to(&self, top: f64);
    /// Record `fragment` (e.g. `#intro`) in history without scrolling.
    fn push_fragment(&self, fragment: &str);
}

pub trait Events: Dom {
    fn listen(
        &self,
        target: EventTarget<Self::Element>,
        event: &str,
        handler: Handler<Self::Element>,
    ) -> ListenerId;
    fn unlisten(&self, id: ListenerId);
    fn observe_intersections(
        &self,
        targets: &[Self::Element],
        root_margin: &str,
        callback: IntersectionCallback<Self::Element>,
    ) -> ObserverId;
    fn disconnect(&self, id: ObserverId);
}

pub trait Clipboard {
    fn write_text(&self, text: String, done: ClipboardDone);
}

pub trait Timers {
    fn set_timeout(&self, delay_ms: u32, f: Box<dyn FnOnce()>) -> TimerId;
    fn clear_timeout(&self, id: TimerId);
}

pub trait Host: Dom + Viewport + Events + Clipboard + Timers + 'static {}

impl<T> Host for T where T: Dom + Viewport + Events + Clipboard + Timers + 'static {}
