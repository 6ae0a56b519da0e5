// In-memory page used by the host-side tests: a small element tree with a
// selector matcher, bubbling event dispatch, a virtual clock and a clipboard
// whose writes settle when the test says so.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use theme_behaviors::host::{
    Clipboard, ClipboardDone, Dom, DomEvent, EventTarget, Events, Handler, HostError,
    Intersection, IntersectionCallback, ListenerId, ObserverId, TimerId, Timers,
    Viewport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
    top: f64,
    height: f64,
}

struct Timer {
    id: i32,
    due: u64,
    f: Box<dyn FnOnce()>,
}

pub struct FakePage {
    nodes: RefCell<Vec<Node>>,
    root: NodeId,
    body: NodeId,
    scroll_y: Cell<f64>,
    scrolls: RefCell<Vec<f64>>,
    history: RefCell<Vec<String>>,
    focused: Cell<Option<NodeId>>,
    next_id: Cell<u32>,
    listeners: RefCell<Vec<(u32, EventTarget<NodeId>, String, Handler<NodeId>)>>,
    observers: RefCell<Vec<(u32, Vec<NodeId>, String, IntersectionCallback<NodeId>)>>,
    now: Cell<u64>,
    timers: RefCell<Vec<Timer>>,
    next_timer: Cell<i32>,
    clipboard_accepts: Cell<bool>,
    clipboard_pending: RefCell<Vec<(String, ClipboardDone)>>,
    clipboard: RefCell<Vec<String>>,
}

impl FakePage {
    pub fn new() -> Rc<Self> {
        let nodes = vec![
            Node {
                tag: "html".into(),
                children: vec![1],
                ..Node::default()
            },
            Node {
                tag: "body".into(),
                parent: Some(0),
                ..Node::default()
            },
        ];
        Rc::new(Self {
            nodes: RefCell::new(nodes),
            root: NodeId(0),
            body: NodeId(1),
            scroll_y: Cell::new(0.0),
            scrolls: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
            focused: Cell::new(None),
            next_id: Cell::new(1),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            now: Cell::new(0),
            timers: RefCell::new(Vec::new()),
            next_timer: Cell::new(1),
            clipboard_accepts: Cell::new(true),
            clipboard_pending: RefCell::new(Vec::new()),
            clipboard: RefCell::new(Vec::new()),
        })
    }

    // ---------------- building ----------------

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    /// Append a new element under `parent`. A `class` attribute is split into
    /// the class list.
    pub fn add(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = nodes.len();
        let mut node = Node {
            tag: tag.to_string(),
            parent: Some(parent.0),
            ..Node::default()
        };
        for (k, v) in attrs {
            if *k == "class" {
                node.classes = v.split_whitespace().map(str::to_string).collect();
            } else {
                node.attrs.insert(k.to_string(), v.to_string());
            }
        }
        nodes.push(node);
        nodes[parent.0].children.push(id);
        NodeId(id)
    }

    pub fn add_text(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let id = self.add(parent, tag, attrs);
        self.nodes.borrow_mut()[id.0].text = text.to_string();
        id
    }

    /// Document-relative top and rendered height.
    pub fn set_geometry(&self, id: NodeId, top: f64, height: f64) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[id.0].top = top;
        nodes[id.0].height = height;
    }

    // ---------------- inspection ----------------

    pub fn style(&self, id: NodeId, prop: &str) -> Option<String> {
        self.nodes.borrow()[id.0].style.get(prop).cloned()
    }

    pub fn has_class_on(&self, id: NodeId, class: &str) -> bool {
        self.nodes.borrow()[id.0].classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.attribute(&id, name)
    }

    pub fn text(&self, id: NodeId) -> String {
        self.text_content(&id)
    }

    pub fn tag(&self, id: NodeId) -> String {
        self.nodes.borrow()[id.0].tag.clone()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[id.0].parent.map(NodeId)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[id.0].children.iter().copied().map(NodeId).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn mutation_snapshot(&self) -> String {
        let nodes = self.nodes.borrow();
        nodes
            .iter()
            .map(|n| format!("{}|{:?}|{:?}|{:?}|{}|{:?}|{:?}", n.tag, n.attrs, n.classes, n.style, n.text, n.parent, n.children))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Targets of every smooth scroll so far.
    pub fn scrolls(&self) -> Vec<f64> {
        self.scrolls.borrow().clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn observer_margins(&self) -> Vec<String> {
        self.observers.borrow().iter().map(|(_, _, m, _)| m.clone()).collect()
    }

    pub fn observed_targets(&self) -> Vec<NodeId> {
        self.observers
            .borrow()
            .iter()
            .flat_map(|(_, t, _, _)| t.clone())
            .collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn copied(&self) -> Vec<String> {
        self.clipboard.borrow().clone()
    }

    pub fn pending_copies(&self) -> usize {
        self.clipboard_pending.borrow().len()
    }

    // ---------------- driving ----------------

    fn bubble_path(&self, from: Option<NodeId>) -> Vec<EventTarget<NodeId>> {
        let mut path = Vec::new();
        let mut cur = from.map(|n| n.0);
        while let Some(i) = cur {
            path.push(EventTarget::Element(NodeId(i)));
            cur = self.nodes.borrow()[i].parent;
        }
        path.push(EventTarget::Document);
        path.push(EventTarget::Window);
        path
    }

    fn dispatch(&self, path: Vec<EventTarget<NodeId>>, name: &str, ev: &DomEvent<NodeId>) {
        for target in path {
            let handlers: Vec<Handler<NodeId>> = self
                .listeners
                .borrow()
                .iter()
                .filter(|(_, t, n, _)| *t == target && n == name)
                .map(|(_, _, _, h)| h.clone())
                .collect();
            for h in handlers {
                h(ev);
            }
        }
    }

    /// Click `node`; the event bubbles up to the document and window.
    pub fn click(&self, node: NodeId) -> DomEvent<NodeId> {
        let ev = DomEvent::new(Some(node));
        self.dispatch(self.bubble_path(Some(node)), "click", &ev);
        ev
    }

    /// Key press delivered to the focused element (or body).
    pub fn press(&self, key: &str) -> DomEvent<NodeId> {
        let target = self.focused.get().unwrap_or(self.body);
        let ev = DomEvent::new(Some(target)).with_key(key);
        self.dispatch(self.bubble_path(Some(target)), "keydown", &ev);
        ev
    }

    pub fn focus_out(&self, from: NodeId, to: Option<NodeId>) {
        self.focused.set(to);
        let ev = DomEvent::new(Some(from)).with_related(to);
        self.dispatch(self.bubble_path(Some(from)), "focusout", &ev);
    }

    pub fn hover(&self, node: NodeId) {
        let ev = DomEvent::new(Some(node));
        self.dispatch(vec![EventTarget::Element(node)], "mouseenter", &ev);
    }

    pub fn unhover(&self, node: NodeId) {
        let ev = DomEvent::new(Some(node));
        self.dispatch(vec![EventTarget::Element(node)], "mouseleave", &ev);
    }

    /// Jump the page to `y` and fire a window scroll event.
    pub fn scroll_page(&self, y: f64) {
        self.scroll_y.set(y);
        let ev = DomEvent::new(None);
        self.dispatch(vec![EventTarget::Window], "scroll", &ev);
    }

    /// Deliver one intersection batch to every observer watching the targets.
    pub fn intersect(&self, entries: &[(NodeId, bool)]) {
        let observers: Vec<(Vec<NodeId>, IntersectionCallback<NodeId>)> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, t, _, cb)| (t.clone(), cb.clone()))
            .collect();
        for (targets, cb) in observers {
            let batch: Vec<Intersection<NodeId>> = entries
                .iter()
                .filter(|(n, _)| targets.contains(n))
                .map(|(n, hit)| Intersection {
                    target: *n,
                    is_intersecting: *hit,
                })
                .collect();
            if !batch.is_empty() {
                cb(batch.as_slice());
            }
        }
    }

    /// Move the virtual clock forward, firing due timers in order.
    pub fn advance(&self, ms: u64) {
        let end = self.now.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let idx = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= end)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                idx.map(|i| timers.remove(i))
            };
            match next {
                Some(timer) => {
                    self.now.set(timer.due);
                    (timer.f)();
                }
                None => break,
            }
        }
        self.now.set(end);
    }

    pub fn reject_clipboard(&self) {
        self.clipboard_accepts.set(false);
    }

    /// Resolve every outstanding clipboard write.
    pub fn settle_clipboard(&self) {
        let pending: Vec<(String, ClipboardDone)> =
            self.clipboard_pending.borrow_mut().drain(..).collect();
        for (text, done) in pending {
            if self.clipboard_accepts.get() {
                self.clipboard.borrow_mut().push(text);
                done(Ok(()));
            } else {
                done(Err(HostError::ClipboardRejected("NotAllowedError".into())));
            }
        }
    }

    // ---------------- tree helpers ----------------

    fn detach(nodes: &mut [Node], id: usize) {
        if let Some(p) = nodes[id].parent.take() {
            nodes[p].children.retain(|c| *c != id);
        }
    }

    fn preorder(&self, from: usize, out: &mut Vec<usize>) {
        let children = self.nodes.borrow()[from].children.clone();
        for c in children {
            out.push(c);
            self.preorder(c, out);
        }
    }

    fn matches(&self, id: usize, selector: &str) -> bool {
        selector.split(',').any(|alt| {
            let chain: Vec<Compound> = alt.split_whitespace().map(Compound::parse).collect();
            !chain.is_empty() && self.matches_chain(id, &chain)
        })
    }

    fn matches_chain(&self, id: usize, chain: &[Compound]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return true;
        };
        if !last.matches(&self.nodes.borrow()[id]) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        let mut cur = self.nodes.borrow()[id].parent;
        while let Some(a) = cur {
            if self.matches_chain(a, rest) {
                return true;
            }
            cur = self.nodes.borrow()[a].parent;
        }
        false
    }
}

/// One compound selector: `tag.class#id[attr][attr^="v"]`.
#[derive(Default)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    id: Option<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(s: &str) -> Self {
        let mut c = Compound::default();
        let mut chars = s.chars().peekable();
        let mut tag = String::new();
        while let Some(&ch) = chars.peek() {
            if matches!(ch, '.' | '#' | '[') {
                break;
            }
            tag.push(ch);
            chars.next();
        }
        if !tag.is_empty() {
            c.tag = Some(tag);
        }
        while let Some(ch) = chars.next() {
            match ch {
                '.' | '#' => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if matches!(n, '.' | '#' | '[') {
                            break;
                        }
                        name.push(n);
                        chars.next();
                    }
                    if ch == '.' {
                        c.classes.push(name);
                    } else {
                        c.id = Some(name);
                    }
                }
                '[' => {
                    let inner: String = chars.by_ref().take_while(|n| *n != ']').collect();
                    match inner.split_once("^=") {
                        Some((name, value)) => c.attrs.push((
                            name.to_string(),
                            Some(value.trim_matches('"').to_string()),
                        )),
                        None => c.attrs.push((inner, None)),
                    }
                }
                _ => {}
            }
        }
        c
    }

    fn matches(&self, node: &Node) -> bool {
        if self.tag.as_ref().is_some_and(|t| *t != node.tag) {
            return false;
        }
        if !self.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        if self
            .id
            .as_ref()
            .is_some_and(|id| node.attrs.get("id") != Some(id))
        {
            return false;
        }
        self.attrs.iter().all(|(name, prefix)| match (node.attrs.get(name), prefix) {
            (Some(v), Some(p)) => v.starts_with(p.as_str()),
            (Some(_), None) => true,
            (None, _) => false,
        })
    }
}

impl Dom for FakePage {
    type Element = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.query_within(&self.root, selector)
    }

    fn query_within(&self, root: &NodeId, selector: &str) -> Vec<NodeId> {
        let mut order = Vec::new();
        self.preorder(root.0, &mut order);
        order
            .into_iter()
            .filter(|id| self.matches(*id, selector))
            .map(NodeId)
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut order = Vec::new();
        self.preorder(self.root.0, &mut order);
        order
            .into_iter()
            .find(|i| self.nodes.borrow()[*i].attrs.get("id").map(String::as_str) == Some(id))
            .map(NodeId)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn parent(&self, el: &NodeId) -> Option<NodeId> {
        self.parent_of(*el)
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        Some(NodeId(nodes.len() - 1))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        Self::detach(&mut nodes, child.0);
        nodes[child.0].parent = Some(parent.0);
        nodes[parent.0].children.push(child.0);
        true
    }

    fn insert_before(&self, reference: &NodeId, node: &NodeId) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        Self::detach(&mut nodes, node.0);
        let Some(p) = nodes[reference.0].parent else {
            return false;
        };
        let idx = nodes[p]
            .children
            .iter()
            .position(|c| *c == reference.0)
            .unwrap_or(nodes[p].children.len());
        nodes[p].children.insert(idx, node.0);
        nodes[node.0].parent = Some(p);
        true
    }

    fn remove(&self, el: &NodeId) {
        Self::detach(&mut self.nodes.borrow_mut(), el.0);
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        let node = &nodes[el.0];
        if name == "class" {
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        node.attrs.get(name).cloned()
    }

    fn set_attribute(&self, el: &NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[el.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn has_class(&self, el: &NodeId, class: &str) -> bool {
        self.has_class_on(*el, class)
    }

    fn add_class(&self, el: &NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        if !nodes[el.0].classes.iter().any(|c| c == class) {
            nodes[el.0].classes.push(class.to_string());
        }
    }

    fn remove_class(&self, el: &NodeId, class: &str) {
        self.nodes.borrow_mut()[el.0].classes.retain(|c| c != class);
    }

    fn toggle_class(&self, el: &NodeId, class: &str) -> bool {
        if self.has_class(el, class) {
            self.remove_class(el, class);
            false
        } else {
            self.add_class(el, class);
            true
        }
    }

    fn set_style(&self, el: &NodeId, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        if value.is_empty() {
            nodes[el.0].style.remove(property);
        } else {
            nodes[el.0]
                .style
                .insert(property.to_string(), value.to_string());
        }
    }

    fn text_content(&self, el: &NodeId) -> String {
        let mut out = self.nodes.borrow()[el.0].text.clone();
        for child in self.children(*el) {
            out.push_str(&self.text_content(&child));
        }
        out
    }

    fn set_text(&self, el: &NodeId, text: &str) {
        let children = self.children(*el);
        let mut nodes = self.nodes.borrow_mut();
        for c in children {
            Self::detach(&mut nodes, c.0);
        }
        nodes[el.0].text = text.to_string();
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut cur = Some(node.0);
        while let Some(i) = cur {
            if i == ancestor.0 {
                return true;
            }
            cur = self.nodes.borrow()[i].parent;
        }
        false
    }

    fn focus(&self, el: &NodeId) {
        self.focused.set(Some(*el));
    }

    fn offset_height(&self, el: &NodeId) -> f64 {
        self.nodes.borrow()[el.0].height
    }

    fn viewport_top(&self, el: &NodeId) -> f64 {
        self.nodes.borrow()[el.0].top - self.scroll_y.get()
    }
}

impl Viewport for FakePage {
    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scrolls.borrow_mut().push(top);
        self.scroll_y.set(top);
    }

    fn push_fragment(&self, fragment: &str) {
        self.history.borrow_mut().push(fragment.to_string());
    }
}

impl Events for FakePage {
    fn listen(&self, target: EventTarget<NodeId>, event: &str, handler: Handler<NodeId>) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .push((id, target, event.to_string(), handler));
        ListenerId(id)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(i, ..)| *i != id.0);
    }

    fn observe_intersections(
        &self,
        targets: &[NodeId],
        root_margin: &str,
        callback: IntersectionCallback<NodeId>,
    ) -> ObserverId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.observers
            .borrow_mut()
            .push((id, targets.to_vec(), root_margin.to_string(), callback));
        ObserverId(id)
    }

    fn disconnect(&self, id: ObserverId) {
        self.observers.borrow_mut().retain(|(i, ..)| *i != id.0);
    }
}

impl Clipboard for FakePage {
    fn write_text(&self, text: String, done: ClipboardDone) {
        self.clipboard_pending.borrow_mut().push((text, done));
    }
}

impl Timers for FakePage {
    fn set_timeout(&self, delay_ms: u32, f: Box<dyn FnOnce()>) -> TimerId {
        let id = self.next_timer.get();
        self.next_timer.set(id + 1);
        self.timers.borrow_mut().push(Timer {
            id,
            due: self.now.get() + u64::from(delay_ms),
            f,
        });
        TimerId(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().retain(|t| t.id != id.0);
    }
}

/// A page shaped like the theme's article template.
pub struct ThemePage {
    pub page: Rc<FakePage>,
    pub header: NodeId,
    pub toggle: NodeId,
    pub nav: NodeId,
    pub nav_links: Vec<NodeId>,
    pub sidebar_links: Vec<NodeId>,
    pub sections: Vec<NodeId>,
    pub content: NodeId,
    pub pres: Vec<NodeId>,
    pub codes: Vec<NodeId>,
}

pub fn theme_page() -> ThemePage {
    let page = FakePage::new();
    let body = page.body_id();

    let header = page.add(body, "header", &[("class", "site-header")]);
    page.set_geometry(header, 0.0, 64.0);
    let toggle = page.add(
        header,
        "button",
        &[("class", "mobile-menu-toggle"), ("aria-expanded", "false")],
    );
    let nav = page.add(header, "nav", &[("class", "main-nav")]);
    let nav_links = vec![
        page.add(nav, "a", &[("class", "nav-link"), ("href", "/")]),
        page.add(nav, "a", &[("class", "nav-link"), ("href", "/docs/")]),
    ];

    let sidebar = page.add(body, "aside", &[("class", "sidebar-nav")]);
    let sidebar_links = vec![
        page.add(sidebar, "a", &[("href", "#install")]),
        page.add(sidebar, "a", &[("href", "#usage")]),
        page.add(sidebar, "a", &[("href", "#")]),
    ];

    let content = page.add(body, "main", &[("class", "content")]);
    let install = page.add_text(content, "h2", &[("id", "install")], "Install");
    page.set_geometry(install, 1000.0, 40.0);
    let usage = page.add_text(content, "h3", &[("id", "usage")], "Usage");
    page.set_geometry(usage, 2400.0, 32.0);
    // no id, never observed
    page.add_text(content, "h2", &[], "Untitled");

    let mut pres = Vec::new();
    let mut codes = Vec::new();
    for src in ["cargo add theme-behaviors", "fn main() {}\n"] {
        let pre = page.add(content, "pre", &[]);
        let code = page.add_text(pre, "code", &[], src);
        pres.push(pre);
        codes.push(code);
    }

    ThemePage {
        page,
        header,
        toggle,
        nav,
        nav_links,
        sidebar_links,
        sections: vec![install, usage],
        content,
        pres,
        codes,
    }
}
