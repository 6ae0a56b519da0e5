use crate::config::ThemeConfig;
use crate::constants::MENU_OPEN_CLASS;
use crate::host::{EventTarget, Host};
use crate::teardown::Teardown;
use std::rc::Rc;

/// Toggle control plus the navigation container it opens.
struct MobileMenu<H: Host> {
    host: Rc<H>,
    toggle: H::Element,
    nav: H::Element,
}

impl<H: Host> MobileMenu<H> {
    fn is_open(&self) -> bool {
        self.host.has_class(&self.nav, MENU_OPEN_CLASS)
    }

    fn flip(&self) {
        let open = self.host.toggle_class(&self.nav, MENU_OPEN_CLASS);
        self.sync(open);
        log::debug!("[menu] open={}", open);
    }

    fn close(&self) {
        self.host.remove_class(&self.nav, MENU_OPEN_CLASS);
        self.sync(false);
    }

    fn sync(&self, open: bool) {
        self.host.set_attribute(
            &self.toggle,
            "aria-expanded",
            if open { "true" } else { "false" },
        );
        // block background scrolling while the menu covers the page
        if let Some(body) = self.host.body() {
            self.host
                .set_style(&body, "overflow", if open { "hidden" } else { "" });
        }
    }

    fn is_outside(&self, node: &H::Element) -> bool {
        !self.host.contains(&self.nav, node) && !self.host.contains(&self.toggle, node)
    }
}

pub fn mount<H: Host>(host: &Rc<H>, config: &ThemeConfig) -> Teardown {
    let mut teardown = Teardown::default();
    let (Some(toggle), Some(nav)) = (
        host.query(&config.selectors.menu_toggle),
        host.query(&config.selectors.main_nav),
    ) else {
        log::debug!("[menu] toggle or nav container missing, skipping");
        return teardown;
    };

    let menu = Rc::new(MobileMenu {
        host: host.clone(),
        toggle: toggle.clone(),
        nav: nav.clone(),
    });

    let m = menu.clone();
    teardown.listen(host, EventTarget::Element(toggle), "click", move |_| {
        m.flip();
    });

    for link in host.query_within(&nav, &config.selectors.nav_link) {
        let m = menu.clone();
        teardown.listen(host, EventTarget::Element(link), "click", move |_| {
            m.close();
        });
    }

    let m = menu.clone();
    teardown.listen(host, EventTarget::Document, "click", move |ev| {
        if !m.is_open() {
            return;
        }
        let outside = ev.target.as_ref().map_or(true, |t| m.is_outside(t));
        if outside {
            m.close();
        }
    });

    let m = menu.clone();
    teardown.listen(host, EventTarget::Document, "keydown", move |ev| {
        if ev.key.as_deref() == Some("Escape") && m.is_open() {
            m.close();
            m.host.focus(&m.toggle);
        }
    });

    // Focus moving to something we know is outside closes the menu. A missing
    // related target is left to the outside-click handler.
    let m = menu;
    teardown.listen(host, EventTarget::Element(nav), "focusout", move |ev| {
        if let Some(next) = ev.related.as_ref() {
            if m.is_open() && m.is_outside(next) {
                m.close();
            }
        }
    });

    teardown
}
