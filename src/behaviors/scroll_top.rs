use crate::config::ThemeConfig;
use crate::constants::{
    SCROLL_TOP_CLASS, SCROLL_TOP_HOVER_TRANSFORM, SCROLL_TOP_REST_TRANSFORM, SCROLL_TOP_STYLE,
};
use crate::host::{EventTarget, Host};
use crate::rate_limit::{Debounced, Throttled};
use crate::teardown::Teardown;
use std::rc::Rc;

/// Shown strictly above the threshold.
#[inline]
pub fn top_button_visible(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

fn apply_visibility<H: Host>(host: &H, button: &H::Element, threshold: f64) {
    if top_button_visible(host.scroll_y(), threshold) {
        host.set_style(button, "opacity", "1");
        host.set_style(button, "visibility", "visible");
    } else {
        host.set_style(button, "opacity", "0");
        host.set_style(button, "visibility", "hidden");
    }
}

pub fn mount<H: Host>(host: &Rc<H>, config: &ThemeConfig) -> Teardown {
    let mut teardown = Teardown::default();
    let Some(body) = host.body() else {
        log::debug!("[scroll-top] no body, skipping");
        return teardown;
    };
    let Some(button) = host.create_element("button") else {
        return teardown;
    };

    host.add_class(&button, SCROLL_TOP_CLASS);
    host.set_text(&button, &config.labels.scroll_top);
    host.set_attribute(&button, "aria-label", &config.labels.scroll_top_aria);
    for (prop, value) in SCROLL_TOP_STYLE {
        host.set_style(&button, prop, value);
    }
    host.append_child(&body, &button);
    {
        let h = host.clone();
        let b = button.clone();
        teardown.push(move || h.remove(&b));
    }

    let threshold = config.scroll_top_threshold_px;
    let update: Rc<dyn Fn()> = {
        let h = host.clone();
        let b = button.clone();
        Rc::new(move || apply_visibility(&*h, &b, threshold))
    };
    update();

    match config.scroll_throttle_ms {
        None => {
            let u = update.clone();
            teardown.listen(host, EventTarget::Window, "scroll", move |_| u());
        }
        Some(ms) => {
            // leading edge for responsiveness, trailing edge so the resting
            // position always wins
            let u = update.clone();
            let leading = Throttled::new(host.clone(), ms, move |()| u());
            let u = update.clone();
            let trailing = Debounced::new(host.clone(), ms, move |()| u());
            {
                let (l, t) = (leading.clone(), trailing.clone());
                teardown.push(move || {
                    l.cancel();
                    t.cancel();
                });
            }
            teardown.listen(host, EventTarget::Window, "scroll", move |_| {
                leading.call(());
                trailing.call(());
            });
        }
    }

    let h = host.clone();
    teardown.listen(host, EventTarget::Element(button.clone()), "click", move |_| {
        h.smooth_scroll_to(0.0);
    });
    let h = host.clone();
    let b = button.clone();
    teardown.listen(host, EventTarget::Element(button.clone()), "mouseenter", move |_| {
        h.set_style(&b, "transform", SCROLL_TOP_HOVER_TRANSFORM);
    });
    let h = host.clone();
    let b = button.clone();
    teardown.listen(host, EventTarget::Element(button), "mouseleave", move |_| {
        h.set_style(&b, "transform", SCROLL_TOP_REST_TRANSFORM);
    });

    teardown
}
