use crate::config::ThemeConfig;
use crate::host::{EventTarget, Host};
use crate::teardown::Teardown;
use std::rc::Rc;

/// Document offset to scroll to so the target sits just below the fixed
/// header.
#[inline]
pub fn scroll_destination(viewport_top: f64, scroll_y: f64, header_height: f64, margin: f64) -> f64 {
    viewport_top + scroll_y - header_height - margin
}

/// The element id a same-page link points at, if any. A bare `#` has none.
#[inline]
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub fn mount<H: Host>(host: &Rc<H>, config: &ThemeConfig) -> Teardown {
    let mut teardown = Teardown::default();
    let anchors = host.query_all(&config.selectors.anchor_links);
    log::debug!("[anchors] {} same-page links", anchors.len());

    for anchor in anchors {
        let h = host.clone();
        let link = anchor.clone();
        let header_selector = config.selectors.site_header.clone();
        let margin = config.anchor_scroll_margin_px;
        teardown.listen(host, EventTarget::Element(anchor), "click", move |ev| {
            let Some(href) = h.attribute(&link, "href") else {
                return;
            };
            let Some(target) = fragment_id(&href).and_then(|id| h.element_by_id(id)) else {
                return;
            };
            ev.prevent_default();

            let header_height = h
                .query(&header_selector)
                .map(|header| h.offset_height(&header))
                .unwrap_or(0.0);
            let top = scroll_destination(h.viewport_top(&target), h.scroll_y(), header_height, margin);
            h.smooth_scroll_to(top);
            h.push_fragment(&href);
        });
    }

    teardown
}
