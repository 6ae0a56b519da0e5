use crate::config::ThemeConfig;
use crate::constants::ACTIVE_LINK_CLASS;
use crate::host::{Host, Intersection};
use crate::teardown::Teardown;
use std::rc::Rc;

#[inline]
pub fn link_targets(href: &str, id: &str) -> bool {
    href.strip_prefix('#') == Some(id)
}

pub fn mount<H: Host>(host: &Rc<H>, config: &ThemeConfig) -> Teardown {
    let mut teardown = Teardown::default();
    let sections = host.query_all(&config.selectors.sections);
    let links = host.query_all(&config.selectors.sidebar_links);
    if sections.is_empty() || links.is_empty() {
        log::debug!(
            "[active-nav] sections={} links={}, skipping",
            sections.len(),
            links.len()
        );
        return teardown;
    }

    let h = host.clone();
    let observer = host.observe_intersections(
        &sections,
        &config.active_root_margin,
        Rc::new(move |entries: &[Intersection<H::Element>]| {
            for entry in entries.iter().filter(|e| e.is_intersecting) {
                let Some(id) = h.attribute(&entry.target, "id") else {
                    continue;
                };
                for link in &links {
                    h.remove_class(link, ACTIVE_LINK_CLASS);
                    if h.attribute(link, "href").is_some_and(|href| link_targets(&href, &id)) {
                        h.add_class(link, ACTIVE_LINK_CLASS);
                    }
                }
            }
        }),
    );

    let h = host.clone();
    teardown.push(move || h.disconnect(observer));
    teardown
}
