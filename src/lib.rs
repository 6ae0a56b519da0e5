//! Page behaviors for the static site theme.
//!
//! [`mount`] wires every behavior against a [`Host`]; in the browser the
//! `web` module provides the host and mounts on `DOMContentLoaded`.

use std::rc::Rc;

pub mod behaviors;
pub mod config;
pub mod constants;
pub mod host;
pub mod rate_limit;
pub mod startup;
pub mod teardown;
#[cfg(target_arch = "wasm32")]
mod web;

pub use behaviors::active_nav::link_targets;
pub use behaviors::anchors::{fragment_id, scroll_destination};
pub use behaviors::scroll_top::top_button_visible;
pub use config::{Labels, Selectors, ThemeConfig};
pub use host::{Host, HostError};
pub use rate_limit::{clamp_millis, debounce, throttle, Debounced, Throttled};
pub use startup::{Request, Startup};
pub use teardown::Teardown;

/// Handles for every mounted behavior, each disposable on its own.
#[derive(Debug, Default)]
pub struct Behaviors {
    pub menu: Teardown,
    pub anchors: Teardown,
    pub active_nav: Teardown,
    pub copy_code: Teardown,
    pub scroll_top: Teardown,
}

impl Behaviors {
    pub fn dispose(self) {
        self.menu.dispose();
        self.anchors.dispose();
        self.active_nav.dispose();
        self.copy_code.dispose();
        self.scroll_top.dispose();
    }
}

pub fn mount<H: Host>(host: Rc<H>, config: &ThemeConfig) -> Behaviors {
    let mounted = Behaviors {
        menu: behaviors::menu::mount(&host, config),
        anchors: behaviors::anchors::mount(&host, config),
        active_nav: behaviors::active_nav::mount(&host, config),
        copy_code: behaviors::copy_code::mount(&host, config),
        scroll_top: behaviors::scroll_top::mount(&host, config),
    };
    log::info!(
        "[theme] mounted: menu={} anchors={} active_nav={} copy_code={} scroll_top={}",
        !mounted.menu.is_empty(),
        !mounted.anchors.is_empty(),
        !mounted.active_nav.is_empty(),
        !mounted.copy_code.is_empty(),
        !mounted.scroll_top.is_empty()
    );
    mounted
}
