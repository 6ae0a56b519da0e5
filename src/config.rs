use crate::constants::*;
use serde::Deserialize;

/// Runtime configuration for [`crate::mount`].
///
/// Every field has a default matching the theme's markup, so a partial JS
/// object (`{ "scrollThrottleMs": 50 }`) deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeConfig {
    pub selectors: Selectors,
    pub labels: Labels,
    pub anchor_scroll_margin_px: f64,
    pub active_root_margin: String,
    pub copy_feedback_ms: u32,
    pub scroll_top_threshold_px: f64,
    /// `None` keeps the back-to-top visibility check on every scroll event.
    pub scroll_throttle_ms: Option<u32>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            labels: Labels::default(),
            anchor_scroll_margin_px: ANCHOR_SCROLL_MARGIN_PX,
            active_root_margin: ACTIVE_SECTION_ROOT_MARGIN.to_string(),
            copy_feedback_ms: COPY_FEEDBACK_MS,
            scroll_top_threshold_px: SCROLL_TOP_THRESHOLD_PX,
            scroll_throttle_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Selectors {
    pub menu_toggle: String,
    pub main_nav: String,
    pub nav_link: String,
    pub site_header: String,
    pub anchor_links: String,
    pub sections: String,
    pub sidebar_links: String,
    pub code_blocks: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            menu_toggle: MENU_TOGGLE_SELECTOR.to_string(),
            main_nav: MAIN_NAV_SELECTOR.to_string(),
            nav_link: NAV_LINK_SELECTOR.to_string(),
            site_header: SITE_HEADER_SELECTOR.to_string(),
            anchor_links: ANCHOR_LINK_SELECTOR.to_string(),
            sections: SECTION_SELECTOR.to_string(),
            sidebar_links: SIDEBAR_LINK_SELECTOR.to_string(),
            code_blocks: CODE_BLOCK_SELECTOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Labels {
    pub copy_idle: String,
    pub copy_success: String,
    pub copy_error: String,
    pub scroll_top: String,
    pub scroll_top_aria: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            copy_idle: COPY_IDLE_LABEL.to_string(),
            copy_success: COPY_SUCCESS_LABEL.to_string(),
            copy_error: COPY_ERROR_LABEL.to_string(),
            scroll_top: SCROLL_TOP_LABEL.to_string(),
            scroll_top_aria: SCROLL_TOP_ARIA_LABEL.to_string(),
        }
    }
}
