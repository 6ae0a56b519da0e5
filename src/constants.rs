/// Markup contract and tuning constants for the theme behaviors.
///
/// Selectors and class names mirror the theme's templates; the numeric values
/// keep magic numbers out of the behavior code.

// Page structure
pub const MENU_TOGGLE_SELECTOR: &str = ".mobile-menu-toggle";
pub const MAIN_NAV_SELECTOR: &str = ".main-nav";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const SITE_HEADER_SELECTOR: &str = ".site-header";
pub const ANCHOR_LINK_SELECTOR: &str = "a[href^=\"#\"]";
pub const SECTION_SELECTOR: &str = "h2[id], h3[id]";
pub const SIDEBAR_LINK_SELECTOR: &str = ".sidebar-nav a";
pub const CODE_BLOCK_SELECTOR: &str = "pre code";

// Classes toggled or injected by the behaviors
pub const MENU_OPEN_CLASS: &str = "is-open";
pub const ACTIVE_LINK_CLASS: &str = "active";
pub const CODE_WRAPPER_CLASS: &str = "code-block-wrapper";
pub const COPY_BUTTON_CLASS: &str = "copy-code-btn";
pub const SCROLL_TOP_CLASS: &str = "scroll-to-top";

// Default labels
pub const COPY_IDLE_LABEL: &str = "📋 Copy";
pub const COPY_SUCCESS_LABEL: &str = "✅ Copied!";
pub const COPY_ERROR_LABEL: &str = "❌ Error";
pub const SCROLL_TOP_LABEL: &str = "↑";
pub const SCROLL_TOP_ARIA_LABEL: &str = "Back to top";

// Anchor scrolling: gap left between the fixed header and the target heading
pub const ANCHOR_SCROLL_MARGIN_PX: f64 = 20.0;

// Section highlight trigger band (top, right, bottom, left)
pub const ACTIVE_SECTION_ROOT_MARGIN: &str = "-20% 0px -80% 0px";

// Copy button feedback duration before the idle label returns
pub const COPY_FEEDBACK_MS: u32 = 2000;

// Scroll offset above which the back-to-top button is shown (exclusive)
pub const SCROLL_TOP_THRESHOLD_PX: f64 = 300.0;

// Inline styles for injected elements
pub const CODE_WRAPPER_STYLE: &[(&str, &str)] = &[("position", "relative")];

pub const COPY_BUTTON_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "8px"),
    ("right", "8px"),
    ("padding", "4px 12px"),
    ("font-size", "12px"),
    ("background", "rgba(255, 255, 255, 0.1)"),
    ("border", "1px solid rgba(255, 255, 255, 0.2)"),
    ("border-radius", "4px"),
    ("color", "#fff"),
    ("cursor", "pointer"),
    ("opacity", "0"),
    ("transition", "opacity 0.2s ease"),
];

pub const SCROLL_TOP_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("bottom", "24px"),
    ("right", "24px"),
    ("width", "48px"),
    ("height", "48px"),
    ("border-radius", "50%"),
    // theme primary color with the theme's default as fallback
    ("background", "var(--color-primary, #2563eb)"),
    ("color", "white"),
    ("border", "none"),
    ("cursor", "pointer"),
    ("font-size", "20px"),
    ("font-weight", "bold"),
    ("box-shadow", "0 4px 12px rgba(0, 0, 0, 0.15)"),
    ("opacity", "0"),
    ("visibility", "hidden"),
    ("transition", "all 0.3s ease"),
    ("z-index", "999"),
];

pub const SCROLL_TOP_HOVER_TRANSFORM: &str = "scale(1.1)";
pub const SCROLL_TOP_REST_TRANSFORM: &str = "scale(1)";
