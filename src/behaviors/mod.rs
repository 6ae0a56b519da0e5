pub mod active_nav;
pub mod anchors;
pub mod copy_code;
pub mod menu;
pub mod scroll_top;
