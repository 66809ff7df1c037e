use serde::{Deserialize, Serialize};

use crate::render::Color;
use crate::scroll::ScrollState;

/// Utility classes shared by both navigation variants.
pub const NAV_BASE_CLASSES: &str =
    "fixed top-0 w-full z-50 transition-all duration-300 px-6 py-4 flex items-center justify-between";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavChromeVariant {
    /// Page at rest: the hero shows through the navigation bar.
    Transparent,
    /// Page scrolled: opaque blurred bar with a hairline border.
    Opaque,
}

/// Resolved navigation bar treatment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavChromeStyle {
    pub variant: NavChromeVariant,
    pub background: Color,
    pub backdrop_blur_px: f64,
    pub border_bottom: Option<Color>,
    pub padding_y_px: f64,
    /// Variant-specific utility classes, appended after `NAV_BASE_CLASSES`.
    pub variant_classes: &'static str,
}

impl NavChromeStyle {
    #[must_use]
    pub fn class_list(&self) -> String {
        format!("{NAV_BASE_CLASSES} {}", self.variant_classes)
    }
}

const TRANSPARENT_NAV: NavChromeStyle = NavChromeStyle {
    variant: NavChromeVariant::Transparent,
    background: Color::TRANSPARENT,
    backdrop_blur_px: 0.0,
    border_bottom: None,
    padding_y_px: 16.0,
    variant_classes: "bg-transparent",
};

const OPAQUE_NAV: NavChromeStyle = NavChromeStyle {
    variant: NavChromeVariant::Opaque,
    background: Color::rgba(19.0 / 255.0, 25.0 / 255.0, 33.0 / 255.0, 0.95),
    backdrop_blur_px: 12.0,
    border_bottom: Some(Color::rgba(1.0, 1.0, 1.0, 0.1)),
    padding_y_px: 12.0,
    variant_classes: "bg-[#131921]/95 backdrop-blur-md border-b border-white/10 py-3",
};

#[must_use]
pub fn nav_variant_for(state: ScrollState) -> NavChromeVariant {
    if state.past_threshold {
        NavChromeVariant::Opaque
    } else {
        NavChromeVariant::Transparent
    }
}

/// Maps scroll state to the navigation treatment. No other input.
#[must_use]
pub fn nav_style_for(state: ScrollState) -> NavChromeStyle {
    match nav_variant_for(state) {
        NavChromeVariant::Transparent => TRANSPARENT_NAV,
        NavChromeVariant::Opaque => OPAQUE_NAV,
    }
}
