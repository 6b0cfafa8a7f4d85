//! Theme System for spark-folio.
//!
//! Two semantic palettes, light and dark, and the machinery that picks one:
//! the OS color-scheme preference plus a session-scoped manual override.
//!
//! # Example
//!
//! ```rust
//! use spark_folio::theme::{ColorScheme, Palette};
//!
//! let palette = Palette::for_scheme(ColorScheme::Dark);
//! assert_eq!(palette, Palette::dark());
//! assert_eq!(ColorScheme::Dark.toggled(), ColorScheme::Light);
//! ```

use std::fmt;

use crate::types::Rgba;

pub mod preference;
pub mod toggle;

pub use preference::{detect_env_preference, ColorSchemeQuery, PreferenceSource, Subscription};
pub use toggle::ThemeToggle;

// =============================================================================
// ColorScheme
// =============================================================================

/// Light or dark page colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub const fn from_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub const fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }

    pub const fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Parse `"dark"` / `"light"` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

// =============================================================================
// Palette - All semantic colors
// =============================================================================

/// Semantic colors of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub scheme: ColorScheme,

    // =========================================================================
    // Text Colors
    // =========================================================================

    /// Primary text color.
    pub text: Rgba,
    /// Secondary text (periods, locations, descriptions).
    pub text_muted: Rgba,

    // =========================================================================
    // Accents
    // =========================================================================

    /// Headings, underlines, skill bars.
    pub accent: Rgba,
    /// Second stop of the hero gradient.
    pub accent_secondary: Rgba,

    // =========================================================================
    // Background Colors
    // =========================================================================

    pub background: Rgba,
    /// Cards.
    pub surface: Rgba,
    /// Condensed header bar.
    pub header: Rgba,

    // =========================================================================
    // Feedback
    // =========================================================================

    pub success: Rgba,
    pub error: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self::light()
    }
}

impl Palette {
    pub const fn light() -> Self {
        Self {
            scheme: ColorScheme::Light,
            text: Rgba::from_rgb_int(0x1f2937),
            text_muted: Rgba::from_rgb_int(0x4b5563),
            accent: Rgba::from_rgb_int(0x93c5fd),
            accent_secondary: Rgba::from_rgb_int(0xc084fc),
            background: Rgba::from_rgb_int(0xeff6ff),
            surface: Rgba::WHITE,
            header: Rgba::from_rgb_int(0x1e3a8a),
            success: Rgba::from_rgb_int(0x22c55e),
            error: Rgba::from_rgb_int(0xef4444),
        }
    }

    pub const fn dark() -> Self {
        Self {
            scheme: ColorScheme::Dark,
            text: Rgba::from_rgb_int(0xf3f4f6),
            text_muted: Rgba::from_rgb_int(0x9ca3af),
            accent: Rgba::from_rgb_int(0x4f46e5),
            accent_secondary: Rgba::from_rgb_int(0x7c3aed),
            background: Rgba::from_rgb_int(0x111827),
            surface: Rgba::from_rgb_int(0x1f2937),
            header: Rgba::from_rgb_int(0x1e3a8a),
            success: Rgba::from_rgb_int(0x22c55e),
            error: Rgba::from_rgb_int(0xef4444),
        }
    }

    pub const fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            ColorScheme::Dark => Self::dark(),
        }
    }

    /// Text color faded towards the background by `opacity`.
    pub fn faded_text(&self, opacity: f32) -> Rgba {
        Rgba::lerp(self.background, self.text, opacity)
    }
}

// =============================================================================
// Tests
// =============================================================================
