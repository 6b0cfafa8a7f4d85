//! Core types for spark-folio.
//!
//! Colors, text attributes and the page geometry (rects and viewports) that
//! the observer, layout and renderer all agree on. Geometry is measured in
//! terminal rows and columns.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Special value: r=-1 means "terminal default" (let terminal pick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Create from a 24-bit RGB integer (0xRRGGBB).
    ///
    /// ```
    /// use spark_folio::types::Rgba;
    ///
    /// let navy = Rgba::from_rgb_int(0x1e3a8a);
    /// assert_eq!(navy, Rgba::rgb(30, 58, 138));
    /// ```
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Parse hex color string (#RGB, #RRGGBB).
    ///
    /// Returns None for invalid format.
    ///
    /// ```
    /// use spark_folio::types::Rgba;
    ///
    /// assert_eq!(Rgba::from_hex("#4F46E5"), Some(Rgba::rgb(79, 70, 229)));
    /// assert_eq!(Rgba::from_hex("fff"), Some(Rgba::WHITE));
    /// assert!(Rgba::from_hex("#gg0000").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn hex_byte(s: &[u8], i: usize) -> Option<u8> {
            let high = hex_digit(s[i])?;
            let low = hex_digit(s[i + 1])?;
            Some((high << 4) | low)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
            }
            6 => {
                let r = hex_byte(bytes, 0)?;
                let g = hex_byte(bytes, 2)?;
                let b = hex_byte(bytes, 4)?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Linear interpolation between two colors.
    ///
    /// Terminal default on either side short-circuits to the target,
    /// since it has no channels to blend.
    #[inline]
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        if a.is_terminal_default() || b.is_terminal_default() {
            return b;
        }
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self {
            r: ((a.r as f32 * inv_t) + (b.r as f32 * t)).round() as i16,
            g: ((a.g as f32 * inv_t) + (b.g as f32 * t)).round() as i16,
            b: ((a.b as f32 * inv_t) + (b.b as f32 * t)).round() as i16,
            a: ((a.a as f32 * inv_t) + (b.a as f32 * t)).round() as i16,
        }
    }
}

// =============================================================================
// Text Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// An element's box in page coordinates (rows from the top of the page).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Vertical overlap with the half-open band `[top, bottom)`.
    pub fn vertical_overlap(&self, top: f32, bottom: f32) -> f32 {
        (self.bottom().min(bottom) - self.top().max(top)).max(0.0)
    }
}

/// The visible window onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Scroll offset (first visible row).
    pub scroll_y: u32,
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl Viewport {
    pub const fn new(scroll_y: u32, width: u16, height: u16) -> Self {
        Self { scroll_y, width, height }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.scroll_y as f32
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.scroll_y as f32 + self.height as f32
    }

    /// Whether any part of `rect` is on screen.
    pub fn shows(&self, rect: &Rect) -> bool {
        rect.vertical_overlap(self.top(), self.bottom()) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_formats() {
        assert_eq!(Rgba::from_hex("#93C5FD"), Some(Rgba::rgb(0x93, 0xc5, 0xfd)));
        assert_eq!(Rgba::from_hex("#000"), Some(Rgba::BLACK));
        assert!(Rgba::from_hex("#12345").is_none());
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(Rgba::lerp(Rgba::BLACK, Rgba::WHITE, 0.0), Rgba::BLACK);
        assert_eq!(Rgba::lerp(Rgba::BLACK, Rgba::WHITE, 1.0), Rgba::WHITE);
        assert_eq!(Rgba::lerp(Rgba::BLACK, Rgba::WHITE, 2.0), Rgba::WHITE);
    }

    #[test]
    fn test_lerp_terminal_default() {
        let c = Rgba::lerp(Rgba::TERMINAL_DEFAULT, Rgba::WHITE, 0.3);
        assert_eq!(c, Rgba::WHITE);
    }

    #[test]
    fn test_rect_overlap() {
        let rect = Rect::new(0.0, 10.0, 40.0, 5.0);
        assert_eq!(rect.vertical_overlap(0.0, 12.0), 2.0);
        assert_eq!(rect.vertical_overlap(15.0, 30.0), 0.0);
        assert_eq!(rect.vertical_overlap(0.0, 100.0), 5.0);
    }

    #[test]
    fn test_viewport_shows() {
        let vp = Viewport::new(20, 80, 24);
        assert!(vp.shows(&Rect::new(0.0, 30.0, 10.0, 2.0)));
        assert!(!vp.shows(&Rect::new(0.0, 44.0, 10.0, 2.0)));
        assert!(!vp.shows(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }
}
