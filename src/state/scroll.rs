//! Page Scroll - Viewport offset and anchor navigation
//!
//! Manages scrolling of the single page:
//! - Vertical offset as a signal (user state)
//! - Scroll bounds from layout (content height minus viewport height)
//! - Scroll operations with clamping
//! - Anchor jumps and header condensation
//!
//! Every operation returns whether the offset actually changed so callers
//! know when an intersection pass is due.

use std::cell::Cell;

use spark_signals::{signal, Signal};

use super::observer::ElementGeometry;
use crate::content::{ElementKey, SectionId};

// =============================================================================
// SCROLL CONSTANTS
// =============================================================================

/// Default scroll amount for arrow keys (rows).
pub const LINE_SCROLL: i32 = 1;

/// Default scroll amount for mouse wheel.
pub const WHEEL_SCROLL: i32 = 3;

/// Page Up/Down moves 90% of the viewport.
pub const PAGE_SCROLL_FACTOR: f32 = 0.9;

/// Header condenses once scrolled past this row (about 200px).
pub const HEADER_CONDENSE_AT: u32 = 8;

// =============================================================================
// PAGE SCROLL
// =============================================================================

/// Vertical scroll state of the page.
pub struct PageScroll {
    offset: Signal<u32>,
    max: Cell<u32>,
    condense_at: u32,
}

impl std::fmt::Debug for PageScroll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageScroll")
            .field("offset", &self.offset())
            .field("max", &self.max())
            .field("condense_at", &self.condense_at)
            .finish()
    }
}

impl Default for PageScroll {
    fn default() -> Self {
        Self::new(HEADER_CONDENSE_AT)
    }
}

impl PageScroll {
    pub fn new(condense_at: u32) -> Self {
        Self {
            offset: signal(0),
            max: Cell::new(0),
            condense_at,
        }
    }

    /// Current first visible row.
    pub fn offset(&self) -> u32 {
        self.offset.get()
    }

    /// Reactive offset.
    pub fn offset_signal(&self) -> Signal<u32> {
        self.offset.clone()
    }

    pub fn max(&self) -> u32 {
        self.max.get()
    }

    /// Update bounds after layout or resize. The offset is re-clamped.
    pub fn set_bounds(&self, content_height: u32, viewport_height: u16) {
        let max = content_height.saturating_sub(u32::from(viewport_height));
        self.max.set(max);
        if self.offset() > max {
            self.offset.set(max);
        }
    }

    /// Jump to `y` (clamped). Returns `true` if the offset changed.
    pub fn scroll_to(&self, y: u32) -> bool {
        let clamped = y.min(self.max());
        if clamped == self.offset() {
            return false;
        }
        self.offset.set(clamped);
        true
    }

    /// Scroll by a delta. Returns `false` if already at the boundary.
    pub fn scroll_by(&self, delta: i32) -> bool {
        let target = i64::from(self.offset()) + i64::from(delta);
        let target = target.clamp(0, i64::from(self.max()));
        // Within u32 range after the clamp.
        self.scroll_to(u32::try_from(target).unwrap_or(0))
    }

    pub fn scroll_to_top(&self) -> bool {
        self.scroll_to(0)
    }

    pub fn scroll_to_bottom(&self) -> bool {
        self.scroll_to(self.max())
    }

    pub fn page_down(&self, viewport_height: u16) -> bool {
        self.scroll_by(page_amount(viewport_height))
    }

    pub fn page_up(&self, viewport_height: u16) -> bool {
        self.scroll_by(-page_amount(viewport_height))
    }

    /// Bring the section named by `anchor` (`"#skills"`) to the top.
    ///
    /// Unknown anchors and sections without geometry are ignored and
    /// return `false`.
    pub fn scroll_to_anchor(&self, anchor: &str, geometry: &dyn ElementGeometry) -> bool {
        let Some(id) = SectionId::from_anchor(anchor) else {
            log::debug!("ignoring unknown anchor {anchor:?}");
            return false;
        };
        self.scroll_to_section(id, geometry)
    }

    /// Bring `id` to the top. Returns `false` if it has no geometry or the
    /// offset did not change.
    pub fn scroll_to_section(&self, id: SectionId, geometry: &dyn ElementGeometry) -> bool {
        let Some(rect) = geometry.rect(ElementKey::section(id)) else {
            return false;
        };
        self.scroll_to(rect.top().max(0.0).round() as u32)
    }

    /// Whether the header is drawn in its condensed form.
    pub fn is_header_condensed(&self) -> bool {
        self.offset() > self.condense_at
    }

    /// Section containing the first visible row.
    pub fn current_section(&self, geometry: &dyn ElementGeometry) -> SectionId {
        let top = self.offset() as f32;
        SectionId::ALL
            .into_iter()
            .filter(|id| {
                geometry
                    .rect(ElementKey::section(*id))
                    .is_some_and(|rect| rect.top() <= top)
            })
            .last()
            .unwrap_or(SectionId::Home)
    }
}

fn page_amount(viewport_height: u16) -> i32 {
    ((f32::from(viewport_height) * PAGE_SCROLL_FACTOR).round() as i32).max(1)
}

// =============================================================================
// NAVIGATION ORDER
// =============================================================================

fn document_index(id: SectionId) -> usize {
    SectionId::ALL.iter().position(|s| *s == id).unwrap_or(0)
}

/// Next header entry after `current`, or None at the end.
pub fn next_section(current: SectionId) -> Option<SectionId> {
    let at = document_index(current);
    SectionId::NAVIGATION
        .into_iter()
        .find(|id| document_index(*id) > at)
}

/// Previous header entry before `current`, or None at the start.
pub fn previous_section(current: SectionId) -> Option<SectionId> {
    let at = document_index(current);
    SectionId::NAVIGATION
        .into_iter()
        .rev()
        .find(|id| document_index(*id) < at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Part;
    use crate::types::Rect;

    /// Each section 20 rows tall, stacked in document order.
    fn stacked(key: ElementKey) -> Option<Rect> {
        if key.part != Part::Section {
            return None;
        }
        let i = document_index(key.section) as f32;
        Some(Rect::new(0.0, i * 20.0, 80.0, 20.0))
    }

    fn page() -> PageScroll {
        let scroll = PageScroll::default();
        scroll.set_bounds(200, 24);
        scroll
    }

    #[test]
    fn test_scroll_by_clamps() {
        let scroll = page();
        assert!(!scroll.scroll_by(-5));
        assert!(scroll.scroll_by(10));
        assert_eq!(scroll.offset(), 10);
        assert!(scroll.scroll_by(1000));
        assert_eq!(scroll.offset(), 176);
        assert!(!scroll.scroll_by(1));
    }

    #[test]
    fn test_top_bottom() {
        let scroll = page();
        assert!(scroll.scroll_to_bottom());
        assert_eq!(scroll.offset(), scroll.max());
        assert!(scroll.scroll_to_top());
        assert_eq!(scroll.offset(), 0);
    }

    #[test]
    fn test_page_down_is_ninety_percent() {
        let scroll = page();
        scroll.page_down(20);
        assert_eq!(scroll.offset(), 18);
        scroll.page_up(20);
        assert_eq!(scroll.offset(), 0);
    }

    #[test]
    fn test_shrinking_content_reclamps() {
        let scroll = page();
        scroll.scroll_to(150);
        scroll.set_bounds(100, 24);
        assert_eq!(scroll.offset(), 76);
    }

    #[test]
    fn test_content_shorter_than_viewport() {
        let scroll = PageScroll::default();
        scroll.set_bounds(10, 24);
        assert_eq!(scroll.max(), 0);
        assert!(!scroll.page_down(24));
    }

    #[test]
    fn test_scroll_to_anchor() {
        let scroll = page();
        assert!(scroll.scroll_to_anchor("#skills", &stacked));
        assert_eq!(scroll.offset(), 60);
        assert_eq!(scroll.current_section(&stacked), SectionId::Skills);
    }

    #[test]
    fn test_unknown_anchor_is_noop() {
        let scroll = page();
        scroll.scroll_to(30);
        assert!(!scroll.scroll_to_anchor("#blog", &stacked));
        assert_eq!(scroll.offset(), 30);
    }

    #[test]
    fn test_header_condenses_past_threshold() {
        let scroll = page();
        scroll.scroll_to(HEADER_CONDENSE_AT);
        assert!(!scroll.is_header_condensed());
        scroll.scroll_by(1);
        assert!(scroll.is_header_condensed());
    }

    #[test]
    fn test_navigation_order_skips_organization() {
        assert_eq!(next_section(SectionId::Certificates), Some(SectionId::Interests));
        assert_eq!(next_section(SectionId::Organization), Some(SectionId::Interests));
        assert_eq!(previous_section(SectionId::Interests), Some(SectionId::Certificates));
        assert_eq!(next_section(SectionId::Contact), None);
        assert_eq!(previous_section(SectionId::Home), None);
    }
}
