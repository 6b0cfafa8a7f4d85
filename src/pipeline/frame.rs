//! Frame - What one redraw shows.
//!
//! A [`Frame`] is the mounted page sampled at one instant. The frame holds
//! only the elements that intersect the viewport, each with the motion
//! styles its reveal controller yields at that time. The renderer turns a
//! frame into terminal lines without touching any reactive state.

use crate::content::{ElementKey, SectionId};
use crate::state::animate::MotionStyle;
use crate::types::{Rect, Viewport};

/// One visible element and its sampled styles.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameElement {
    pub key: ElementKey,
    /// Page-space box, before motion offsets.
    pub rect: Rect,
    pub style: MotionStyle,
    /// Title underline growth.
    pub underline: Option<MotionStyle>,
    /// Proficiency bar fill.
    pub bar: Option<MotionStyle>,
}

/// A sampled page.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub header_condensed: bool,
    pub current_section: SectionId,
    /// In document order.
    pub elements: Vec<FrameElement>,
    /// True while some visible entrance is still playing.
    pub animating: bool,
}

impl Frame {
    pub fn element(&self, key: ElementKey) -> Option<&FrameElement> {
        self.elements.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
