//! State Module - Runtime state of the page
//!
//! The reactive systems behind the scroll-triggered reveal pattern:
//!
//! - **Observer** - One-shot visibility detection, handle release
//! - **Reveal** - `hidden → visible` controllers and motion variants
//! - **Stagger** - Per-index entrance delays
//! - **Animate** - Easing, springs, style interpolation
//! - **Scroll** - Page offset, anchors, header condensation
//! - **Input** - crossterm events to page commands

pub mod animate;
pub mod input;
pub mod observer;
pub mod reveal;
pub mod scroll;
pub mod stagger;

pub use input::{Mode, PageCommand};
pub use observer::{
    observe, process_intersections, reset_observers, ElementGeometry, IntersectionEntry,
    ObserverHandle, ObserverOptions, RootMargin,
};
pub use reveal::{MotionVariant, RevealController, RevealState};
pub use scroll::PageScroll;
pub use stagger::{stagger_items, Stagger, StaggeredItem};
