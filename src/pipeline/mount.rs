//! Mount API - Page lifecycle and intersection dispatch.
//!
//! [`mount`] lays out a [`PageSpec`], creates one [`RevealController`] per
//! section title and per item, and registers one observer for each. Every
//! viewport change then runs the intersection dispatch, which reveals
//! whatever has come into view. [`MountedPage::frame`] samples the result
//! for the renderer.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_folio::content::{portfolio, ElementKey, SectionId};
//! use spark_folio::pipeline::mount;
//!
//! let page = mount(portfolio(), (80, 24), Duration::ZERO).unwrap();
//! assert!(page.is_revealed(ElementKey::title(SectionId::Home)));
//! assert!(!page.is_revealed(ElementKey::title(SectionId::Contact)));
//!
//! page.scroll_to_anchor("#contact", Duration::from_secs(1));
//! assert!(page.is_revealed(ElementKey::title(SectionId::Contact)));
//!
//! page.unmount();
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use spark_signals::{derived, Derived};

use crate::config::PageConfig;
use crate::content::{ElementKey, PageSpec, Part, SectionId, SectionSpec};
use crate::error::FolioError;
use crate::layout::PageLayout;
use crate::state::observer::{observe, process_intersections, ObserverHandle, ObserverOptions};
use crate::state::reveal::{MotionVariant, RevealController};
use crate::state::scroll::PageScroll;
use crate::state::stagger::stagger_items;
use crate::types::Viewport;

use super::frame::{Frame, FrameElement};

// =============================================================================
// ELEMENT MOTION
// =============================================================================

/// How one element is driven: which controller and which variants.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMotion {
    pub key: ElementKey,
    /// Key of the controller that reveals this element.
    pub driver: ElementKey,
    pub variant: MotionVariant,
    pub underline: Option<MotionVariant>,
    pub bar: Option<MotionVariant>,
}

impl ElementMotion {
    fn new(key: ElementKey, driver: ElementKey, variant: MotionVariant) -> Self {
        Self {
            key,
            driver,
            variant,
            underline: None,
            bar: None,
        }
    }
}

/// Every element of `section` in document order.
///
/// Title, body, chips and footer share the title controller. Items have
/// their own, offset by the section stagger.
pub fn element_motions(section: &SectionSpec) -> Vec<ElementMotion> {
    let title = ElementKey::title(section.id);
    let mut motions = Vec::new();

    let title_variant = if section.reveal_on_mount {
        MotionVariant::hero_title()
    } else {
        MotionVariant::title()
    };
    motions.push(ElementMotion {
        underline: Some(MotionVariant::underline()),
        ..ElementMotion::new(title, title, title_variant)
    });

    if section.body.is_some() {
        motions.push(ElementMotion::new(
            ElementKey::new(section.id, Part::Body),
            title,
            MotionVariant::body(),
        ));
    }

    for index in 0..section.chips.len() {
        motions.push(ElementMotion::new(
            ElementKey::new(section.id, Part::Chip(index)),
            title,
            MotionVariant::chip().delayed(section.chip_stagger.delay(index)),
        ));
    }

    for staggered in stagger_items(&section.items, section.stagger) {
        let key = ElementKey::item(section.id, staggered.index);
        motions.push(ElementMotion {
            bar: staggered
                .item
                .proficiency
                .map(|percent| MotionVariant::skill_bar(percent, staggered.delay)),
            ..ElementMotion::new(key, key, section.item_motion.delayed(staggered.delay))
        });
    }

    if section.footer.is_some() {
        motions.push(ElementMotion::new(
            ElementKey::new(section.id, Part::Footer),
            title,
            MotionVariant::footer(),
        ));
    }

    motions
}

// =============================================================================
// MOUNTED PAGE
// =============================================================================

/// A page with live reveal state.
///
/// Dropping it (or calling [`MountedPage::unmount`]) releases every
/// observation that has not fired.
pub struct MountedPage {
    spec: PageSpec,
    layout: PageLayout,
    scroll: PageScroll,
    size: (u16, u16),
    controllers: BTreeMap<ElementKey, RevealController>,
    revealed: Derived<usize>,
    observers: Vec<ObserverHandle>,
}

impl std::fmt::Debug for MountedPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedPage")
            .field("size", &self.size)
            .field("scroll", &self.scroll)
            .field("controllers", &self.controllers.len())
            .field("revealed", &self.revealed.get())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

/// Mount `spec` in a `(width, height)` viewport with default page settings.
pub fn mount(spec: PageSpec, size: (u16, u16), now: Duration) -> Result<MountedPage, FolioError> {
    mount_with(spec, size, now, &PageConfig::default())
}

/// Mount `spec` with explicit page settings.
pub fn mount_with(
    spec: PageSpec,
    size: (u16, u16),
    now: Duration,
    config: &PageConfig,
) -> Result<MountedPage, FolioError> {
    let (width, height) = size;
    let layout = PageLayout::compute(&spec, width)?;
    let scroll = PageScroll::new(config.header_condense_at);
    scroll.set_bounds(layout.content_height(), height);

    let mut controllers = BTreeMap::new();
    let mut observers = Vec::new();

    for section in &spec.sections {
        let keys = std::iter::once(ElementKey::title(section.id))
            .chain((0..section.items.len()).map(|i| ElementKey::item(section.id, i)));

        for key in keys {
            let controller = RevealController::new();
            if section.reveal_on_mount {
                controller.reveal(now);
            } else {
                let options = match key.part {
                    Part::Title => ObserverOptions::title(),
                    _ => ObserverOptions::card(),
                };
                let target = controller.clone();
                let handle = observe(layout.rect(key).map(|_| key), options, move |entry| {
                    if target.reveal(entry.time) {
                        log::debug!(
                            "revealed {}/{:?} at {:?}",
                            entry.target.section,
                            entry.target.part,
                            entry.time
                        );
                    }
                });
                observers.push(handle);
            }
            controllers.insert(key, controller);
        }
    }

    let states: Vec<_> = controllers.values().map(RevealController::state_signal).collect();
    let revealed = derived(move || states.iter().filter(|s| s.get().is_visible()).count());

    let page = MountedPage {
        spec,
        layout,
        scroll,
        size,
        controllers,
        revealed,
        observers,
    };
    page.dispatch(now);
    Ok(page)
}

impl MountedPage {
    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn scroll(&self) -> &PageScroll {
        &self.scroll
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.scroll.offset(), self.size.0, self.size.1)
    }

    pub fn controller(&self, key: ElementKey) -> Option<&RevealController> {
        self.controllers.get(&key)
    }

    pub fn is_revealed(&self, key: ElementKey) -> bool {
        self.controller(key).is_some_and(RevealController::is_visible)
    }

    /// Number of revealed controllers.
    pub fn revealed_count(&self) -> usize {
        self.revealed.get()
    }

    /// Reactive [`MountedPage::revealed_count`].
    pub fn revealed_signal(&self) -> Derived<usize> {
        self.revealed.clone()
    }

    /// Observations still waiting to fire.
    pub fn pending_observers(&self) -> usize {
        self.observers.iter().filter(|h| h.is_active()).count()
    }

    /// Run the intersection dispatch for the current viewport.
    pub fn dispatch(&self, now: Duration) -> usize {
        process_intersections(self.viewport(), &self.layout, now)
    }

    /// Dispatch every offset between `from` and the current one, so a jump
    /// reveals what a smooth scroll would have passed.
    fn sweep_from(&self, from: u32, now: Duration) -> usize {
        let to = self.scroll.offset();
        let (width, height) = self.size;
        let offsets: Box<dyn Iterator<Item = u32>> = if from <= to {
            Box::new(from..=to)
        } else {
            Box::new((to..=from).rev())
        };

        let mut fired = 0;
        for offset in offsets {
            if self.pending_observers() == 0 {
                break;
            }
            fired += process_intersections(Viewport::new(offset, width, height), &self.layout, now);
        }
        fired
    }

    fn moved(&self, from: u32, moved: bool, now: Duration) -> bool {
        if moved {
            self.sweep_from(from, now);
        }
        moved
    }

    /// Scroll by `delta` rows. Returns whether the offset changed.
    pub fn scroll_by(&self, delta: i32, now: Duration) -> bool {
        let from = self.scroll.offset();
        self.moved(from, self.scroll.scroll_by(delta), now)
    }

    pub fn scroll_to(&self, y: u32, now: Duration) -> bool {
        let from = self.scroll.offset();
        self.moved(from, self.scroll.scroll_to(y), now)
    }

    pub fn page_down(&self, now: Duration) -> bool {
        let from = self.scroll.offset();
        self.moved(from, self.scroll.page_down(self.size.1), now)
    }

    pub fn page_up(&self, now: Duration) -> bool {
        let from = self.scroll.offset();
        self.moved(from, self.scroll.page_up(self.size.1), now)
    }

    pub fn scroll_to_anchor(&self, anchor: &str, now: Duration) -> bool {
        let from = self.scroll.offset();
        self.moved(from, self.scroll.scroll_to_anchor(anchor, &self.layout), now)
    }

    pub fn scroll_to_section(&self, id: SectionId, now: Duration) -> bool {
        let from = self.scroll.offset();
        self.moved(from, self.scroll.scroll_to_section(id, &self.layout), now)
    }

    pub fn current_section(&self) -> SectionId {
        self.scroll.current_section(&self.layout)
    }

    /// Relayout for a new terminal size and re-dispatch.
    pub fn resize(&mut self, width: u16, height: u16, now: Duration) -> Result<(), FolioError> {
        if width != self.size.0 {
            self.layout = PageLayout::compute(&self.spec, width)?;
        }
        self.size = (width, height);
        self.scroll.set_bounds(self.layout.content_height(), height);
        self.dispatch(now);
        Ok(())
    }

    /// Sample every visible element at `now`.
    pub fn frame(&self, now: Duration) -> Frame {
        let viewport = self.viewport();
        let mut elements = Vec::new();
        let mut animating = false;

        for section in &self.spec.sections {
            let shown = self
                .layout
                .rect(ElementKey::section(section.id))
                .is_some_and(|rect| viewport.shows(&rect));
            if !shown {
                continue;
            }

            for motion in element_motions(section) {
                let Some(rect) = self.layout.rect(motion.key) else {
                    continue;
                };
                if !viewport.shows(&rect) {
                    continue;
                }
                let Some(controller) = self.controllers.get(&motion.driver) else {
                    continue;
                };

                let variants = std::iter::once(&motion.variant)
                    .chain(motion.underline.as_ref())
                    .chain(motion.bar.as_ref());
                for variant in variants {
                    animating |= !controller.is_settled(variant, now);
                }

                elements.push(FrameElement {
                    key: motion.key,
                    rect,
                    style: controller.sample(&motion.variant, now),
                    underline: motion.underline.map(|v| controller.sample(&v, now)),
                    bar: motion.bar.map(|v| controller.sample(&v, now)),
                });
            }
        }

        Frame {
            viewport,
            header_condensed: self.scroll.is_header_condensed(),
            current_section: self.current_section(),
            elements,
            animating,
        }
    }

    /// Release every pending observation.
    pub fn unmount(self) {
        for handle in self.observers {
            handle.disconnect();
        }
    }
}
