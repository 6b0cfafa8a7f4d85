//! Visibility Observer - One-shot intersection detection
//!
//! Watches elements by [`ElementKey`] and fires a callback exactly once, the
//! first time the element crosses into the (margin-adjusted) viewport. The
//! observation is removed as it fires, so re-scrolling never fires again.
//!
//! # API
//!
//! - `observe(target, options, callback)` - Register a one-shot observation
//! - `process_intersections(viewport, geometry, now)` - Dispatch after scroll/resize
//! - `ObserverHandle::disconnect()` - Release before firing (unmount)
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_folio::content::{ElementKey, SectionId};
//! use spark_folio::state::observer::{observe, process_intersections, ObserverOptions};
//! use spark_folio::types::{Rect, Viewport};
//!
//! let key = ElementKey::title(SectionId::About);
//! let handle = observe(Some(key), ObserverOptions::default(), |entry| {
//!     println!("{:?} revealed at {:?}", entry.target, entry.time);
//! });
//!
//! let geometry = |k: ElementKey| (k == key).then(|| Rect::new(0.0, 40.0, 80.0, 2.0));
//! process_intersections(Viewport::new(30, 80, 24), &geometry, Duration::ZERO);
//! assert!(!handle.is_active());
//! ```

use std::cell::RefCell;
use std::time::Duration;

use crate::content::ElementKey;
use crate::types::{Rect, Viewport};

// =============================================================================
// OPTIONS
// =============================================================================

/// Grows (positive) or shrinks (negative) the viewport before testing,
/// like CSS `rootMargin`. Units are rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl RootMargin {
    pub const ZERO: Self = Self::vertical(0.0);

    /// `rootMargin: '<v> 0px'`.
    pub const fn vertical(v: f32) -> Self {
        Self {
            top: v,
            right: 0.0,
            bottom: v,
            left: 0.0,
        }
    }
}

/// Observer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObserverOptions {
    pub root_margin: RootMargin,
    /// Fraction of the element that must be inside the root (0.0 = any part).
    pub threshold: f32,
}

/// Section headings: about 100px inside the viewport.
pub const TITLE_MARGIN: RootMargin = RootMargin::vertical(-4.0);

/// Cards: about 50px inside the viewport.
pub const CARD_MARGIN: RootMargin = RootMargin::vertical(-2.0);

impl ObserverOptions {
    pub const fn with_margin(root_margin: RootMargin) -> Self {
        Self {
            root_margin,
            threshold: 0.0,
        }
    }

    pub const fn title() -> Self {
        Self::with_margin(TITLE_MARGIN)
    }

    pub const fn card() -> Self {
        Self::with_margin(CARD_MARGIN)
    }

    pub const fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Margin-adjusted root rows `[top, bottom)` for `viewport`.
    ///
    /// Negative margins are scaled down so the root keeps at least one row
    /// of a viewport that has one.
    pub fn root(&self, viewport: &Viewport) -> (f32, f32) {
        let RootMargin { top, bottom, .. } = self.root_margin;
        let shrink = (-top).max(0.0) + (-bottom).max(0.0);
        let room = (f32::from(viewport.height) - 1.0).max(0.0);
        let scale = if shrink > room { room / shrink } else { 1.0 };
        let fit = |margin: f32| if margin < 0.0 { margin * scale } else { margin };
        (viewport.top() - fit(top), viewport.bottom() + fit(bottom))
    }

    /// Intersection ratio of `rect` with the margin-adjusted viewport, or
    /// None if it does not count as intersecting.
    pub fn intersection(&self, viewport: &Viewport, rect: &Rect) -> Option<f32> {
        let (root_top, root_bottom) = self.root(viewport);
        if root_bottom <= root_top {
            return None;
        }

        if rect.height <= 0.0 {
            let inside = rect.top() >= root_top && rect.top() < root_bottom;
            return inside.then_some(1.0);
        }

        let overlap = rect.vertical_overlap(root_top, root_bottom);
        if overlap <= 0.0 {
            return None;
        }
        let ratio = (overlap / rect.height).min(1.0);
        (ratio >= self.threshold.clamp(0.0, 1.0)).then_some(ratio)
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Resolves element keys to their current page rect.
///
/// Returning None means the element is not on the page (not laid out, or
/// removed); such observations are skipped silently.
pub trait ElementGeometry {
    fn rect(&self, key: ElementKey) -> Option<Rect>;
}

impl<F> ElementGeometry for F
where
    F: Fn(ElementKey) -> Option<Rect>,
{
    fn rect(&self, key: ElementKey) -> Option<Rect> {
        self(key)
    }
}

// =============================================================================
// ENTRIES & CALLBACKS
// =============================================================================

/// What a callback learns when its element first intersects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementKey,
    pub rect: Rect,
    pub ratio: f32,
    pub time: Duration,
}

/// One-shot intersection callback.
pub type IntersectionCallback = Box<dyn FnOnce(IntersectionEntry)>;

struct Observation {
    id: usize,
    target: ElementKey,
    options: ObserverOptions,
    callback: IntersectionCallback,
}

struct ObserverRegistry {
    observations: Vec<Observation>,
    next_id: usize,
}

impl ObserverRegistry {
    fn new() -> Self {
        Self {
            observations: Vec::new(),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<ObserverRegistry> = RefCell::new(ObserverRegistry::new());
}

// =============================================================================
// HANDLE
// =============================================================================

/// Ownership of a pending observation.
///
/// Dropping the handle (or calling [`ObserverHandle::disconnect`]) releases
/// the observation if it has not fired yet.
#[derive(Debug)]
#[must_use = "dropping the handle disconnects the observer"]
pub struct ObserverHandle {
    id: Option<usize>,
}

impl ObserverHandle {
    fn inert() -> Self {
        Self { id: None }
    }

    /// Whether the observation is still waiting for its first intersection.
    pub fn is_active(&self) -> bool {
        let Some(id) = self.id else {
            return false;
        };
        REGISTRY.with(|reg| reg.borrow().observations.iter().any(|o| o.id == id))
    }

    /// Release the observation without firing it.
    pub fn disconnect(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            REGISTRY.with(|reg| {
                // try_borrow_mut: a handle may be dropped from inside a callback.
                if let Ok(mut reg) = reg.try_borrow_mut() {
                    reg.observations.retain(|o| o.id != id);
                }
            });
        }
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Observe `target` once.
///
/// A `None` target (no element to attach to) returns an inert handle and
/// never fires.
pub fn observe<F>(
    target: Option<ElementKey>,
    options: ObserverOptions,
    callback: F,
) -> ObserverHandle
where
    F: FnOnce(IntersectionEntry) + 'static,
{
    let Some(target) = target else {
        return ObserverHandle::inert();
    };

    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.observations.push(Observation {
            id,
            target,
            options,
            callback: Box::new(callback),
        });
        id
    });

    ObserverHandle { id: Some(id) }
}

/// Test every pending observation against `viewport` and fire those that
/// intersect. Fired observations are removed before their callbacks run.
///
/// Returns the number of callbacks fired.
pub fn process_intersections(
    viewport: Viewport,
    geometry: &dyn ElementGeometry,
    now: Duration,
) -> usize {
    let fired: Vec<(IntersectionCallback, IntersectionEntry)> = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let mut fired = Vec::new();
        let mut pending = Vec::with_capacity(reg.observations.len());

        for observation in reg.observations.drain(..) {
            let hit = geometry.rect(observation.target).and_then(|rect| {
                observation
                    .options
                    .intersection(&viewport, &rect)
                    .map(|ratio| (rect, ratio))
            });

            match hit {
                Some((rect, ratio)) => fired.push((
                    observation.callback,
                    IntersectionEntry {
                        target: observation.target,
                        rect,
                        ratio,
                        time: now,
                    },
                )),
                None => pending.push(observation),
            }
        }

        reg.observations = pending;
        fired
    });

    let count = fired.len();
    // Run outside the borrow so callbacks may observe or disconnect.
    for (callback, entry) in fired {
        callback(entry);
    }
    count
}

/// Number of observations waiting to fire.
pub fn pending_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().observations.len())
}

/// Drop every observation (for testing).
pub fn reset_observers() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.observations.clear();
        reg.next_id = 1;
    });
}

// =============================================================================
// TESTS
// =============================================================================
