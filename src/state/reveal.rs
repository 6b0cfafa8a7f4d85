//! Reveal Controller - One-way `hidden → visible` entrance state
//!
//! Each revealable element (a section title, a card) owns a
//! [`RevealController`]. The visibility observer calls [`RevealController::reveal`]
//! once; every sub-element then samples its own [`MotionVariant`] against the
//! shared reveal time so the effects cascade.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_folio::state::reveal::{MotionVariant, RevealController, RevealState};
//!
//! let title = RevealController::new();
//! assert_eq!(title.state(), RevealState::Hidden);
//!
//! assert!(title.reveal(Duration::from_secs(2)));
//! assert!(!title.reveal(Duration::from_secs(9))); // terminal, keeps first time
//!
//! let style = title.sample(&MotionVariant::title(), Duration::from_secs(10));
//! assert_eq!(style.opacity, 1.0);
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{signal, Signal};

use super::animate::{Easing, MotionStyle, Transition};

// =============================================================================
// REVEAL STATE
// =============================================================================

/// Entrance state of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevealState {
    #[default]
    Hidden,
    /// Terminal.
    Visible,
}

impl RevealState {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }
}

// =============================================================================
// MOTION VARIANTS
// =============================================================================

/// Hidden and visible targets of one element plus the transition between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionVariant {
    pub hidden: MotionStyle,
    pub visible: MotionStyle,
    pub transition: Transition,
}

impl MotionVariant {
    pub const fn new(hidden: MotionStyle, visible: MotionStyle, transition: Transition) -> Self {
        Self {
            hidden,
            visible,
            transition,
        }
    }

    /// Section heading: drops in from above.
    pub const fn title() -> Self {
        Self::new(
            MotionStyle::faded().offset_y(-50.0),
            MotionStyle::VISIBLE,
            Transition::tween(Duration::from_millis(800), Easing::EaseOut),
        )
    }

    /// Paragraph under a heading: rises in after it.
    pub const fn body() -> Self {
        Self::new(
            MotionStyle::faded().offset_y(50.0),
            MotionStyle::VISIBLE,
            Transition::tween(Duration::from_millis(600), Easing::EaseOut)
                .with_delay(Duration::from_millis(300)),
        )
    }

    /// Content card: rises in. Delay is supplied by the section's stagger.
    pub const fn card() -> Self {
        Self::new(
            MotionStyle::faded().offset_y(50.0),
            MotionStyle::VISIBLE,
            Transition::tween(Duration::from_millis(600), Easing::EaseOut),
        )
    }

    /// Project card: rises in on a soft spring.
    pub fn spring_card() -> Self {
        Self::new(
            MotionStyle::faded().offset_y(50.0),
            MotionStyle::VISIBLE,
            Transition::spring(60.0, 10.0),
        )
    }

    /// Heading underline: grows from the left.
    pub const fn underline() -> Self {
        Self::new(
            MotionStyle::VISIBLE.scale_x(0.0),
            MotionStyle::VISIBLE,
            Transition::tween(Duration::from_secs(1), Easing::EaseOut)
                .with_delay(Duration::from_millis(500)),
        )
    }

    /// Closing line of a section: fades in last.
    pub const fn footer() -> Self {
        Self::new(
            MotionStyle::faded(),
            MotionStyle::VISIBLE,
            Transition::tween(Duration::from_secs(1), Easing::EaseOut)
                .with_delay(Duration::from_millis(1500)),
        )
    }

    /// Tag chip: short fade and rise.
    pub const fn chip() -> Self {
        Self::new(
            MotionStyle::faded().offset_y(20.0),
            MotionStyle::VISIBLE,
            Transition::tween(Duration::from_millis(500), Easing::EaseOut),
        )
    }

    /// Proficiency bar: fills to `percent` a little after its card.
    pub fn skill_bar(percent: u8, card_delay: Duration) -> Self {
        Self::new(
            MotionStyle::VISIBLE.fill(0.0),
            MotionStyle::VISIBLE.fill(f32::from(percent.min(100)) / 100.0),
            Transition::tween(Duration::from_secs(1), Easing::EaseInOut)
                .with_delay(card_delay + Duration::from_millis(300)),
        )
    }

    /// Hero name: scales up on a bouncy spring.
    pub fn hero_title() -> Self {
        Self::new(
            MotionStyle::faded().scale_x(0.9),
            MotionStyle::VISIBLE,
            Transition::spring(100.0, 10.0).with_delay(Duration::from_millis(600)),
        )
    }

    /// Hero role line.
    pub const fn hero_role() -> Self {
        Self::new(
            MotionStyle::faded().offset_y(20.0),
            MotionStyle::VISIBLE,
            Transition::tween(Duration::from_secs(1), Easing::EaseOut),
        )
    }

    /// Same motion, starting `delay` later than the element's reveal.
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.transition.delay = delay;
        self
    }

    /// Add `extra` to the existing delay.
    pub fn offset_by(mut self, extra: Duration) -> Self {
        self.transition.delay = self.transition.delay.saturating_add(extra);
        self
    }

    /// Style `elapsed` after the reveal.
    pub fn at(&self, elapsed: Duration) -> MotionStyle {
        MotionStyle::mix(self.hidden, self.visible, self.transition.progress(elapsed))
    }
}

// =============================================================================
// REVEAL CONTROLLER
// =============================================================================

/// Shared, one-shot entrance state.
///
/// Cloning yields another handle to the same state, which is how an observer
/// callback and the page frame builder share a controller.
#[derive(Clone)]
pub struct RevealController {
    state: Signal<RevealState>,
    revealed_at: Rc<Cell<Option<Duration>>>,
}

impl std::fmt::Debug for RevealController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealController")
            .field("state", &self.state.get())
            .field("revealed_at", &self.revealed_at.get())
            .finish()
    }
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealController {
    pub fn new() -> Self {
        Self {
            state: signal(RevealState::Hidden),
            revealed_at: Rc::new(Cell::new(None)),
        }
    }

    pub fn state(&self) -> RevealState {
        self.state.get()
    }

    pub fn is_visible(&self) -> bool {
        self.state().is_visible()
    }

    /// Reactive state, for effects that want to track the transition.
    pub fn state_signal(&self) -> Signal<RevealState> {
        self.state.clone()
    }

    /// Time of the transition, if it happened.
    pub fn revealed_at(&self) -> Option<Duration> {
        self.revealed_at.get()
    }

    /// Move to `Visible` at `at`.
    ///
    /// Returns `true` only for the call that performed the transition; every
    /// later call is ignored and keeps the first reveal time.
    pub fn reveal(&self, at: Duration) -> bool {
        if self.revealed_at.get().is_some() {
            return false;
        }
        self.revealed_at.set(Some(at));
        self.state.set(RevealState::Visible);
        true
    }

    /// Style of an element driven by this controller at time `now`.
    pub fn sample(&self, variant: &MotionVariant, now: Duration) -> MotionStyle {
        match self.revealed_at.get() {
            None => variant.hidden,
            Some(at) => variant.at(now.saturating_sub(at)),
        }
    }

    /// Whether `variant` has finished playing at `now`.
    pub fn is_settled(&self, variant: &MotionVariant, now: Duration) -> bool {
        match self.revealed_at.get() {
            None => true,
            Some(at) => variant.transition.is_finished(now.saturating_sub(at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_hidden() {
        let c = RevealController::new();
        assert_eq!(c.state(), RevealState::Hidden);
        assert_eq!(c.revealed_at(), None);
        let style = c.sample(&MotionVariant::card(), Duration::from_secs(100));
        assert_eq!(style, MotionVariant::card().hidden);
    }

    #[test]
    fn test_reveal_is_one_shot() {
        let c = RevealController::new();
        assert!(c.reveal(Duration::from_secs(1)));
        for t in 2..10 {
            assert!(!c.reveal(Duration::from_secs(t)));
        }
        assert_eq!(c.revealed_at(), Some(Duration::from_secs(1)));
        assert!(c.is_visible());
    }

    #[test]
    fn test_clones_share_state() {
        let c = RevealController::new();
        let other = c.clone();
        other.reveal(Duration::ZERO);
        assert!(c.is_visible());
        assert!(!c.reveal(Duration::from_secs(1)));
    }

    #[test]
    fn test_sub_elements_cascade() {
        let c = RevealController::new();
        c.reveal(Duration::ZERO);
        let now = Duration::from_millis(400);

        let title = c.sample(&MotionVariant::title(), now);
        let body = c.sample(&MotionVariant::body(), now);
        let footer = c.sample(&MotionVariant::footer(), now);

        assert!(title.opacity > body.opacity);
        assert!(body.opacity > 0.0);
        assert_eq!(footer.opacity, 0.0);
    }

    #[test]
    fn test_underline_grows() {
        let c = RevealController::new();
        c.reveal(Duration::ZERO);
        let u = MotionVariant::underline();
        assert_eq!(c.sample(&u, Duration::from_millis(500)).scale_x, 0.0);
        assert!(c.sample(&u, Duration::from_millis(1000)).scale_x > 0.0);
        assert_eq!(c.sample(&u, Duration::from_secs(2)).scale_x, 1.0);
    }

    #[test]
    fn test_skill_bar_targets_proficiency() {
        let bar = MotionVariant::skill_bar(75, Duration::from_millis(200));
        assert_eq!(bar.transition.delay, Duration::from_millis(500));
        assert_eq!(bar.at(Duration::from_secs(5)).fill, 0.75);
        assert_eq!(bar.at(Duration::ZERO).fill, 0.0);
    }

    #[test]
    fn test_is_settled() {
        let c = RevealController::new();
        let v = MotionVariant::card();
        assert!(c.is_settled(&v, Duration::ZERO));
        c.reveal(Duration::from_secs(1));
        assert!(!c.is_settled(&v, Duration::from_millis(1300)));
        assert!(c.is_settled(&v, Duration::from_millis(1600)));
    }

    #[test]
    fn test_delayed_variant() {
        let v = MotionVariant::card().delayed(Duration::from_millis(400));
        assert_eq!(v.at(Duration::from_millis(400)).opacity, 0.0);
        let later = v.offset_by(Duration::from_millis(100));
        assert_eq!(later.transition.delay, Duration::from_millis(500));
    }
}
