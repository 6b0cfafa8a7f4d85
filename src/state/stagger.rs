//! Stagger - Per-index entrance delays
//!
//! Lists animate in sequence rather than all at once: item `i` starts
//! `base + i * increment` after its section is revealed. Delays are a pure
//! function of index, so re-rendering the same list yields the same timing.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_folio::state::stagger::Stagger;
//!
//! let stagger = Stagger::CARDS;
//! assert_eq!(stagger.delay(0), Duration::ZERO);
//! assert_eq!(stagger.delay(3), Duration::from_millis(600));
//! ```

use std::time::Duration;

/// Linear delay schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stagger {
    pub base: Duration,
    pub increment: Duration,
}

impl Stagger {
    /// Education, experience, certificates, organization and interest cards.
    pub const CARDS: Self = Self::new(Duration::ZERO, Duration::from_millis(200));
    /// Skill cards.
    pub const SKILLS: Self = Self::new(Duration::ZERO, Duration::from_millis(100));
    /// Project cards.
    pub const PROJECTS: Self = Self::new(Duration::ZERO, Duration::from_millis(100));
    /// About's skill chips.
    pub const CHIPS: Self = Self::new(Duration::from_millis(600), Duration::from_millis(100));
    /// Hero role lines.
    pub const HERO_ROLES: Self = Self::new(Duration::from_secs(1), Duration::from_millis(600));
    /// Hero social links.
    pub const HERO_SOCIAL: Self = Self::new(Duration::from_secs(1), Duration::from_millis(900));

    pub const fn new(base: Duration, increment: Duration) -> Self {
        Self { base, increment }
    }

    /// Delay of the item at `index`.
    pub fn delay(&self, index: usize) -> Duration {
        let steps = u32::try_from(index).unwrap_or(u32::MAX);
        self.base
            .saturating_add(self.increment.checked_mul(steps).unwrap_or(Duration::MAX))
    }

    /// Delays for `count` items in index order.
    pub fn delays(&self, count: usize) -> Vec<Duration> {
        (0..count).map(|i| self.delay(i)).collect()
    }
}

/// An item paired with its position and entrance delay.
#[derive(Debug, Clone, PartialEq)]
pub struct StaggeredItem<'a, T> {
    pub index: usize,
    pub delay: Duration,
    pub item: &'a T,
}

/// Pair every item with its delay.
pub fn stagger_items<T>(items: &[T], stagger: Stagger) -> Vec<StaggeredItem<'_, T>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| StaggeredItem {
            index,
            delay: stagger.delay(index),
            item,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_is_linear_in_index() {
        let stagger = Stagger::new(Duration::from_millis(300), Duration::from_millis(100));
        for i in 0..50 {
            assert_eq!(
                stagger.delay(i),
                Duration::from_millis(300) + Duration::from_millis(100) * i as u32
            );
        }
    }

    #[test]
    fn test_delays_non_decreasing() {
        for stagger in [Stagger::CARDS, Stagger::CHIPS, Stagger::HERO_SOCIAL] {
            let delays = stagger.delays(20);
            assert_eq!(delays.len(), 20);
            assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_zero_increment_is_simultaneous() {
        let stagger = Stagger::new(Duration::from_millis(500), Duration::ZERO);
        assert!(stagger.delays(5).iter().all(|d| *d == Duration::from_millis(500)));
    }

    #[test]
    fn test_stagger_items_deterministic() {
        let items = ["a", "b", "c"];
        let first = stagger_items(&items, Stagger::SKILLS);
        let second = stagger_items(&items, Stagger::SKILLS);
        assert_eq!(first, second);
        assert_eq!(first[2].delay, Duration::from_millis(200));
        assert_eq!(*first[1].item, "b");
    }

    #[test]
    fn test_empty_list() {
        let items: [u8; 0] = [];
        assert!(stagger_items(&items, Stagger::CARDS).is_empty());
        assert!(Stagger::CARDS.delays(0).is_empty());
    }

    #[test]
    fn test_huge_index_saturates() {
        let d = Stagger::CARDS.delay(usize::MAX);
        assert!(d >= Stagger::CARDS.delay(1_000_000));
    }
}
