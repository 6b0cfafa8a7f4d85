//! OS color-scheme preference.
//!
//! [`PreferenceSource`] is the injected "does the system prefer dark?"
//! capability. [`ColorSchemeQuery`] is an in-memory implementation shaped
//! like a media query: it holds the current answer and notifies listeners
//! when it changes.

use std::cell::RefCell;
use std::rc::Rc;

use super::ColorScheme;

/// Environment variable forcing the scheme (`dark` or `light`).
pub const COLOR_SCHEME_VAR: &str = "SPARK_FOLIO_COLOR_SCHEME";

/// Terminal-provided `fg;bg` palette indices.
pub const COLORFGBG_VAR: &str = "COLORFGBG";

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Registration of a preference listener. Dropping it unsubscribes.
#[must_use = "dropping the subscription removes the listener"]
pub struct Subscription {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// A subscription with nothing to release.
    pub fn noop() -> Self {
        Self { cleanup: None }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cleanup.is_some())
            .finish()
    }
}

// =============================================================================
// PREFERENCE SOURCE
// =============================================================================

/// Listener called with the new `prefers_dark` value.
pub type PreferenceListener = Rc<dyn Fn(bool)>;

/// Where the system color-scheme preference comes from.
pub trait PreferenceSource {
    fn prefers_dark(&self) -> bool;

    /// Call `listener` on every change until the subscription is dropped.
    fn subscribe(&self, listener: PreferenceListener) -> Subscription;

    fn scheme(&self) -> ColorScheme {
        ColorScheme::from_dark(self.prefers_dark())
    }
}

// =============================================================================
// COLOR SCHEME QUERY
// =============================================================================

struct QueryState {
    prefers_dark: bool,
    listeners: Vec<(usize, PreferenceListener)>,
    next_id: usize,
}

/// In-memory `(prefers-color-scheme: dark)` query.
///
/// Clones share state, so a test (or a terminal probe) can hold one clone
/// and flip the preference while the theme toggle listens on another.
#[derive(Clone)]
pub struct ColorSchemeQuery {
    state: Rc<RefCell<QueryState>>,
}

impl ColorSchemeQuery {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(QueryState {
                prefers_dark,
                listeners: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Seed from the process environment.
    ///
    /// The environment is read once and never notifies, so the binary's
    /// theme follows the OS only as far as it was at launch. Sources that can
    /// change call [`ColorSchemeQuery::set_prefers_dark`] on a clone.
    pub fn from_env() -> Self {
        Self::new(detect_env_preference().is_dark())
    }

    /// Change the answer. Listeners run only when the value differs.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        let listeners: Vec<PreferenceListener> = {
            let mut state = self.state.borrow_mut();
            if state.prefers_dark == prefers_dark {
                return;
            }
            state.prefers_dark = prefers_dark;
            state.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        log::debug!("system color scheme changed, prefers_dark={prefers_dark}");
        for listener in listeners {
            listener(prefers_dark);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

impl std::fmt::Debug for ColorSchemeQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ColorSchemeQuery")
            .field("prefers_dark", &state.prefers_dark)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl PreferenceSource for ColorSchemeQuery {
    fn prefers_dark(&self) -> bool {
        self.state.borrow().prefers_dark
    }

    fn subscribe(&self, listener: PreferenceListener) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, listener));
            id
        };

        let weak = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }
}

// =============================================================================
// ENVIRONMENT DETECTION
// =============================================================================

/// Scheme from the process environment.
///
/// `SPARK_FOLIO_COLOR_SCHEME` wins; otherwise the background index of
/// `COLORFGBG` decides. Light when neither says anything.
pub fn detect_env_preference() -> ColorScheme {
    preference_from_lookup(|key| std::env::var(key).ok()).unwrap_or_default()
}

/// Same as [`detect_env_preference`] with an injectable lookup.
pub fn preference_from_lookup<F>(lookup: F) -> Option<ColorScheme>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(forced) = lookup(COLOR_SCHEME_VAR).and_then(|v| ColorScheme::parse(&v)) {
        return Some(forced);
    }

    let fgbg = lookup(COLORFGBG_VAR)?;
    let background: u8 = fgbg.rsplit(';').next()?.trim().parse().ok()?;
    // 0-6 and 8 are the dark entries of the 16-color palette.
    Some(ColorScheme::from_dark(matches!(background, 0..=6 | 8)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_listeners_notified_on_change_only() {
        let query = ColorSchemeQuery::new(false);
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _sub = query.subscribe(Rc::new(move |_| c.set(c.get() + 1)));

        query.set_prefers_dark(false);
        assert_eq!(calls.get(), 0);
        query.set_prefers_dark(true);
        assert_eq!(calls.get(), 1);
        assert!(query.prefers_dark());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let query = ColorSchemeQuery::new(false);
        let sub = query.subscribe(Rc::new(|_| {}));
        assert_eq!(query.listener_count(), 1);
        drop(sub);
        assert_eq!(query.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_query() {
        let query = ColorSchemeQuery::new(true);
        let sub = query.subscribe(Rc::new(|_| {}));
        drop(query);
        sub.unsubscribe();
    }

    #[test]
    fn test_env_override_wins() {
        let env = lookup(&[(COLOR_SCHEME_VAR, "dark"), (COLORFGBG_VAR, "0;15")]);
        assert_eq!(preference_from_lookup(env), Some(ColorScheme::Dark));
    }

    #[test]
    fn test_colorfgbg_background() {
        assert_eq!(
            preference_from_lookup(lookup(&[(COLORFGBG_VAR, "15;0")])),
            Some(ColorScheme::Dark)
        );
        assert_eq!(
            preference_from_lookup(lookup(&[(COLORFGBG_VAR, "0;default;15")])),
            Some(ColorScheme::Light)
        );
        assert_eq!(preference_from_lookup(lookup(&[(COLORFGBG_VAR, "junk")])), None);
        assert_eq!(preference_from_lookup(lookup(&[])), None);
    }

    #[test]
    fn test_invalid_override_falls_through() {
        let env = lookup(&[(COLOR_SCHEME_VAR, "sepia"), (COLORFGBG_VAR, "15;0")]);
        assert_eq!(preference_from_lookup(env), Some(ColorScheme::Dark));
    }
}
