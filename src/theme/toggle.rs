//! Theme Toggle - OS preference with a sticky manual override
//!
//! The scheme starts at the source's preference and follows it until the
//! user picks one. From then on the choice is kept for the rest of the
//! session and OS changes are ignored, unless the override is cleared.
//!
//! # Example
//!
//! ```
//! use spark_folio::theme::{ColorScheme, ColorSchemeQuery, ThemeToggle};
//!
//! let os = ColorSchemeQuery::new(false);
//! let theme = ThemeToggle::mount(os.clone());
//! assert_eq!(theme.scheme(), ColorScheme::Light);
//!
//! os.set_prefers_dark(true);
//! assert_eq!(theme.scheme(), ColorScheme::Dark);
//!
//! theme.toggle();
//! os.set_prefers_dark(false);
//! os.set_prefers_dark(true);
//! assert_eq!(theme.scheme(), ColorScheme::Light);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use super::preference::{PreferenceSource, Subscription};
use super::{ColorScheme, Palette};

/// Current color scheme of a mounted page.
pub struct ThemeToggle {
    scheme: Signal<ColorScheme>,
    overridden: Rc<Cell<bool>>,
    source: Rc<dyn PreferenceSource>,
    _subscription: Subscription,
}

impl ThemeToggle {
    /// Initialize from `source` and start following it.
    pub fn mount(source: impl PreferenceSource + 'static) -> Self {
        let source: Rc<dyn PreferenceSource> = Rc::new(source);
        let scheme = signal(source.scheme());
        let overridden = Rc::new(Cell::new(false));

        let subscription = {
            let scheme = scheme.clone();
            let overridden = overridden.clone();
            source.subscribe(Rc::new(move |prefers_dark| {
                if !overridden.get() {
                    scheme.set(ColorScheme::from_dark(prefers_dark));
                }
            }))
        };

        Self {
            scheme,
            overridden,
            source,
            _subscription: subscription,
        }
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme.get()
    }

    /// Reactive scheme.
    pub fn scheme_signal(&self) -> Signal<ColorScheme> {
        self.scheme.clone()
    }

    pub fn palette(&self) -> Palette {
        Palette::for_scheme(self.scheme())
    }

    /// Whether a manual choice is in effect.
    pub fn is_overridden(&self) -> bool {
        self.overridden.get()
    }

    /// Flip the scheme and keep it for the session.
    pub fn toggle(&self) -> ColorScheme {
        let next = self.scheme().toggled();
        self.set_scheme(next);
        next
    }

    /// Pick `scheme` explicitly.
    pub fn set_scheme(&self, scheme: ColorScheme) {
        self.overridden.set(true);
        self.scheme.set(scheme);
        log::debug!("theme override set to {scheme}");
    }

    /// Drop the override and go back to the system preference.
    pub fn clear_override(&self) {
        self.overridden.set(false);
        self.scheme.set(self.source.scheme());
    }
}

impl std::fmt::Debug for ThemeToggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeToggle")
            .field("scheme", &self.scheme())
            .field("overridden", &self.is_overridden())
            .finish()
    }
}
