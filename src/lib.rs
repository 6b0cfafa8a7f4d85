//! # spark-folio
//!
//! A single-page portfolio for the terminal with scroll-triggered reveals.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! Every section title and every content card owns a one-shot reveal
//! controller. Observers watch the page geometry; the first time an element
//! crosses into the margin-adjusted viewport its controller flips to visible
//! and its entrance plays. Scrolling back never replays it.
//!
//! ```text
//! PageSpec → PageLayout → observers → RevealControllers → Frame → renderer
//! ```
//!
//! ## Modules
//!
//! - [`content`] - Sections, items and the portfolio page
//! - [`layout`] - Taffy layout and text measurement
//! - [`state`] - Observer, reveal, stagger, animation, scroll and input
//! - [`pipeline`] - Mounting a page and sampling frames
//! - [`renderer`] - Cells, lines and terminal output
//! - [`theme`] - Color schemes, OS preference and the manual toggle
//! - [`contact`] - Contact form and mail relay client
//! - [`app`] - The command loop tying it together
//! - [`config`], [`error`], [`logging`] - Startup plumbing

pub mod app;
pub mod config;
pub mod contact;
pub mod content;
pub mod error;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use app::{App, OFFLINE_NOTICE};

pub use config::{FolioConfig, PageConfig, RelayConfig};

pub use contact::{
    ContactClient, ContactField, ContactForm, ContactSubmission, EmailRelay, PendingSubmission,
    RelayTransport, SendStatus,
};

pub use content::{portfolio, ContentItem, ElementKey, PageSpec, Part, SectionId, SectionSpec};

pub use error::{ConfigError, FolioError, RelayError, SubmitError, ValidationError};

pub use layout::{measure_text_height, string_width, truncate_text, wrap_text, PageLayout};

pub use pipeline::{mount, mount_with, Frame, FrameElement, MountedPage};

pub use renderer::{render_lines, Header, Line, TerminalRenderer};

pub use state::{
    observe, process_intersections, reset_observers, ElementGeometry, IntersectionEntry, Mode,
    MotionVariant, ObserverHandle, ObserverOptions, PageCommand, PageScroll, RevealController,
    RevealState, RootMargin, Stagger, StaggeredItem, stagger_items,
};

pub use theme::{ColorScheme, ColorSchemeQuery, Palette, PreferenceSource, ThemeToggle};
