//! Renderer - Frames to terminal output
//!
//! - **canvas** - Cell grid and styled lines
//! - **page** - Paints a sampled frame and the header
//! - **form** - The contact form panel
//! - **terminal** - Writes lines to the terminal, rewriting changed rows only

pub mod canvas;
pub mod form;
pub mod page;
pub mod terminal;

pub use canvas::{Canvas, Cell, Line, Pen, Span};
pub use form::{paint_form, FormView};
pub use page::{paint_page, render_lines, Header};
pub use terminal::{to_color, TerminalRenderer};
