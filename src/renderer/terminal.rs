//! Differential line renderer.
//!
//! The TerminalRenderer compares each row with the one drawn last frame and
//! only rewrites the rows that changed. Output for a frame is queued inside
//! a synchronized update and flushed once.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};

use super::canvas::{Line, Span};
use crate::types::{Attr, Rgba};

/// Map a color to crossterm. The terminal default maps to `Reset`.
pub fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        return Color::Reset;
    }
    let channel = |c: i16| c.clamp(0, 255) as u8;
    Color::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

fn attributes(attrs: Attr) -> impl Iterator<Item = Attribute> {
    [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::INVERSE, Attribute::Reverse),
    ]
    .into_iter()
    .filter(move |(flag, _)| attrs.contains(*flag))
    .map(|(_, attribute)| attribute)
}

/// Line-diffing renderer over any writer.
pub struct TerminalRenderer<W: Write> {
    out: W,
    previous: Option<Vec<Line>>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: None,
        }
    }

    /// Draw `lines`, rewriting only rows that changed.
    ///
    /// Returns true if any row was written.
    pub fn render(&mut self, lines: &[Line]) -> io::Result<bool> {
        let previous = self.previous.take();
        let same_shape = previous.as_ref().is_some_and(|p| p.len() == lines.len());

        queue!(self.out, BeginSynchronizedUpdate)?;
        let mut changed = false;
        for (row, line) in lines.iter().enumerate() {
            let unchanged = same_shape
                && previous
                    .as_ref()
                    .and_then(|p| p.get(row))
                    .is_some_and(|old| old == line);
            if unchanged {
                continue;
            }
            changed = true;
            self.write_line(row, line)?;
        }
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(lines.to_vec());
        Ok(changed)
    }

    fn write_line(&mut self, row: usize, line: &Line) -> io::Result<()> {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(self.out, MoveTo(0, row))?;
        for span in &line.spans {
            self.write_span(span)?;
        }
        Ok(())
    }

    fn write_span(&mut self, span: &Span) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(to_color(span.fg)),
            SetBackgroundColor(to_color(span.bg)),
        )?;
        for attribute in attributes(span.attrs) {
            queue!(self.out, SetAttribute(attribute))?;
        }
        queue!(self.out, Print(&span.text))
    }

    /// Forget the last frame; the next render redraws every row.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Check if we have a previous frame to diff against.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Enter fullscreen mode (alternate screen buffer).
    pub fn enter_fullscreen(&mut self) -> io::Result<()> {
        queue!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        self.out.flush()?;
        self.invalidate();
        Ok(())
    }

    /// Exit fullscreen mode.
    pub fn exit_fullscreen(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            Show,
            LeaveAlternateScreen
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::canvas::{Canvas, Pen};

    fn lines(text: &str) -> Vec<Line> {
        let mut canvas = Canvas::new(10, 2, Rgba::BLACK);
        canvas.put_str(0, 0, text, Pen::fg(Rgba::WHITE).attrs(Attr::BOLD));
        canvas.put_str(0, 1, "static", Pen::fg(Rgba::WHITE));
        canvas.into_lines()
    }

    #[test]
    fn test_first_render_draws_everything() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        assert!(!renderer.has_previous());
        assert!(renderer.render(&lines("hello")).unwrap());
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("hello"));
        assert!(out.contains("static"));
    }

    #[test]
    fn test_unchanged_frame_writes_no_rows() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&lines("hello")).unwrap();
        assert!(!renderer.render(&lines("hello")).unwrap());
    }

    #[test]
    fn test_only_changed_rows_rewritten() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&lines("hello")).unwrap();
        let before = renderer.out.len();
        assert!(renderer.render(&lines("world")).unwrap());
        let out = String::from_utf8(renderer.out[before..].to_vec()).unwrap();
        assert!(out.contains("world"));
        assert!(!out.contains("static"));
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&lines("hello")).unwrap();
        renderer.invalidate();
        assert!(renderer.render(&lines("hello")).unwrap());
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(to_color(Rgba::TERMINAL_DEFAULT), Color::Reset);
        assert_eq!(to_color(Rgba::rgb(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn test_attribute_mapping() {
        let attrs: Vec<_> = attributes(Attr::BOLD | Attr::INVERSE).collect();
        assert_eq!(attrs, vec![Attribute::Bold, Attribute::Reverse]);
    }
}
