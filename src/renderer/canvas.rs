//! Cell canvas and styled lines.
//!
//! Painting happens on a [`Canvas`] of cells. Once a screen is complete it is
//! collapsed into [`Line`]s, runs of identically styled cells, which is what
//! the terminal writer diffs.

use unicode_width::UnicodeWidthChar;

use crate::types::{Attr, Rgba};

/// Marks the right half of a wide character.
const CONTINUATION: char = '\0';

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Cell {
    pub const fn blank(bg: Rgba) -> Self {
        Self {
            ch: ' ',
            fg: Rgba::TERMINAL_DEFAULT,
            bg,
            attrs: Attr::NONE,
        }
    }
}

/// Text style of a painted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub fg: Rgba,
    /// None keeps the background already on the canvas.
    pub bg: Option<Rgba>,
    pub attrs: Attr,
}

impl Pen {
    pub const fn fg(fg: Rgba) -> Self {
        Self {
            fg,
            bg: None,
            attrs: Attr::NONE,
        }
    }

    pub const fn bg(mut self, bg: Rgba) -> Self {
        self.bg = Some(bg);
        self
    }

    pub const fn attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }
}

/// A fixed-size grid of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16, background: Rgba) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(background); usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u16::try_from(x).ok().filter(|x| *x < self.width)?;
        let y = u16::try_from(y).ok().filter(|y| *y < self.height)?;
        Some(usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(i32::from(x), i32::from(y)).map(|i| &self.cells[i])
    }

    /// Paint `text` starting at `(x, y)`, clipped to the canvas.
    ///
    /// Returns the column after the last cell written.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, pen: Pen) -> i32 {
        let mut col = x;
        for c in text.chars() {
            let width = c.width().unwrap_or(0) as i32;
            if width == 0 {
                continue;
            }
            // A wide char that does not fit whole is dropped.
            if width == 2 && self.index(col + 1, y).is_none() {
                col += width;
                continue;
            }
            self.set(col, y, c, pen);
            if width == 2 {
                self.set(col + 1, y, CONTINUATION, pen);
            }
            col += width;
        }
        col
    }

    /// Paint `count` copies of `c`.
    pub fn repeat(&mut self, x: i32, y: i32, c: char, count: u16, pen: Pen) {
        for offset in 0..i32::from(count) {
            self.set(x + offset, y, c, pen);
        }
    }

    /// Set the background of a whole row.
    pub fn fill_row(&mut self, y: i32, bg: Rgba) {
        for x in 0..i32::from(self.width) {
            if let Some(i) = self.index(x, y) {
                self.cells[i] = Cell::blank(bg);
            }
        }
    }

    fn set(&mut self, x: i32, y: i32, ch: char, pen: Pen) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let cell = &mut self.cells[i];
        cell.ch = ch;
        cell.fg = pen.fg;
        cell.attrs = pen.attrs;
        if let Some(bg) = pen.bg {
            cell.bg = bg;
        }
    }

    /// Collapse each row into runs of identical style.
    pub fn into_lines(self) -> Vec<Line> {
        self.cells
            .chunks(usize::from(self.width.max(1)))
            .take(usize::from(self.height))
            .map(Line::from_cells)
            .collect()
    }
}

/// A run of identically styled text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

/// One screen row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    fn from_cells(cells: &[Cell]) -> Self {
        let mut spans: Vec<Span> = Vec::new();
        for cell in cells {
            if cell.ch == CONTINUATION {
                continue;
            }
            match spans.last_mut() {
                Some(span)
                    if span.fg == cell.fg && span.bg == cell.bg && span.attrs == cell.attrs =>
                {
                    span.text.push(cell.ch);
                }
                _ => spans.push(Span {
                    text: cell.ch.to_string(),
                    fg: cell.fg,
                    bg: cell.bg,
                    attrs: cell.attrs,
                }),
            }
        }
        Self { spans }
    }

    /// Plain text of the row.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_str_clips() {
        let mut canvas = Canvas::new(5, 2, Rgba::BLACK);
        let end = canvas.put_str(3, 0, "hello", Pen::fg(Rgba::WHITE));
        assert_eq!(end, 8);
        canvas.put_str(-2, 1, "abcd", Pen::fg(Rgba::WHITE));
        let lines = canvas.into_lines();
        assert_eq!(lines[0].text(), "   he");
        assert_eq!(lines[1].text(), "cd   ");
    }

    #[test]
    fn test_wide_chars_take_two_cells() {
        let mut canvas = Canvas::new(4, 1, Rgba::BLACK);
        canvas.put_str(0, 0, "日本語", Pen::fg(Rgba::WHITE));
        assert_eq!(canvas.into_lines()[0].text(), "日本");
    }

    #[test]
    fn test_lines_merge_runs() {
        let mut canvas = Canvas::new(6, 1, Rgba::BLACK);
        canvas.put_str(0, 0, "ab", Pen::fg(Rgba::WHITE).attrs(Attr::BOLD));
        let line = canvas.into_lines().remove(0);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].text, "ab");
        assert_eq!(line.spans[1].text, "    ");
    }

    #[test]
    fn test_pen_keeps_background() {
        let mut canvas = Canvas::new(2, 1, Rgba::GRAY);
        canvas.put_str(0, 0, "x", Pen::fg(Rgba::WHITE));
        assert_eq!(canvas.get(0, 0).unwrap().bg, Rgba::GRAY);
        canvas.put_str(1, 0, "y", Pen::fg(Rgba::WHITE).bg(Rgba::BLACK));
        assert_eq!(canvas.get(1, 0).unwrap().bg, Rgba::BLACK);
    }
}
