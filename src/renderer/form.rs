//! Contact form panel.
//!
//! Drawn over the bottom of the page while the app is in form mode.

use crate::contact::{ContactField, ContactForm, SendStatus};
use crate::layout::{take_width, truncate_text, wrap_text};
use crate::theme::Palette;
use crate::types::{Attr, Rgba};

use super::canvas::{Canvas, Pen};

/// Rows of the message field.
pub const MESSAGE_ROWS: u16 = 4;

/// Panel height: rule, name, email, message label and rows, status, hint.
pub const PANEL_ROWS: u16 = 5 + MESSAGE_ROWS + 1;

const LABEL_COLS: u16 = 9;
const HINT: &str = "Enter send  Alt+Enter newline  Tab next field  Esc close";

/// Everything the panel shows.
#[derive(Debug, Clone, Copy)]
pub struct FormView<'a> {
    pub form: &'a ContactForm,
    pub status: &'a SendStatus,
    /// Last validation problem, shown instead of the status.
    pub problem: Option<&'a str>,
    /// Shown when there is no relay.
    pub notice: Option<&'a str>,
}

/// Paint the form panel onto the bottom rows of `canvas`.
pub fn paint_form(canvas: &mut Canvas, view: &FormView<'_>, palette: &Palette) {
    let height = canvas.height();
    let width = canvas.width();
    // Row 0 stays the header.
    let rows = PANEL_ROWS.min(height.saturating_sub(1));
    if rows == 0 {
        return;
    }
    let top = i32::from(height - rows);
    for row in 0..i32::from(rows) {
        canvas.fill_row(top + row, palette.surface);
    }

    let accent = Pen::fg(palette.accent).attrs(Attr::BOLD);
    let title = " Send me a message ";
    canvas.repeat(0, top, '─', width, Pen::fg(palette.accent));
    canvas.put_str(2, top, title, accent);

    let field_cols = width.saturating_sub(LABEL_COLS + 2);
    let mut y = top + 1;
    for field in [ContactField::Name, ContactField::Email] {
        paint_label(canvas, y, field, view.form, palette);
        let value = tail(view.form.get(field), field_cols.saturating_sub(1));
        let end = canvas.put_str(i32::from(LABEL_COLS + 1), y, &value, Pen::fg(palette.text));
        paint_cursor(canvas, end, y, field, view.form, palette);
        y += 1;
    }

    paint_label(canvas, y, ContactField::Message, view.form, palette);
    let lines = wrap_text(view.form.get(ContactField::Message), field_cols.saturating_sub(1));
    // Keep the last rows in view while typing.
    let skip = lines.len().saturating_sub(usize::from(MESSAGE_ROWS));
    let mut end = i32::from(LABEL_COLS + 1);
    let mut cursor_y = y;
    for (row, line) in lines.iter().skip(skip).enumerate() {
        cursor_y = y + row as i32;
        end = canvas.put_str(i32::from(LABEL_COLS + 1), cursor_y, line, Pen::fg(palette.text));
    }
    paint_cursor(canvas, end, cursor_y, ContactField::Message, view.form, palette);
    y += i32::from(MESSAGE_ROWS) + 1;

    let (status, color) = status_line(view, palette);
    if let Some(status) = status {
        canvas.put_str(2, y, &truncate_text(status, width.saturating_sub(2)), Pen::fg(color));
    }
    canvas.put_str(
        2,
        y + 1,
        &truncate_text(HINT, width.saturating_sub(2)),
        Pen::fg(palette.text_muted).attrs(Attr::ITALIC),
    );
}

fn paint_label(
    canvas: &mut Canvas,
    y: i32,
    field: ContactField,
    form: &ContactForm,
    palette: &Palette,
) {
    let focused = form.focus() == field;
    let marker = if focused { "›" } else { " " };
    let pen = if focused {
        Pen::fg(palette.accent).attrs(Attr::BOLD)
    } else {
        Pen::fg(palette.text_muted)
    };
    canvas.put_str(1, y, &format!("{marker}{}", field.label()), pen);
}

fn paint_cursor(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    field: ContactField,
    form: &ContactForm,
    palette: &Palette,
) {
    if form.focus() == field {
        canvas.put_str(x, y, "▏", Pen::fg(palette.accent));
    }
}

/// Rightmost `width` cells of `value`.
fn tail(value: &str, width: u16) -> String {
    let reversed: String = value.chars().rev().collect();
    take_width(&reversed, width).chars().rev().collect()
}

fn status_line<'a>(view: &FormView<'a>, palette: &Palette) -> (Option<&'a str>, Rgba) {
    if let Some(notice) = view.notice {
        return (Some(notice), palette.text_muted);
    }
    if let Some(problem) = view.problem {
        return (Some(problem), palette.error);
    }
    let color = match view.status {
        SendStatus::Sent => palette.success,
        SendStatus::Failed { .. } => palette.error,
        SendStatus::Idle | SendStatus::Sending => palette.text_muted,
    };
    (view.status.user_message(), color)
}
