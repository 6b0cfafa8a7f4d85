//! Page painting.
//!
//! Turns a sampled [`Frame`] into cells. Motion styles map onto the terminal
//! as follows:
//!
//! - opacity below [`HIDDEN_BELOW`] draws nothing, below [`DIM_BELOW`] draws
//!   `DIM`, and the color is blended towards the background
//! - offsets are in pixels of the original design and move whole cells
//! - underline `scale_x` and bar `fill` set partial widths

use crate::content::{ContentItem, PageSpec, Part, SectionId, SectionSpec};
use crate::layout::{card_lines, string_width, wrap_text, CardLine, CARD_INSET};
use crate::pipeline::{Frame, FrameElement};
use crate::state::animate::MotionStyle;
use crate::theme::{ColorScheme, Palette};
use crate::types::{Attr, Rgba};

use super::canvas::{Canvas, Line, Pen};

/// Pixels per terminal row.
pub const PX_PER_ROW: f32 = 25.0;

/// Pixels per terminal column.
pub const PX_PER_COL: f32 = 10.0;

/// Elements fainter than this are not drawn.
pub const HIDDEN_BELOW: f32 = 0.15;

/// Elements fainter than this are drawn dim.
pub const DIM_BELOW: f32 = 0.6;

/// Width of a full heading underline.
pub const UNDERLINE_COLS: u16 = 10;

/// Text on the condensed header bar.
const HEADER_TEXT: Rgba = Rgba::WHITE;
const HEADER_MUTED: Rgba = Rgba::from_rgb_int(0xbfdbfe);

/// What the header shows besides the frame's scroll state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub owner: String,
    pub scheme: ColorScheme,
}

impl Header {
    pub fn new(owner: impl Into<String>, scheme: ColorScheme) -> Self {
        Self {
            owner: owner.into(),
            scheme,
        }
    }
}

/// Draw `frame` as terminal lines.
pub fn render_lines(
    frame: &Frame,
    page: &PageSpec,
    palette: &Palette,
    header: &Header,
) -> Vec<Line> {
    paint_page(frame, page, palette, header).into_lines()
}

/// Draw `frame` onto a fresh canvas, leaving room for overlays.
pub fn paint_page(frame: &Frame, page: &PageSpec, palette: &Palette, header: &Header) -> Canvas {
    let viewport = frame.viewport;
    let mut canvas = Canvas::new(viewport.width, viewport.height, palette.background);

    for element in &frame.elements {
        if let Some(section) = page.section(element.key.section) {
            paint_element(&mut canvas, element, section, palette, viewport.scroll_y);
        }
    }

    paint_header(&mut canvas, frame, header, palette);
    canvas
}

/// Screen origin and ink of an element at its current style.
struct Brush<'a> {
    x: i32,
    y: i32,
    width: u16,
    style: MotionStyle,
    palette: &'a Palette,
}

impl Brush<'_> {
    fn visible(&self) -> bool {
        self.style.opacity >= HIDDEN_BELOW
    }

    fn pen(&self, color: Rgba, attrs: Attr) -> Pen {
        let dim = if self.style.opacity < DIM_BELOW {
            Attr::DIM
        } else {
            Attr::NONE
        };
        Pen::fg(Rgba::lerp(self.palette.background, color, self.style.opacity)).attrs(attrs | dim)
    }

    fn text(&self, canvas: &mut Canvas, text: &str, color: Rgba, attrs: Attr) -> i32 {
        let lines = wrap_text(text, self.width);
        for (row, line) in lines.iter().enumerate() {
            canvas.put_str(self.x, self.y + row as i32, line, self.pen(color, attrs));
        }
        lines.len() as i32
    }
}

fn paint_element(
    canvas: &mut Canvas,
    element: &FrameElement,
    section: &SectionSpec,
    palette: &Palette,
    scroll_y: u32,
) {
    let style = element.style;
    let rest_y = element.rect.y as i32 - scroll_y as i32;
    let brush = Brush {
        x: element.rect.x as i32 + (style.offset_x / PX_PER_COL).round() as i32,
        y: rest_y + (style.offset_y / PX_PER_ROW).round() as i32,
        width: element.rect.width.max(0.0) as u16,
        style,
        palette,
    };

    match element.key.part {
        Part::Section => {}
        Part::Title => {
            let rows = wrap_text(&section.title, brush.width).len() as i32;
            if brush.visible() {
                brush.text(canvas, &section.title, palette.accent, Attr::BOLD);
            }
            if let Some(underline) = element.underline {
                let full = UNDERLINE_COLS.min(brush.width);
                let cols = (underline.scale_x.min(1.0) * f32::from(full)).round() as u16;
                canvas.repeat(
                    element.rect.x as i32,
                    rest_y + rows,
                    '━',
                    cols,
                    Pen::fg(palette.accent_secondary),
                );
            }
        }
        Part::Body => {
            if let (true, Some(body)) = (brush.visible(), &section.body) {
                brush.text(canvas, body, palette.text, Attr::NONE);
            }
        }
        Part::Chip(index) => {
            if let (true, Some(label)) = (brush.visible(), section.chips.get(index)) {
                let pen = brush.pen(palette.accent_secondary, Attr::NONE).bg(palette.surface);
                canvas.put_str(brush.x, brush.y, &format!("[{label}]"), pen);
            }
        }
        Part::Item(index) => {
            if let (true, Some(item)) = (brush.visible(), section.items.get(index)) {
                paint_card(canvas, &brush, item, element.bar);
            }
        }
        Part::Footer => {
            if let (true, Some(footer)) = (brush.visible(), &section.footer) {
                brush.text(canvas, footer, palette.text_muted, Attr::ITALIC);
            }
        }
    }
}

fn paint_card(
    canvas: &mut Canvas,
    brush: &Brush<'_>,
    item: &ContentItem,
    bar: Option<MotionStyle>,
) {
    let palette = brush.palette;
    let rule = item
        .color
        .as_deref()
        .and_then(Rgba::from_hex)
        .unwrap_or(palette.accent);
    let inner = brush.width.saturating_sub(CARD_INSET);
    let x = brush.x + i32::from(CARD_INSET);

    for (row, line) in card_lines(item, brush.width).iter().enumerate() {
        let y = brush.y + row as i32;
        canvas.put_str(brush.x, y, "│", brush.pen(rule, Attr::NONE));

        match line {
            CardLine::Title(text) => {
                canvas.put_str(x, y, text, brush.pen(palette.text, Attr::BOLD));
            }
            CardLine::Meta(text) => {
                canvas.put_str(x, y, text, brush.pen(palette.text_muted, Attr::ITALIC));
            }
            CardLine::Text(text) => {
                canvas.put_str(x, y, text, brush.pen(palette.text, Attr::NONE));
            }
            CardLine::Link(text) => {
                canvas.put_str(x, y, text, brush.pen(palette.accent, Attr::UNDERLINE));
            }
            CardLine::Bar(percent) => {
                let label = format!(" {percent:>3}%");
                let track = inner.saturating_sub(string_width(&label));
                let fill = bar.map_or(f32::from(*percent) / 100.0, |b| b.fill);
                let filled = (fill.clamp(0.0, 1.0) * f32::from(track)).round() as u16;
                canvas.repeat(x, y, '█', filled, brush.pen(palette.accent, Attr::NONE));
                canvas.repeat(
                    x + i32::from(filled),
                    y,
                    '░',
                    track - filled,
                    brush.pen(palette.text_muted, Attr::NONE),
                );
                canvas.put_str(
                    x + i32::from(track),
                    y,
                    &label,
                    brush.pen(palette.text_muted, Attr::NONE),
                );
            }
        }
    }
}

fn paint_header(canvas: &mut Canvas, frame: &Frame, header: &Header, palette: &Palette) {
    let (bg, text, muted) = if frame.header_condensed {
        (palette.header, HEADER_TEXT, HEADER_MUTED)
    } else {
        (palette.background, palette.text, palette.text_muted)
    };
    canvas.fill_row(0, bg);

    let mut col = canvas.put_str(1, 0, &header.owner, Pen::fg(text).attrs(Attr::BOLD)) + 2;
    for id in SectionId::NAVIGATION {
        let pen = if id == frame.current_section {
            Pen::fg(text).attrs(Attr::BOLD | Attr::INVERSE)
        } else {
            Pen::fg(muted)
        };
        col = canvas.put_str(col, 0, id.label(), pen) + 1;
    }

    let toggle = if header.scheme.is_dark() { "☾" } else { "☀" };
    let right = i32::from(canvas.width()) - 2;
    canvas.put_str(right, 0, toggle, Pen::fg(text).bg(bg));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ElementKey;
    use crate::types::{Rect, Viewport};

    fn page() -> PageSpec {
        PageSpec::new(
            "Ada",
            vec![
                SectionSpec::new(SectionId::About, "About Me")
                    .body("Hello there")
                    .items(vec![ContentItem::new("Rust", "").proficiency(50)]),
            ],
        )
    }

    fn frame(elements: Vec<FrameElement>) -> Frame {
        Frame {
            viewport: Viewport::new(0, 40, 12),
            header_condensed: false,
            current_section: SectionId::About,
            elements,
            animating: false,
        }
    }

    fn element(part: Part, y: f32, style: MotionStyle) -> FrameElement {
        FrameElement {
            key: ElementKey::new(SectionId::About, part),
            rect: Rect::new(2.0, y, 30.0, 2.0),
            style,
            underline: None,
            bar: None,
        }
    }

    fn row_text(lines: &[Line], row: usize) -> String {
        lines[row].text().trim_end().to_string()
    }

    fn header() -> Header {
        Header::new("Ada", ColorScheme::Light)
    }

    #[test]
    fn test_faint_element_not_drawn() {
        let f = frame(vec![element(Part::Body, 3.0, MotionStyle::VISIBLE.opacity(0.1))]);
        let lines = render_lines(&f, &page(), &Palette::light(), &header());
        assert_eq!(row_text(&lines, 3), "");
    }

    #[test]
    fn test_half_faded_element_is_dim() {
        let f = frame(vec![element(Part::Body, 3.0, MotionStyle::VISIBLE.opacity(0.4))]);
        let lines = render_lines(&f, &page(), &Palette::light(), &header());
        assert_eq!(row_text(&lines, 3), "  Hello there");
        let span = lines[3].spans.iter().find(|s| s.text.contains("Hello")).unwrap();
        assert!(span.attrs.contains(Attr::DIM));
    }

    #[test]
    fn test_offset_moves_rows() {
        let f = frame(vec![element(Part::Body, 3.0, MotionStyle::VISIBLE.offset_y(50.0))]);
        let lines = render_lines(&f, &page(), &Palette::light(), &header());
        assert_eq!(row_text(&lines, 3), "");
        assert_eq!(row_text(&lines, 5), "  Hello there");
    }

    #[test]
    fn test_scroll_offset_applies() {
        let mut f = frame(vec![element(Part::Body, 8.0, MotionStyle::VISIBLE)]);
        f.viewport.scroll_y = 4;
        let lines = render_lines(&f, &page(), &Palette::light(), &header());
        assert_eq!(row_text(&lines, 4), "  Hello there");
    }

    #[test]
    fn test_underline_grows() {
        let mut title = element(Part::Title, 2.0, MotionStyle::VISIBLE);
        title.underline = Some(MotionStyle::VISIBLE.scale_x(0.5));
        let lines = render_lines(&frame(vec![title]), &page(), &Palette::light(), &header());
        assert_eq!(row_text(&lines, 2), "  About Me");
        assert_eq!(row_text(&lines, 3), "  ━━━━━");
    }

    #[test]
    fn test_bar_fill() {
        let mut card = element(Part::Item(0), 2.0, MotionStyle::VISIBLE);
        card.bar = Some(MotionStyle::VISIBLE.fill(0.5));
        let lines = render_lines(&frame(vec![card]), &page(), &Palette::light(), &header());
        let bar = row_text(&lines, 3);
        // 28 inner columns, 5 for the label: 23 track cells.
        assert_eq!(bar.matches('█').count(), 12);
        assert_eq!(bar.matches('░').count(), 11);
        assert!(bar.ends_with(" 50%"));
    }

    #[test]
    fn test_header_highlights_current_section() {
        let lines = render_lines(&frame(vec![]), &page(), &Palette::light(), &header());
        let current = lines[0]
            .spans
            .iter()
            .find(|s| s.attrs.contains(Attr::INVERSE))
            .unwrap();
        assert_eq!(current.text, "About");
        assert!(lines[0].text().starts_with(" Ada  Home About"));
    }

    #[test]
    fn test_condensed_header_uses_bar_color() {
        let mut f = frame(vec![]);
        f.header_condensed = true;
        let palette = Palette::light();
        let lines = render_lines(&f, &page(), &palette, &header());
        assert!(lines[0].spans.iter().all(|s| s.bg == palette.header));
        let plain = render_lines(&frame(vec![]), &page(), &palette, &header());
        assert!(plain[0].spans.iter().all(|s| s.bg == palette.background));
    }
}
