//! Page Layout - Section geometry using Taffy
//!
//! The page is one flexbox column of sections. Each section is itself a
//! column of title, body, chip row, item cards and footer. The layout uses
//! [Taffy](https://github.com/DioxusLabs/taffy). Text leaves are sized by a
//! measure function that wraps their content at the available width. The
//! result is a page-space [`Rect`] for every [`ElementKey`], which is what
//! the visibility observer tests against.
//!
//! # Example
//!
//! ```
//! use spark_folio::content::{portfolio, ElementKey, SectionId};
//! use spark_folio::layout::PageLayout;
//!
//! let layout = PageLayout::compute(&portfolio(), 80).unwrap();
//! let about = layout.rect(ElementKey::section(SectionId::About)).unwrap();
//! let home = layout.rect(ElementKey::section(SectionId::Home)).unwrap();
//! assert!(about.top() >= home.bottom());
//! ```

mod text_measure;

pub use text_measure::*;

use std::collections::HashMap;

use taffy::{
    AvailableSpace, Dimension, FlexDirection, FlexWrap, LengthPercentage, NodeId, Size, Style,
    TaffyError, TaffyTree,
};

use crate::content::{ContentItem, ElementKey, PageSpec, Part, SectionSpec};
use crate::error::FolioError;
use crate::state::observer::ElementGeometry;
use crate::types::Rect;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Rows reserved at the top of the page for the fixed header.
pub const HEADER_ROWS: u16 = 1;

/// Columns of padding on each side of a section.
pub const SECTION_PADDING_X: u16 = 2;

/// Rows of padding above and below a section's content.
pub const SECTION_PADDING_Y: u16 = 1;

/// Columns a card spends on its left rule.
pub const CARD_INSET: u16 = 2;

/// Narrower terminals are laid out at this width and clipped.
pub const MIN_WIDTH: u16 = 20;

impl From<TaffyError> for FolioError {
    fn from(err: TaffyError) -> Self {
        FolioError::Layout(err.to_string())
    }
}

// =============================================================================
// CARD CONTENT
// =============================================================================

/// One row of an item card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardLine {
    Title(String),
    Meta(String),
    Text(String),
    /// Proficiency bar at this percent.
    Bar(u8),
    Link(String),
}

/// Rows of a card `width` columns wide. Layout and renderer share this so
/// measured and drawn heights agree.
pub fn card_lines(item: &ContentItem, width: u16) -> Vec<CardLine> {
    let inner = width.saturating_sub(CARD_INSET).max(1);
    let mut lines: Vec<CardLine> = wrap_text(&item.title, inner)
        .into_iter()
        .map(CardLine::Title)
        .collect();

    if let Some(meta) = item.meta_line() {
        lines.push(CardLine::Meta(truncate_text(&meta, inner)));
    }
    lines.extend(
        wrap_text(&item.description, inner)
            .into_iter()
            .map(CardLine::Text),
    );
    if let Some(percent) = item.proficiency {
        lines.push(CardLine::Bar(percent));
    }
    if let Some(link) = &item.link {
        lines.push(CardLine::Link(truncate_text(link, inner)));
    }
    lines
}

/// Cell width of a chip drawn as `[label]`.
pub fn chip_width(label: &str) -> u16 {
    string_width(label).saturating_add(2)
}

// =============================================================================
// TAFFY TREE
// =============================================================================

/// Measured leaf content.
enum Leaf {
    Text { text: String, extra_rows: u16 },
    Card(ContentItem),
}

impl Leaf {
    fn measure(&self, known: Size<Option<f32>>, available: Size<AvailableSpace>) -> Size<f32> {
        let width = known.width.unwrap_or(match available.width {
            AvailableSpace::Definite(w) => w,
            AvailableSpace::MinContent | AvailableSpace::MaxContent => f32::from(MIN_WIDTH),
        });
        let cells = width.max(1.0) as u16;

        let rows = match self {
            Leaf::Text { text, extra_rows } => measure_text_height(text, cells) + extra_rows,
            Leaf::Card(item) => u16::try_from(card_lines(item, cells).len()).unwrap_or(u16::MAX),
        };

        Size {
            width,
            height: known.height.unwrap_or(f32::from(rows)),
        }
    }
}

fn column(gap: u16) -> Style {
    Style {
        flex_direction: FlexDirection::Column,
        gap: Size {
            width: LengthPercentage::Length(0.0),
            height: LengthPercentage::Length(f32::from(gap)),
        },
        ..Default::default()
    }
}

fn section_style() -> Style {
    let x = LengthPercentage::Length(f32::from(SECTION_PADDING_X));
    let y = LengthPercentage::Length(f32::from(SECTION_PADDING_Y));
    Style {
        padding: taffy::Rect {
            top: y,
            bottom: y,
            left: x,
            right: x,
        },
        ..column(1)
    }
}

fn chip_row_style() -> Style {
    Style {
        flex_direction: FlexDirection::Row,
        flex_wrap: FlexWrap::Wrap,
        gap: Size {
            width: LengthPercentage::Length(1.0),
            height: LengthPercentage::Length(0.0),
        },
        ..Default::default()
    }
}

fn chip_style(label: &str) -> Style {
    Style {
        size: Size {
            width: Dimension::Length(f32::from(chip_width(label))),
            height: Dimension::Length(1.0),
        },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

/// Nodes of one section, for reading results back.
struct SectionNodes {
    node: NodeId,
    parts: Vec<(Part, NodeId)>,
    chips: Option<(NodeId, Vec<NodeId>)>,
}

fn build_section(
    tree: &mut TaffyTree<Leaf>,
    section: &SectionSpec,
) -> Result<SectionNodes, TaffyError> {
    let mut parts = Vec::new();
    let mut children = Vec::new();

    // Title plus its underline row.
    let title = tree.new_leaf_with_context(
        Style::default(),
        Leaf::Text {
            text: section.title.clone(),
            extra_rows: 1,
        },
    )?;
    parts.push((Part::Title, title));
    children.push(title);

    if let Some(body) = &section.body {
        let node = tree.new_leaf_with_context(
            Style::default(),
            Leaf::Text {
                text: body.clone(),
                extra_rows: 0,
            },
        )?;
        parts.push((Part::Body, node));
        children.push(node);
    }

    let chips = if section.chips.is_empty() {
        None
    } else {
        let chip_nodes = section
            .chips
            .iter()
            .map(|label| tree.new_leaf(chip_style(label)))
            .collect::<Result<Vec<_>, _>>()?;
        let row = tree.new_with_children(chip_row_style(), &chip_nodes)?;
        children.push(row);
        Some((row, chip_nodes))
    };

    for (index, item) in section.items.iter().enumerate() {
        let node = tree.new_leaf_with_context(Style::default(), Leaf::Card(item.clone()))?;
        parts.push((Part::Item(index), node));
        children.push(node);
    }

    if let Some(footer) = &section.footer {
        let node = tree.new_leaf_with_context(
            Style::default(),
            Leaf::Text {
                text: footer.clone(),
                extra_rows: 0,
            },
        )?;
        parts.push((Part::Footer, node));
        children.push(node);
    }

    let node = tree.new_with_children(section_style(), &children)?;
    Ok(SectionNodes { node, parts, chips })
}

// =============================================================================
// PAGE LAYOUT
// =============================================================================

/// Computed geometry of a page at one terminal width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    width: u16,
    content_height: u32,
    rects: HashMap<ElementKey, Rect>,
}

impl PageLayout {
    /// Lay out `spec` at `width` columns.
    pub fn compute(spec: &PageSpec, width: u16) -> Result<Self, FolioError> {
        let width = width.max(MIN_WIDTH);
        let mut tree: TaffyTree<Leaf> = TaffyTree::new();

        let sections = spec
            .sections
            .iter()
            .map(|section| build_section(&mut tree, section))
            .collect::<Result<Vec<_>, _>>()?;

        let section_nodes: Vec<NodeId> = sections.iter().map(|s| s.node).collect();
        let root = tree.new_with_children(
            Style {
                size: Size {
                    width: Dimension::Length(f32::from(width)),
                    height: Dimension::Auto,
                },
                padding: taffy::Rect {
                    top: LengthPercentage::Length(f32::from(HEADER_ROWS)),
                    bottom: LengthPercentage::Length(0.0),
                    left: LengthPercentage::Length(0.0),
                    right: LengthPercentage::Length(0.0),
                },
                ..column(0)
            },
            &section_nodes,
        )?;

        let available = Size {
            width: AvailableSpace::Definite(f32::from(width)),
            height: AvailableSpace::MaxContent,
        };
        tree.compute_layout_with_measure(
            root,
            available,
            |known, available, _node, context: Option<&mut Leaf>, _style| match context {
                Some(leaf) => leaf.measure(known, available),
                None => Size::ZERO,
            },
        )?;

        let mut rects = HashMap::new();
        for (spec_section, nodes) in spec.sections.iter().zip(&sections) {
            let id = spec_section.id;
            let section_rect = to_rect(&tree, nodes.node, 0.0, 0.0)?;
            rects.insert(ElementKey::section(id), section_rect);

            for (part, node) in &nodes.parts {
                let rect = to_rect(&tree, *node, section_rect.x, section_rect.y)?;
                rects.insert(ElementKey::new(id, *part), rect);
            }

            if let Some((row, chips)) = &nodes.chips {
                let row_rect = to_rect(&tree, *row, section_rect.x, section_rect.y)?;
                for (index, chip) in chips.iter().enumerate() {
                    let rect = to_rect(&tree, *chip, row_rect.x, row_rect.y)?;
                    rects.insert(ElementKey::new(id, Part::Chip(index)), rect);
                }
            }
        }

        let content_height = tree.layout(root)?.size.height.max(0.0).round() as u32;
        log::debug!(
            "laid out {} sections at {width} cols, {content_height} rows",
            spec.sections.len()
        );

        Ok(Self {
            width,
            content_height,
            rects,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Total page height in rows.
    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    pub fn rect(&self, key: ElementKey) -> Option<Rect> {
        self.rects.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl ElementGeometry for PageLayout {
    fn rect(&self, key: ElementKey) -> Option<Rect> {
        PageLayout::rect(self, key)
    }
}

fn to_rect(
    tree: &TaffyTree<Leaf>,
    node: NodeId,
    offset_x: f32,
    offset_y: f32,
) -> Result<Rect, TaffyError> {
    let layout = tree.layout(node)?;
    Ok(Rect::new(
        (offset_x + layout.location.x).round(),
        (offset_y + layout.location.y).round(),
        layout.size.width.round(),
        layout.size.height.round(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{portfolio, SectionId};

    #[test]
    fn test_sections_stack_in_document_order() {
        let layout = PageLayout::compute(&portfolio(), 80).unwrap();
        let tops: Vec<f32> = SectionId::ALL
            .iter()
            .map(|id| layout.rect(ElementKey::section(*id)).unwrap().top())
            .collect();
        assert!(tops.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(tops[0], f32::from(HEADER_ROWS));
    }

    #[test]
    fn test_every_part_has_geometry() {
        let page = portfolio();
        let layout = PageLayout::compute(&page, 80).unwrap();
        for section in &page.sections {
            assert!(layout.rect(ElementKey::title(section.id)).is_some());
            for i in 0..section.items.len() {
                assert!(layout.rect(ElementKey::item(section.id, i)).is_some());
            }
            for i in 0..section.chips.len() {
                assert!(layout.rect(ElementKey::new(section.id, Part::Chip(i))).is_some());
            }
        }
    }

    #[test]
    fn test_parts_inside_section() {
        let layout = PageLayout::compute(&portfolio(), 80).unwrap();
        let section = layout.rect(ElementKey::section(SectionId::Skills)).unwrap();
        let title = layout.rect(ElementKey::title(SectionId::Skills)).unwrap();
        let last = layout.rect(ElementKey::item(SectionId::Skills, 11)).unwrap();
        assert!(title.top() >= section.top());
        assert!(last.bottom() <= section.bottom());
        assert!(title.bottom() <= last.top());
        assert_eq!(title.x, f32::from(SECTION_PADDING_X));
    }

    #[test]
    fn test_narrow_width_is_taller() {
        let page = portfolio();
        let wide = PageLayout::compute(&page, 120).unwrap();
        let narrow = PageLayout::compute(&page, 40).unwrap();
        assert!(narrow.content_height() > wide.content_height());
    }

    #[test]
    fn test_chips_wrap_within_width() {
        let layout = PageLayout::compute(&portfolio(), 40).unwrap();
        let chips: Vec<Rect> = (0..6)
            .map(|i| layout.rect(ElementKey::new(SectionId::About, Part::Chip(i))).unwrap())
            .collect();
        assert!(chips.iter().all(|r| r.x + r.width <= 40.0));
        assert!(chips.iter().any(|r| r.top() > chips[0].top()));
    }

    #[test]
    fn test_card_lines() {
        let item = ContentItem::new("Python", "").proficiency(75);
        assert_eq!(
            card_lines(&item, 40),
            vec![CardLine::Title("Python".into()), CardLine::Bar(75)]
        );
        let edu = ContentItem::new("BS", "UET").period("2022").location("Lahore");
        assert_eq!(card_lines(&edu, 40)[1], CardLine::Meta("2022 | Lahore".into()));
    }

    #[test]
    fn test_card_height_matches_lines() {
        let page = portfolio();
        let layout = PageLayout::compute(&page, 60).unwrap();
        let projects = page.section(SectionId::Projects).unwrap();
        let rect = layout.rect(ElementKey::item(SectionId::Projects, 0)).unwrap();
        let lines = card_lines(&projects.items[0], rect.width as u16);
        assert_eq!(rect.height, lines.len() as f32);
    }
}
