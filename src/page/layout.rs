//! Page layout with Taffy.
//!
//! Builds a flexbox tree mirroring the page structure, lets Taffy place it
//! against the terminal size, and flattens the result into absolute cell
//! rectangles plus wrapped text per node.
//!
//! Leaf nodes carry their page node index as Taffy context so the measure
//! function can wrap their text.

use taffy::prelude::*;
use taffy::{TaffyResult, TaffyTree};
use tracing::warn;

use super::text::{longest_word, string_width, wrap_text};
use super::{PageTree, Section, SectionItem};
use crate::types::ClipRect;

// =============================================================================
// Spacing (cells)
// =============================================================================

/// Rows above the heading.
pub const TOP_PAD: f32 = 3.0;
/// Maximum content width in columns.
pub const MAIN_MAX_WIDTH: f32 = 96.0;
/// Inner width from which the two lists sit side by side.
pub const TWO_COLUMN_MIN: f32 = 60.0;
const PAD_X_NARROW: f32 = 3.0;
const PAD_X_WIDE: f32 = 5.0;
const WIDE_TERMINAL: u16 = 100;
const COLUMN_GAP: f32 = 6.0;
const STACK_GAP: f32 = 2.0;
const SUBTITLE_GAP: f32 = 1.0;
const GRID_GAP: f32 = 2.0;
const LIST_GAP: f32 = 1.0;
const CONTACT_GAP: f32 = 2.0;
const INLINE_GAP: f32 = 1.0;
const SOCIAL_GAP: f32 = 3.0;

// =============================================================================
// Result
// =============================================================================

/// Absolute placement of every page node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// Indexed by page node; `None` for nodes Taffy never placed.
    pub rects: Vec<Option<ClipRect>>,
    /// Wrapped text per node at its laid-out width.
    pub lines: Vec<Vec<String>>,
    pub width: u16,
    pub height: u16,
    pub two_column: bool,
}

impl PageLayout {
    pub fn rect(&self, index: usize) -> Option<ClipRect> {
        self.rects.get(index).copied().flatten()
    }

    pub fn lines(&self, index: usize) -> &[String] {
        self.lines.get(index).map_or(&[], Vec::as_slice)
    }
}

// =============================================================================
// Style Helpers
// =============================================================================

fn cells(v: f32) -> LengthPercentage {
    LengthPercentage::Length(v)
}

fn margin_top(v: f32) -> Rect<LengthPercentageAuto> {
    Rect {
        left: LengthPercentageAuto::Length(0.0),
        right: LengthPercentageAuto::Length(0.0),
        top: LengthPercentageAuto::Length(v),
        bottom: LengthPercentageAuto::Length(0.0),
    }
}

fn column() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        ..Default::default()
    }
}

fn centered_row(gap: f32) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        flex_wrap: FlexWrap::Wrap,
        justify_content: Some(JustifyContent::Center),
        gap: Size {
            width: cells(gap),
            height: cells(0.0),
        },
        ..Default::default()
    }
}

fn full_width(mut style: Style) -> Style {
    style.size.width = Dimension::Percent(1.0);
    style
}

// =============================================================================
// Tree Construction
// =============================================================================

struct TreeBuilder {
    tree: TaffyTree<usize>,
}

impl TreeBuilder {
    fn leaf(&mut self, index: usize, style: Style) -> TaffyResult<NodeId> {
        self.tree.new_leaf_with_context(style, index)
    }

    fn text(&mut self, index: usize) -> TaffyResult<NodeId> {
        self.leaf(index, full_width(Style::default()))
    }

    fn container(&mut self, style: Style, children: &[NodeId]) -> TaffyResult<NodeId> {
        self.tree.new_with_children(style, children)
    }

    fn section(&mut self, section: &Section, two_column: bool) -> TaffyResult<NodeId> {
        let label = self.text(section.label)?;
        let rule = self.leaf(
            section.rule,
            Style {
                size: Size {
                    width: Dimension::Percent(1.0),
                    height: Dimension::Length(1.0),
                },
                ..Default::default()
            },
        )?;

        let mut items = Vec::with_capacity(section.items.len());
        for item in &section.items {
            let node = match *item {
                SectionItem::Entry { name, description } => {
                    let name = self.text(name)?;
                    let description = self.text(description)?;
                    self.container(full_width(column()), &[name, description])?
                }
                SectionItem::Indicator(index) => self.text(index)?,
            };
            items.push(node);
        }

        let list = self.container(
            Style {
                margin: margin_top(1.0),
                gap: Size {
                    width: cells(0.0),
                    height: cells(LIST_GAP),
                },
                ..full_width(column())
            },
            &items,
        )?;

        let mut style = column();
        if two_column {
            style.flex_grow = 1.0;
            style.flex_basis = Dimension::Length(0.0);
            style.min_size.width = Dimension::Length(0.0);
        } else {
            style = full_width(style);
        }
        self.container(style, &[label, rule, list])
    }
}

fn build_tree(page: &PageTree, width: u16) -> TaffyResult<(TreeBuilder, NodeId, bool)> {
    let pad_x = if width >= WIDE_TERMINAL {
        PAD_X_WIDE
    } else {
        PAD_X_NARROW
    };
    let inner = (width as f32).min(MAIN_MAX_WIDTH) - 2.0 * pad_x;
    let two_column = inner >= TWO_COLUMN_MIN;

    let mut b = TreeBuilder { tree: TaffyTree::new() };

    let heading = b.text(page.heading)?;
    let subtitle = b.leaf(
        page.subtitle,
        Style {
            margin: margin_top(SUBTITLE_GAP),
            ..full_width(Style::default())
        },
    )?;

    let apps = b.section(&page.apps, two_column)?;
    let projects = b.section(&page.projects, two_column)?;
    let grid_style = if two_column {
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            align_items: Some(AlignItems::FlexStart),
            gap: Size {
                width: cells(COLUMN_GAP),
                height: cells(0.0),
            },
            margin: margin_top(GRID_GAP),
            ..Default::default()
        }
    } else {
        Style {
            gap: Size {
                width: cells(0.0),
                height: cells(STACK_GAP),
            },
            margin: margin_top(GRID_GAP),
            ..column()
        }
    };
    let grid = b.container(full_width(grid_style), &[apps, projects])?;

    let contact_label = b.text(page.contact.label)?;
    let inline: Vec<NodeId> = page
        .contact
        .inline
        .iter()
        .map(|&i| b.leaf(i, Style::default()))
        .collect::<TaffyResult<_>>()?;
    let inline_row = b.container(full_width(centered_row(INLINE_GAP)), &inline)?;
    let social: Vec<NodeId> = page
        .contact
        .social
        .iter()
        .map(|&i| b.leaf(i, Style::default()))
        .collect::<TaffyResult<_>>()?;
    let social_row = b.container(
        Style {
            margin: margin_top(1.0),
            ..full_width(centered_row(SOCIAL_GAP))
        },
        &social,
    )?;
    let contact = b.container(
        Style {
            margin: margin_top(CONTACT_GAP),
            ..full_width(column())
        },
        &[contact_label, inline_row, social_row],
    )?;

    let main = b.container(
        Style {
            size: Size {
                width: Dimension::Percent(1.0),
                height: Dimension::Auto,
            },
            max_size: Size {
                width: Dimension::Length(MAIN_MAX_WIDTH),
                height: Dimension::Auto,
            },
            padding: Rect {
                left: cells(pad_x),
                right: cells(pad_x),
                top: cells(0.0),
                bottom: cells(0.0),
            },
            ..column()
        },
        &[heading, subtitle, grid, contact],
    )?;

    let root = b.container(
        Style {
            size: Size {
                width: Dimension::Length(width as f32),
                height: Dimension::Auto,
            },
            padding: Rect {
                left: cells(0.0),
                right: cells(0.0),
                top: cells(TOP_PAD),
                bottom: cells(0.0),
            },
            align_items: Some(AlignItems::Center),
            ..column()
        },
        &[main],
    )?;

    Ok((b, root, two_column))
}

// =============================================================================
// Measurement
// =============================================================================

fn measure_text(text: &str, known: Size<Option<f32>>, available: Size<AvailableSpace>) -> Size<f32> {
    if text.trim().is_empty() {
        return Size {
            width: known.width.unwrap_or(0.0),
            height: known.height.unwrap_or(0.0),
        };
    }

    let natural = string_width(text);
    let wrap_at = match known.width {
        Some(w) => w as u16,
        None => match available.width {
            AvailableSpace::Definite(w) => (w as u16).min(natural),
            AvailableSpace::MinContent => longest_word(text),
            AvailableSpace::MaxContent => natural,
        },
    };
    let lines = wrap_text(text, wrap_at.max(1));
    let widest = lines.iter().map(|l| string_width(l)).max().unwrap_or(0);

    Size {
        width: known.width.unwrap_or(widest as f32),
        height: known.height.unwrap_or(lines.len() as f32),
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

/// Lay the page out for a terminal of `width` x `height` cells.
///
/// The page may be taller than the terminal; painting clips.
pub fn compute_page_layout(page: &PageTree, width: u16, height: u16) -> PageLayout {
    match try_compute(page, width, height) {
        Ok(layout) => layout,
        Err(err) => {
            warn!(%err, width, height, "page layout failed");
            PageLayout {
                rects: vec![None; page.len()],
                lines: vec![Vec::new(); page.len()],
                width,
                height,
                two_column: false,
            }
        }
    }
}

fn try_compute(page: &PageTree, width: u16, height: u16) -> TaffyResult<PageLayout> {
    let (mut b, root, two_column) = build_tree(page, width)?;

    let nodes = page.nodes();
    let mut measure_fn = |known: Size<Option<f32>>,
                          available: Size<AvailableSpace>,
                          _node_id: NodeId,
                          context: Option<&mut usize>,
                          _style: &Style| {
        match context.and_then(|&mut i| nodes.get(i)) {
            Some(node) => measure_text(&node.text, known, available),
            None => Size::ZERO,
        }
    };

    let available = Size {
        width: AvailableSpace::Definite(width as f32),
        height: AvailableSpace::MaxContent,
    };
    b.tree.compute_layout_with_measure(root, available, &mut measure_fn)?;

    let mut layout = PageLayout {
        rects: vec![None; page.len()],
        lines: vec![Vec::new(); page.len()],
        width,
        height,
        two_column,
    };

    // Taffy locations are parent-relative; walk down accumulating offsets
    let mut stack = vec![(root, 0.0f32, 0.0f32)];
    while let Some((node, parent_x, parent_y)) = stack.pop() {
        let placed = b.tree.layout(node)?;
        let x = parent_x + placed.location.x;
        let y = parent_y + placed.location.y;

        if let Some(&index) = b.tree.get_node_context(node) {
            let rect = ClipRect::new(
                x.round().max(0.0) as u16,
                y.round().max(0.0) as u16,
                placed.size.width.round().max(0.0) as u16,
                placed.size.height.round().max(0.0) as u16,
            );
            layout.rects[index] = Some(rect);
            layout.lines[index] = wrap_text(&nodes[index].text, rect.width);
        }

        for child in b.tree.children(node)? {
            stack.push((child, x, y));
        }
    }

    Ok(layout)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TargetStore;
    use crate::content::ContentModel;

    fn page() -> PageTree {
        PageTree::build(&ContentModel::default(), &mut TargetStore::new())
    }

    #[test]
    fn test_every_node_is_placed() {
        let page = page();
        let layout = compute_page_layout(&page, 120, 40);
        assert!((0..page.len()).all(|i| layout.rect(i).is_some()));
    }

    #[test]
    fn test_heading_on_top_row_after_padding() {
        let page = page();
        let layout = compute_page_layout(&page, 120, 40);
        let heading = layout.rect(page.heading).unwrap();
        assert_eq!(heading.y, TOP_PAD as u16);
        assert_eq!(layout.lines(page.heading), ["Hi, I'm Yernar"]);

        let subtitle = layout.rect(page.subtitle).unwrap();
        assert_eq!(subtitle.y, heading.y + 2);
    }

    #[test]
    fn test_main_column_is_centered_and_capped() {
        let page = page();
        let layout = compute_page_layout(&page, 200, 40);
        let heading = layout.rect(page.heading).unwrap();
        // 96 wide main minus 5 cells of padding each side, centered in 200
        assert_eq!(heading.width, 86);
        assert_eq!(heading.x, 52 + 5);
    }

    #[test]
    fn test_wide_terminal_puts_lists_side_by_side() {
        let page = page();
        let layout = compute_page_layout(&page, 120, 40);
        assert!(layout.two_column);
        let apps = layout.rect(page.apps.label).unwrap();
        let projects = layout.rect(page.projects.label).unwrap();
        assert_eq!(apps.y, projects.y);
        assert!(projects.x > apps.x + apps.width);
    }

    #[test]
    fn test_narrow_terminal_stacks_lists() {
        let page = page();
        let layout = compute_page_layout(&page, 50, 40);
        assert!(!layout.two_column);
        let apps = layout.rect(page.apps.label).unwrap();
        let projects = layout.rect(page.projects.label).unwrap();
        assert_eq!(apps.x, projects.x);
        assert!(projects.y > apps.y);
    }

    #[test]
    fn test_descriptions_wrap_inside_their_column() {
        let page = page();
        let layout = compute_page_layout(&page, 80, 40);
        let SectionItem::Entry { description, .. } = page.apps.items[0] else {
            panic!("entry expected");
        };
        let rect = layout.rect(description).unwrap();
        let lines = layout.lines(description);
        assert!(lines.len() > 1);
        assert_eq!(rect.height as usize, lines.len());
        assert!(lines.iter().all(|l| string_width(l) <= rect.width));
    }

    #[test]
    fn test_rule_sits_under_label() {
        let page = page();
        let layout = compute_page_layout(&page, 120, 40);
        let label = layout.rect(page.apps.label).unwrap();
        let rule = layout.rect(page.apps.rule).unwrap();
        assert_eq!(rule.y, label.y + 1);
        assert_eq!(rule.height, 1);
        assert_eq!(rule.width, label.width);
    }

    #[test]
    fn test_social_row_is_centered() {
        let page = page();
        let layout = compute_page_layout(&page, 120, 40);
        let first = layout.rect(page.contact.social[0]).unwrap();
        let last = layout.rect(*page.contact.social.last().unwrap()).unwrap();
        let label = layout.rect(page.contact.label).unwrap();
        let left = first.x - label.x;
        let right = (label.x + label.width) - (last.x + last.width);
        assert!(left.abs_diff(right) <= 1);
    }
}
