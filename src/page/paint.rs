//! Frame painting.
//!
//! Paints one frame of the page into a fresh [`FrameBuffer`] in layers:
//!
//! 1. Page background
//! 2. Light rays tint
//! 3. Tile grid (borders and highlight fades)
//! 4. Content, only once the page container is visible
//!
//! Painting is pure: it reads the layout, the target store and the tile
//! state, and returns the buffer with the hit regions of every visible
//! content node. The caller applies the regions to the global hit grid.

use std::time::Duration;

use crate::animation::{split_chars, TargetStore, VisualState};
use crate::content::SPINNER_FRAMES;
use crate::orchestrator::HeadingChars;
use crate::rays::LightRays;
use crate::renderer::FrameBuffer;
use crate::tiles::{TileGrid, TileLayout, BORDER_COLOR, PX_PER_ROW};
use crate::types::{Attr, ClipRect, Rgba};

use super::layout::PageLayout;
use super::text::string_width;
use super::{Align, PageTree, Role};

/// Page background under every layer.
pub const PAGE_BACKGROUND: Rgba = Rgba::BLACK;

/// Seconds per full turn of the "more coming soon" spinner.
pub const SPINNER_PERIOD: f32 = 3.0;

/// Glyph color of the external-link marker after entry names.
pub const LINK_GLYPH_COLOR: Rgba = Rgba::RED_400;

/// Everything one frame reads.
pub struct FrameContext<'a> {
    pub page: &'a PageTree,
    pub layout: &'a PageLayout,
    pub targets: &'a TargetStore,
    pub heading_chars: Option<&'a HeadingChars>,
    pub page_visible: bool,
    pub hovered: Option<usize>,
    pub tiles: &'a TileGrid,
    pub tile_layout: &'a TileLayout,
    pub rays: Option<&'a LightRays>,
    /// Time since the page was mounted.
    pub now: Duration,
}

/// A screen rectangle that belongs to one page node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    pub rect: ClipRect,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaintResult {
    pub buffer: FrameBuffer,
    pub hit_regions: Vec<HitRegion>,
}

/// Paint one frame.
pub fn paint_page(ctx: &FrameContext<'_>) -> PaintResult {
    let mut buffer = FrameBuffer::with_background(ctx.layout.width, ctx.layout.height, PAGE_BACKGROUND);
    let mut hit_regions = Vec::new();

    if let Some(rays) = ctx.rays {
        paint_rays(&mut buffer, rays, ctx.now.as_secs_f32());
    }
    paint_tiles(&mut buffer, ctx.tiles, ctx.tile_layout, ctx.now);

    if ctx.page_visible {
        paint_content(&mut buffer, ctx, &mut hit_regions);
    }

    PaintResult { buffer, hit_regions }
}

// =============================================================================
// Background Layers
// =============================================================================

fn paint_rays(buffer: &mut FrameBuffer, rays: &LightRays, time: f32) {
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            buffer.tint(x, y, rays.sample(x, y, time), None);
        }
    }
}

fn paint_tiles(buffer: &mut FrameBuffer, tiles: &TileGrid, layout: &TileLayout, now: Duration) {
    for index in layout.visible() {
        let Some(rect) = layout.tile_rect(index) else {
            continue;
        };

        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                if let Some(cell) = buffer.get_mut(x, y) {
                    if let Some(fill) = tiles.fill(index, cell.bg, now) {
                        cell.bg = fill;
                    }
                }
            }
        }

        // Right and bottom edges; neighbors supply the other two
        let right = rect.x + layout.tile_width - 1;
        let bottom = rect.y + layout.tile_height - 1;
        for y in rect.y..rect.y + rect.height {
            if rect.contains(right, y) {
                let glyph = if y == bottom { '┼' } else { '│' };
                buffer.draw_char(right, y, glyph, BORDER_COLOR, Attr::NONE, Some(&rect));
            }
        }
        if rect.contains(rect.x, bottom) {
            for x in rect.x..right.min(rect.x + rect.width) {
                buffer.draw_char(x, bottom, '─', BORDER_COLOR, Attr::NONE, Some(&rect));
            }
        }
    }
}

// =============================================================================
// Content
// =============================================================================

/// Rows a target is pushed down by its `y`/`yPercent` offset.
fn row_offset(state: &VisualState, height_rows: u16) -> i32 {
    let px = state.y + state.y_percent / 100.0 * (height_rows.max(1) as f64 * PX_PER_ROW as f64);
    (px / PX_PER_ROW as f64).round() as i32
}

/// Stand-in glyph for a blurred character.
fn blurred(ch: char, blur: f64) -> char {
    if blur >= 5.0 {
        '░'
    } else if blur >= 2.5 {
        '▒'
    } else {
        ch
    }
}

/// Foreground for `color` at `opacity` over the cell's background.
fn faded(color: Rgba, opacity: f64, bg: Rgba) -> Rgba {
    let solid = Rgba::blend(color, bg);
    Rgba::lerp(bg, solid, opacity as f32)
}

fn spinner_frame(now: Duration) -> char {
    let turns = now.as_secs_f32() / SPINNER_PERIOD;
    let frame = (turns * SPINNER_FRAMES.len() as f32).floor() as usize;
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

struct Pen<'a> {
    buffer: &'a mut FrameBuffer,
}

impl Pen<'_> {
    /// Draw one glyph faded over whatever is below. Returns columns used.
    fn glyph(&mut self, x: u16, y: i32, ch: char, color: Rgba, opacity: f64, attrs: Attr) -> u16 {
        let width = string_width(ch.encode_utf8(&mut [0; 4]));
        let Ok(y) = u16::try_from(y) else {
            return width;
        };
        let Some(bg) = self.buffer.get(x, y).map(|c| c.bg) else {
            return width;
        };
        if width == 2 {
            let mut buf = [0; 4];
            self.buffer.draw_text(x, y, ch.encode_utf8(&mut buf), faded(color, opacity, bg), attrs, None);
        } else if width == 1 {
            self.buffer.draw_char(x, y, ch, faded(color, opacity, bg), attrs, None);
        }
        width
    }

    fn text(&mut self, x: u16, y: i32, text: &str, color: Rgba, opacity: f64, attrs: Attr) {
        let mut col = x;
        for ch in text.chars() {
            col = col.saturating_add(self.glyph(col, y, ch, color, opacity, attrs));
        }
    }
}

fn line_x(rect: ClipRect, align: Align, line: &str) -> u16 {
    match align {
        Align::Left => rect.x,
        Align::Center => rect.x + rect.width.saturating_sub(string_width(line)) / 2,
    }
}

fn paint_content(buffer: &mut FrameBuffer, ctx: &FrameContext<'_>, hits: &mut Vec<HitRegion>) {
    let mut pen = Pen { buffer };

    for (index, node) in ctx.page.nodes().iter().enumerate() {
        let Some(rect) = ctx.layout.rect(index) else {
            continue;
        };

        if node.role == Role::Heading {
            if let Some(chars) = ctx.heading_chars {
                paint_heading_chars(&mut pen, ctx, index, rect, chars, hits);
                continue;
            }
        }

        let Some(state) = ctx.targets.get(node.target) else {
            continue;
        };
        if state.is_hidden() {
            continue;
        }

        let style = node.role.style();
        let color = match style.hover {
            Some(hover) if ctx.hovered == Some(index) => hover,
            _ => style.color,
        };
        let dy = row_offset(state, rect.height);

        if node.role == Role::SectionRule {
            for x in rect.x..rect.x + rect.width {
                pen.glyph(x, rect.y as i32 + dy, '─', color, state.opacity, style.attrs);
            }
            push_hit(hits, index, rect.x, rect.y as i32 + dy, rect.width);
            continue;
        }

        let lines = ctx.layout.lines(index);
        let last = lines.len().saturating_sub(1);
        for (row, line) in lines.iter().enumerate() {
            let x = line_x(rect, style.align, line);
            let y = rect.y as i32 + row as i32 + dy;

            match node.role {
                Role::Indicator if row == 0 => {
                    let mut chars = line.chars();
                    if chars.next().is_some() {
                        let used = pen.glyph(x, y, spinner_frame(ctx.now), color, state.opacity, style.attrs);
                        pen.text(x + used, y, chars.as_str(), color, state.opacity, style.attrs);
                    }
                }
                Role::EntryName if row == last => {
                    let body = line.strip_suffix(crate::content::EXTERNAL_LINK_GLYPH).unwrap_or(line);
                    pen.text(x, y, body, color, state.opacity, style.attrs);
                    if body.len() < line.len() {
                        let gx = x + string_width(body);
                        pen.glyph(gx, y, crate::content::EXTERNAL_LINK_GLYPH, LINK_GLYPH_COLOR, state.opacity, Attr::NONE);
                    }
                }
                _ => pen.text(x, y, line, color, state.opacity, style.attrs),
            }

            push_hit(hits, index, x, y, string_width(line));
        }
    }
}

fn paint_heading_chars(
    pen: &mut Pen<'_>,
    ctx: &FrameContext<'_>,
    index: usize,
    rect: ClipRect,
    chars: &HeadingChars,
    hits: &mut Vec<HitRegion>,
) {
    let style = Role::Heading.style();
    let lines = ctx.layout.lines(index);

    // Wrapping only drops whitespace, so the split chars land on the
    // wrapped lines in source order.
    let slots = lines.iter().enumerate().flat_map(|(row, line)| {
        let x = line_x(rect, style.align, line);
        split_chars(line)
            .chars()
            .map(|unit| (row, x + unit.column))
            .collect::<Vec<_>>()
    });

    let mut visible_rows = vec![false; lines.len()];
    for ((row, x), (unit, id)) in slots.zip(chars.split.chars().zip(&chars.ids)) {
        let Some(state) = ctx.targets.get(*id) else {
            continue;
        };
        if state.is_hidden() {
            continue;
        }
        visible_rows[row] = true;
        let y = rect.y as i32 + row as i32 + row_offset(state, 1);
        if let Some(ch) = unit.text.chars().next() {
            pen.glyph(x, y, blurred(ch, state.blur), style.color, state.opacity, style.attrs);
        }
    }

    for (row, line) in lines.iter().enumerate().filter(|(row, _)| visible_rows[*row]) {
        let x = line_x(rect, style.align, line);
        push_hit(hits, index, x, rect.y as i32 + row as i32, string_width(line));
    }
}

fn push_hit(hits: &mut Vec<HitRegion>, index: usize, x: u16, y: i32, width: u16) {
    if width == 0 {
        return;
    }
    if let Ok(y) = u16::try_from(y) {
        hits.push(HitRegion {
            rect: ClipRect::new(x, y, width, 1),
            index,
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
