//! Text layout and string rendering.

use oled_panel_hw::Canvas;
use tracing::trace;

use crate::font::{draw_glyph, Font};

/// Bounding box of a rendered string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringBound {
    pub x: i32,
    pub y: i32,
    /// Sum of glyph advances, clamped to the display width.
    pub width: u32,
    /// Always the font's `max_height`.
    pub height: u32,
}

/// Text alignment inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// Offset returned by [`justification_pos`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Measures `text` without drawing it.
///
/// Characters the font does not cover and `\r` contribute nothing.
pub fn string_bounds(text: &str, font: &Font, max_width: u32) -> StringBound {
    let width: u32 = text
        .chars()
        .filter(|&ch| ch != '\r')
        .filter_map(|ch| font.glyph(ch))
        .map(|glyph| u32::from(glyph.x_advance))
        .sum();

    StringBound {
        x: 0,
        y: 0,
        width: width.min(max_width),
        height: u32::from(font.max_height),
    }
}

/// Computes where to place a text block inside a container.
///
/// The axes are swapped relative to [`Canvas`] coordinates: `y` carries
/// the horizontal offset and `x` the vertical (baseline) offset. Results
/// go negative when the text is larger than the container.
pub fn justification_pos(
    bounds: &StringBound,
    mode: Justify,
    container_width: u32,
    container_height: u32,
) -> Position {
    let text_width = bounds.width as i32;
    let text_height = bounds.height as i32;
    let container_width = container_width as i32;
    let container_height = container_height as i32;

    match mode {
        Justify::Left => Position { x: 0, y: 0 },
        Justify::Center => Position {
            x: (container_height + text_height) / 2,
            y: (container_width - text_width) / 2,
        },
        Justify::Right => Position {
            x: container_height - text_height,
            y: container_width - text_width,
        },
    }
}

/// Draws `text` left to right starting with the cursor at `(x, y)`.
///
/// `y` is the baseline: glyphs extend upwards from it by up to the font
/// height. The cursor advances by each covered glyph's `x_advance`, blank
/// glyphs included; uncovered characters are skipped without advancing.
/// Returns the final cursor position.
pub fn write_string<C: Canvas + ?Sized>(
    canvas: &mut C,
    font: &Font,
    text: &str,
    x: i32,
    y: i32,
    on: bool,
) -> i32 {
    let mut cursor = x;
    for ch in text.chars() {
        let Some(glyph) = font.glyph(ch) else {
            trace!("Skipping uncovered character {:?}", ch);
            continue;
        };
        draw_glyph(canvas, font, glyph, cursor, y, on);
        cursor = cursor.saturating_add(i32::from(glyph.x_advance));
    }
    cursor
}
