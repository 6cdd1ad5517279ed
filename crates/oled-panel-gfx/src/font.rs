//! Bitmap fonts and glyph rasterization.
//!
//! Fonts use the Adafruit GFX layout: a glyph table indexed by character
//! code minus `first`, and one bitmap shared by every glyph. A glyph's
//! pixels start at byte `bitmap_offset` and run row-major, MSB first, with
//! rows packed back to back (no per-row padding).

use oled_panel_hw::Canvas;
use serde::{Deserialize, Serialize};

use crate::primitives::plot;

/// Per-character metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Glyph {
    /// Bitmap width in pixels.
    pub width: u8,
    /// Bitmap height in pixels.
    pub height: u8,
    /// Distance to advance the cursor after this glyph.
    pub x_advance: u8,
    /// Horizontal offset from the cursor to the bitmap's left edge.
    pub x_offset: i8,
    /// Vertical offset from the baseline to the bitmap's top edge.
    pub y_offset: i8,
    /// Byte index of the first bitmap row in [`Font::bitmap`].
    pub bitmap_offset: u32,
}

impl Glyph {
    /// Returns true if the glyph has no pixels (e.g. space).
    pub fn is_blank(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A bitmap font covering the character codes `first..=last`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    /// First character code covered.
    pub first: u32,
    /// Last character code covered.
    pub last: u32,
    /// Line height; used as the height of every text block.
    #[serde(alias = "y_advance")]
    pub max_height: u8,
    /// One entry per code in `first..=last`.
    pub glyphs: Vec<Glyph>,
    /// Shared glyph bitmap.
    pub bitmap: Vec<u8>,
}

impl Font {
    /// Looks up the glyph for `ch`. Characters outside `first..=last` have
    /// none.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        let code = ch as u32;
        if code < self.first || code > self.last {
            return None;
        }
        self.glyphs.get((code - self.first) as usize)
    }
}

/// Renders one glyph with its cursor at `(x, y)`.
///
/// Set bits are drawn with `on`; clear bits leave the canvas untouched.
/// Rendering stops if the glyph runs past the end of the bitmap.
pub fn draw_glyph<C: Canvas + ?Sized>(
    canvas: &mut C,
    font: &Font,
    glyph: &Glyph,
    x: i32,
    y: i32,
    on: bool,
) {
    if glyph.is_blank() {
        return;
    }

    let left = x.saturating_add(i32::from(glyph.x_offset));
    let top = y.saturating_add(i32::from(glyph.y_offset));
    let mut stream = font.bitmap.iter().skip(glyph.bitmap_offset as usize);
    let mut segment = 0u8;
    let mut bit = 0usize;

    for row in 0..i32::from(glyph.height) {
        for col in 0..i32::from(glyph.width) {
            if bit % 8 == 0 {
                segment = match stream.next() {
                    Some(&byte) => byte,
                    None => return,
                };
            }
            bit += 1;

            if segment & 0x80 != 0 {
                plot(canvas, left.saturating_add(col), top.saturating_add(row), on);
            }
            segment <<= 1;
        }
    }
}
