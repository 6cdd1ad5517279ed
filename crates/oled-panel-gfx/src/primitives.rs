//! Integer rasterization of lines, rectangles, circles and icons.
//!
//! Every primitive writes through [`Canvas::set_pixel`] and clamps its
//! coordinates to the canvas first, so runaway end points land on the
//! nearest edge instead of being dropped.

use oled_panel_hw::Canvas;

/// Largest valid coordinate on each axis.
fn bounds<C: Canvas + ?Sized>(canvas: &C) -> (i32, i32) {
    let max_x = i32::try_from(canvas.width() - 1).unwrap_or(i32::MAX);
    let max_y = i32::try_from(canvas.height() - 1).unwrap_or(i32::MAX);
    (max_x, max_y)
}

/// Clamps a point into `[0, width-1] x [0, height-1]`.
pub fn clamp_point<C: Canvas + ?Sized>(canvas: &C, x: i32, y: i32) -> (i32, i32) {
    let (max_x, max_y) = bounds(canvas);
    (x.clamp(0, max_x), y.clamp(0, max_y))
}

/// Sets one pixel from signed coordinates.
pub(crate) fn plot<C: Canvas + ?Sized>(canvas: &mut C, x: i32, y: i32, on: bool) {
    let (x, y) = clamp_point(canvas, x, y);
    canvas.set_pixel(x as u32, y as u32, on);
}

/// Draws a line with Bresenham's algorithm. Both end points are plotted.
pub fn draw_line<C: Canvas + ?Sized>(
    canvas: &mut C,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    on: bool,
) {
    let (mut x, mut y) = clamp_point(canvas, x0, y0);
    let (x1, y1) = clamp_point(canvas, x1, y1);

    let dx = (x1 - x).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let dy = (y1 - y).abs();
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = (if dx > dy { dx } else { -dy }) / 2;

    loop {
        canvas.set_pixel(x as u32, y as u32, on);
        if x == x1 && y == y1 {
            break;
        }
        // Both branches may fire in one step, giving a diagonal move.
        let e2 = err;
        if e2 > -dx {
            err -= dy;
            x += sx;
        }
        if e2 < dy {
            err += dx;
            y += sy;
        }
    }
}

/// Draws a rectangle between two opposite corners, inclusive.
///
/// Filled rectangles are swept along the shorter axis with full-length
/// spans, so the corner order does not matter.
pub fn draw_rect<C: Canvas + ?Sized>(
    canvas: &mut C,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    on: bool,
    fill: bool,
) {
    let (x0, y0) = clamp_point(canvas, x0, y0);
    let (x1, y1) = clamp_point(canvas, x1, y1);

    if !fill {
        draw_line(canvas, x0, y0, x1, y0, on);
        draw_line(canvas, x1, y0, x1, y1, on);
        draw_line(canvas, x1, y1, x0, y1, on);
        draw_line(canvas, x0, y1, x0, y0, on);
        return;
    }

    let (left, right) = (x0.min(x1), x0.max(x1));
    let (top, bottom) = (y0.min(y1), y0.max(y1));

    if right - left <= bottom - top {
        for x in left..=right {
            draw_line(canvas, x, top, x, bottom, on);
        }
    } else {
        for y in top..=bottom {
            draw_line(canvas, left, y, right, y, on);
        }
    }
}

/// Draws a circle with the midpoint algorithm.
///
/// The outline plots the eight symmetric points of each step; the filled
/// variant draws four horizontal spans per step instead. The radius is
/// capped at twice the canvas half-perimeter: past that, every point of a
/// circle centred on the canvas already clamps onto the border.
pub fn draw_circle<C: Canvas + ?Sized>(
    canvas: &mut C,
    cx: i32,
    cy: i32,
    radius: i32,
    on: bool,
    fill: bool,
) {
    if radius < 1 {
        return;
    }
    let (max_x, max_y) = bounds(canvas);
    let radius = radius.min(max_x.saturating_add(max_y).saturating_add(2).saturating_mul(2));

    let mut x = radius - 1;
    let mut y = 0;
    let mut dx = 1;
    let mut dy = 1;
    let mut err = dx - (radius << 1);

    while x >= y {
        if fill {
            let (left, right) = (cx.saturating_sub(x), cx.saturating_add(x));
            let (inner_left, inner_right) = (cx.saturating_sub(y), cx.saturating_add(y));
            draw_line(canvas, left, cy.saturating_add(y), right, cy.saturating_add(y), on);
            draw_line(canvas, left, cy.saturating_sub(y), right, cy.saturating_sub(y), on);
            let (below, above) = (cy.saturating_add(x), cy.saturating_sub(x));
            draw_line(canvas, inner_left, below, inner_right, below, on);
            draw_line(canvas, inner_left, above, inner_right, above, on);
        } else {
            for (px, py) in [(x, y), (y, x), (-y, x), (-x, y)] {
                plot(canvas, cx.saturating_add(px), cy.saturating_add(py), on);
                plot(canvas, cx.saturating_sub(px), cy.saturating_sub(py), on);
            }
        }

        if err <= 0 {
            y += 1;
            err += dy;
            dy += 2;
        }
        if err > 0 {
            x -= 1;
            dx += 2;
            err += dx - (radius << 1);
        }
    }
}

/// Blits a 1-bit icon stored as 32-bit words, most significant bit first.
///
/// Bits are consumed column-major: all rows of column 0, then column 1.
/// A set bit draws `on`; a clear bit turns the pixel off. Drawing stops
/// early if `words` runs out.
pub fn draw_icon<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    words: &[u32],
    on: bool,
) {
    let mut bits = words
        .iter()
        .flat_map(|&word| (0..32).rev().map(move |shift| (word >> shift) & 1 != 0));

    for col in 0..width {
        for row in 0..height {
            let Some(bit) = bits.next() else {
                return;
            };
            let px = x.saturating_add(i32::try_from(col).unwrap_or(i32::MAX));
            let py = y.saturating_add(i32::try_from(row).unwrap_or(i32::MAX));
            plot(canvas, px, py, bit && on);
        }
    }
}
