//! Pure pixel painting on [`Frame`] buffers: rectangle and circle
//! outlines plus a small 5x7 bitmap font for the steering labels. Every
//! operation clips to the frame bounds, so callers may pass coordinates
//! that hang off any edge.

use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Overlay palette (RGB).
pub const RED: [u8; 3] = [255, 0, 0];
pub const GREEN: [u8; 3] = [0, 255, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];

const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;
/// Blank columns between adjacent glyphs, before scaling.
const GLYPH_SPACING: i32 = 1;

fn put_pixel(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    if x < 0 || y < 0 || x >= frame.width() as i32 || y >= frame.height() as i32 {
        return;
    }
    let offset = ((y as u32 * frame.width() + x as u32) * 3) as usize;
    frame.data_mut()[offset..offset + 3].copy_from_slice(&color);
}

/// Rectangle outline drawn as concentric 1 px rings growing inward from
/// the rectangle's own bounds.
pub fn draw_rect_outline(frame: &mut Frame, rect: Rect, color: [u8; 3], thickness: i32) {
    for ring in 0..thickness {
        let left = rect.x + ring;
        let top = rect.y + ring;
        let right = rect.right() - 1 - ring;
        let bottom = rect.bottom() - 1 - ring;
        if right < left || bottom < top {
            break;
        }
        for x in left..=right {
            put_pixel(frame, x, top, color);
            put_pixel(frame, x, bottom, color);
        }
        for y in top..=bottom {
            put_pixel(frame, left, y, color);
            put_pixel(frame, right, y, color);
        }
    }
}

/// 1 px circle outline, midpoint algorithm.
pub fn draw_circle_outline(frame: &mut Frame, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            put_pixel(frame, px, py, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Draws `text` with its top-left corner at `(x, y)`, each glyph pixel
/// expanded to a `scale` x `scale` block. Lowercase input renders as
/// uppercase; characters outside the font advance the pen but paint
/// nothing.
pub fn draw_text(frame: &mut Frame, text: &str, x: i32, y: i32, color: [u8; 3], scale: i32) {
    let mut pen_x = x;
    for ch in text.chars() {
        let rows = glyph(ch.to_ascii_uppercase());
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits >> (GLYPH_WIDTH - 1 - col) & 1 == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        put_pixel(
                            frame,
                            pen_x + col * scale + dx,
                            y + row as i32 * scale + dy,
                            color,
                        );
                    }
                }
            }
        }
        pen_x += (GLYPH_WIDTH + GLYPH_SPACING) * scale;
    }
}

/// 5x7 glyph rows, most significant bit leftmost. Covers the characters
/// the steering labels use; anything else is blank.
fn glyph(ch: char) -> [u8; 7] {
    match ch {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        _ => [0; 7],
    }
}
