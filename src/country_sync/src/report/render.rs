//! Bitmap text on an RGB canvas.
//!
//! Glyphs come from the embedded `font8x8` tables (basic Latin, then Latin-1
//! supplement). Each 8x8 cell is drawn at [`SCALE`]x. Characters with no glyph
//! are drawn as `?`, and pixels past the canvas edge are dropped.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 400;
/// Left margin of every line.
pub const LEFT: u32 = 50;
pub const SCALE: u32 = 2;
const CELL: u32 = 8;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

pub fn canvas() -> RgbImage {
    RgbImage::from_pixel(WIDTH, HEIGHT, WHITE)
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Draw `text` with its top-left corner at `(x, y)`.
pub fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    let advance = CELL * SCALE;
    let (w, h) = img.dimensions();

    for (i, ch) in text.chars().enumerate() {
        let Some(gx) = u32::try_from(i)
            .ok()
            .and_then(|i| i.checked_mul(advance))
            .and_then(|dx| x.checked_add(dx))
        else {
            break;
        };
        if gx >= w {
            break;
        }

        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..CELL {
                // bit 0 is the leftmost pixel
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = gx + col * SCALE;
                let py = y.saturating_add(row as u32 * SCALE);
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        let (cx, cy) = (px + dx, py.saturating_add(dy));
                        if cx < w && cy < h {
                            img.put_pixel(cx, cy, color);
                        }
                    }
                }
            }
        }
    }
}
