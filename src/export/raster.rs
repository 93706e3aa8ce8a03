//! Cell-block rasterizer.
//!
//! Every buffer cell becomes a `cell_width × cell_height` block (times the
//! scale). The block is filled with the cell background; box-drawing glyphs
//! become strokes and any other visible glyph becomes a solid ink block in
//! the foreground colour. The result keeps the layout, colours, and check
//! state of the section legible without a font renderer.

use image::{Rgb, RgbImage};
use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier};

use super::{ExportError, Rasterizer, RenderOptions};

/// Upper bound on output size, in pixels.
const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Default [`Rasterizer`] producing one pixel block per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRasterizer {
    /// Cell width in pixels at scale 1.
    pub cell_width: u32,
    /// Cell height in pixels at scale 1.
    pub cell_height: u32,
}

impl Default for BlockRasterizer {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Blank,
    Horizontal,
    Vertical,
    Corner,
    Glyph,
}

fn shape_of(symbol: &str) -> Shape {
    match symbol {
        "" | " " => Shape::Blank,
        "─" | "━" | "-" => Shape::Horizontal,
        "│" | "┃" | "|" => Shape::Vertical,
        "╭" | "╮" | "╰" | "╯" | "┌" | "┐" | "└" | "┘" | "+" => Shape::Corner,
        _ => Shape::Glyph,
    }
}

impl Rasterizer for BlockRasterizer {
    fn rasterize(&self, region: &Buffer, options: &RenderOptions) -> Result<RgbImage, ExportError> {
        let area = region.area;
        let cell_w = self.cell_width * options.scale;
        let cell_h = self.cell_height * options.scale;
        let width = u32::from(area.width) * cell_w;
        let height = u32::from(area.height) * cell_h;

        if width == 0 || height == 0 {
            return Err(ExportError::Render("empty cell size".into()));
        }
        if u64::from(width) * u64::from(height) > MAX_PIXELS {
            return Err(ExportError::Render(format!(
                "image of {width}x{height} pixels is too large"
            )));
        }

        let ink = default_ink(options.background);
        let stroke = options.scale.max(1);
        let mut image = RgbImage::from_pixel(width, height, options.background);
        let columns = usize::from(area.width);

        for (index, cell) in region.content.iter().enumerate() {
            let x0 = u32::try_from(index % columns).unwrap_or(0) * cell_w;
            let y0 = u32::try_from(index / columns).unwrap_or(0) * cell_h;

            let mut fg = to_rgb(cell.fg).unwrap_or(ink);
            let mut bg = to_rgb(cell.bg).unwrap_or(options.background);
            if cell.modifier.contains(Modifier::REVERSED) {
                std::mem::swap(&mut fg, &mut bg);
            }

            if bg != options.background {
                fill(&mut image, x0, y0, cell_w, cell_h, bg);
            }

            let mid_x = x0 + (cell_w - stroke) / 2;
            let mid_y = y0 + (cell_h - stroke) / 2;
            match shape_of(cell.symbol()) {
                Shape::Blank => {}
                Shape::Horizontal => fill(&mut image, x0, mid_y, cell_w, stroke, fg),
                Shape::Vertical => fill(&mut image, mid_x, y0, stroke, cell_h, fg),
                Shape::Corner => {
                    fill(&mut image, x0, mid_y, cell_w, stroke, fg);
                    fill(&mut image, mid_x, y0, stroke, cell_h, fg);
                }
                Shape::Glyph => {
                    let pad_x = cell_w / 8;
                    let pad_y = cell_h / 4;
                    fill(
                        &mut image,
                        x0 + pad_x,
                        y0 + pad_y,
                        cell_w - 2 * pad_x,
                        cell_h - 2 * pad_y,
                        fg,
                    );
                }
            }

            if cell.modifier.contains(Modifier::CROSSED_OUT) {
                fill(&mut image, x0, mid_y, cell_w, stroke, bg);
            }
        }

        log::debug!(
            "Rasterized {}x{} cells into {}x{} pixels",
            area.width,
            area.height,
            width,
            height
        );
        Ok(image)
    }
}

fn fill(image: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x0 + w).min(image.width());
    let y_end = (y0 + h).min(image.height());
    for y in y0..y_end {
        for x in x0..x_end {
            image.put_pixel(x, y, color);
        }
    }
}

/// Black on light backgrounds, white on dark ones.
fn default_ink(background: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = background.0;
    let luma = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    if luma >= 128_000 {
        Rgb([0, 0, 0])
    } else {
        Rgb([255, 255, 255])
    }
}

/// RGB value of a terminal colour; `None` for the terminal default.
fn to_rgb(color: Color) -> Option<Rgb<u8>> {
    let rgb = match color {
        Color::Reset => return None,
        Color::Black => [0, 0, 0],
        Color::Red => [205, 49, 49],
        Color::Green => [13, 140, 55],
        Color::Yellow => [181, 137, 0],
        Color::Blue => [36, 80, 200],
        Color::Magenta => [160, 50, 170],
        Color::Cyan => [17, 140, 160],
        Color::Gray => [150, 150, 150],
        Color::DarkGray => [90, 90, 90],
        Color::LightRed => [241, 76, 76],
        Color::LightGreen => [35, 209, 139],
        Color::LightYellow => [245, 245, 67],
        Color::LightBlue => [59, 142, 234],
        Color::LightMagenta => [214, 112, 214],
        Color::LightCyan => [41, 184, 219],
        Color::White => [255, 255, 255],
        Color::Rgb(r, g, b) => [r, g, b],
        Color::Indexed(i) => return Some(indexed(i)),
    };
    Some(Rgb(rgb))
}

/// The xterm 256-colour palette.
fn indexed(i: u8) -> Rgb<u8> {
    const BASIC: [Color; 16] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::Gray,
        Color::DarkGray,
        Color::LightRed,
        Color::LightGreen,
        Color::LightYellow,
        Color::LightBlue,
        Color::LightMagenta,
        Color::LightCyan,
        Color::White,
    ];

    match i {
        0..=15 => to_rgb(BASIC[usize::from(i)]).unwrap_or(Rgb([0, 0, 0])),
        16..=231 => {
            let n = i - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            Rgb([level(n / 36), level((n / 6) % 6), level(n % 6)])
        }
        _ => {
            let v = 8 + (i - 232) * 10;
            Rgb([v, v, v])
        }
    }
}
