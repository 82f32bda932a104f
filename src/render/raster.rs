//! Software raster addressed in world (logical pixel) coordinates.
//!
//! Shapes are filled by testing each covered raster pixel's center against
//! the shape, after undoing the shape's rotation. The finished raster is
//! blitted into a ratatui buffer with upper-half-block cells, two raster rows
//! per terminal row.

use crate::color::Rgb;
use image::RgbaImage;
use ratatui::{buffer::Buffer, layout::Rect};

/// Rotation of a shape around a world-space pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub pivot: (f64, f64),
    pub angle: f64,
}

impl Rotation {
    pub const NONE: Rotation = Rotation {
        pivot: (0.0, 0.0),
        angle: 0.0,
    };

    pub fn around(x: f64, y: f64, angle: f64) -> Self {
        Self {
            pivot: (x, y),
            angle,
        }
    }

    /// Rotate a world point by the rotation.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let (sin, cos) = self.angle.sin_cos();
        let (dx, dy) = (x - self.pivot.0, y - self.pivot.1);
        (
            self.pivot.0 + dx * cos - dy * sin,
            self.pivot.1 + dx * sin + dy * cos,
        )
    }

    /// Undo the rotation.
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        Rotation {
            angle: -self.angle,
            ..*self
        }
        .apply(x, y)
    }
}

#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    /// Raster pixels per world pixel.
    scale_x: f64,
    scale_y: f64,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// A `width` x `height` raster covering a `world_width` x `world_height`
    /// world.
    pub fn new(width: usize, height: usize, world_width: f64, world_height: f64) -> Self {
        let scale = |pixels: usize, world: f64| {
            if world > 0.0 {
                pixels as f64 / world
            } else {
                1.0
            }
        };
        Self {
            width,
            height,
            scale_x: scale(width, world_width),
            scale_y: scale(height, world_height),
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    /// Raster sized for a terminal area: one column and two rows per cell.
    pub fn for_area(area: Rect, world_width: f64, world_height: f64) -> Self {
        Self::new(
            area.width as usize,
            area.height as usize * 2,
            world_width,
            world_height,
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// Pixel covering the world point, if it is on the raster.
    pub fn pixel_at_world(&self, x: f64, y: f64) -> Option<Rgb> {
        let px = (x * self.scale_x).floor();
        let py = (y * self.scale_y).floor();
        if px < 0.0 || py < 0.0 || px >= self.width as f64 || py >= self.height as f64 {
            return None;
        }
        Some(self.pixel(px as usize, py as usize))
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgb, alpha: f64) {
        let index = y * self.width + x;
        self.pixels[index] = if alpha >= 1.0 {
            color
        } else {
            self.pixels[index].lerp(color, alpha)
        };
    }

    /// World-space center of raster pixel `(x, y)`.
    fn world_center(&self, x: usize, y: usize) -> (f64, f64) {
        (
            (x as f64 + 0.5) / self.scale_x,
            (y as f64 + 0.5) / self.scale_y,
        )
    }

    /// Visit every raster pixel whose center may fall inside the world-space
    /// box `(x0, y0)..(x1, y1)`.
    fn covered(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> impl Iterator<Item = (usize, usize)> {
        let clamp = |v: f64, max: usize| v.max(0.0).min(max as f64) as usize;
        let (px0, px1) = (
            clamp((x0 * self.scale_x).floor(), self.width),
            clamp((x1 * self.scale_x).ceil(), self.width),
        );
        let (py0, py1) = (
            clamp((y0 * self.scale_y).floor(), self.height),
            clamp((y1 * self.scale_y).ceil(), self.height),
        );
        (py0..py1).flat_map(move |y| (px0..px1).map(move |x| (x, y)))
    }

    /// World-space bounding box of a rotated rectangle.
    fn rotated_bounds(x: f64, y: f64, w: f64, h: f64, rotation: &Rotation) -> (f64, f64, f64, f64) {
        let corners = [(x, y), (x + w, y), (x, y + h), (x + w, y + h)].map(|(cx, cy)| rotation.apply(cx, cy));
        corners.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(x0, y0, x1, y1), &(cx, cy)| (x0.min(cx), y0.min(cy), x1.max(cx), y1.max(cy)),
        )
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }

    /// Top-to-bottom gradient over the whole raster.
    pub fn fill_vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let rows = self.height.max(2) - 1;
        for y in 0..self.height {
            let color = top.lerp(bottom, y as f64 / rows as f64);
            for x in 0..self.width {
                self.pixels[y * self.width + x] = color;
            }
        }
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb, alpha: f64) {
        self.fill_rotated_rect(x, y, w, h, &Rotation::NONE, color, alpha);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fill_rotated_rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        rotation: &Rotation,
        color: Rgb,
        alpha: f64,
    ) {
        if w <= 0.0 || h <= 0.0 || alpha <= 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = Self::rotated_bounds(x, y, w, h, rotation);
        let pixels: Vec<_> = self.covered(x0, y0, x1, y1).collect();
        for (px, py) in pixels {
            let (wx, wy) = self.world_center(px, py);
            let (lx, ly) = rotation.invert(wx, wy);
            if lx >= x && lx < x + w && ly >= y && ly < y + h {
                self.blend(px, py, color, alpha);
            }
        }
    }

    /// Ellipse centered at `(cx, cy)`, rotated by `angle` around its center.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_ellipse(
        &mut self,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        angle: f64,
        color: Rgb,
        alpha: f64,
    ) {
        if rx <= 0.0 || ry <= 0.0 || alpha <= 0.0 {
            return;
        }
        let reach = rx.max(ry);
        let rotation = Rotation::around(cx, cy, angle);
        let pixels: Vec<_> = self
            .covered(cx - reach, cy - reach, cx + reach, cy + reach)
            .collect();
        for (px, py) in pixels {
            let (wx, wy) = self.world_center(px, py);
            let (lx, ly) = rotation.invert(wx, wy);
            let (nx, ny) = ((lx - cx) / rx, (ly - cy) / ry);
            if nx * nx + ny * ny <= 1.0 {
                self.blend(px, py, color, alpha);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Rgb, alpha: f64) {
        self.fill_ellipse(cx, cy, r, r, 0.0, color, alpha);
    }

    /// Stretch `image` over the world rectangle, nearest-neighbour sampled,
    /// alpha-blended, optionally rotated.
    pub fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64, w: f64, h: f64, rotation: &Rotation) {
        let (iw, ih) = image.dimensions();
        if w <= 0.0 || h <= 0.0 || iw == 0 || ih == 0 {
            return;
        }
        let (x0, y0, x1, y1) = Self::rotated_bounds(x, y, w, h, rotation);
        let pixels: Vec<_> = self.covered(x0, y0, x1, y1).collect();
        for (px, py) in pixels {
            let (wx, wy) = self.world_center(px, py);
            let (lx, ly) = rotation.invert(wx, wy);
            if lx < x || lx >= x + w || ly < y || ly >= y + h {
                continue;
            }
            let u = (((lx - x) / w) * iw as f64) as u32;
            let v = (((ly - y) / h) * ih as f64) as u32;
            let [r, g, b, a] = image.get_pixel(u.min(iw - 1), v.min(ih - 1)).0;
            if a > 0 {
                self.blend(px, py, Rgb(r, g, b), a as f64 / 255.0);
            }
        }
    }

    /// Copy into `buf` at `area`, two raster rows per cell.
    pub fn blit(&self, area: Rect, buf: &mut Buffer) {
        let cols = (area.width as usize).min(self.width);
        let rows = (area.height as usize).min(self.height.div_ceil(2));
        for row in 0..rows {
            for col in 0..cols {
                let top = self.pixel(col, row * 2);
                let bottom = if row * 2 + 1 < self.height {
                    self.pixel(col, row * 2 + 1)
                } else {
                    top
                };
                buf.get_mut(area.x + col as u16, area.y + row as u16)
                    .set_char('▀')
                    .set_fg(top.into())
                    .set_bg(bottom.into());
            }
        }
    }
}
