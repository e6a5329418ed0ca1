//! CPU framebuffer for the handheld screen
//!
//! A fixed-size RGBA8 (sRGB) image with source-over blending. The whole game
//! screen is rasterized here each frame and uploaded as one texture.

use super::font;

/// sRGB colour with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub rgb: [u8; 3],
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);

    pub const fn hex(hex: u32) -> Self {
        Self {
            rgb: [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8],
            alpha: 1.0,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            rgb: [r, g, b],
            alpha,
        }
    }

    pub const fn from_rgb(rgb: [u8; 3]) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Scale the existing alpha
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.alpha * factor)
    }
}

pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Canvas {
    /// Opaque black canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 rows, ready for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Source-over blend of one pixel; out-of-bounds writes are dropped
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let a = color.alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        let dst = &mut self.pixels[idx];
        for c in 0..3 {
            let mixed = color.rgb[c] as f32 * a + dst[c] as f32 * (1.0 - a);
            dst[c] = mixed.round() as u8;
        }
        dst[3] = 255;
    }

    pub fn fill(&mut self, color: Color) {
        self.fill_rect(0.0, 0.0, self.width as f32, self.height as f32, color);
    }

    /// Axis-aligned rectangle, edges rounded to whole pixels
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, x1) = (x.round() as i32, (x + w).round() as i32);
        let (y0, y1) = (y.round() as i32, (y + h).round() as i32);
        for py in y0.max(0)..y1.min(self.height as i32) {
            for px in x0.max(0)..x1.min(self.width as i32) {
                self.blend(px, py, color);
            }
        }
    }

    /// One-pixel outline inside the given rectangle
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, x1) = (x.round() as i32, (x + w).round() as i32 - 1);
        let (y0, y1) = (y.round() as i32, (y + h).round() as i32 - 1);
        if x1 < x0 || y1 < y0 {
            return;
        }
        for px in x0..=x1 {
            self.blend(px, y0, color);
            if y1 != y0 {
                self.blend(px, y1, color);
            }
        }
        for py in (y0 + 1)..y1 {
            self.blend(x0, py, color);
            if x1 != x0 {
                self.blend(x1, py, color);
            }
        }
    }

    pub fn hline(&mut self, y: i32, x0: i32, x1: i32, color: Color) {
        for px in x0..x1 {
            self.blend(px, y, color);
        }
    }

    /// Solid disc; pixels whose centre lies within `radius`
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        self.radial(cx, cy, radius, |_| color.alpha, color);
    }

    /// Disc whose alpha falls linearly from `color.alpha` at the centre to 0
    /// at `radius`
    pub fn radial_glow(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        self.radial(cx, cy, radius, |t| color.alpha * (1.0 - t), color);
    }

    fn radial(&mut self, cx: f32, cy: f32, radius: f32, alpha: impl Fn(f32) -> f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d <= radius {
                    self.blend(px, py, color.with_alpha(alpha(d / radius)));
                }
            }
        }
    }

    /// Soft halo around a rectangle, fading out over `spread` pixels.
    /// The rectangle itself is left untouched.
    pub fn glow_rect(&mut self, x: f32, y: f32, w: f32, h: f32, spread: f32, color: Color) {
        if spread <= 0.0 {
            return;
        }
        let x0 = (x - spread).floor() as i32;
        let x1 = (x + w + spread).ceil() as i32;
        let y0 = (y - spread).floor() as i32;
        let y1 = (y + h + spread).ceil() as i32;
        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;
                let dx = (x - cx).max(cx - (x + w)).max(0.0);
                let dy = (y - cy).max(cy - (y + h)).max(0.0);
                let d = (dx * dx + dy * dy).sqrt();
                if d > 0.0 && d < spread {
                    self.blend(px, py, color.fade(1.0 - d / spread));
                }
            }
        }
    }

    /// Rectangle filled with a left-to-right gradient. `stops` are
    /// `(offset 0..1, colour)` pairs in increasing offset order.
    pub fn horizontal_gradient_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        stops: &[(f32, [u8; 3])],
    ) {
        let Some(&(_, first)) = stops.first() else {
            return;
        };
        let (x0, x1) = (x.round() as i32, (x + w).round() as i32);
        let (y0, y1) = (y.round() as i32, (y + h).round() as i32);
        for px in x0..x1 {
            let t = if w > 0.0 {
                (px as f32 + 0.5 - x) / w
            } else {
                0.0
            };
            let mut rgb = first;
            for pair in stops.windows(2) {
                let (o0, c0) = pair[0];
                let (o1, c1) = pair[1];
                if t >= o0 && t <= o1 {
                    let s = if o1 > o0 { (t - o0) / (o1 - o0) } else { 0.0 };
                    rgb = lerp_rgb(c0, c1, s);
                    break;
                }
                if t > o1 {
                    rgb = c1;
                }
            }
            for py in y0..y1 {
                self.blend(px, py, Color::from_rgb(rgb));
            }
        }
    }

    /// Draw `text` with its baseline at `baseline` (glyph bottom row sits on
    /// `baseline - 1`). Returns the advance width in pixels.
    pub fn text(&mut self, x: i32, baseline: i32, text: &str, color: Color) -> i32 {
        let top = baseline - font::GLYPH_HEIGHT;
        let mut pen = x;
        for ch in text.chars() {
            if let Some(rows) = font::glyph(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..font::GLYPH_WIDTH {
                        if (bits >> (font::GLYPH_WIDTH - 1 - col)) & 1 == 1 {
                            self.blend(pen + col, top + row as i32, color);
                        }
                    }
                }
            }
            pen += font::ADVANCE;
        }
        pen - x
    }
}

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mix = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    [mix(0), mix(1), mix(2)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_rect(-4.0, 6.0, 20.0, 10.0, Color::WHITE);
        assert_eq!(canvas.pixel(0, 6), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(7, 7), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(0, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn test_blend_half_alpha() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill(Color::hex(0x0000ff));
        canvas.blend(1, 1, Color::rgba(255, 0, 0, 0.5));
        // 127.5 rounds to 128
        assert_eq!(canvas.pixel(1, 1), [128, 0, 128, 255]);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 255, 255]);
    }

    #[test]
    fn test_stroke_rect_is_hollow() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_rect(2.0, 2.0, 6.0, 6.0, Color::WHITE);
        assert_eq!(canvas.pixel(2, 2), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(7, 7), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(2, 5), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(5, 5), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(8, 8), [0, 0, 0, 255]);
    }

    #[test]
    fn test_circle_and_glow() {
        let mut canvas = Canvas::new(40, 40);
        canvas.radial_glow(20.0, 20.0, 16.0, Color::WHITE.with_alpha(0.4));
        let center = canvas.pixel(20, 20)[0];
        let edge = canvas.pixel(34, 20)[0];
        assert!(center > edge && edge > 0);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0, 255]);

        canvas.fill_circle(20.0, 20.0, 5.0, Color::WHITE);
        assert_eq!(canvas.pixel(20, 20), [255, 255, 255, 255]);
        assert_ne!(canvas.pixel(20, 26), [255, 255, 255, 255]);
    }

    #[test]
    fn test_gradient_peaks_in_middle() {
        let mut canvas = Canvas::new(64, 4);
        canvas.horizontal_gradient_rect(
            0.0,
            0.0,
            64.0,
            4.0,
            &[(0.0, [0, 0x50, 0x70]), (0.5, [0, 0xd4, 0xff]), (1.0, [0, 0x50, 0x70])],
        );
        let left = canvas.pixel(0, 0);
        let mid = canvas.pixel(32, 0);
        let right = canvas.pixel(63, 0);
        assert!(mid[2] > left[2] && mid[2] > right[2]);
        assert_eq!(left, right);
    }

    #[test]
    fn test_glow_leaves_rect_alone() {
        let mut canvas = Canvas::new(20, 20);
        canvas.glow_rect(5.0, 5.0, 10.0, 10.0, 3.0, Color::WHITE);
        assert_eq!(canvas.pixel(10, 10), [0, 0, 0, 255]);
        assert!(canvas.pixel(4, 10)[0] > 0);
        assert_eq!(canvas.pixel(0, 10), [0, 0, 0, 255]);
    }

    #[test]
    fn test_text_advance() {
        let mut canvas = Canvas::new(64, 16);
        let width = canvas.text(1, 10, "LV 2", Color::WHITE);
        assert_eq!(width, 4 * font::ADVANCE);
        // 'L' has its full left column lit
        for y in 3..10 {
            assert_eq!(canvas.pixel(1, y), [255, 255, 255, 255]);
        }
        assert_eq!(canvas.pixel(1, 10), [0, 0, 0, 255]);
    }

    #[test]
    fn test_bytes_are_rgba_rows() {
        let mut canvas = Canvas::new(3, 2);
        canvas.blend(2, 1, Color::hex(0x102030));
        let bytes = canvas.as_bytes();
        assert_eq!(bytes.len(), 3 * 2 * 4);
        assert_eq!(&bytes[20..24], &[0x10, 0x20, 0x30, 255]);
    }
}
