use crate::foundation::core::{Rect, Resolution, Rgb8};

/// Per-frame image buffer.
///
/// Pixels are stored as tightly packed BGR8, row-major. Sinks receive RGB8 through
/// [`FrameBuffer::write_rgb`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(res: Resolution, background: Rgb8) -> Self {
        let mut buf = Self {
            width: res.width,
            height: res.height,
            data: vec![0; res.pixel_count() * 3],
        };
        buf.reset(background);
        buf
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw BGR8 bytes.
    pub fn as_bgr(&self) -> &[u8] {
        &self.data
    }

    /// Fill every pixel with `background`.
    pub fn reset(&mut self, background: Rgb8) {
        for px in self.data.chunks_exact_mut(3) {
            px.copy_from_slice(&[background.b, background.g, background.r]);
        }
    }

    /// `true` when every pixel equals `color`.
    pub fn is_filled_with(&self, color: Rgb8) -> bool {
        self.data
            .chunks_exact(3)
            .all(|px| *px == [color.b, color.g, color.r])
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb8> {
        let o = self.offset(x, y)?;
        Some(Rgb8::new(self.data[o + 2], self.data[o + 1], self.data[o]))
    }

    /// Set one pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb8) {
        if let Some(o) = self.offset(x, y) {
            self.data[o..o + 3].copy_from_slice(&[color.b, color.g, color.r]);
        }
    }

    /// Mix `color` into one pixel with weight `alpha`. Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgb8, alpha: f64) {
        if let Some(cur) = self.pixel(x, y) {
            self.set_pixel(x, y, cur.mix(color, alpha));
        }
    }

    /// Fill the pixels whose centres fall inside `rect`, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb8) {
        let x0 = (rect.x0 - 0.5).ceil().max(0.0) as i64;
        let y0 = (rect.y0 - 0.5).ceil().max(0.0) as i64;
        let x1 = ((rect.x1 - 0.5).ceil() as i64).min(i64::from(self.width));
        let y1 = ((rect.y1 - 0.5).ceil() as i64).min(i64::from(self.height));
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Write the buffer as RGB8 into `dst`, which must hold `width * height * 3` bytes.
    pub fn write_rgb(&self, dst: &mut [u8]) {
        for (d, s) in dst.chunks_exact_mut(3).zip(self.data.chunks_exact(3)) {
            d[0] = s[2];
            d[1] = s[1];
            d[2] = s[0];
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer.rs"]
mod tests;
