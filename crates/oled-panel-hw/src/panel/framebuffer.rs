//! Paged monochrome framebuffer.
//!
//! The vertical axis is split into pages of [`PAGE_HEIGHT`] rows. Each byte
//! holds one 8-pixel vertical strip of a page, least significant bit on top:
//!
//! ```text
//! page = y / 8
//! byte = page * width + x
//! bit  = y % 8
//! ```

use crate::canvas::Canvas;
use crate::{Error, Result, PAGE_HEIGHT, PANEL_HEIGHT, PANEL_WIDTH};

/// Validated panel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    width: u32,
    height: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
        }
    }
}

impl Geometry {
    /// Validates panel dimensions.
    ///
    /// Both axes must be non-zero, the height must be a whole number of
    /// pages, and the last column and page must be addressable with one
    /// command byte.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let fits = width > 0
            && height > 0
            && height % PAGE_HEIGHT == 0
            && width <= 256
            && height / PAGE_HEIGHT <= 256;
        if !fits {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of 8-row pages.
    pub fn pages(&self) -> u32 {
        self.height / PAGE_HEIGHT
    }

    /// Buffer size in bytes.
    pub fn buffer_len(&self) -> usize {
        (self.width * self.pages()) as usize
    }

    /// Address of the last column, as sent to the controller.
    pub fn last_column(&self) -> u8 {
        (self.width - 1) as u8
    }

    /// Address of the last page, as sent to the controller.
    pub fn last_page(&self) -> u8 {
        (self.pages() - 1) as u8
    }
}

/// Bit-packed framebuffer for a paged monochrome panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// One byte per column per page.
    data: Vec<u8>,
    geometry: Geometry,
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new(Geometry::default())
    }
}

impl PixelBuffer {
    /// Creates a buffer with every pixel off.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            data: vec![0; geometry.buffer_len()],
            geometry,
        }
    }

    /// Returns the buffer geometry.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Returns the packed page data in controller order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Byte index and bit mask for a pixel, clamping to the last column/row.
    fn locate(&self, x: u32, y: u32) -> (usize, u8) {
        let x = x.min(self.geometry.width - 1);
        let y = y.min(self.geometry.height - 1);
        let page = y / PAGE_HEIGHT;
        let index = (page * self.geometry.width + x) as usize;
        (index, 1 << (y % PAGE_HEIGHT))
    }

    /// Reads a pixel, with the same clamping as [`Canvas::set_pixel`].
    pub fn get_pixel(&self, x: u32, y: u32) -> bool {
        let (index, mask) = self.locate(x, y);
        self.data[index] & mask != 0
    }

    /// Counts pixels that are on.
    pub fn count_on(&self) -> u32 {
        self.data.iter().map(|b| b.count_ones()).sum()
    }

    /// Expands the buffer to one 8-bit luma sample per pixel, row-major.
    pub fn to_luma8(&self) -> Vec<u8> {
        let (width, height) = (self.geometry.width, self.geometry.height);
        let mut luma = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                luma.push(if self.get_pixel(x, y) { 0xFF } else { 0x00 });
            }
        }
        luma
    }
}

impl Canvas for PixelBuffer {
    fn width(&self) -> u32 {
        self.geometry.width
    }

    fn height(&self) -> u32 {
        self.geometry.height
    }

    fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        let (index, mask) = self.locate(x, y);
        if on {
            self.data[index] |= mask;
        } else {
            self.data[index] &= !mask;
        }
    }

    fn fill(&mut self, on: bool) {
        self.data.fill(if on { 0xFF } else { 0x00 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> PixelBuffer {
        PixelBuffer::new(Geometry::new(128, 32).unwrap())
    }

    #[test]
    fn test_geometry_validation() {
        let geometry = Geometry::new(128, 64).unwrap();
        assert_eq!(geometry.pages(), 8);
        assert_eq!(geometry.buffer_len(), 1024);
        assert_eq!(geometry.last_column(), 127);
        assert_eq!(geometry.last_page(), 7);

        assert!(Geometry::new(0, 32).is_err());
        assert!(Geometry::new(128, 0).is_err());
        assert!(Geometry::new(128, 30).is_err());
        assert!(Geometry::new(300, 32).is_err());
    }

    #[test]
    fn test_set_pixel_addressing() {
        let mut fb = buffer();
        for &(x, y) in &[(0, 0), (5, 3), (127, 31), (64, 8), (10, 17)] {
            fb.set_pixel(x, y, true);
            let byte = fb.data()[((y / 8) * 128 + x) as usize];
            assert_eq!(byte >> (y % 8) & 1, 1, "pixel ({}, {})", x, y);
            assert!(fb.get_pixel(x, y));
        }
    }

    #[test]
    fn test_clear_pixel_keeps_neighbours() {
        let mut fb = buffer();
        for y in 8..16 {
            fb.set_pixel(3, y, true);
        }
        assert_eq!(fb.data()[128 + 3], 0xFF);

        fb.set_pixel(3, 12, false);
        assert_eq!(fb.data()[128 + 3], 0b1110_1111);
        assert!(fb.get_pixel(3, 11));
        assert!(fb.get_pixel(3, 13));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let mut fb = buffer();
        fb.set_pixel(500, 2, true);
        assert!(fb.get_pixel(127, 2));

        fb.set_pixel(4, 99, true);
        assert!(fb.get_pixel(4, 31));

        fb.set_pixel(u32::MAX, u32::MAX, true);
        assert!(fb.get_pixel(127, 31));
        assert_eq!(fb.count_on(), 3);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut fb = buffer();
        fb.clear();
        fb.fill(true);
        assert!(fb.data().iter().all(|&b| b == 0xFF));
        fb.clear();
        assert!(fb.data().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_to_luma8() {
        let mut fb = PixelBuffer::new(Geometry::new(4, 8).unwrap());
        fb.set_pixel(1, 2, true);
        let luma = fb.to_luma8();
        assert_eq!(luma.len(), 32);
        assert_eq!(luma[2 * 4 + 1], 0xFF);
        assert_eq!(luma.iter().filter(|&&v| v == 0xFF).count(), 1);
    }
}
