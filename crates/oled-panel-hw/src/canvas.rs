//! Capability traits shared by the framebuffer and panel drivers.

use crate::channel::ByteChannel;
use crate::Result;

/// A monochrome pixel surface.
///
/// `set_pixel` never fails: coordinates past the right or bottom edge are
/// clamped to the last column/row.
pub trait Canvas {
    /// Width in pixels. Always non-zero.
    fn width(&self) -> u32;

    /// Height in pixels. Always non-zero.
    fn height(&self) -> u32;

    /// Turns a single pixel on or off.
    fn set_pixel(&mut self, x: u32, y: u32, on: bool);

    /// Sets every pixel on or off.
    fn fill(&mut self, on: bool);

    /// Turns every pixel off.
    fn clear(&mut self) {
        self.fill(false);
    }
}

/// A panel driver: a [`Canvas`] backed by an in-memory buffer that can be
/// pushed to a device over a [`ByteChannel`].
pub trait Display: Canvas {
    /// Transport the driver talks over.
    type Channel: ByteChannel;

    /// Binds the channel, initializes the controller and shows a blank frame.
    fn open(&mut self, channel: Self::Channel) -> Result<()>;

    /// Re-sends the controller init payload, optionally clearing the buffer
    /// first, then flushes.
    fn reset(&mut self, clean: bool) -> Result<()>;

    /// Optionally blanks the panel, then releases the channel.
    fn close(&mut self, clean: bool) -> Result<()>;

    /// Transmits the whole buffer to the panel.
    fn sync(&mut self) -> Result<()>;
}
