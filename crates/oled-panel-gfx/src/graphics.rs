//! Drawing facade over a panel driver and a font.

use oled_panel_hw::{Display, Error, Result};
use tracing::debug;

use crate::font::Font;
use crate::primitives;
use crate::text::{self, Justify, Position, StringBound};

/// Binds a display driver and (optionally) a font for one drawing session.
///
/// Both are borrowed: the caller owns the panel and the font and keeps
/// them alive for as long as the facade is in use. Drawing calls only
/// change the panel's buffer; [`Graphics::flush`] sends it.
pub struct Graphics<'a, D: Display> {
    display: &'a mut D,
    font: Option<&'a Font>,
}

impl<'a, D: Display> Graphics<'a, D> {
    /// Binds a display without a font. Text operations fail until
    /// [`Graphics::set_font`] is called.
    pub fn new(display: &'a mut D) -> Self {
        Self {
            display,
            font: None,
        }
    }

    /// Binds a display and a font.
    pub fn init(display: &'a mut D, font: &'a Font) -> Self {
        Self {
            display,
            font: Some(font),
        }
    }

    /// Replaces the current font.
    pub fn set_font(&mut self, font: &'a Font) {
        self.font = Some(font);
    }

    /// Returns the current font.
    pub fn font(&self) -> Result<&'a Font> {
        self.font.ok_or(Error::InvalidReference("font"))
    }

    /// Returns the bound display.
    pub fn display(&self) -> &D {
        &*self.display
    }

    /// Returns the bound display mutably.
    pub fn display_mut(&mut self) -> &mut D {
        &mut *self.display
    }

    /// Opens the display on `channel`.
    pub fn open(&mut self, channel: D::Channel) -> Result<()> {
        self.display.open(channel)
    }

    /// Blanks the panel and releases its channel.
    pub fn destroy(self) -> Result<()> {
        self.display.close(true)
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.display.clear();
    }

    /// Sets every pixel on or off.
    pub fn fill(&mut self, on: bool) {
        self.display.fill(on);
    }

    /// Sends the buffer to the panel.
    pub fn flush(&mut self) -> Result<()> {
        debug!("Flushing frame");
        self.display.sync()
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        primitives::plot(self.display, x, y, on);
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, on: bool) {
        primitives::draw_line(self.display, x0, y0, x1, y1, on);
    }

    pub fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, on: bool, fill: bool) {
        primitives::draw_rect(self.display, x0, y0, x1, y1, on, fill);
    }

    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, on: bool, fill: bool) {
        primitives::draw_circle(self.display, cx, cy, radius, on, fill);
    }

    /// Blits a column-major 1-bit icon; see [`primitives::draw_icon`].
    pub fn draw_icon(&mut self, x: i32, y: i32, width: u32, height: u32, words: &[u32], on: bool) {
        primitives::draw_icon(self.display, x, y, width, height, words, on);
    }

    /// Draws `text` with its baseline at `y`. Returns the final cursor x.
    pub fn write_string(&mut self, text: &str, x: i32, y: i32, on: bool) -> Result<i32> {
        let font = self.font()?;
        Ok(text::write_string(self.display, font, text, x, y, on))
    }

    /// Measures `text` in the current font, clamped to the display width.
    pub fn string_bounds(&self, text: &str) -> Result<StringBound> {
        let font = self.font()?;
        Ok(text::string_bounds(text, font, self.display.width()))
    }

    /// Placement of a text block in a container; see
    /// [`text::justification_pos`] for the axis convention.
    pub fn justification_pos(
        &self,
        bounds: &StringBound,
        mode: Justify,
        container_width: u32,
        container_height: u32,
    ) -> Position {
        text::justification_pos(bounds, mode, container_width, container_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::test_font;
    use oled_panel_hw::{Geometry, MockChannel, PanelState, Ssd1306};

    fn panel() -> Ssd1306<MockChannel> {
        Ssd1306::new(Geometry::new(128, 32).unwrap())
    }

    #[test]
    fn test_text_requires_font() {
        let mut panel = panel();
        let mut gfx = Graphics::new(&mut panel);
        assert!(matches!(
            gfx.write_string("AB", 0, 10, true),
            Err(Error::InvalidReference("font"))
        ));
        assert!(matches!(
            gfx.string_bounds("AB"),
            Err(Error::InvalidReference("font"))
        ));
        drop(gfx);
        assert_eq!(panel.buffer().count_on(), 0);
    }

    #[test]
    fn test_flush_without_channel() {
        let mut panel = panel();
        let mut gfx = Graphics::new(&mut panel);
        gfx.draw_line(0, 0, 10, 0, true);
        assert!(matches!(gfx.flush(), Err(Error::ChannelUnavailable)));
        drop(gfx);
        assert_eq!(panel.buffer().count_on(), 11);
    }

    #[test]
    fn test_draw_and_flush() {
        let font = test_font();
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();

        let mut gfx = Graphics::init(&mut panel, &font);
        gfx.open(channel).unwrap();
        log.clear();

        gfx.draw_rect(0, 0, 127, 31, true, false);
        gfx.draw_circle(64, 16, 8, true, true);
        assert_eq!(gfx.write_string("AB", 4, 12, true).unwrap(), 18);
        gfx.flush().unwrap();

        let writes = log.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0][0], 0x00);
        assert_eq!(writes[1][0], 0x40);
        assert_eq!(&writes[1][1..], gfx.display().buffer().data());
    }

    #[test]
    fn test_string_bounds_uses_display_width() {
        let font = test_font();
        let mut panel: Ssd1306<MockChannel> = Ssd1306::new(Geometry::new(16, 8).unwrap());
        let gfx = Graphics::init(&mut panel, &font);
        let bounds = gfx.string_bounds("ABAB").unwrap();
        assert_eq!(bounds.width, 16);
        assert_eq!(bounds.height, 10);
    }

    #[test]
    fn test_centered_text_position() {
        let font = test_font();
        let mut panel = panel();
        let gfx = Graphics::init(&mut panel, &font);
        let bounds = gfx.string_bounds("AB").unwrap();
        let pos = gfx.justification_pos(&bounds, Justify::Center, 128, 32);
        assert_eq!(pos, Position { x: 21, y: 57 });
    }

    #[test]
    fn test_destroy_blanks_and_closes() {
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();

        let mut gfx = Graphics::new(&mut panel);
        gfx.open(channel).unwrap();
        gfx.fill(true);
        gfx.destroy().unwrap();

        assert!(log.is_closed());
        assert!(log.writes().last().unwrap()[1..].iter().all(|&b| b == 0));
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn test_set_pixel_clamps_negative() {
        let mut panel = panel();
        let mut gfx = Graphics::new(&mut panel);
        gfx.set_pixel(-3, 40, true);
        drop(gfx);
        assert!(panel.buffer().get_pixel(0, 31));
    }
}
