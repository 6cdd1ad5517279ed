//! SSD1306 panel driver: framing and display lifecycle.

use crate::canvas::{Canvas, Display};
use crate::channel::ByteChannel;
use crate::{Error, Result};
use tracing::{debug, info, warn};

use super::framebuffer::{Geometry, PixelBuffer};
use super::protocol::{cursor_reset, encode_frame, init_sequence, Selector};

/// Display lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    /// No channel bound.
    #[default]
    Closed,
    /// Channel bound, init payload and first frame in flight.
    Initializing,
    /// Accepting flushes.
    Ready,
}

impl PanelState {
    /// Lowercase state name.
    pub fn name(self) -> &'static str {
        match self {
            PanelState::Closed => "closed",
            PanelState::Initializing => "initializing",
            PanelState::Ready => "ready",
        }
    }
}

/// SSD1306 panel controller.
///
/// Owns the framebuffer for the whole session. Drawing only touches the
/// buffer; [`Display::sync`] pushes it to the device.
pub struct Ssd1306<C: ByteChannel> {
    buffer: PixelBuffer,
    channel: Option<C>,
    state: PanelState,
    /// Opaque controller init payload (command bytes and arguments).
    init_sequence: Vec<u8>,
    /// Scratch space for framing, reused across flushes.
    tx: Vec<u8>,
}

impl<C: ByteChannel> Ssd1306<C> {
    /// Creates a closed driver with the default init payload for `geometry`.
    pub fn new(geometry: Geometry) -> Self {
        Self::with_init_sequence(geometry, init_sequence(geometry))
    }

    /// Creates a closed driver that sends `payload` on open and reset.
    pub fn with_init_sequence(geometry: Geometry, payload: Vec<u8>) -> Self {
        Self {
            buffer: PixelBuffer::new(geometry),
            channel: None,
            state: PanelState::Closed,
            init_sequence: payload,
            tx: Vec::with_capacity(geometry.buffer_len() + 1),
        }
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Returns the framebuffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Returns the panel geometry.
    pub fn geometry(&self) -> Geometry {
        self.buffer.geometry()
    }

    /// Returns the bound channel, if any.
    pub fn channel(&self) -> Option<&C> {
        self.channel.as_ref()
    }

    /// Returns the init payload sent on open and reset.
    pub fn init_payload(&self) -> &[u8] {
        &self.init_sequence
    }

    /// Writes one frame: selector byte plus payload in a single channel call.
    fn send(
        channel: &mut Option<C>,
        tx: &mut Vec<u8>,
        selector: Selector,
        payload: &[u8],
    ) -> Result<()> {
        let channel = channel.as_mut().ok_or(Error::ChannelUnavailable)?;
        encode_frame(selector, payload, tx);
        debug!("Sending {:?} frame ({} bytes)", selector, tx.len());
        channel.write(tx.as_slice()).map_err(|e| {
            if let Error::TransferSizeMismatch { expected, actual } = &e {
                warn!(
                    "Short {:?} frame: {} of {} bytes transferred",
                    selector, actual, expected
                );
            }
            e
        })
    }

    /// Re-homes the write cursor, then sends the whole buffer.
    fn flush(&mut self) -> Result<()> {
        let reset = cursor_reset(self.buffer.geometry());
        Self::send(&mut self.channel, &mut self.tx, Selector::Command, &reset)?;
        Self::send(
            &mut self.channel,
            &mut self.tx,
            Selector::Data,
            self.buffer.data(),
        )
    }

    /// Sends the init payload, optionally clears, then flushes.
    fn initialize(&mut self, clean: bool) -> Result<()> {
        Self::send(
            &mut self.channel,
            &mut self.tx,
            Selector::Command,
            &self.init_sequence,
        )?;
        if clean {
            self.buffer.clear();
        }
        self.flush()
    }

    fn require_ready(&self, operation: &'static str) -> Result<()> {
        match self.state {
            PanelState::Ready => Ok(()),
            PanelState::Closed => Err(Error::ChannelUnavailable),
            state => Err(Error::InvalidState {
                operation,
                state: state.name(),
            }),
        }
    }

    /// Drops the channel after closing it. Close errors are logged only.
    fn release(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.close() {
                warn!("Failed to close channel: {}", e);
            }
        }
        self.state = PanelState::Closed;
    }
}

impl<C: ByteChannel> Canvas for Ssd1306<C> {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        self.buffer.set_pixel(x, y, on);
    }

    fn fill(&mut self, on: bool) {
        self.buffer.fill(on);
    }
}

impl<C: ByteChannel> Display for Ssd1306<C> {
    type Channel = C;

    fn open(&mut self, channel: C) -> Result<()> {
        if self.state != PanelState::Closed {
            return Err(Error::InvalidState {
                operation: "open",
                state: self.state.name(),
            });
        }

        self.channel = Some(channel);
        self.state = PanelState::Initializing;

        if let Err(e) = self.initialize(true) {
            self.release();
            return Err(e);
        }

        self.state = PanelState::Ready;
        let geometry = self.buffer.geometry();
        info!(
            "Panel opened ({}x{}, {} pages)",
            geometry.width(),
            geometry.height(),
            geometry.pages()
        );
        Ok(())
    }

    fn reset(&mut self, clean: bool) -> Result<()> {
        self.require_ready("reset")?;
        self.state = PanelState::Initializing;

        // A partial init payload leaves the controller configuration unknown.
        if let Err(e) = self.initialize(clean) {
            self.release();
            return Err(e);
        }

        self.state = PanelState::Ready;
        debug!("Panel reset (clean: {})", clean);
        Ok(())
    }

    fn close(&mut self, clean: bool) -> Result<()> {
        if self.state == PanelState::Closed {
            return Err(Error::ChannelUnavailable);
        }

        let result = if clean {
            self.buffer.clear();
            self.flush()
        } else {
            Ok(())
        };

        self.release();
        info!("Panel closed");
        result
    }

    fn sync(&mut self) -> Result<()> {
        self.require_ready("sync")?;
        self.flush()?;
        debug!("Frame synced ({} bytes)", self.buffer.data().len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MockChannel;

    fn panel() -> Ssd1306<MockChannel> {
        Ssd1306::new(Geometry::new(128, 32).unwrap())
    }

    #[test]
    fn test_open_sequence() {
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();

        panel.open(channel).unwrap();
        assert_eq!(panel.state(), PanelState::Ready);

        let writes = log.writes();
        assert_eq!(writes.len(), 3);

        let mut init = vec![0x00];
        init.extend_from_slice(panel.init_payload());
        assert_eq!(writes[0], init);
        assert_eq!(writes[1][0], 0x00);
        assert_eq!(&writes[1][1..], &cursor_reset(panel.geometry()));
        assert_eq!(writes[2].len(), 1 + 512);
        assert_eq!(writes[2][0], 0x40);
        assert!(writes[2][1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_open_clears_buffer() {
        let mut panel = panel();
        panel.fill(true);
        panel.open(MockChannel::new()).unwrap();
        assert_eq!(panel.buffer().count_on(), 0);
    }

    #[test]
    fn test_sync_frames_command_then_data() {
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();
        panel.open(channel).unwrap();
        log.clear();

        panel.set_pixel(0, 0, true);
        panel.set_pixel(127, 31, true);
        panel.sync().unwrap();

        let writes = log.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], vec![0x00, 0x21, 0x00, 0x7F, 0x22, 0x00, 0x03]);
        assert_eq!(writes[1][0], 0x40);
        assert_eq!(&writes[1][1..], panel.buffer().data());
        assert_eq!(writes[1][1], 0x01);
        assert_eq!(writes[1][512], 0x80);
    }

    #[test]
    fn test_sync_requires_open() {
        let mut panel = panel();
        assert!(matches!(panel.sync(), Err(Error::ChannelUnavailable)));
    }

    #[test]
    fn test_open_twice_is_rejected() {
        let mut panel = panel();
        panel.open(MockChannel::new()).unwrap();
        assert!(matches!(
            panel.open(MockChannel::new()),
            Err(Error::InvalidState {
                operation: "open",
                ..
            })
        ));
    }

    #[test]
    fn test_close_clean_blanks_panel() {
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();
        panel.open(channel).unwrap();
        panel.fill(true);
        log.clear();

        panel.close(true).unwrap();

        let writes = log.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0][0], 0x00);
        assert!(writes[1][1..].iter().all(|&b| b == 0));
        assert!(log.is_closed());
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(panel.channel().is_none());
    }

    #[test]
    fn test_close_without_clean() {
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();
        panel.open(channel).unwrap();
        log.clear();

        panel.close(false).unwrap();
        assert!(log.is_empty());
        assert!(log.is_closed());
        assert!(matches!(panel.close(false), Err(Error::ChannelUnavailable)));
    }

    #[test]
    fn test_reset_resends_init() {
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();
        panel.open(channel).unwrap();
        panel.set_pixel(1, 1, true);
        log.clear();

        panel.reset(false).unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(&log.writes()[0][1..], panel.init_payload());
        assert!(panel.buffer().get_pixel(1, 1));

        panel.reset(true).unwrap();
        assert_eq!(panel.buffer().count_on(), 0);
        assert_eq!(panel.state(), PanelState::Ready);
    }

    #[test]
    fn test_short_write_surfaces_and_closes() {
        let mut panel = panel();
        let channel = MockChannel::with_short_write(4);
        let log = channel.log();

        let result = panel.open(channel);
        assert!(matches!(result, Err(Error::TransferSizeMismatch { .. })));
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(log.is_closed());
    }

    #[test]
    fn test_custom_init_payload() {
        let geometry = Geometry::new(64, 48).unwrap();
        let mut panel: Ssd1306<MockChannel> =
            Ssd1306::with_init_sequence(geometry, vec![0xAE, 0xAF]);
        let channel = MockChannel::new();
        let log = channel.log();
        panel.open(channel).unwrap();

        let writes = log.writes();
        assert_eq!(writes[0], vec![0x00, 0xAE, 0xAF]);
        assert_eq!(writes[1], vec![0x00, 0x21, 0x00, 0x3F, 0x22, 0x00, 0x05]);
        assert_eq!(writes[2].len(), 1 + 64 * 6);
    }

    #[test]
    fn test_failed_reset_releases_channel() {
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();
        panel.open(channel).unwrap();

        log.set_short_write(Some(4));
        assert!(matches!(
            panel.reset(false),
            Err(Error::TransferSizeMismatch { .. })
        ));
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(panel.channel().is_none());
        assert!(log.is_closed());
        assert!(matches!(panel.sync(), Err(Error::ChannelUnavailable)));
    }

    #[test]
    fn test_short_write_during_sync() {
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();
        panel.open(channel).unwrap();
        log.clear();

        log.set_short_write(Some(4));
        assert!(matches!(
            panel.sync(),
            Err(Error::TransferSizeMismatch {
                expected: 7,
                actual: 4
            })
        ));
        // The data frame is not sent after a failed cursor reset.
        assert_eq!(log.len(), 1);

        // Every flush re-homes the cursor, so the next sync recovers.
        assert_eq!(panel.state(), PanelState::Ready);
        log.set_short_write(None);
        log.clear();
        panel.sync().unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_close_releases_after_failed_flush() {
        let mut panel = panel();
        let channel = MockChannel::new();
        let log = channel.log();
        panel.open(channel).unwrap();

        log.set_short_write(Some(4));
        assert!(matches!(
            panel.close(true),
            Err(Error::TransferSizeMismatch { .. })
        ));
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(panel.channel().is_none());
        assert!(log.is_closed());
    }
}
