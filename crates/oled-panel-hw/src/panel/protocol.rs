//! SSD1306 protocol definitions and framing.
//!
//! Frame structure (one channel write per frame):
//! - Selector byte: 0x00 (command stream) or 0x40 (data stream)
//! - Payload: command bytes with their arguments, or packed page data

use super::framebuffer::Geometry;

/// Leading D/C selector byte of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Selector {
    /// Payload is a command stream.
    Command = 0x00,
    /// Payload is display RAM data.
    Data = 0x40,
}

/// Memory addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AddressMode {
    Horizontal = 0x00,
    Vertical = 0x01,
    Page = 0x02,
}

/// Controller commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Charge pump setting; argument 0x14 enables, 0x10 disables.
    ChargePump = 0x8D,
    /// Contrast; one argument byte.
    SetContrast = 0x81,
    /// Display follows RAM contents.
    EntireDisplayResume = 0xA4,
    /// Every pixel on, ignoring RAM.
    EntireDisplayOn = 0xA5,
    NormalDisplay = 0xA6,
    InvertDisplay = 0xA7,
    DisplayOff = 0xAE,
    DisplayOn = 0xAF,
    DeactivateScroll = 0x2E,
    /// One argument: an [`AddressMode`].
    SetMemoryAddressMode = 0x20,
    /// Two arguments: start and end column.
    SetColumnAddress = 0x21,
    /// Two arguments: start and end page.
    SetPageAddress = 0x22,
    /// Page mode start page, OR'ed with the page number.
    SetPageStart = 0xB0,
    /// OR'ed with the start line (0-63).
    SetDisplayStartLine = 0x40,
    /// Column 0 mapped to SEG0.
    SegmentRemapNormal = 0xA0,
    /// Column 127 mapped to SEG0.
    SegmentRemapFlipped = 0xA1,
    /// One argument: mux ratio minus one.
    SetMultiplexRatio = 0xA8,
    ComScanIncrement = 0xC0,
    ComScanDecrement = 0xC8,
    /// One argument: vertical shift.
    SetDisplayOffset = 0xD3,
    /// One argument: 0x02 sequential, 0x12 alternative.
    SetComPins = 0xDA,
    /// One argument: divide ratio and oscillator frequency.
    SetClockDivide = 0xD5,
    SetPrechargePeriod = 0xD9,
    SetVcomhDeselect = 0xDB,
    Nop = 0xE3,
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

/// Builds the controller init payload for a panel geometry.
///
/// Leaves the controller in horizontal addressing mode with the write
/// window covering the whole panel, display on.
pub fn init_sequence(geometry: Geometry) -> Vec<u8> {
    let multiplex = u8::try_from(geometry.height() - 1).unwrap_or(u8::MAX);
    let com_pins = if geometry.height() > 32 { 0x12 } else { 0x02 };

    vec![
        Command::DisplayOff.into(),
        Command::SetClockDivide.into(),
        0x80,
        Command::SetMultiplexRatio.into(),
        multiplex,
        Command::SetDisplayOffset.into(),
        0x00,
        Command::SetDisplayStartLine.into(),
        Command::ChargePump.into(),
        0x14,
        Command::SetMemoryAddressMode.into(),
        AddressMode::Horizontal as u8,
        Command::SetColumnAddress.into(),
        0x00,
        geometry.last_column(),
        Command::SetPageAddress.into(),
        0x00,
        geometry.last_page(),
        Command::SegmentRemapFlipped.into(),
        Command::ComScanDecrement.into(),
        Command::SetComPins.into(),
        com_pins,
        Command::SetContrast.into(),
        0xFF,
        Command::SetPrechargePeriod.into(),
        0xF1,
        Command::SetVcomhDeselect.into(),
        0x40,
        Command::EntireDisplayResume.into(),
        Command::NormalDisplay.into(),
        Command::DeactivateScroll.into(),
        Command::DisplayOn.into(),
    ]
}

/// Builds the command payload that re-homes the write cursor to column 0,
/// page 0 with the window covering the whole panel.
pub fn cursor_reset(geometry: Geometry) -> [u8; 6] {
    [
        Command::SetColumnAddress.into(),
        0x00,
        geometry.last_column(),
        Command::SetPageAddress.into(),
        0x00,
        geometry.last_page(),
    ]
}

/// Packs a selector and payload into `out`, replacing its contents.
pub fn encode_frame(selector: Selector, payload: &[u8], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(payload.len() + 1);
    out.push(selector as u8);
    out.extend_from_slice(payload);
}
