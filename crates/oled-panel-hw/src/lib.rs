//! OLED Panel Hardware Library
//!
//! Provides the paged monochrome framebuffer and the command/data framing
//! used to push it to SSD1306-class segmented-memory display controllers
//! over a byte channel (I2C on Linux, or a recording mock for tests).

pub mod canvas;
pub mod channel;
pub mod error;
pub mod panel;

pub use canvas::{Canvas, Display};
pub use channel::{ByteChannel, MockChannel, TransferLog};
pub use error::{Error, Result};
pub use panel::{Geometry, PanelState, PixelBuffer, Selector, Ssd1306};

#[cfg(target_os = "linux")]
pub use channel::I2cChannel;

/// Number of vertical pixels packed into one buffer byte.
pub const PAGE_HEIGHT: u32 = 8;

/// Default panel dimensions (128x32 SSD1306 module).
pub const PANEL_WIDTH: u32 = 128;
pub const PANEL_HEIGHT: u32 = 32;

/// Default 7-bit I2C slave address for SSD1306 modules.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x3C;
