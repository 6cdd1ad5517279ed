//! OLED panel module.
//!
//! Provides the paged framebuffer and the SSD1306 command/data framing
//! that pushes it to the controller.

mod device;
mod protocol;

pub mod framebuffer;

pub use device::{PanelState, Ssd1306};
pub use framebuffer::{Geometry, PixelBuffer};
pub use protocol::{cursor_reset, encode_frame, init_sequence, AddressMode, Command, Selector};
