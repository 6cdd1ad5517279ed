//! Byte channel capability.
//!
//! A point-to-point byte transport to the panel controller. Each `write`
//! call is one bus transaction; the panel driver relies on that to keep a
//! D/C selector byte and its payload together.

#[cfg(target_os = "linux")]
mod i2c;
mod mock;

#[cfg(target_os = "linux")]
pub use i2c::I2cChannel;
pub use mock::{MockChannel, TransferLog};

use crate::{Error, Result};

/// Blocking byte transport to a single device.
pub trait ByteChannel {
    /// Writes `bytes` as one transaction. Succeeds only if every byte was
    /// transferred.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Fills `buffer` from the device. Succeeds only if it was filled.
    fn read(&mut self, buffer: &mut [u8]) -> Result<()>;

    /// Releases the transport. Further transfers fail with
    /// [`Error::ChannelUnavailable`].
    fn close(&mut self) -> Result<()>;
}

/// Converts a transfer count into a result.
pub(crate) fn check_transfer(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::TransferSizeMismatch { expected, actual })
    }
}
