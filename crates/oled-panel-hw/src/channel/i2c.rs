//! Linux I2C channel via `/dev/i2c-N`.

use super::{check_transfer, ByteChannel};
use crate::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::io::AsRawFd;
use tracing::{debug, info};

/// `ioctl` request binding the slave address used by plain read/write.
const I2C_SLAVE: u16 = 0x0703;

/// I2C character device bound to one slave address.
pub struct I2cChannel {
    file: Option<File>,
    path: String,
    address: u8,
}

impl I2cChannel {
    /// Opens `/dev/i2c-<bus>` and binds it to `address`.
    pub fn open(bus: u8, address: u8) -> Result<Self> {
        let path = format!("/dev/i2c-{}", bus);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| Error::ChannelOpen {
                path: path.clone(),
                source,
            })?;

        // SAFETY: the descriptor stays open for the duration of the call and
        // I2C_SLAVE takes the address by value, no pointers are involved.
        let rc = unsafe {
            libc::ioctl(
                file.as_raw_fd(),
                I2C_SLAVE as _,
                libc::c_ulong::from(address),
            )
        };
        if rc < 0 {
            return Err(Error::ChannelOpen {
                path,
                source: std::io::Error::last_os_error(),
            });
        }

        info!("I2C channel opened at {} (address 0x{:02X})", path, address);

        Ok(Self {
            file: Some(file),
            path,
            address,
        })
    }

    /// Returns the device path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the bound slave address.
    pub fn address(&self) -> u8 {
        self.address
    }

    fn file(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(Error::ChannelUnavailable)
    }
}

impl ByteChannel for I2cChannel {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let written = self.file()?.write(bytes)?;
        check_transfer(bytes.len(), written)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<()> {
        let expected = buffer.len();
        let read = self.file()?.read(buffer)?;
        check_transfer(expected, read)
    }

    fn close(&mut self) -> Result<()> {
        if self.file.take().is_some() {
            debug!("I2C channel {} closed", self.path);
        }
        Ok(())
    }
}
