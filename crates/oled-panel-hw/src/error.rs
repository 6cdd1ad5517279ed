//! Error types for the OLED panel hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving the panel.
///
/// Out-of-range pixel coordinates are not represented here: they are
/// clamped to the last valid row/column and never fail.
#[derive(Error, Debug)]
pub enum Error {
    /// No byte channel is bound to the panel (it is closed).
    #[error("no byte channel bound to the panel")]
    ChannelUnavailable,

    /// A required collaborator (font, display) was not bound at call time.
    #[error("missing {0} reference")]
    InvalidReference(&'static str),

    /// The channel moved a different number of bytes than requested.
    #[error("transfer size mismatch: expected {expected} bytes, got {actual}")]
    TransferSizeMismatch { expected: usize, actual: usize },

    /// Panel geometry cannot be addressed.
    #[error("invalid panel dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Lifecycle operation called in the wrong state.
    #[error("cannot {operation} while panel is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Opening the underlying bus device failed.
    #[error("failed to open {path}: {source}")]
    ChannelOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Bus I/O error.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}
