//! Error taxonomy.
//!
//! Per the error handling design: fatal errors abort the process, frame-level
//! errors drop the current frame and let the framer resynchronize, and
//! parser warnings just leave a field unset and keep going (those are
//! reported via `log::warn!`, not an error type).

use thiserror::Error;

/// Errors that abort the process.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("failed to open serial device {path}: {source}")]
    OpenSerial {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serial read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("serial write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to configure serial port: {0}")]
    Termios(#[source] nix::Error),

    #[error("failed to read config file {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    ParseConfig {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Frame-level errors: the frame is dropped, the framer keeps running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame too short: {0} bytes")]
    TooShort(usize),

    #[error("frame exceeds maximum size of {max} bytes")]
    Oversize { max: usize },

    #[error("lone escape byte with no following byte")]
    DanglingEscape,

    #[error("escape byte followed by invalid byte {0:#04x}")]
    InvalidEscape(u8),

    #[error("CRC mismatch: expected {expected:#06x}, got {got:#06x}")]
    CrcInvalid { expected: u16, got: u16 },

    #[error("data frame shorter than the 23-byte link-layer envelope: {0} bytes")]
    EnvelopeTooShort(usize),

    #[error("inner header is not IPHC (dispatch byte {0:#04x})")]
    NotIphc(u8),

    #[error("ICMPv6 payload shorter than 5 bytes: {0} bytes")]
    Icmpv6TooShort(usize),
}

pub type FatalResult<T> = Result<T, FatalError>;
pub type FrameResult<T> = Result<T, FrameError>;
