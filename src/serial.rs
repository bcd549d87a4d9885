//! Byte source (component A).
//!
//! This is the external collaborator per the purpose/scope section: a real
//! deployment's serial device driver. What's here is the thin interface and
//! termios setup the rest of the crate needs in order to compile and run
//! against a real TTY — one byte at a time, 19200bps, 8-N-1, software
//! XON/XOFF, blocking.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::AsFd;
use std::path::Path;

use nix::sys::termios::{self, BaudRate, SetArg};

use crate::error::{FatalError, FatalResult};

/// A duplex serial handle. `reader()`/`writer()` give each concurrent task
/// its own handle to its own direction, so the reader task and the commander
/// task never touch the same `File` value (see concurrency model: the two
/// directions don't alias, so no lock is needed).
pub struct SerialPort {
    file: File,
}

impl SerialPort {
    /// Open and configure `path` per the external interface: 19200bps, 8-N-1,
    /// software XON/XOFF flow control, raw (non-canonical) blocking reads.
    pub fn open(path: &Path) -> FatalResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| FatalError::OpenSerial {
                path: path.display().to_string(),
                source,
            })?;
        configure(&file).map_err(FatalError::Termios)?;
        Ok(Self { file })
    }

    /// Obtain an independent handle for the reader task (read direction only).
    pub fn reader(&self) -> FatalResult<SerialReader> {
        let file = self.file.try_clone().map_err(FatalError::Read)?;
        Ok(SerialReader { file })
    }

    /// Obtain an independent handle for the commander task (write direction
    /// only).
    pub fn writer(&self) -> FatalResult<SerialWriter> {
        let file = self.file.try_clone().map_err(FatalError::Write)?;
        Ok(SerialWriter { file })
    }
}

fn configure(file: &File) -> nix::Result<()> {
    let mut tio = termios::tcgetattr(file.as_fd())?;
    termios::cfsetspeed(&mut tio, BaudRate::B19200)?;
    termios::cfmakeraw(&mut tio);
    tio.control_flags.insert(termios::ControlFlags::CS8);
    tio.control_flags.remove(termios::ControlFlags::PARENB);
    tio.control_flags.remove(termios::ControlFlags::CSTOPB);
    tio.input_flags.insert(termios::InputFlags::IXON);
    tio.input_flags.insert(termios::InputFlags::IXOFF);
    termios::tcsetattr(file.as_fd(), SetArg::TCSANOW, &tio)?;
    Ok(())
}

/// Read half of a [`SerialPort`]. Blocking, one byte at a time from the
/// caller's point of view (the framer only needs one byte per call).
pub struct SerialReader {
    file: File,
}

impl SerialReader {
    /// Block until exactly one byte is available and return it.
    pub fn read_byte(&mut self) -> FatalResult<u8> {
        let mut buf = [0u8; 1];
        self.file.read_exact(&mut buf).map_err(FatalError::Read)?;
        Ok(buf[0])
    }
}

/// Write half of a [`SerialPort`].
pub struct SerialWriter {
    file: File,
}

impl SerialWriter {
    /// Write `data` as a single atomic write. Partial writes are treated as
    /// fatal, matching the "write failure is fatal" requirement.
    pub fn write_all(&mut self, data: &[u8]) -> FatalResult<()> {
        self.file.write_all(data).map_err(FatalError::Write)
    }
}
