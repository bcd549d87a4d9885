//! Frame decoder (component C): HDLC byte-unstuffing, CRC-16/X-25
//! verification, and dispatch by leading type byte.

use log::warn;

use super::crc::crc16_x25;
use crate::error::{FrameError, FrameResult};

const ESC: u8 = 0x7d;
const ESC_FLAG: u8 = 0x5e;
const ESC_ESC: u8 = 0x5d;
const FLAG: u8 = 0x7e;

const TAG_STATUS: u8 = b'S';
const TAG_NOTIFICATION: u8 = b'E';
const TAG_DATA: u8 = b'D';

/// Reverse HDLC byte-stuffing: `0x7d 0x5e -> 0x7e`, `0x7d 0x5d -> 0x7d`.
/// Replacement is left-to-right and non-overlapping, matching the wire
/// encoding's own construction.
pub fn unstuff(frame: &[u8]) -> FrameResult<Vec<u8>> {
    let mut out = Vec::with_capacity(frame.len());
    let mut i = 0;
    while i < frame.len() {
        if frame[i] == ESC {
            match frame.get(i + 1) {
                Some(&ESC_FLAG) => {
                    out.push(FLAG);
                    i += 2;
                }
                Some(&ESC_ESC) => {
                    out.push(ESC);
                    i += 2;
                }
                Some(&other) => return Err(FrameError::InvalidEscape(other)),
                None => return Err(FrameError::DanglingEscape),
            }
        } else {
            out.push(frame[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// One mote status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFrame {
    pub mote_id: [u8; 2],
    pub status_type: u8,
    /// Populated only for the recognized status type 0 (is-sync).
    pub is_sync: Option<bool>,
}

/// An error notification from the mote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFrame {
    pub mote_id: [u8; 2],
    pub component: u8,
    pub code: u8,
    pub arg1: i16,
    pub arg2: u16,
}

/// A successfully decoded frame, dispatched by its type byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFrame {
    Status(StatusFrame),
    Notification(NotificationFrame),
    /// The 6LoWPAN payload of a data frame, i.e. everything after the `'D'`
    /// tag byte.
    Data(Vec<u8>),
    /// Recognized-but-unhandled tag; silently ignored per spec.
    Unknown(u8),
}

/// Unstuff, verify the CRC-16/X-25 trailer, and dispatch `frame` (the raw
/// bytes between two flags, as produced by the framer).
pub fn decode(frame: &[u8]) -> FrameResult<DecodedFrame> {
    if frame.len() < 3 {
        return Err(FrameError::TooShort(frame.len()));
    }
    let unstuffed = unstuff(frame)?;
    if unstuffed.len() < 3 {
        return Err(FrameError::TooShort(unstuffed.len()));
    }
    let (body, trailer) = unstuffed.split_at(unstuffed.len() - 2);
    let expected = crc16_x25(body);
    let got = u16::from_le_bytes([trailer[0], trailer[1]]);
    if expected != got {
        return Err(FrameError::CrcInvalid { expected, got });
    }
    dispatch(body)
}

fn dispatch(body: &[u8]) -> FrameResult<DecodedFrame> {
    match body[0] {
        TAG_STATUS => Ok(DecodedFrame::Status(parse_status(body)?)),
        TAG_NOTIFICATION => Ok(DecodedFrame::Notification(parse_notification(body)?)),
        TAG_DATA => Ok(DecodedFrame::Data(body[1..].to_vec())),
        other => {
            warn!("Decoder: ignoring unknown frame type {other:#04x}");
            Ok(DecodedFrame::Unknown(other))
        }
    }
}

fn parse_status(body: &[u8]) -> FrameResult<StatusFrame> {
    if body.len() < 4 {
        return Err(FrameError::TooShort(body.len()));
    }
    let mote_id = [body[1], body[2]];
    let status_type = body[3];
    let payload = &body[4..];
    let is_sync = if status_type == 0 {
        payload.first().map(|&b| b != 0)
    } else {
        None
    };
    Ok(StatusFrame {
        mote_id,
        status_type,
        is_sync,
    })
}

fn parse_notification(body: &[u8]) -> FrameResult<NotificationFrame> {
    // mote_id(2) + component(1) + code(1) + arg1(2) + arg2(2) = 8 bytes
    // after the tag byte.
    if body.len() < 9 {
        return Err(FrameError::TooShort(body.len()));
    }
    let payload = &body[1..9];
    Ok(NotificationFrame {
        mote_id: [payload[0], payload[1]],
        component: payload[2],
        code: payload[3],
        arg1: i16::from_be_bytes([payload[4], payload[5]]),
        arg2: u16::from_be_bytes([payload[6], payload[7]]),
    })
}
