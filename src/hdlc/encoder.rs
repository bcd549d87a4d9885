//! Frame encoder: the write-side mirror of [`super::decoder`] — HDLC
//! byte-stuffing plus a CRC-16/X-25 trailer, wrapped in flag delimiters.
//! Used only by the commander, which is the only component that ever writes
//! to the serial port.

use super::crc::crc16_x25;

const FLAG: u8 = 0x7e;
const ESC: u8 = 0x7d;
const ESC_FLAG: u8 = 0x5e;
const ESC_ESC: u8 = 0x5d;

/// Apply HDLC byte-stuffing: `0x7e -> 0x7d 0x5e`, `0x7d -> 0x7d 0x5d`.
fn stuff(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for &b in data {
        match b {
            FLAG => out.extend([ESC, ESC_FLAG]),
            ESC => out.extend([ESC, ESC_ESC]),
            _ => out.push(b),
        }
    }
    out
}

/// Build a complete wire frame from `body`: append its CRC-16/X-25 trailer
/// (little-endian, matching the decoder's expectation), byte-stuff the
/// result, and wrap it in flag delimiters.
pub fn encode_frame(body: &[u8]) -> Vec<u8> {
    let crc = crc16_x25(body);
    let mut plain = body.to_vec();
    plain.push((crc & 0xff) as u8);
    plain.push((crc >> 8) as u8);

    let mut out = Vec::with_capacity(plain.len() + 2);
    out.push(FLAG);
    out.extend(stuff(&plain));
    out.push(FLAG);
    out
}

#[cfg(test)]
mod tests {
    use super::super::decoder::decode;
    use super::*;

    #[test]
    fn round_trips_through_the_decoder() {
        let body = [b'D', 0x7e, 0x7d, 0x01, 0x02];
        let frame = encode_frame(&body);
        assert_eq!(frame.first(), Some(&FLAG));
        assert_eq!(frame.last(), Some(&FLAG));
        let inner = &frame[1..frame.len() - 1];
        let decoded = decode(inner).unwrap();
        assert_eq!(decoded, super::super::decoder::DecodedFrame::Data(body[1..].to_vec()));
    }
}
