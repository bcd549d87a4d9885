//! Commander (component E): after a fixed startup delay, sends the one
//! "become DODAG root" command this program ever writes to the mote.

use std::thread;
use std::time::Duration;

use log::info;

use crate::error::FatalResult;
use crate::hdlc::encoder::encode_frame;
use crate::serial::SerialWriter;

/// How long to wait after opening the serial port before sending the
/// set-root command, giving the mote time to finish its own boot sequence.
const STARTUP_DELAY: Duration = Duration::from_secs(5);

const CMD_TAG: u8 = b'R';
const CMD_SUBTYPE: u8 = b'T';
/// This network's fixed /64 prefix, repeated here (rather than reused from
/// [`crate::addr::NETWORK_PREFIX`]) because the command body's layout
/// spells it out byte-for-byte, padding included, as a fixed wire constant.
const PREFIX_AND_PADDING: [u8; 8] = [0xbb, 0xbb, 0, 0, 0, 0, 0, 0];
const VERSION: u8 = 0x01;

/// The network's pre-shared key, sent inline as part of the set-root
/// command.
const NETWORK_KEY: [u8; 16] = [
    0x15, 0x38, 0xb6, 0x9a, 0x00, 0xbd, 0xa9, 0x17, 0x14, 0x50, 0x1c, 0xf6, 0x67, 0x76, 0x62, 0xc1,
];

fn set_root_command() -> Vec<u8> {
    let mut body = Vec::with_capacity(27);
    body.push(CMD_TAG);
    body.push(CMD_SUBTYPE);
    body.extend(PREFIX_AND_PADDING);
    body.push(VERSION);
    body.extend(NETWORK_KEY);
    encode_frame(&body)
}

/// Wait [`STARTUP_DELAY`], then write the set-root command. Any write
/// failure is fatal, matching the rest of the program's treatment of serial
/// I/O errors.
pub fn run(mut writer: SerialWriter) -> FatalResult<()> {
    thread::sleep(STARTUP_DELAY);
    let frame = set_root_command();
    info!("Commander: sending set-root command ({} bytes)", frame.len());
    writer.write_all(&frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_known_wire_bytes() {
        let expected: [u8; 31] = [
            0x7e, b'R', b'T', 0xbb, 0xbb, 0, 0, 0, 0, 0, 0, 0x01, 0x15, 0x38, 0xb6, 0x9a, 0x00, 0xbd, 0xa9, 0x17,
            0x14, 0x50, 0x1c, 0xf6, 0x67, 0x76, 0x62, 0xc1, 0, 0, 0x7e,
        ];
        let got = set_root_command();
        assert_eq!(got.len(), expected.len());
        assert_eq!(got[..28], expected[..28]);
        assert_eq!(got[30], expected[30]);
        // Trailing CRC bytes are recomputed rather than compared against the
        // literal zeros in the `expected` placeholder above.
        let crc = crate::hdlc::crc16_x25(&expected[1..28]);
        assert_eq!(got[28], (crc & 0xff) as u8);
        assert_eq!(got[29], (crc >> 8) as u8);
    }
}
