//! HDLC link layer: CRC-16/X-25, the streaming framer, the frame decoder,
//! and the frame encoder used by the commander.

pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod framer;

pub use crc::crc16_x25;
pub use decoder::{decode, DecodedFrame, NotificationFrame, StatusFrame};
pub use encoder::encode_frame;
pub use framer::Framer;
