//! Reader task: owns the read half of the serial port and the whole
//! decode pipeline, byte in to logged/dispatched frame out.

use log::{debug, info, warn};

use crate::error::FatalResult;
use crate::hdlc::{self, DecodedFrame};
use crate::rpl::{self, RouteSink};
use crate::serial::SerialReader;
use crate::sixlowpan;

/// ICMPv6 message type for RPL control messages (RFC 6550).
const ICMPV6_RPL: u8 = 0x9b;
/// RPL message code for a Destination Advertisement Object.
const RPL_CODE_DAO: u8 = 0x02;

/// Read bytes from `reader` forever, framing, decoding, and dispatching
/// each complete frame. Returns only on a fatal I/O error; frame-level
/// errors are logged and the loop continues.
pub fn run(mut reader: SerialReader, sink: &mut impl RouteSink) -> FatalResult<()> {
    let mut framer = hdlc::Framer::new();
    loop {
        let byte = reader.read_byte()?;
        let Some(raw) = framer.feed_byte(byte) else {
            continue;
        };
        match hdlc::decode(&raw) {
            Ok(frame) => dispatch(frame, sink),
            Err(e) => warn!("Reader: dropping frame: {e}"),
        }
    }
}

fn dispatch(frame: DecodedFrame, sink: &mut impl RouteSink) {
    match frame {
        DecodedFrame::Status(s) => {
            if let Some(is_sync) = s.is_sync {
                info!("is sync? {}", is_sync as u8);
            } else {
                debug!("Reader: status frame, unrecognized type {:#04x}", s.status_type);
            }
        }
        DecodedFrame::Notification(n) => {
            warn!(
                "Reader: notification component={:#04x} code={:#04x} arg1={} arg2={}",
                n.component, n.code, n.arg1, n.arg2
            );
        }
        DecodedFrame::Data(payload) => dispatch_data(&payload, sink),
        DecodedFrame::Unknown(tag) => debug!("Reader: ignoring frame of unknown type {tag:#04x}"),
    }
}

fn dispatch_data(payload: &[u8], sink: &mut impl RouteSink) {
    let ip = match sixlowpan::parse_data_frame(payload) {
        Ok(ip) => ip,
        Err(e) => {
            warn!("Reader: dropping data frame: {e}");
            return;
        }
    };

    let (Some(source), Some(icmp_type), Some(icmp_code), Some(app_payload)) =
        (ip.source, ip.icmpv6_type, ip.icmpv6_code, ip.app_payload)
    else {
        return;
    };

    if icmp_type != ICMPV6_RPL || icmp_code != RPL_CODE_DAO {
        return;
    }

    let Some(dao_body) = payload.get(app_payload..) else {
        warn!("Reader: DAO payload offset out of range");
        return;
    };
    if let Err(e) = rpl::read_dao(source, dao_body, sink) {
        warn!("Reader: dropping malformed DAO: {e}");
    }
}
