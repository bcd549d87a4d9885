//! RPL (RFC 6550) DAO parsing: pulls a non-storing-mode source route
//! (child, parent) pair out of a Destination Advertisement Object body, and
//! the [`RouteSink`] trait that receives it.

use log::{info, warn};

use crate::addr::V6Addr;
use crate::error::{FrameError, FrameResult};

/// Bytes consumed by the fixed DAO header (RPL instance ID, flags,
/// reserved, DAO sequence, and the target option's own header) before the
/// first transit information option can appear.
const DAO_HEADER_LEN: usize = 20;
/// RPL option type for Transit Information.
const TRANSIT_OPTION_TYPE: u8 = 0x06;
/// Offset of the inline parent EUI-64 within the transit information option.
const PARENT_EUI64_OFFSET: usize = 28;
const EUI64_LEN: usize = 8;

/// Receives a decoded (child, parent) route. A real deployment would feed
/// this into the DODAG root's routing table; the default implementation
/// just logs it.
pub trait RouteSink {
    fn add_route(&mut self, child: V6Addr, parent: V6Addr);
}

/// A `RouteSink` that logs every route at info level and keeps no state.
#[derive(Debug, Default)]
pub struct LoggingRouteSink;

impl RouteSink for LoggingRouteSink {
    fn add_route(&mut self, child: V6Addr, parent: V6Addr) {
        info!("RPL: route {child} via {parent}");
    }
}

/// Decode a DAO body (the ICMPv6 payload after the 4-byte ICMPv6 header) and
/// report the (child, parent) route, if a Transit Information option with an
/// inline parent address is present.
///
/// `source` is the DAO's IPv6 source address, which doubles as the child
/// (the mote advertising its own reachability).
pub fn read_dao(source: V6Addr, data: &[u8], sink: &mut impl RouteSink) -> FrameResult<()> {
    info!("DAO from [{source}]");
    if data.len() <= DAO_HEADER_LEN {
        return Err(FrameError::TooShort(data.len()));
    }
    if data[DAO_HEADER_LEN] != TRANSIT_OPTION_TYPE {
        warn!(
            "RPL: DAO option at offset {DAO_HEADER_LEN} is type {:#04x}, not transit information; skipping",
            data[DAO_HEADER_LEN]
        );
        return Ok(());
    }
    let end = PARENT_EUI64_OFFSET + EUI64_LEN;
    if data.len() < end {
        return Err(FrameError::TooShort(data.len()));
    }
    let mut iid = [0u8; EUI64_LEN];
    iid.copy_from_slice(&data[PARENT_EUI64_OFFSET..end]);
    let parent = V6Addr::from_prefix_and_iid(iid);
    sink.add_route(source, parent);
    Ok(())
}
