//! 6LoWPAN ingest: 6LoRH-RPI outer header, IPHC inner header, and the typed
//! `IpData` record assembled from both passes.

pub mod iphc;
pub mod rpi;

use log::warn;

use crate::addr::V6Addr;
use crate::error::{FrameError, FrameResult};

const LINK_LAYER_ENVELOPE_LEN: usize = 23;

/// RPI hop-by-hop flag bits (see `rpi::parse`'s `hop_flags`).
const RPI_O_FLAG: u8 = 0x10;
const RPI_R_FLAG: u8 = 0x08;

/// Fields recovered from one pass of header parsing (either the outer
/// 6LoRH-RPI/IPHC header or the inner IPHC header, if the outer was a
/// hop-by-hop wrapper). Unset fields stay `None`: that pass's header didn't
/// carry that value, not that parsing failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderParse {
    /// Always 6: this network never carries anything but IPv6.
    pub version: u8,
    /// Always 0: traffic class is never exercised by this network's firmware.
    pub traffic_class: u8,
    pub next_header: Option<u8>,
    pub hop_flags: Option<u8>,
    pub hop_rpl_instance_id: Option<u8>,
    pub hop_sender_rank: Option<u16>,
    pub hop_next_header: Option<u8>,
    pub flow_label: Option<u32>,
    pub hop_limit: Option<u8>,
    pub source_iid: Option<[u8; 8]>,
    pub dest_iid: Option<[u8; 8]>,
    /// Offset within the buffer passed to this call where the next header's
    /// bytes start.
    pub payload: usize,
    pub payload_length: usize,
}

/// Parse one header starting at `buf[0]`: the RFC 8025 Page-1 6LoRH-RPI
/// dispatch, or an IPHC header directly. Invoked once for the outer header
/// and, if the outer header was a hop-by-hop RPI wrapper, once more for the
/// inner IPHC header.
pub fn read_data(buf: &[u8]) -> FrameResult<HeaderParse> {
    if buf.is_empty() {
        return Err(FrameError::TooShort(0));
    }
    if rpi::is_page_one(buf) {
        Ok(rpi::parse(buf))
    } else {
        iphc::parse(buf)
    }
}

/// The fully assembled record for one data frame's 6LoWPAN payload, per the
/// recognized field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpData {
    /// Always 6: this network never carries anything but IPv6.
    pub version: u8,
    /// Always 0: traffic class is never exercised by this network's firmware.
    pub traffic_class: u8,
    pub source: Option<V6Addr>,
    pub dest: Option<V6Addr>,
    pub pre_hop: u8,
    pub next_header: Option<u8>,
    pub hop_flags: Option<u8>,
    pub hop_rpl_instance_id: Option<u8>,
    pub hop_sender_rank: Option<u16>,
    pub hop_next_header: Option<u8>,
    pub flow_label: Option<u32>,
    pub hop_limit: Option<u8>,
    pub icmpv6_type: Option<u8>,
    pub icmpv6_code: Option<u8>,
    pub icmpv6_checksum: Option<u16>,
    /// Offset of whatever bytes follow the fully decompressed headers,
    /// relative to the `buf` originally passed to [`parse_data_frame`]
    /// (i.e. including the 23-byte link-layer envelope).
    pub app_payload: Option<usize>,
}

/// Parse the full link-layer envelope plus 6LoWPAN payload of a data frame.
/// `buf` is everything after the `'D'` tag byte.
pub fn parse_data_frame(buf: &[u8]) -> FrameResult<IpData> {
    if buf.len() < LINK_LAYER_ENVELOPE_LEN {
        return Err(FrameError::EnvelopeTooShort(buf.len()));
    }
    let pre_hop = buf[LINK_LAYER_ENVELOPE_LEN - 1];
    let payload = &buf[LINK_LAYER_ENVELOPE_LEN..];

    let outer = read_data(payload)?;
    let has_hop_by_hop = outer.next_header == Some(rpi::IANA_IPV6_HOP_HEADER);

    let (header, source_iid, dest_iid) = if has_hop_by_hop {
        if outer.hop_flags.is_some_and(|f| f & RPI_O_FLAG != 0) {
            warn!("RPL: O bit set on hop-by-hop RPI header (expected down direction only)");
        }
        if outer.hop_flags.is_some_and(|f| f & RPI_R_FLAG != 0) {
            warn!("RPL: R bit set on hop-by-hop RPI header (rank error reported by a forwarder)");
        }
        let inner_buf = payload.get(outer.payload..).ok_or(FrameError::TooShort(payload.len()))?;
        if outer.hop_next_header != Some(rpi::INNER_IPHC_FOLLOWS) {
            warn!("RPL: hop-by-hop header's next header is not the expected inner IPHC marker");
        }
        let mut inner = read_data(inner_buf)?;
        // The outer header's hop limit is the authoritative one: IPHC's own
        // compressed hop limit, if present, describes the now-discarded
        // outer envelope, not the datagram as a whole.
        inner.hop_limit = outer.hop_limit.or(inner.hop_limit);
        let source_iid = inner.source_iid.or(outer.source_iid);
        let dest_iid = inner.dest_iid.or(outer.dest_iid);
        let abs_payload = outer.payload + inner.payload;
        inner.payload = abs_payload;
        inner.payload_length = payload.len().saturating_sub(abs_payload);
        (inner, source_iid, dest_iid)
    } else {
        let iid_s = outer.source_iid;
        let iid_d = outer.dest_iid;
        (outer, iid_s, iid_d)
    };

    let source = source_iid.map(V6Addr::from_prefix_and_iid);
    let dest = dest_iid.map(V6Addr::from_prefix_and_iid);

    let mut ip = IpData {
        version: header.version,
        traffic_class: header.traffic_class,
        source,
        dest,
        pre_hop,
        next_header: header.next_header,
        hop_flags: header.hop_flags,
        hop_rpl_instance_id: header.hop_rpl_instance_id,
        hop_sender_rank: header.hop_sender_rank,
        hop_next_header: header.hop_next_header,
        flow_label: header.flow_label,
        hop_limit: header.hop_limit,
        icmpv6_type: None,
        icmpv6_code: None,
        icmpv6_checksum: None,
        app_payload: None,
    };

    if ip.next_header == Some(0x3a) {
        let icmp = payload.get(header.payload..).ok_or(FrameError::TooShort(payload.len()))?;
        if icmp.len() < 5 {
            return Err(FrameError::Icmpv6TooShort(icmp.len()));
        }
        ip.icmpv6_type = Some(icmp[0]);
        ip.icmpv6_code = Some(icmp[1]);
        ip.icmpv6_checksum = Some(u16::from_be_bytes([icmp[2], icmp[3]]));
        ip.app_payload = Some(LINK_LAYER_ENVELOPE_LEN + header.payload + 4);
    }

    Ok(ip)
}
