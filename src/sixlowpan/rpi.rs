//! 6LoRH-RPI (RFC 8138) outer header, reached via the RFC 8025 Page-1
//! dispatch byte `0xf1`.

use super::HeaderParse;

const PAGE_ONE_DISPATCH: u8 = 0xf1;
const CRITICAL_6LORH_MASK: u8 = 0xe0;
const CRITICAL_6LORH: u8 = 0x80;
const TYPE_6LORH_RPI: u8 = 0x05;

const RPI_FLAG_MASK: u8 = 0x1f;
/// I bit: RPL instance ID elided when set.
const RPI_I_FLAG: u8 = 0x02;
/// K bit: sender rank low byte elided when set.
const RPI_K_FLAG: u8 = 0x01;

/// IANA next-header value for the IPv6 Hop-by-Hop Options header.
pub const IANA_IPV6_HOP_HEADER: u8 = 0;
/// Sentinel meaning "inner IPHC follows" (there's no IANA value for this;
/// RFC 6282's NHC dispatch bit pattern is reused as a local marker).
pub const INNER_IPHC_FOLLOWS: u8 = 0xee;

/// True if `buf` starts with the Page-1 dispatch byte.
pub fn is_page_one(buf: &[u8]) -> bool {
    buf.first() == Some(&PAGE_ONE_DISPATCH)
}

/// Parse a 6LoRH-RPI header following the Page-1 dispatch byte. `buf` still
/// includes the dispatch byte at `buf[0]`.
///
/// If the 6LoRH present isn't a critical RPI header, this is a no-op: IP-in-IP
/// and deadline 6LoRH variants are explicitly unsupported, and are silently
/// skipped rather than failing the frame.
pub fn parse(buf: &[u8]) -> HeaderParse {
    let mut h = HeaderParse::default();
    h.version = 6;
    h.traffic_class = 0;
    let mut i = 1;

    if buf.len() < i + 2 || (buf[i] & CRITICAL_6LORH_MASK) != CRITICAL_6LORH || buf[i + 1] != TYPE_6LORH_RPI {
        h.payload = i;
        h.payload_length = buf.len().saturating_sub(i);
        return h;
    }

    let hop_flags = buf[i] & RPI_FLAG_MASK;
    h.next_header = Some(IANA_IPV6_HOP_HEADER);
    h.hop_flags = Some(hop_flags);
    i += 2;

    if hop_flags & RPI_I_FLAG == 0 {
        h.hop_rpl_instance_id = Some(buf[i]);
        i += 1;
    } else {
        h.hop_rpl_instance_id = Some(0);
    }

    if hop_flags & RPI_K_FLAG == 0 {
        h.hop_sender_rank = Some(u16::from_be_bytes([buf[i], buf[i + 1]]));
        i += 2;
    } else {
        h.hop_sender_rank = Some((buf[i] as u16) << 8);
        i += 1;
    }

    h.hop_next_header = Some(INNER_IPHC_FOLLOWS);
    h.payload = i;
    h.payload_length = buf.len().saturating_sub(i);
    h
}
