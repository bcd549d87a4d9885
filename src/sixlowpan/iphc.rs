//! RFC 6282 IPHC header decompression, restricted to the field values this
//! network's firmware actually emits: traffic class/flow label always
//! elided, next header always a literal inline byte (never LOWPAN_NHC
//! compressed), hop limit always the 64 compressed constant (never inline
//! or any other compressed value), and source/destination addresses either
//! elided (derived from the link-layer source, which this parser doesn't
//! have access to, so it's left unset) or a 64-bit inline interface
//! identifier combined with this network's fixed prefix.

use log::warn;

use super::HeaderParse;
use crate::error::{FrameError, FrameResult};

const IPHC_DISPATCH_MASK: u8 = 0xe0;
const IPHC_DISPATCH: u8 = 0x60;

const TF_ELIDED: u8 = 3;
const HLIM_64: u8 = 2;
const CID_NONE: u8 = 0;

const AM_128: u8 = 0;
const AM_64: u8 = 1;
const AM_16: u8 = 2;
const AM_ELIDED: u8 = 3;

/// Parse an IPHC header starting at `buf[0]`. Only the dispatch byte
/// mismatching IPHC at all is a hard failure; every other unsupported
/// sub-field value is logged and left unset, and decoding continues.
pub fn parse(buf: &[u8]) -> FrameResult<HeaderParse> {
    if buf.len() < 2 {
        return Err(FrameError::TooShort(buf.len()));
    }
    if buf[0] & IPHC_DISPATCH_MASK != IPHC_DISPATCH {
        return Err(FrameError::NotIphc(buf[0]));
    }

    let tf = (buf[0] >> 3) & 0x03;
    let nh_inline = (buf[0] >> 2) & 0x01 == 0;
    let hlim_bits = buf[0] & 0x03;

    let cid = (buf[1] >> 7) & 0x01;
    let sac = (buf[1] >> 6) & 0x01;
    let sam = (buf[1] >> 4) & 0x03;
    let m = (buf[1] >> 3) & 0x01;
    let dac = (buf[1] >> 2) & 0x01;
    let dam = buf[1] & 0x03;

    let mut h = HeaderParse::default();
    h.version = 6;
    h.traffic_class = 0;
    let mut i = 2;

    if cid != CID_NONE {
        warn!("IPHC: context identifier extension not supported, skipping header");
        i += 1;
    }

    if tf == TF_ELIDED {
        h.flow_label = Some(0);
    } else {
        warn!("IPHC: inline traffic class/flow label not supported, leaving unset");
    }

    if hlim_bits == HLIM_64 {
        h.hop_limit = Some(64);
    } else {
        warn!("IPHC: only the 64 compressed hop limit is supported, leaving unset");
    }

    if nh_inline {
        let next_header = *buf.get(i).ok_or(FrameError::TooShort(buf.len()))?;
        h.next_header = Some(next_header);
        i += 1;
    } else {
        warn!("IPHC: LOWPAN_NHC-compressed next header not supported, leaving unset");
    }

    h.source_iid = decode_address(buf, &mut i, sac, sam)?;
    if m == 1 {
        warn!("IPHC: multicast destination addressing not supported");
    }
    h.dest_iid = decode_address(buf, &mut i, dac, dam)?;

    h.payload = i;
    h.payload_length = buf.len().saturating_sub(i);
    Ok(h)
}

/// Decode one address field (source or destination) per its AC/AM bits,
/// advancing `i` past whatever bytes were consumed. Returns `None` (with a
/// warning) for modes this parser doesn't reconstruct.
fn decode_address(buf: &[u8], i: &mut usize, ac: u8, am: u8) -> FrameResult<Option<[u8; 8]>> {
    match am {
        AM_128 => {
            let bytes = buf.get(*i..*i + 16).ok_or(FrameError::TooShort(buf.len()))?;
            *i += 16;
            let mut iid = [0u8; 8];
            iid.copy_from_slice(&bytes[8..]);
            Ok(Some(iid))
        }
        AM_64 => {
            let bytes = buf.get(*i..*i + 8).ok_or(FrameError::TooShort(buf.len()))?;
            *i += 8;
            if ac == 0 {
                warn!("IPHC: stateless 64-bit address compression assumes this network's context");
            }
            let mut iid = [0u8; 8];
            iid.copy_from_slice(bytes);
            Ok(Some(iid))
        }
        AM_16 => {
            let bytes = buf.get(*i..*i + 2).ok_or(FrameError::TooShort(buf.len()))?;
            *i += 2;
            let mut iid = [0u8; 8];
            iid[0] = 0x00;
            iid[1] = 0x00;
            iid[2] = 0x00;
            iid[3] = 0xff;
            iid[4] = 0xfe;
            iid[5] = 0x00;
            iid[6..].copy_from_slice(bytes);
            Ok(Some(iid))
        }
        AM_ELIDED => {
            warn!("IPHC: address elided (derived from link-layer address), leaving unset");
            Ok(None)
        }
        _ => unreachable!("2-bit field"),
    }
}
