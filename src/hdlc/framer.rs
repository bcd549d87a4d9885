//! HDLC framer (component B): a per-byte streaming state machine that
//! resynchronizes on `0x7e` flag bytes and strips the software XON/XOFF
//! flow-escape layer inline, emitting framed byte buffers with HDLC
//! byte-stuffing still present.
//!
//! Grounded on the teacher's `hdlc_deframer.rs` state-machine shape (a
//! tagged enum plus an accumulating buffer, mutated one input byte at a
//! time), adapted from its bit-oriented AX.25 framing to the byte-oriented,
//! flag-delimited framing this wire format actually uses.

use log::{debug, trace, warn};

const FLAG: u8 = 0x7e;
const FLOW_ESC: u8 = 0x12;
const XON: u8 = 0x11;
const XOFF: u8 = 0x13;

/// Default cap on accumulated frame size. The spec allows any generous
/// limit; oversize frames are reported and dropped, not fatal.
pub const MAX_FRAME_SIZE: usize = 2048;

#[derive(Debug)]
enum State {
    /// Discarding bytes until the first flag.
    Hunting,
    /// Accumulating bytes for the current frame.
    InFrame(Vec<u8>),
    /// Just saw the flow-escape byte; the next byte gets XORed with 0x10.
    InFrameFlowEscaped(Vec<u8>),
}

/// Streaming HDLC framer. Feed it bytes one at a time; it emits a `Frame`
/// every time the buffer between two flags is non-empty.
pub struct Framer {
    state: State,
    max_size: usize,
    oversize_count: u64,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer {
    pub fn new() -> Self {
        Self {
            state: State::Hunting,
            max_size: MAX_FRAME_SIZE,
            oversize_count: 0,
        }
    }

    /// Feed a single byte from the serial stream. Returns `Some(frame)` if
    /// this byte closed a non-empty frame.
    pub fn feed_byte(&mut self, byte: u8) -> Option<Vec<u8>> {
        match &mut self.state {
            State::Hunting => {
                if byte == FLAG {
                    trace!("Framer: found first flag, synchronized");
                    self.state = State::InFrame(Vec::new());
                }
                None
            }
            State::InFrame(buf) => {
                if byte == FLAG {
                    if buf.is_empty() {
                        // Consecutive flags: stay put, open the next frame.
                        None
                    } else {
                        let frame = std::mem::take(buf);
                        debug!("Framer: closed frame of {} bytes", frame.len());
                        self.state = State::InFrame(Vec::new());
                        Some(frame)
                    }
                } else if byte == FLOW_ESC {
                    let buf = std::mem::take(buf);
                    self.state = State::InFrameFlowEscaped(buf);
                    None
                } else if byte == XON || byte == XOFF {
                    warn!("Framer: discarding unescaped flow-control byte {byte:#04x}");
                    None
                } else {
                    if buf.len() >= self.max_size {
                        self.oversize_count += 1;
                        warn!(
                            "Framer: frame exceeded {} bytes, discarding and resyncing",
                            self.max_size
                        );
                        self.state = State::Hunting;
                        return None;
                    }
                    buf.push(byte);
                    None
                }
            }
            State::InFrameFlowEscaped(buf) => {
                if byte == FLAG {
                    // Escape sequence abandoned; treat as a normal delimiter.
                    warn!("Framer: flag seen mid flow-escape, abandoning escape");
                    if buf.is_empty() {
                        self.state = State::InFrame(Vec::new());
                        None
                    } else {
                        let frame = std::mem::take(buf);
                        self.state = State::InFrame(Vec::new());
                        Some(frame)
                    }
                } else {
                    let mut buf = std::mem::take(buf);
                    buf.push(byte ^ 0x10);
                    self.state = State::InFrame(buf);
                    None
                }
            }
        }
    }

    /// Number of frames discarded so far for exceeding `max_size`.
    pub fn oversize_count(&self) -> u64 {
        self.oversize_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(framer: &mut Framer, bytes: &[u8]) -> Vec<Vec<u8>> {
        bytes.iter().filter_map(|&b| framer.feed_byte(b)).collect()
    }

    #[test]
    fn resynchronizes_past_garbage_prefix() {
        let body = [0x44u8, 0x01, 0x02];
        let clean: Vec<u8> = [&[FLAG][..], &body, &[FLAG]].concat();
        let mut f1 = Framer::new();
        let frames1 = feed_all(&mut f1, &clean);

        let garbage: Vec<u8> = [&[0xaa, 0xbb, 0x7d][..], &clean].concat();
        let mut f2 = Framer::new();
        let frames2 = feed_all(&mut f2, &garbage);

        assert_eq!(frames1, frames2);
        assert_eq!(frames1, vec![body.to_vec()]);
    }

    #[test]
    fn double_flags_produce_no_empty_frames() {
        let body = [0x44u8, 0x01];
        let stream: Vec<u8> = [&[FLAG, FLAG, FLAG][..], &body, &[FLAG]].concat();
        let mut f = Framer::new();
        let frames = feed_all(&mut f, &stream);
        assert_eq!(frames, vec![body.to_vec()]);
    }

    #[test]
    fn back_to_back_frames_via_shared_flag() {
        let a = [0x01u8, 0x02];
        let b = [0x03u8, 0x04];
        let stream: Vec<u8> = [&[FLAG][..], &a, &[FLAG], &b, &[FLAG]].concat();
        let mut f = Framer::new();
        let frames = feed_all(&mut f, &stream);
        assert_eq!(frames, vec![a.to_vec(), b.to_vec()]);
    }

    #[test]
    fn flow_escape_round_trip() {
        for b in 0u8..=255 {
            let stream = [FLAG, FLOW_ESC, b, FLAG];
            let mut f = Framer::new();
            let frames = feed_all(&mut f, &stream);
            assert_eq!(frames, vec![vec![b ^ 0x10]]);
        }
    }

    #[test]
    fn unescaped_flow_control_bytes_are_dropped() {
        for ctrl in [XON, XOFF] {
            let stream = [FLAG, 0xaa, ctrl, 0xbb, FLAG];
            let mut f = Framer::new();
            let frames = feed_all(&mut f, &stream);
            assert_eq!(frames, vec![vec![0xaa, 0xbb]]);
        }
    }

    #[test]
    fn flag_mid_escape_abandons_escape_and_opens_next_frame() {
        let stream = [FLAG, 0xaa, FLOW_ESC, FLAG, 0xbb, FLAG];
        let mut f = Framer::new();
        let frames = feed_all(&mut f, &stream);
        assert_eq!(frames, vec![vec![0xaa], vec![0xbb]]);
    }

    #[test]
    fn oversize_frame_is_discarded_and_resyncs() {
        let mut f = Framer::new();
        f.max_size = 4;
        let mut stream = vec![FLAG];
        stream.extend(std::iter::repeat(0x01u8).take(10));
        stream.push(FLAG);
        stream.extend([0xaa, 0xbb]);
        stream.push(FLAG);
        let frames = feed_all(&mut f, &stream);
        assert_eq!(frames, vec![vec![0xaa, 0xbb]]);
        assert_eq!(f.oversize_count(), 1);
    }
}
