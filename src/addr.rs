//! IPv6 address reconstruction from a fixed network prefix and an inline
//! 64-bit interface identifier, grounded on the `V6Addr`/`Eui64` shapes in
//! lpwan's `sixlo/headers.rs`.

use std::fmt;

/// The network's fixed /64 prefix: `bb bb 00 00 00 00 00 00`.
pub const NETWORK_PREFIX: [u8; 8] = [0xbb, 0xbb, 0, 0, 0, 0, 0, 0];

/// A full 128-bit address, always this network's prefix plus an inline IID.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct V6Addr(pub [u8; 16]);

impl V6Addr {
    /// Build an address from the network prefix and a 64-bit interface
    /// identifier taken verbatim from the wire (no U/L bit flip: this
    /// network's IIDs are carried inline, not derived from a MAC address).
    pub fn from_prefix_and_iid(iid: [u8; 8]) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&NETWORK_PREFIX);
        bytes[8..].copy_from_slice(&iid);
        V6Addr(bytes)
    }
}

impl fmt::Display for V6Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: Vec<String> = self
            .0
            .chunks(2)
            .map(|c| format!("{:02x}{:02x}", c[0], c[1]))
            .collect();
        write!(f, "{}", groups.join(":"))
    }
}

impl fmt::Debug for V6Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V6Addr({self})")
    }
}
