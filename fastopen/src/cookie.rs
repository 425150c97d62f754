//! Cookie derivation: a keyed PRF over the client address

use std::hash::Hasher;
use std::net::{IpAddr, SocketAddr};

use siphasher::sip::SipHasher24;

use crate::basic_types::{Cookie, Key};

/// Domain-separation tag fed to the PRF ahead of IPv4 address octets
const ADDR_TAG_V4: u8 = 4;
/// Domain-separation tag fed to the PRF ahead of IPv6 address octets
const ADDR_TAG_V6: u8 = 6;

/// The client-identifying tuple a cookie is bound to.
///
/// Identity is the peer source address including its family; the tag
/// byte in the PRF input keeps a v4 address and a v6 address with
/// coinciding raw bytes from ever producing the same cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnInfo {
    remote: IpAddr,
}

impl ConnInfo {
    /// Identity of a peer by its source address
    pub fn new(remote: IpAddr) -> Self {
        Self { remote }
    }

    /// The peer source address
    pub fn remote(&self) -> IpAddr {
        self.remote
    }
}

impl From<IpAddr> for ConnInfo {
    fn from(remote: IpAddr) -> Self {
        Self::new(remote)
    }
}

/// The port plays no role in cookie identity; a client reconnecting from
/// a different source port keeps its cookie.
impl From<SocketAddr> for ConnInfo {
    fn from(remote: SocketAddr) -> Self {
        Self::new(remote.ip())
    }
}

/// Derives the cookie for `conn` under one key generation.
///
/// SipHash-2-4 keyed with the 16-byte secret over the family tag and the
/// fixed-size address octets; the 64-bit output in little-endian order is
/// the cookie. Deterministic, side-effect free and allocation free; this
/// runs once per resident key on the per-SYN path.
pub fn derive(key: &Key, conn: &ConnInfo) -> Cookie {
    let mut prf = SipHasher24::new_with_key(key.secret());
    match conn.remote {
        IpAddr::V4(addr) => {
            prf.write_u8(ADDR_TAG_V4);
            prf.write(&addr.octets());
        }
        IpAddr::V6(addr) => {
            prf.write_u8(ADDR_TAG_V6);
            prf.write(&addr.octets());
        }
    }
    Cookie::new(prf.finish().to_le_bytes())
}
