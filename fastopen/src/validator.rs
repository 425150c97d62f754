//! Cookie validation against the resident key generations

use fastopen_constant_time::memcmp;

use crate::basic_types::Cookie;
use crate::constants::COOKIE_LEN;
use crate::cookie::{self, ConnInfo};
use crate::keyring::KeyRing;

/// Outcome of checking a presented cookie.
///
/// Deliberately not a boolean: the host TCP stack maps these onto
/// different SYN handling (accept early data, answer with a fresh cookie,
/// or fall back to a plain handshake because the feature cannot operate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No key is installed; a cookie can be neither checked nor offered
    NoKeys,
    /// No cookie (or a malformed one) was presented; the returned cookie
    /// should be offered to the client for next time
    NeedsCookie,
    /// A well-formed cookie was presented but matches no resident key
    Invalid,
    /// The presented cookie proves knowledge of a resident key
    Valid,
}

impl Verdict {
    /// Collapses the verdict to the numeric contract of the TCP input
    /// path: -1 cannot operate, 0 retry with the returned cookie, 1
    /// accept
    pub fn code(self) -> i8 {
        match self {
            Verdict::NoKeys => -1,
            Verdict::NeedsCookie | Verdict::Invalid => 0,
            Verdict::Valid => 1,
        }
    }
}

/// Checks `presented` for `conn` against every resident key generation,
/// newest first.
///
/// Alongside the verdict this returns the cookie derived from the newest
/// key, so the caller can always offer the client a current one; it is
/// the zero cookie when no key exists (or when `accept_any` bypasses the
/// lookup entirely).
///
/// A missing or wrong-length cookie is an expected condition on this
/// path, folded into [Verdict::NeedsCookie]; it is never an error and
/// never logged (per-SYN logging would hand an attacker an amplifier).
pub(crate) fn check_cookie<const CAP: usize>(
    keys: &KeyRing<CAP>,
    accept_any: bool,
    conn: &ConnInfo,
    presented: Option<&[u8]>,
) -> (Verdict, Cookie) {
    if accept_any {
        return (Verdict::Valid, Cookie::zero());
    }

    let latest = match keys.newest() {
        Some(key) => cookie::derive(key, conn),
        None => return (Verdict::NoKeys, Cookie::zero()),
    };

    let presented = match presented {
        Some(bytes) if bytes.len() == COOKIE_LEN => bytes,
        _ => return (Verdict::NeedsCookie, latest),
    };

    // Newest generation first; any resident generation is acceptable
    // (rolling window), and the first match wins.
    for key in keys.iter_newest_to_oldest() {
        let candidate = cookie::derive(key, conn);
        if memcmp(&*candidate, presented) {
            return (Verdict::Valid, latest);
        }
    }

    (Verdict::Invalid, latest)
}
