//! Constants and configuration values for the Fast Open cookie core

use static_assertions::const_assert;

/// Length in bytes of one server key (the SipHash-2-4 key size)
pub const KEY_LEN: usize = 16;

/// Length in bytes of a cookie handed out to and presented by clients.
///
/// This is the full 64-bit SipHash output; clients treat it as opaque.
pub const COOKIE_LEN: usize = 8;

/// Number of key generations kept resident at once.
///
/// A cookie issued under any resident generation still validates, so a
/// client whose cookie was minted just before a rotation is not forced
/// back through a cookie exchange. One spare generation is enough for
/// that; anything older has no cookies in circulation worth honoring.
pub const MAX_KEYS: usize = 2;

/// Default period of automatic key rotation, in seconds.
///
/// Same epoch the rotating cookie secrets of the WireGuard family of
/// protocols use: two minutes.
pub const DEFAULT_AUTOKEY_INTERVAL_SECS: u32 = 120;

/// Upper bound accepted for the rotation period, in seconds (7 days).
///
/// The interval eventually becomes a scheduler deadline; bounding it here
/// keeps that conversion trivially overflow-free and catches fat-fingered
/// control-plane input early.
pub const MAX_AUTOKEY_INTERVAL_SECS: u32 = 7 * 24 * 60 * 60;

// The ring index arithmetic and the codec key handling assume these.
const_assert!(MAX_KEYS >= 1);
const_assert!(COOKIE_LEN == 8);
const_assert!(DEFAULT_AUTOKEY_INTERVAL_SECS <= MAX_AUTOKEY_INTERVAL_SECS);
