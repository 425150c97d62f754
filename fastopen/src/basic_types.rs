//! Key and cookie types used throughout the Fast Open core

use fastopen_secret_memory::{Public, Secret};

use crate::constants::{COOKIE_LEN, KEY_LEN};

/// One generation of server key material.
///
/// Keys are created by the rotation controller (operator install or
/// automatic rotation) and owned by exactly one key-ring slot until
/// evicted.
pub type Key = Secret<KEY_LEN>;

/// A cookie value, either freshly derived to offer to a client or
/// presented by one. Derived, not random, and not secret.
pub type Cookie = Public<COOKIE_LEN>;
