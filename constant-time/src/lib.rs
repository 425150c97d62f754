//! Constant-time equality check used on the cookie-validation hot path.
//!
//! A presented cookie is attacker-controlled; comparing it against the
//! derived candidates with an early-exit comparison would leak, byte by
//! byte, how much of a guess was correct.

mod memcmp;

pub use memcmp::memcmp;
