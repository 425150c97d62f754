//! Server-side TCP Fast Open cookie management: deriving the opaque
//! cookies handed out to clients, validating presented ones against a
//! rolling window of rotating server keys, and running the key
//! lifecycle (operator install, periodic automatic rotation,
//! enable/disable).
//!
//! The host TCP stack owns option parsing and handshake behavior; this
//! crate ends at the [FastOpenContext::check] verdict boundary.

pub mod basic_types;
pub mod config;
pub mod constants;
pub mod context;
pub mod cookie;
pub mod keyring;
mod rotation;
pub mod validator;

pub use basic_types::{Cookie, Key};
pub use config::FastOpenConfig;
pub use context::FastOpenContext;
pub use cookie::ConnInfo;
pub use validator::Verdict;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FastOpenError {
    #[error("key length mismatch, required {required} but found {actual}")]
    KeyLengthMismatch { required: usize, actual: usize },
    #[error("autokey interval of {seconds}s exceeds the maximum of {max}s")]
    IntervalOutOfRange { seconds: u32, max: u32 },
}
