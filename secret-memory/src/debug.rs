use std::fmt;

/// Renders a byte array as lowercase hex for [std::fmt::Debug] output.
///
/// Only used for public values (cookies); secrets redact themselves
/// instead of going through this.
pub fn debug_crypto_array(v: &[u8], fmt: &mut fmt::Formatter) -> fmt::Result {
    for byte in v {
        write!(fmt, "{byte:02x}")?;
    }
    Ok(())
}
