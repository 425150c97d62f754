//! Configuration readable from a config file.
//!
//! The host stack usually drives the context through sysctl-like setters;
//! this module additionally supports a TOML section so a deployment can
//! declare its Fast Open settings next to the rest of its server
//! configuration.

use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUTOKEY_INTERVAL_SECS, KEY_LEN, MAX_AUTOKEY_INTERVAL_SECS};
use crate::context::FastOpenContext;

/// Declarative Fast Open settings.
///
/// # Examples
///
/// ```
/// use fastopen::FastOpenConfig;
///
/// let cfg: FastOpenConfig = toml::from_str(r#"
///     enabled = true
///     autokey_interval = 300
///     keys = ["000102030405060708090a0b0c0d0e0f"]
/// "#).unwrap();
/// assert!(cfg.enabled);
/// assert_eq!(cfg.autokey_interval, 300);
/// cfg.validate().unwrap();
/// ```
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastOpenConfig {
    /// whether the subsystem is enabled at startup
    #[serde(default)]
    pub enabled: bool,

    /// debug override accepting any presented cookie; never enable this
    /// in production
    #[serde(default)]
    pub accept_any: bool,

    /// automatic key rotation period in seconds, `0` to rotate only via
    /// explicitly installed keys
    #[serde(default = "default_autokey_interval")]
    pub autokey_interval: u32,

    /// operator keys to install at startup, hex encoded, oldest first;
    /// the last entry becomes the newest generation
    #[serde(default)]
    pub keys: Vec<String>,
}

fn default_autokey_interval() -> u32 {
    DEFAULT_AUTOKEY_INTERVAL_SECS
}

impl Default for FastOpenConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            accept_any: false,
            autokey_interval: DEFAULT_AUTOKEY_INTERVAL_SECS,
            keys: Vec::new(),
        }
    }
}

impl FastOpenConfig {
    /// Reads and parses a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let p = path.as_ref();
        let raw = fs::read_to_string(p).with_context(|| format!("Could not read config file {p:?}"))?;
        let config: Self =
            toml::from_str(&raw).with_context(|| format!("Could not parse config file {p:?}"))?;
        Ok(config)
    }

    /// Checks the configuration for consistency without touching any
    /// context
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.autokey_interval <= MAX_AUTOKEY_INTERVAL_SECS,
            "autokey_interval {}s exceeds the maximum of {}s",
            self.autokey_interval,
            MAX_AUTOKEY_INTERVAL_SECS
        );
        for (i, key) in self.keys.iter().enumerate() {
            let bytes = match hex::decode(key) {
                Ok(bytes) => bytes,
                Err(e) => bail!("key #{i} is not valid hex: {e}"),
            };
            ensure!(
                bytes.len() == KEY_LEN,
                "key #{i} is {} bytes long, expected {KEY_LEN}",
                bytes.len()
            );
        }
        Ok(())
    }

    /// Applies the configuration to a context.
    ///
    /// Validates first; a rejected configuration leaves the context
    /// untouched. Keys are installed before the subsystem is enabled so
    /// enabling sees the operator keys and does not mint a random one.
    pub fn apply(&self, ctx: &FastOpenContext) -> anyhow::Result<()> {
        self.validate()?;
        for key in &self.keys {
            // Validated above, so neither decode nor install can fail
            ctx.install_key(&hex::decode(key)?)?;
        }
        ctx.set_autokey_interval(self.autokey_interval)?;
        ctx.set_accept_any(self.accept_any);
        ctx.set_enabled(self.enabled);
        Ok(())
    }
}
