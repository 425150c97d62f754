//! The embeddable Fast Open context: key lifecycle plus the per-SYN
//! check entry point

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use log::{debug, info};

use crate::basic_types::{Cookie, Key};
use crate::constants::{KEY_LEN, MAX_AUTOKEY_INTERVAL_SECS, MAX_KEYS};
use crate::cookie::ConnInfo;
use crate::keyring::KeyRing;
use crate::rotation::RotationTimer;
use crate::validator::{self, Verdict};
use crate::FastOpenError;

/// Everything the per-SYN path reads, under one read/write lock.
///
/// Readers (the [check](FastOpenContext::check) scan) are many and
/// frequent; writers (rotation, key install, enable/disable) are rare, so
/// reader throughput dominates and the lock is effectively uncontended.
struct State {
    keys: KeyRing<MAX_KEYS>,
    enabled: bool,
    accept_any: bool,
    autokey_interval: Option<Duration>,
}

/// State shared between the context and the rotation worker
pub(crate) struct Shared {
    state: RwLock<State>,
}

impl Shared {
    fn read(&self) -> RwLockReadGuard<'_, State> {
        // A poisoned lock means a writer panicked, but every write path
        // leaves the state consistent between field updates, so the
        // value is still usable.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// One automatic rotation tick
    pub(crate) fn rotate(&self) {
        let mut state = self.write();
        // The worker may race a concurrent disable or interval change;
        // its tick then simply does nothing.
        if state.enabled && state.autokey_interval.is_some() {
            state.keys.add(Key::random());
            debug!("rotated server key, {} generation(s) resident", state.keys.len());
        }
    }
}

/// Server-side TCP Fast Open cookie and key-lifecycle manager.
///
/// One value of this type holds the complete state of the subsystem
/// (key ring, feature flags, rotation worker), so embedding
/// stacks can run one context per listener, per network namespace or per
/// test without any global coupling.
///
/// [check](Self::check) is safe to call from any number of threads
/// concurrently with the rare control-plane mutations.
///
/// # Examples
///
/// ```
/// use fastopen::{ConnInfo, FastOpenContext, Verdict};
///
/// let ctx = FastOpenContext::new();
/// ctx.install_key(&[0x17; 16]).unwrap();
///
/// let conn: ConnInfo = "203.0.113.5".parse::<std::net::IpAddr>().unwrap().into();
///
/// // First contact: no cookie yet, the context offers one
/// let (verdict, offer) = ctx.check(&conn, None);
/// assert_eq!(verdict, Verdict::NeedsCookie);
///
/// // The client retries with the offered cookie
/// let (verdict, _) = ctx.check(&conn, Some(&*offer));
/// assert_eq!(verdict, Verdict::Valid);
/// ```
pub struct FastOpenContext {
    shared: Arc<Shared>,
    /// Also serializes control-plane operations against each other; the
    /// per-SYN path never touches it
    timer: Mutex<Option<RotationTimer>>,
}

impl FastOpenContext {
    /// Key length accepted by [install_key](Self::install_key)
    pub const KEY_LEN: usize = KEY_LEN;
    /// Number of key generations kept resident
    pub const MAX_KEYS: usize = MAX_KEYS;

    /// Creates a disabled context with an empty key ring and automatic
    /// rotation configured at the default period (not running until
    /// enabled)
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(State {
                    keys: KeyRing::new(),
                    enabled: false,
                    accept_any: false,
                    autokey_interval: Some(Duration::from_secs(
                        crate::constants::DEFAULT_AUTOKEY_INTERVAL_SECS as u64,
                    )),
                }),
            }),
            timer: Mutex::new(None),
        }
    }

    /// Checks a presented cookie for `conn` and returns the verdict plus
    /// the cookie to offer.
    ///
    /// This is the per-SYN entry point: it takes the shared read lock for
    /// a scan bounded by [MAX_KEYS] PRF evaluations and performs no
    /// allocation, no I/O and no logging.
    pub fn check(&self, conn: &ConnInfo, presented: Option<&[u8]>) -> (Verdict, Cookie) {
        let state = self.shared.read();
        validator::check_cookie(&state.keys, state.accept_any, conn, presented)
    }

    /// Installs one operator-supplied key as the newest generation.
    ///
    /// Valid whether or not the feature is enabled, and never changes the
    /// enabled state. Rejects `material` of the wrong length without
    /// touching the ring.
    pub fn install_key(&self, material: &[u8]) -> Result<(), FastOpenError> {
        if material.len() != KEY_LEN {
            return Err(FastOpenError::KeyLengthMismatch {
                required: KEY_LEN,
                actual: material.len(),
            });
        }
        let _control = self.control();
        self.shared.write().keys.add(Key::from_slice(material));
        debug!("installed operator key");
        Ok(())
    }

    /// Enables or disables the subsystem.
    ///
    /// Enabling with an empty ring and automatic rotation configured
    /// installs one fresh random key immediately, then starts the
    /// rotation worker. Disabling clears the ring and synchronously stops
    /// the worker; connections already validated are unaffected.
    /// Idempotent in both directions.
    pub fn set_enabled(&self, enabled: bool) {
        let mut control = self.control();
        if enabled {
            let interval = {
                let mut state = self.shared.write();
                if state.enabled {
                    return;
                }
                state.enabled = true;
                if state.autokey_interval.is_some() && state.keys.is_empty() {
                    state.keys.add(Key::random());
                }
                state.autokey_interval
            };
            if let Some(interval) = interval {
                *control = Some(RotationTimer::spawn(Arc::clone(&self.shared), interval));
            }
            info!("fastopen enabled");
        } else {
            {
                let mut state = self.shared.write();
                if !state.enabled {
                    return;
                }
                state.enabled = false;
                state.keys.clear();
            }
            if let Some(timer) = control.take() {
                timer.stop();
            }
            info!("fastopen disabled, key ring cleared");
        }
    }

    /// Sets the debug override that accepts any presented cookie.
    ///
    /// A testing escape hatch; leave off in production.
    pub fn set_accept_any(&self, accept_any: bool) {
        let _control = self.control();
        self.shared.write().accept_any = accept_any;
    }

    /// Sets the automatic rotation period in seconds; `0` turns
    /// automatic rotation off (resident keys stay valid).
    ///
    /// While enabled, a changed period reschedules the rotation worker.
    /// Values above [MAX_AUTOKEY_INTERVAL_SECS] are rejected without any
    /// state change.
    pub fn set_autokey_interval(&self, seconds: u32) -> Result<(), FastOpenError> {
        if seconds > MAX_AUTOKEY_INTERVAL_SECS {
            return Err(FastOpenError::IntervalOutOfRange {
                seconds,
                max: MAX_AUTOKEY_INTERVAL_SECS,
            });
        }
        let interval = (seconds > 0).then(|| Duration::from_secs(seconds as u64));

        let mut control = self.control();
        let (enabled, changed) = {
            let mut state = self.shared.write();
            let changed = state.autokey_interval != interval;
            state.autokey_interval = interval;
            (state.enabled, changed)
        };

        if changed && enabled {
            if let Some(timer) = control.take() {
                timer.stop();
            }
            if let Some(interval) = interval {
                *control = Some(RotationTimer::spawn(Arc::clone(&self.shared), interval));
            }
            info!("autokey interval set to {seconds}s, rotation rescheduled");
        }
        Ok(())
    }

    /// Number of key generations currently resident (diagnostic; key
    /// material itself is never exposed)
    pub fn num_keys(&self) -> usize {
        self.shared.read().keys.len()
    }

    /// Serializes control-plane operations.
    ///
    /// Lock order is always control mutex before state lock, and the
    /// worker is never stopped while the state lock is held (its tick
    /// may be waiting on that lock).
    fn control(&self) -> std::sync::MutexGuard<'_, Option<RotationTimer>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FastOpenContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FastOpenContext {
    fn drop(&mut self) {
        // Stop the worker before the state goes away; RotationTimer's
        // own Drop joins it.
        let timer = self
            .timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(timer) = timer {
            timer.stop();
        }
    }
}
