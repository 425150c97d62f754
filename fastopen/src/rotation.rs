//! Periodic automatic key rotation

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::context::Shared;

/// Handle to the background rotation worker.
///
/// The worker parks on a condition variable between ticks; each tick adds
/// one fresh random key under the write lock. [stop](Self::stop) is
/// synchronous: once it returns, no further tick can run, so the state
/// the worker shares may be torn down afterwards.
pub(crate) struct RotationTimer {
    stop: Arc<StopFlag>,
    worker: Option<JoinHandle<()>>,
}

struct StopFlag {
    stopped: Mutex<bool>,
    bell: Condvar,
}

impl RotationTimer {
    /// Spawns a worker that rotates `shared`'s keys every `interval`
    pub fn spawn(shared: Arc<Shared>, interval: Duration) -> Self {
        let stop = Arc::new(StopFlag {
            stopped: Mutex::new(false),
            bell: Condvar::new(),
        });

        let worker = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || run(shared, stop, interval))
        };

        Self {
            stop,
            worker: Some(worker),
        }
    }

    /// Stops the worker and waits for it to exit
    pub fn stop(mut self) {
        self.signal_stop();
        if let Some(worker) = self.worker.take() {
            // The worker only parks on the condvar and takes the state
            // write lock briefly, so this join is short and cannot hang.
            let _ = worker.join();
        }
    }

    fn signal_stop(&self) {
        let mut stopped = self
            .stop
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        self.stop.bell.notify_all();
    }
}

impl Drop for RotationTimer {
    fn drop(&mut self) {
        // Normal teardown goes through stop(); this covers the handle
        // being dropped on an unwind path.
        self.signal_stop();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run(shared: Arc<Shared>, stop: Arc<StopFlag>, interval: Duration) {
    let mut stopped = stop
        .stopped
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    loop {
        if *stopped {
            return;
        }
        let (guard, timeout) = stop
            .bell
            .wait_timeout(stopped, interval)
            .unwrap_or_else(PoisonError::into_inner);
        stopped = guard;
        if *stopped {
            return;
        }
        if timeout.timed_out() {
            shared.rotate();
        }
    }
}
