//! Countdown to a deadline such as a tender's closing time.
//!
//! [`remaining`] is the pure computation. [`CountdownTimer`] recomputes it
//! once per second on a background thread until the timer is dropped.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub fn is_expired(&self) -> bool {
        *self == Remaining::default()
    }
}

/// Time left until `expiration`; every field is at least zero.
pub fn remaining(expiration: DateTime<Utc>, now: DateTime<Utc>) -> Remaining {
    let total = (expiration - now).num_seconds();
    Remaining {
        days: (total / 86_400).max(0),
        hours: (total % 86_400 / 3_600).max(0),
        minutes: (total % 3_600 / 60).max(0),
        seconds: (total % 60).max(0),
    }
}

/// Ticks once per second. Dropping the timer stops the thread.
pub struct CountdownTimer {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    pub fn start<F>(expiration: DateTime<Utc>, on_tick: F) -> Self
    where
        F: FnMut(Remaining) + Send + 'static,
    {
        Self::start_with(expiration, Duration::from_secs(1), Utc::now, on_tick)
    }

    pub(crate) fn start_with<F, C>(expiration: DateTime<Utc>, period: Duration, clock: C, mut on_tick: F) -> Self
    where
        F: FnMut(Remaining) + Send + 'static,
        C: Fn() -> DateTime<Utc> + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            on_tick(remaining(expiration, clock()));
            match stopped.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        // Closing the channel wakes the thread immediately.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
