// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time source for history coalescing and typeahead.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use web_time::{SystemTime, UNIX_EPOCH};

/// Millisecond clock.
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u64;
}

/// Wall clock; works on native targets and in the browser.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Hand-driven clock for tests and replays. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("now", &self.now.get())
            .finish()
    }
}

impl ManualClock {
    /// Clock starting at `now` milliseconds.
    pub fn new(now: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
