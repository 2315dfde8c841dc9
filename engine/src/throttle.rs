use std::time::{Duration, Instant};

/// Default window for resize-driven work.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(250);

/// Rate limiter for event handlers.
///
/// Time is passed in rather than read from the clock so callers (and tests) control it. The
/// leading call of a burst always fires; later calls inside `interval` are dropped, or, with
/// `trailing` enabled, collapsed into one pending call that [`Throttle::poll`] delivers once the
/// window has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
    trailing: bool,
    last_fired: Option<Instant>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            trailing: false,
            last_fired: None,
            pending: false,
        }
    }

    pub fn with_trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Registers an event at `now`. Returns `true` when the handler should run.
    pub fn call(&mut self, now: Instant) -> bool {
        if self.window_open(now) {
            self.fire(now);
            return true;
        }
        if self.trailing {
            self.pending = true;
        }
        false
    }

    /// Delivers a pending trailing call if its window has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.pending || !self.window_open(now) {
            return false;
        }
        self.fire(now);
        true
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    fn fire(&mut self, now: Instant) {
        self.last_fired = Some(now);
        self.pending = false;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}
