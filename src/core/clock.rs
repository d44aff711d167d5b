/// Abstraction over time sources.
/// Implementations: MonotonicClock (production), ManualClock (testing).
pub trait Clock {
    /// Current time in milliseconds from an arbitrary epoch.
    fn now_ms(&self) -> i64;
}

/// Production clock backed by std::time::Instant.
pub struct MonotonicClock {
    start: std::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> i64 {
        self.start.elapsed().as_millis() as i64
    }
}

/// Deterministic clock for tests and headless simulation.
pub struct ManualClock {
    current_ms: std::cell::Cell<i64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            current_ms: std::cell::Cell::new(0),
        }
    }

    pub fn set_time(&self, ms: i64) {
        self.current_ms.set(ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.current_ms.set(self.current_ms.get() + delta_ms);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.current_ms.get()
    }
}
