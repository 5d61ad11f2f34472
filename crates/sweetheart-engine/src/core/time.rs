/// Wall-clock stopwatch for the puzzle timer.
/// Timestamps are milliseconds from any monotonic-enough source (`Date.now()` on the web).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stopwatch {
    /// Start instant, `None` until the first move of a cycle.
    started_ms: Option<f64>,
    /// Elapsed whole seconds captured at `stop`.
    frozen_secs: Option<u64>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start instant. No-op if already started.
    pub fn start(&mut self, now_ms: f64) {
        if self.started_ms.is_none() {
            self.started_ms = Some(now_ms);
            self.frozen_secs = None;
        }
    }

    /// Freeze the elapsed time at `now_ms`.
    pub fn stop(&mut self, now_ms: f64) {
        if self.is_running() {
            self.frozen_secs = Some(self.elapsed_secs(now_ms));
        }
    }

    /// Back to unset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_started(&self) -> bool {
        self.started_ms.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.started_ms.is_some() && self.frozen_secs.is_none()
    }

    /// Whole seconds since start (floored). Frozen value after `stop`, 0 when unset.
    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        if let Some(secs) = self.frozen_secs {
            return secs;
        }
        match self.started_ms {
            Some(start) => ((now_ms - start).max(0.0) / 1000.0).floor() as u64,
            None => 0,
        }
    }
}

/// Format whole seconds as `MM:SS`. Minutes are not capped.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
