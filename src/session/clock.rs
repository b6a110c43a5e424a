/// Elapsed-time bookkeeping for one play-through, fed with host timestamps in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionClock {
    start_ms: Option<u64>,
    end_ms: Option<u64>,
}

impl SessionClock {
    pub fn restart(&mut self, now_ms: u64) {
        self.start_ms = Some(now_ms);
        self.end_ms = None;
    }

    /// Record the finish time. Only the first call after a restart counts; a clock that was never
    /// started cannot finish.
    pub fn finish(&mut self, now_ms: u64) -> bool {
        if !self.is_running() {
            return false;
        }
        self.end_ms = Some(now_ms);
        true
    }

    pub fn is_running(&self) -> bool {
        self.start_ms.is_some() && self.end_ms.is_none()
    }

    pub fn is_finished(&self) -> bool {
        self.end_ms.is_some()
    }

    /// Frozen at the finish time once finished; `None` before the first restart.
    pub fn elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        let start = self.start_ms?;
        let end = self.end_ms.unwrap_or(now_ms);
        Some(end.saturating_sub(start))
    }

    /// Text for the on-screen timer, recomputed every render tick.
    pub fn display(&self, now_ms: u64) -> Option<String> {
        self.elapsed_ms(now_ms).map(format_elapsed)
    }
}

/// `HH:MM:SS`, seconds floored, hours wrapping at a day.
pub fn format_elapsed(ms: u64) -> String {
    let seconds = ms / 1000;
    let s = seconds % 60;
    let m = (seconds % (60 * 60)) / 60;
    let h = (seconds % (60 * 60 * 24)) / (60 * 60);
    format!("{h:02}:{m:02}:{s:02}")
}

/// Whole seconds shown as the player's score.
pub fn score_seconds(ms: u64) -> u64 {
    ms / 1000
}

#[cfg(test)]
#[path = "../../tests/unit/session/clock.rs"]
mod tests;
