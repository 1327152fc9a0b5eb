//! Debounced re-run scheduling.
//!
//! The scheduler is a pending-request flag plus one single-shot deadline —
//! no timer callbacks, no queue. Each edit while live mode is on calls
//! [`RunScheduler::request`], which *replaces* any pending deadline, so a
//! slider drag produces one run after the user pauses rather than one per
//! intermediate value. [`RunScheduler::poll`] fires at most once per settle.
//!
//! With live mode off, requests are ignored and only
//! [`RunScheduler::request_immediate`] (the manual Run control) arms a fire.

use std::time::{Duration, Instant};

/// Default settle delay between the last edit and the automatic re-run.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub struct RunScheduler {
    delay: Duration,
    live: bool,
    deadline: Option<Instant>,
}

impl RunScheduler {
    pub fn new(delay: Duration, live: bool) -> Self {
        Self {
            delay,
            live,
            deadline: None,
        }
    }

    pub fn live(&self) -> bool {
        self.live
    }

    /// Switching live mode on re-arms a run so the preview catches up with
    /// any edits made while it was off.
    pub fn set_live(&mut self, live: bool) {
        if live && !self.live {
            self.deadline = Some(Instant::now() + self.delay);
        }
        if !live {
            self.deadline = None;
        }
        self.live = live;
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Request a debounced re-run. A request inside the settle window
    /// replaces the pending deadline. Ignored when live mode is off.
    pub fn request(&mut self) {
        if self.live {
            self.deadline = Some(Instant::now() + self.delay);
        }
    }

    /// Arm an immediate run regardless of live mode (manual trigger).
    pub fn request_immediate(&mut self) {
        self.deadline = Some(Instant::now());
    }

    /// True while a deadline is armed.
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending deadline, for repaint scheduling.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true exactly once per elapsed deadline; the caller runs the
    /// pipeline when it does.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for RunScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_replaces_pending_deadline() {
        let mut sched = RunScheduler::new(Duration::from_millis(100), true);
        let t0 = Instant::now();
        sched.request();
        let first = sched.deadline.expect("armed");
        sched.request();
        let second = sched.deadline.expect("armed");
        assert!(second >= first);
        // Still exactly one pending trigger.
        assert!(!sched.poll(t0));
        assert!(sched.poll(second + Duration::from_millis(1)));
        assert!(!sched.poll(second + Duration::from_secs(1)));
    }

    #[test]
    fn test_requests_ignored_when_live_off() {
        let mut sched = RunScheduler::new(Duration::from_millis(10), false);
        sched.request();
        assert!(!sched.pending());
    }

    #[test]
    fn test_manual_trigger_fires_when_live_off() {
        let mut sched = RunScheduler::new(Duration::from_millis(10), false);
        sched.request_immediate();
        assert!(sched.poll(Instant::now()));
    }

    #[test]
    fn test_enabling_live_rearms() {
        let mut sched = RunScheduler::new(Duration::from_millis(10), false);
        sched.set_live(true);
        assert!(sched.pending());
        sched.set_live(false);
        assert!(!sched.pending());
    }
}
