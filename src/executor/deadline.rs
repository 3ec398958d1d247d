//! Deadline tracking for timed executions

use std::time::{Duration, Instant};

/// Tracks an optional deadline fixed at process launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineMonitor {
    deadline: Option<Instant>,
}

impl DeadlineMonitor {
    /// Start the clock now. `None` means the execution never expires.
    pub fn start(timeout: Option<Duration>) -> Self {
        Self::starting_at(Instant::now(), timeout)
    }

    /// Start the clock at a given instant
    pub fn starting_at(launched: Instant, timeout: Option<Duration>) -> Self {
        Self {
            deadline: timeout.and_then(|t| launched.checked_add(t)),
        }
    }

    /// The instant after which the execution has overrun
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has passed
    pub fn is_expired(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() > deadline)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_timeout_never_expires() {
        let monitor = DeadlineMonitor::start(None);
        assert!(monitor.deadline().is_none());
        assert!(!monitor.is_expired());
    }

    #[test]
    fn test_future_deadline_not_expired() {
        let monitor = DeadlineMonitor::start(Some(Duration::from_secs(60)));
        assert!(monitor.deadline().is_some());
        assert!(!monitor.is_expired());
    }

    #[test]
    fn test_past_deadline_expired() {
        let launched = Instant::now() - Duration::from_millis(50);
        let monitor = DeadlineMonitor::starting_at(launched, Some(Duration::from_millis(10)));
        assert!(monitor.is_expired());
    }

    #[test]
    fn test_expires_after_sleep() {
        let monitor = DeadlineMonitor::start(Some(Duration::from_millis(20)));
        std::thread::sleep(Duration::from_millis(40));
        assert!(monitor.is_expired());
    }

    #[test]
    fn test_huge_timeout_saturates_to_never() {
        let monitor = DeadlineMonitor::start(Some(Duration::MAX));
        assert!(!monitor.is_expired());
    }
}
