use std::time::{Duration, Instant};

/// Oracle for how much of the current turn is left.
pub trait TimeRemaining {
    fn time_left(&self) -> Duration;
}

impl<F> TimeRemaining for F where F: Fn() -> Duration {
    fn time_left(&self) -> Duration {
        self()
    }
}

/// Wall-clock deadline for a single move decision.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    end: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self { end: Instant::now() + budget }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.end
    }
}

impl TimeRemaining for Deadline {
    fn time_left(&self) -> Duration {
        self.end.saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_counts_down_to_zero() {
        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(deadline.time_left() > Duration::from_secs(59));
        assert!(!deadline.is_expired());

        let expired = Deadline::after(Duration::ZERO);
        assert_eq!(expired.time_left(), Duration::ZERO);
        assert!(expired.is_expired());
    }

    #[test]
    fn closures_act_as_oracles() {
        let fixed = || Duration::from_millis(25);
        assert_eq!(fixed.time_left(), Duration::from_millis(25));
    }
}
