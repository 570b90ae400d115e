use chrono::{DateTime, Utc};
use quiz_core::Clock;
use std::time::Duration;
use tokio::time::Instant;

/// Wall time derived from tokio's monotonic clock.
///
/// Anchored once to a core `Clock`; afterwards it only moves with `tokio::time`,
/// so paused-time tests see exact offsets.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    wall: DateTime<Utc>,
    origin: Instant,
}

impl RuntimeClock {
    #[must_use]
    pub fn anchored(clock: &Clock) -> Self {
        Self {
            wall: clock.now(),
            origin: Instant::now(),
        }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.wall + elapsed
    }

    /// Tokio instant matching a wall timestamp; past timestamps map to the anchor.
    #[must_use]
    pub fn instant_at(&self, at: DateTime<Utc>) -> Instant {
        let offset = (at - self.wall).to_std().unwrap_or(Duration::ZERO);
        self.origin + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[tokio::test(start_paused = true)]
    async fn follows_paused_tokio_time() {
        let clock = RuntimeClock::anchored(&Clock::fixed(fixed_now()));
        tokio::time::advance(Duration::from_millis(750)).await;

        assert_eq!(clock.now(), fixed_now() + chrono::Duration::milliseconds(750));
        let at = fixed_now() + chrono::Duration::milliseconds(2_000);
        assert_eq!(clock.instant_at(at) - clock.origin, Duration::from_millis(2_000));
    }
}
