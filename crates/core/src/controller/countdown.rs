use chrono::{DateTime, Duration, Utc};

use crate::time::millis_between;

/// Countdown for a single pending prompt.
///
/// Dropped when the prompt resolves, so it never ticks past resolution.
#[derive(Debug, Clone)]
pub(crate) struct Countdown {
    started_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
    limit_ms: u32,
    tick_ms: i64,
    next_tick_at: DateTime<Utc>,
    last_remaining_ms: u32,
}

impl Countdown {
    pub(crate) fn start(started_at: DateTime<Utc>, limit_ms: u32, tick: Duration) -> Self {
        let tick_ms = tick.num_milliseconds().max(1);
        Self {
            started_at,
            deadline: started_at + Duration::milliseconds(i64::from(limit_ms)),
            limit_ms,
            tick_ms,
            next_tick_at: started_at + Duration::milliseconds(tick_ms),
            last_remaining_ms: limit_ms,
        }
    }

    pub(crate) fn limit_ms(&self) -> u32 {
        self.limit_ms
    }

    pub(crate) fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub(crate) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    pub(crate) fn remaining_ms(&self, now: DateTime<Utc>) -> u32 {
        self.limit_ms
            .saturating_sub(millis_between(self.started_at, now))
    }

    /// Remaining time if a tick boundary has been crossed since the last tick.
    ///
    /// Boundaries missed by a late poll collapse into one tick. Values strictly
    /// decrease and never reach zero; zero is reported as expiry instead.
    pub(crate) fn take_tick(&mut self, now: DateTime<Utc>) -> Option<u32> {
        if now < self.next_tick_at || self.is_expired(now) {
            return None;
        }
        let elapsed = (now - self.started_at).num_milliseconds().max(0);
        let crossed = elapsed / self.tick_ms;
        self.next_tick_at =
            self.started_at + Duration::milliseconds(self.tick_ms * (crossed + 1));

        let remaining = self.remaining_ms(now);
        if remaining == 0 || remaining >= self.last_remaining_ms {
            return None;
        }
        self.last_remaining_ms = remaining;
        Some(remaining)
    }

    /// Next instant the owner has to poll: a tick boundary or the deadline.
    pub(crate) fn next_wakeup(&self) -> DateTime<Utc> {
        self.next_tick_at.min(self.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn ms(value: i64) -> Duration {
        Duration::milliseconds(value)
    }

    #[test]
    fn ticks_on_each_boundary() {
        let start = fixed_now();
        let mut countdown = Countdown::start(start, 1_000, ms(100));

        assert_eq!(countdown.take_tick(start + ms(50)), None);
        assert_eq!(countdown.take_tick(start + ms(100)), Some(900));
        assert_eq!(countdown.take_tick(start + ms(150)), None);
        assert_eq!(countdown.take_tick(start + ms(200)), Some(800));
        assert_eq!(countdown.next_wakeup(), start + ms(300));
    }

    #[test]
    fn late_poll_coalesces_ticks() {
        let start = fixed_now();
        let mut countdown = Countdown::start(start, 1_000, ms(100));

        assert_eq!(countdown.take_tick(start + ms(450)), Some(550));
        assert_eq!(countdown.next_wakeup(), start + ms(500));
    }

    #[test]
    fn no_tick_at_deadline() {
        let start = fixed_now();
        let mut countdown = Countdown::start(start, 300, ms(100));

        assert_eq!(countdown.take_tick(start + ms(300)), None);
        assert!(countdown.is_expired(start + ms(300)));
        assert_eq!(countdown.remaining_ms(start + ms(400)), 0);
    }

    #[test]
    fn wakeup_never_passes_deadline() {
        let start = fixed_now();
        let countdown = Countdown::start(start, 50, ms(100));
        assert_eq!(countdown.next_wakeup(), start + ms(50));
        assert_eq!(countdown.deadline(), start + ms(50));
    }
}
