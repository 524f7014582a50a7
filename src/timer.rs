use std::time::Duration;

/// Identity of one scheduling of a [`OneShotTimer`].
///
/// Every call to [`OneShotTimer::schedule`] produces a fresh token, so a
/// holder can tell whether the deadline it is looking at is still the one it
/// asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Fire-once timer polled from the host loop.
///
/// Time is expressed as the duration elapsed since an arbitrary origin
/// chosen by the caller (usually application start), which keeps the timer
/// deterministic under test.
#[derive(Debug, Default)]
pub struct OneShotTimer {
    generation: u64,
    deadline: Option<Duration>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to fire `delay` after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Duration, delay: Duration) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        self.deadline = Some(now.saturating_add(delay));
        TimerToken(self.generation)
    }

    /// Disarms the timer. A token issued before the call never fires.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns the token of the current scheduling once its deadline has
    /// passed. The timer is disarmed afterwards.
    pub fn poll(&mut self, now: Duration) -> Option<TimerToken> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(TimerToken(self.generation))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn fires_once_after_deadline() {
        let mut timer = OneShotTimer::new();
        let token = timer.schedule(ms(100), ms(50));
        assert_eq!(timer.poll(ms(149)), None);
        assert_eq!(timer.poll(ms(150)), Some(token));
        assert_eq!(timer.poll(ms(500)), None);
        assert!(!timer.is_pending());
    }

    #[test]
    fn rescheduling_replaces_the_deadline() {
        let mut timer = OneShotTimer::new();
        let first = timer.schedule(ms(0), ms(100));
        let second = timer.schedule(ms(60), ms(100));
        assert_ne!(first, second);
        assert_eq!(timer.poll(ms(100)), None);
        assert_eq!(timer.poll(ms(160)), Some(second));
    }

    #[test]
    fn cancel_suppresses_pending_fire() {
        let mut timer = OneShotTimer::new();
        timer.schedule(ms(0), ms(10));
        timer.cancel();
        assert_eq!(timer.poll(ms(1_000)), None);
    }
}
