use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        TickHandle(id)
    }
}

/// Periodic tick source. At most one timer is live; scheduling a new one
/// replaces whatever was pending.
pub trait TickScheduler {
    fn schedule(&mut self, interval: Duration) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
    /// Returns the live handle if its tick is due at `now`.
    fn poll(&mut self, now: Instant) -> Option<TickHandle>;
}

struct ActiveTimer {
    handle: TickHandle,
    interval: Duration,
    next_due: Instant,
}

/// Wall-clock scheduler driven by the app loop.
pub struct IntervalTimer {
    next_id: u64,
    active: Option<ActiveTimer>,
}

impl Default for IntervalTimer {
    fn default() -> Self {
        IntervalTimer::new()
    }
}

impl IntervalTimer {
    pub fn new() -> Self {
        IntervalTimer { next_id: 0, active: None }
    }
}

impl TickScheduler for IntervalTimer {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        let next_due = Instant::now() + interval;
        self.active = Some(ActiveTimer { handle, interval, next_due });
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if matches!(&self.active, Some(timer) if timer.handle == handle) {
            self.active = None;
        }
    }

    fn poll(&mut self, now: Instant) -> Option<TickHandle> {
        let timer = self.active.as_mut()?;
        if now < timer.next_due {
            return None;
        }

        // One tick per poll; a stalled loop does not get a burst of catch-up ticks
        timer.next_due += timer.interval;
        if timer.next_due < now {
            timer.next_due = now + timer.interval;
        }

        Some(timer.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_fires_once_per_interval() {
        let mut timer = IntervalTimer::new();
        let start = Instant::now();
        let handle = timer.schedule(Duration::from_millis(150));

        assert_eq!(timer.poll(start), None);
        let due = start + Duration::from_millis(200);
        assert_eq!(timer.poll(due), Some(handle));
        assert_eq!(timer.poll(due), None);
    }

    #[test]
    fn test_schedule_replaces_previous_timer() {
        let mut timer = IntervalTimer::new();
        let old = timer.schedule(Duration::from_millis(150));
        let new = timer.schedule(Duration::from_millis(145));
        assert_ne!(old, new);

        let later = Instant::now() + Duration::from_secs(1);
        assert_eq!(timer.poll(later), Some(new));

        // Cancelling the replaced handle must not stop the new one
        timer.cancel(old);
        assert_eq!(timer.poll(later + Duration::from_secs(1)), Some(new));
    }

    #[test]
    fn test_cancel_stops_future_ticks() {
        let mut timer = IntervalTimer::new();
        let handle = timer.schedule(Duration::from_millis(50));
        timer.cancel(handle);

        assert_eq!(timer.poll(Instant::now() + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_stalled_loop_does_not_burst() {
        let mut timer = IntervalTimer::new();
        let handle = timer.schedule(Duration::from_millis(50));
        let late = Instant::now() + Duration::from_secs(2);

        assert_eq!(timer.poll(late), Some(handle));
        assert_eq!(timer.poll(late), None);
    }
}
