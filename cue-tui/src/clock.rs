use time::OffsetDateTime;

/// Timing phase of the local clock. The variants are mutually exclusive by
/// construction: idle, counting down toward a deadline, or counting up in
/// overtime. A countdown reaching its deadline is the only automatic
/// transition (see [`LocalClock::tick`]); everything else is an explicit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Countdown { deadline: OffsetDateTime },
    Overtime { origin: OffsetDateTime },
}

/// Derived display fields, recomputed from absolute instants on every read.
/// In countdown the fields show time remaining; in overtime they count up
/// from the moment the countdown expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_seconds_remaining: i64,
    pub is_countdown_active: bool,
    pub is_overtime_active: bool,
}

/// The one local countdown/overtime clock for the session.
///
/// All timing is anchored to absolute wall-clock instants: the countdown
/// deadline and the overtime origin. Display fields are recomputed from those
/// instants on every read, never decremented, so render cadence, event-loop
/// throttling and system sleep cannot accumulate drift the way a stored
/// counter would.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    phase: Phase,
    /// Seconds shown while idle: the value frozen by the last `stop`, or the
    /// armed duration of a `reset` that was not auto-started.
    held_seconds: i64,
}

impl Default for LocalClock {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalClock {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            held_seconds: 0,
        }
    }

    /// Enter countdown mode toward `deadline`. The caller computes the
    /// deadline as `now + remaining`, so delay between fetching the remaining
    /// time and applying it cannot shift the countdown. Starting while
    /// already running restarts from the new deadline (last write wins).
    pub fn start(&mut self, deadline: OffsetDateTime) {
        self.phase = Phase::Countdown { deadline };
    }

    /// Halt ticking without discarding the displayed value. Reads after a
    /// stop return the same frozen snapshot until the clock is started or
    /// reset again. Stopping an idle clock is a no-op.
    pub fn stop(&mut self, now: OffsetDateTime) {
        match self.phase {
            Phase::Idle => {}
            Phase::Countdown { deadline } => {
                self.held_seconds = remaining_seconds(deadline, now);
                self.phase = Phase::Idle;
            }
            Phase::Overtime { origin } => {
                self.held_seconds = elapsed_seconds(origin, now);
                self.phase = Phase::Idle;
            }
        }
    }

    /// Re-arm the countdown. Any active overtime is cleared. With
    /// `auto_start` the countdown begins ticking immediately; without it the
    /// new remaining time is held frozen until the next start. Called with no
    /// deadline, this deactivates the clock entirely.
    pub fn reset(&mut self, deadline: Option<OffsetDateTime>, auto_start: bool, now: OffsetDateTime) {
        match deadline {
            Some(deadline) if auto_start => self.phase = Phase::Countdown { deadline },
            Some(deadline) => {
                self.held_seconds = remaining_seconds(deadline, now);
                self.phase = Phase::Idle;
            }
            None => {
                self.held_seconds = 0;
                self.phase = Phase::Idle;
            }
        }
    }

    /// Enter overtime directly, counting up from `origin`. Used when
    /// reconciling against a remote timer that is already overrunning, so the
    /// local stopwatch reflects the elapsed overrun instead of restarting
    /// from zero.
    pub fn enter_overtime(&mut self, origin: OffsetDateTime) {
        self.phase = Phase::Overtime { origin };
    }

    /// Expiry watcher. When a countdown's deadline has passed, switch to
    /// overtime exactly once, anchored at the deadline itself rather than at
    /// the instant the transition was observed, so no time is lost or
    /// duplicated however late the tick arrives. Returns whether the
    /// transition fired.
    pub fn tick(&mut self, now: OffsetDateTime) -> bool {
        if let Phase::Countdown { deadline } = self.phase {
            if now >= deadline {
                self.phase = Phase::Overtime { origin: deadline };
                return true;
            }
        }
        false
    }

    pub fn is_countdown_active(&self) -> bool {
        matches!(self.phase, Phase::Countdown { .. })
    }

    pub fn is_overtime_active(&self) -> bool {
        matches!(self.phase, Phase::Overtime { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn snapshot(&self, now: OffsetDateTime) -> ClockSnapshot {
        let (total, is_countdown, is_overtime) = match self.phase {
            Phase::Idle => (self.held_seconds, false, false),
            Phase::Countdown { deadline } => (remaining_seconds(deadline, now), true, false),
            Phase::Overtime { origin } => (elapsed_seconds(origin, now), false, true),
        };

        ClockSnapshot {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
            // In overtime this carries the elapsed overrun, counting up.
            total_seconds_remaining: total,
            is_countdown_active: is_countdown,
            is_overtime_active: is_overtime,
        }
    }
}

fn remaining_seconds(deadline: OffsetDateTime, now: OffsetDateTime) -> i64 {
    (deadline - now).whole_seconds().max(0)
}

fn elapsed_seconds(origin: OffsetDateTime, now: OffsetDateTime) -> i64 {
    (now - origin).whole_seconds().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn t0() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    #[test]
    fn start_shows_full_duration_immediately() {
        let mut clock = LocalClock::new();
        clock.start(t0() + secs(300));

        let snap = clock.snapshot(t0());
        assert_eq!(snap.total_seconds_remaining, 300);
        assert_eq!((snap.hours, snap.minutes, snap.seconds), (0, 5, 0));
        assert!(snap.is_countdown_active);
    }

    #[test]
    fn restart_takes_the_new_deadline() {
        let mut clock = LocalClock::new();
        clock.start(t0() + secs(300));
        clock.start(t0() + secs(600));

        assert_eq!(clock.snapshot(t0()).total_seconds_remaining, 600);
    }

    #[test]
    fn stop_freezes_the_displayed_value() {
        let mut clock = LocalClock::new();
        clock.start(t0() + secs(300));
        clock.stop(t0() + secs(60));

        let first = clock.snapshot(t0() + secs(120));
        let second = clock.snapshot(t0() + secs(500));
        assert_eq!(first.total_seconds_remaining, 240);
        assert_eq!(first, second);
        assert!(!first.is_countdown_active);
        assert!(!first.is_overtime_active);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut clock = LocalClock::new();
        clock.start(t0() + secs(300));
        clock.stop(t0() + secs(100));
        let frozen = clock.snapshot(t0() + secs(100));

        clock.stop(t0() + secs(250));
        assert_eq!(clock.snapshot(t0() + secs(250)), frozen);
    }

    #[test]
    fn stop_while_idle_is_a_noop() {
        let mut clock = LocalClock::new();
        clock.stop(t0());
        assert!(clock.is_idle());
        assert_eq!(clock.snapshot(t0()).total_seconds_remaining, 0);
    }

    #[test]
    fn expiry_transitions_exactly_once() {
        let mut clock = LocalClock::new();
        clock.start(t0() + secs(300));

        assert!(!clock.tick(t0() + secs(299)));
        assert!(clock.is_countdown_active());

        assert!(clock.tick(t0() + secs(300)));
        assert!(clock.is_overtime_active());

        assert!(!clock.tick(t0() + secs(301)));
        assert!(clock.is_overtime_active());
    }

    #[test]
    fn overtime_is_anchored_at_the_deadline_not_the_tick() {
        let mut clock = LocalClock::new();
        clock.start(t0() + secs(300));

        // Tick arrives 7 seconds late (throttled loop); no time is lost.
        assert!(clock.tick(t0() + secs(307)));
        let snap = clock.snapshot(t0() + secs(307));
        assert_eq!((snap.hours, snap.minutes, snap.seconds), (0, 0, 7));
        assert_eq!(snap.total_seconds_remaining, 7);
    }

    #[test]
    fn countdown_runs_straight_into_overtime_with_no_gap() {
        // start(now + 300s), advance 300s: overtime just began.
        let mut clock = LocalClock::new();
        clock.start(t0() + secs(300));
        clock.tick(t0() + secs(300));

        let snap = clock.snapshot(t0() + secs(300));
        assert!(snap.is_overtime_active);
        assert_eq!((snap.hours, snap.minutes, snap.seconds), (0, 0, 0));
    }

    #[test]
    fn overtime_counts_up_unbounded() {
        let mut clock = LocalClock::new();
        clock.enter_overtime(t0());

        let snap = clock.snapshot(t0() + secs(2 * 3600 + 90));
        assert_eq!((snap.hours, snap.minutes, snap.seconds), (2, 1, 30));
        assert!(snap.is_overtime_active);
    }

    #[test]
    fn countdown_and_overtime_are_never_both_active() {
        let mut clock = LocalClock::new();
        clock.start(t0() + secs(10));

        for offset in [0, 5, 9, 10, 11, 60] {
            let now = t0() + secs(offset);
            clock.tick(now);
            let snap = clock.snapshot(now);
            assert!(!(snap.is_countdown_active && snap.is_overtime_active));
        }
    }

    #[test]
    fn reset_without_deadline_clears_overtime() {
        let mut clock = LocalClock::new();
        clock.enter_overtime(t0());

        clock.reset(None, false, t0() + secs(30));
        let snap = clock.snapshot(t0() + secs(30));
        assert!(clock.is_idle());
        assert!(!snap.is_overtime_active);
        assert_eq!(snap.total_seconds_remaining, 0);
    }

    #[test]
    fn reset_without_autostart_holds_the_new_duration() {
        let mut clock = LocalClock::new();
        clock.reset(Some(t0() + secs(120)), false, t0());

        assert!(clock.is_idle());
        // Held value does not tick down.
        assert_eq!(clock.snapshot(t0() + secs(50)).total_seconds_remaining, 120);
    }

    #[test]
    fn reset_with_autostart_begins_counting() {
        let mut clock = LocalClock::new();
        clock.reset(Some(t0() + secs(120)), true, t0());

        assert!(clock.is_countdown_active());
        assert_eq!(clock.snapshot(t0() + secs(20)).total_seconds_remaining, 100);
    }
}
