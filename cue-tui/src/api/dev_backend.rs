use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{bail, Result};
use propresenter::domain::{
    format_clock_time, Countdown, Timer, TimerId, TimerOperation, TimerState,
};

/// In-memory stand-in for a ProPresenter host. Backs `cue-tui dev` and the
/// reconciler tests: remote state transitions are emulated, every operation
/// call is counted so the in-flight guard can be asserted, and failures can
/// be injected to exercise the error paths.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevState>>,
}

#[derive(Debug)]
struct DevState {
    timers: Vec<Timer>,
    operation_calls: usize,
    failing: bool,
    next_index: i64,
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DevBackend {
    pub fn new() -> Self {
        let timers = seed_timers();
        let next_index = timers.len() as i64;
        Self {
            store: Arc::new(Mutex::new(DevState {
                timers,
                operation_calls: 0,
                failing: false,
                next_index,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DevState> {
        self.store.lock().expect("dev store lock poisoned")
    }

    pub fn timers(&self) -> Result<Vec<Timer>> {
        let state = self.lock();
        if state.failing {
            bail!("simulated ProPresenter failure");
        }
        Ok(state.timers.clone())
    }

    pub fn apply_operation(&self, uuid: &str, op: TimerOperation) -> Result<()> {
        let mut state = self.lock();
        if state.failing {
            bail!("simulated ProPresenter failure");
        }
        state.operation_calls += 1;
        if let Some(timer) = state.timers.iter_mut().find(|t| t.id.uuid == uuid) {
            transition(timer, op);
        }
        Ok(())
    }

    pub fn apply_bulk_operation(&self, op: TimerOperation) -> Result<()> {
        let mut state = self.lock();
        if state.failing {
            bail!("simulated ProPresenter failure");
        }
        state.operation_calls += 1;
        for timer in &mut state.timers {
            transition(timer, op);
        }
        Ok(())
    }

    pub fn create_timer(&self, duration_seconds: i64, name: &str) -> Result<Timer> {
        let mut state = self.lock();
        if state.failing {
            bail!("simulated ProPresenter failure");
        }
        let index = state.next_index;
        state.next_index += 1;
        let timer = Timer {
            id: TimerId {
                index,
                name: name.to_string(),
                uuid: format!("dev-timer-{}", index + 1),
            },
            allows_overrun: true,
            countdown: Some(Countdown {
                duration: duration_seconds,
            }),
            state: TimerState::Stopped,
            time: format_clock_time(duration_seconds),
            remaining_seconds: duration_seconds,
        };
        state.timers.push(timer.clone());
        Ok(timer)
    }

    pub fn edit_timer(&self, uuid: &str, duration_seconds: i64, name: &str) -> Result<Timer> {
        let mut state = self.lock();
        if state.failing {
            bail!("simulated ProPresenter failure");
        }
        let timer = state
            .timers
            .iter_mut()
            .find(|t| t.id.uuid == uuid)
            .ok_or_else(|| anyhow::anyhow!("no such timer: {}", uuid))?;
        timer.id.name = name.to_string();
        timer.countdown = Some(Countdown {
            duration: duration_seconds,
        });
        if timer.state == TimerState::Stopped {
            timer.remaining_seconds = duration_seconds;
            timer.time = format_clock_time(duration_seconds);
        }
        Ok(timer.clone())
    }

    pub fn delete_timer(&self, uuid: &str) -> Result<()> {
        let mut state = self.lock();
        if state.failing {
            bail!("simulated ProPresenter failure");
        }
        state.timers.retain(|t| t.id.uuid != uuid);
        Ok(())
    }

    /// Number of operation-endpoint calls observed (single and bulk).
    pub fn operation_calls(&self) -> usize {
        self.lock().operation_calls
    }

    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Force a timer into a given remote state, as if another control
    /// surface changed it behind the panel's back.
    pub fn set_remote_state(&self, uuid: &str, state: TimerState, remaining_seconds: i64) {
        let mut store = self.lock();
        if let Some(timer) = store.timers.iter_mut().find(|t| t.id.uuid == uuid) {
            timer.state = state;
            timer.remaining_seconds = remaining_seconds;
            timer.time = format_clock_time(remaining_seconds);
        }
    }
}

/// Remote-state emulation for a single operation.
fn transition(timer: &mut Timer, op: TimerOperation) {
    let duration = timer.duration_seconds().unwrap_or(0);
    match op {
        TimerOperation::Start => {
            timer.state = TimerState::Running;
            if timer.remaining_seconds <= 0 {
                timer.remaining_seconds = duration;
            }
        }
        TimerOperation::Stop => {
            timer.state = TimerState::Stopped;
        }
        TimerOperation::Reset => {
            timer.state = TimerState::Stopped;
            timer.remaining_seconds = duration;
        }
    }
    timer.time = format_clock_time(timer.remaining_seconds);
}

fn seed_timers() -> Vec<Timer> {
    let seed = |index: i64, name: &str, duration: Option<i64>| Timer {
        id: TimerId {
            index,
            name: name.to_string(),
            uuid: format!("dev-timer-{}", index + 1),
        },
        allows_overrun: true,
        countdown: duration.map(|duration| Countdown { duration }),
        state: TimerState::Stopped,
        time: format_clock_time(duration.unwrap_or(0)),
        remaining_seconds: duration.unwrap_or(0),
    };

    vec![
        seed(0, "Pre-service countdown", Some(600)),
        seed(1, "Sermon", Some(1800)),
        seed(2, "Q&A", Some(900)),
        // A timer kind the panel cannot operate on.
        seed(3, "Walk-in loop", None),
    ]
}
