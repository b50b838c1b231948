use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity block ProPresenter attaches to every timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerId {
    pub index: i64,
    pub name: String,
    pub uuid: String,
}

/// Remote-reported lifecycle state of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Stopped,
    Running,
    Complete,
    Overran,
    Overrunning,
}

impl TimerState {
    /// Whether the remote clock is advancing in this state.
    pub fn is_live(self) -> bool {
        matches!(self, TimerState::Running | TimerState::Overrunning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    /// Configured total duration in seconds.
    pub duration: i64,
}

/// A timer record as reported by the remote.
///
/// `remaining_seconds` is not a wire field: it is derived locally from the
/// reported `time` string when the current-timers snapshot is merged into the
/// full list (see `ProPresenterClient::fetch_timers`). Negative means the
/// timer has overrun by that many seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub allows_overrun: bool,
    /// Absent on timer kinds (elapsed, count-down-to-time) the panel does not
    /// operate on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countdown: Option<Countdown>,
    pub state: TimerState,
    /// Remote clock reading, `HH:MM:SS`, with a leading `-` while overrunning.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub remaining_seconds: i64,
}

impl Timer {
    pub fn duration_seconds(&self) -> Option<i64> {
        self.countdown.map(|c| c.duration)
    }
}

/// An operation the remote accepts on a single timer or on all timers at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOperation {
    Start,
    Stop,
    Reset,
}

impl TimerOperation {
    /// Path segment of the operation endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            TimerOperation::Start => "start",
            TimerOperation::Stop => "stop",
            TimerOperation::Reset => "reset",
        }
    }
}

impl fmt::Display for TimerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTimerPayload {
    pub allows_overrun: bool,
    pub countdown: Countdown,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditTimerPayload {
    pub allows_overrun: bool,
    pub countdown: Countdown,
    pub id: EditTimerId,
}

/// Only the name is writable through the edit endpoint's `id` block.
#[derive(Debug, Clone, Serialize)]
pub struct EditTimerId {
    pub name: String,
}
