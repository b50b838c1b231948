use propresenter::domain::Timer;
use time::OffsetDateTime;

use crate::clock::{ClockSnapshot, LocalClock};

mod state;
pub use state::{DeleteContext, FormField, TextInput, TimerForm, View};

/// The one application state instance for the session, constructed in `main`
/// and passed explicitly to the event loop and action handlers. Presentation
/// code reads derived fields; mutation happens only through the action
/// handlers and the clock's own API.
pub struct App {
    pub running: bool,
    pub clock: LocalClock,

    /// Last fetched timer list, in remote order.
    pub timers: Vec<Timer>,
    /// Uuid of the timer the local clock is tracking.
    pub current_uuid: Option<String>,
    /// Single-slot latch serializing remote-mutating operations. A second
    /// operation arriving while one is pending is dropped, not queued.
    pub sync_in_flight: bool,

    pub current_view: View,
    pub selected_index: usize,
    pub status_message: Option<String>,
    /// Last remote failure, shown as a banner until dismissed or until the
    /// next call succeeds.
    pub error_message: Option<String>,

    pub form: Option<TimerForm>,
    pub delete_context: Option<DeleteContext>,

    /// Where the panel is pointed, for the header ("host:port" or "dev").
    pub endpoint_label: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            clock: LocalClock::new(),
            timers: Vec::new(),
            current_uuid: None,
            sync_in_flight: false,
            current_view: View::Timers,
            selected_index: 0,
            status_message: None,
            error_message: None,
            form: None,
            delete_context: None,
            endpoint_label: String::new(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Replace the timer list with a fresh fetch, keeping selection and the
    /// tracked uuid consistent with what still exists.
    pub fn update_timers(&mut self, timers: Vec<Timer>) {
        self.timers = timers;
        if !self.timers.is_empty() && self.selected_index >= self.timers.len() {
            self.selected_index = self.timers.len() - 1;
        }
        if let Some(uuid) = &self.current_uuid {
            if !self.timers.iter().any(|t| &t.id.uuid == uuid) {
                self.current_uuid = None;
            }
        }
    }

    pub fn selected_timer(&self) -> Option<&Timer> {
        self.timers.get(self.selected_index)
    }

    pub fn current_timer(&self) -> Option<&Timer> {
        let uuid = self.current_uuid.as_ref()?;
        self.timers.iter().find(|t| &t.id.uuid == uuid)
    }

    pub fn select_next(&mut self) {
        if !self.timers.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.timers.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.timers.is_empty() {
            self.selected_index = if self.selected_index == 0 {
                self.timers.len() - 1
            } else {
                self.selected_index - 1
            };
        }
    }

    pub fn navigate_to(&mut self, view: View) {
        self.current_view = view;
        self.clear_status();
    }

    pub fn enter_create_form(&mut self) {
        self.form = Some(TimerForm::create());
        self.navigate_to(View::EditTimer);
    }

    /// Open the edit dialog for the selected timer. Timers without a
    /// countdown configuration are not editable from the panel.
    pub fn enter_edit_form(&mut self) {
        let Some(timer) = self.selected_timer() else {
            return;
        };
        if timer.countdown.is_none() {
            self.set_status("Timer config not supported".to_string());
            return;
        }
        self.form = Some(TimerForm::edit(timer));
        self.navigate_to(View::EditTimer);
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.navigate_to(View::Timers);
    }

    pub fn enter_delete_confirm(&mut self) {
        let Some(timer) = self.selected_timer() else {
            return;
        };
        self.delete_context = Some(DeleteContext {
            uuid: timer.id.uuid.clone(),
            name: timer.id.name.clone(),
        });
        self.navigate_to(View::ConfirmDelete);
    }

    pub fn cancel_delete_confirm(&mut self) {
        self.delete_context = None;
        self.navigate_to(View::Timers);
    }

    /// Fresh derived display fields for the current instant.
    pub fn clock_snapshot(&self) -> ClockSnapshot {
        self.clock.snapshot(OffsetDateTime::now_utc())
    }

    /// Presentation threshold: the last fifth of the tracked timer's
    /// configured duration counts as injury time.
    pub fn is_injury_time(&self, snapshot: &ClockSnapshot) -> bool {
        if !snapshot.is_countdown_active {
            return false;
        }
        match self.current_timer().and_then(|t| t.duration_seconds()) {
            Some(duration) if duration > 0 => snapshot.total_seconds_remaining * 5 < duration,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propresenter::domain::{Countdown, TimerId, TimerState};
    use time::Duration;

    fn timer(uuid: &str, duration: i64) -> Timer {
        Timer {
            id: TimerId {
                index: 0,
                name: format!("timer-{}", uuid),
                uuid: uuid.to_string(),
            },
            allows_overrun: true,
            countdown: Some(Countdown { duration }),
            state: TimerState::Stopped,
            time: String::new(),
            remaining_seconds: duration,
        }
    }

    #[test]
    fn update_timers_drops_vanished_tracked_uuid() {
        let mut app = App::new();
        app.update_timers(vec![timer("a", 300), timer("b", 600)]);
        app.current_uuid = Some("a".to_string());

        app.update_timers(vec![timer("b", 600)]);
        assert_eq!(app.current_uuid, None);
    }

    #[test]
    fn update_timers_clamps_selection() {
        let mut app = App::new();
        app.update_timers(vec![timer("a", 300), timer("b", 600)]);
        app.selected_index = 1;

        app.update_timers(vec![timer("a", 300)]);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn injury_time_kicks_in_below_a_fifth_of_duration() {
        let mut app = App::new();
        app.update_timers(vec![timer("a", 300)]);
        app.current_uuid = Some("a".to_string());

        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        app.clock.start(now + Duration::seconds(300));

        assert!(!app.is_injury_time(&app.clock.snapshot(now + Duration::seconds(200))));
        assert!(app.is_injury_time(&app.clock.snapshot(now + Duration::seconds(250))));
    }
}
