use anyhow::Result;
use propresenter::domain::{Timer, TimerOperation, TimerState};
use time::{Duration, OffsetDateTime};

use crate::api::ApiClient;
use crate::app::App;

/// Fetch the authoritative timer list and drive the local clock into the
/// matching mode. Runs at session start and whenever an out-of-band change
/// may have happened; finding a timer started from another control surface
/// is expected, not an error. A fetch failure propagates with the clock
/// untouched.
pub(crate) async fn load_and_sync(app: &mut App, client: &ApiClient) -> Result<()> {
    let timers = client.fetch_timers().await?;
    tracing::debug!(count = timers.len(), "reconciling remote timer list");
    apply_remote_state(app, timers, OffsetDateTime::now_utc());
    Ok(())
}

/// Application step of [`load_and_sync`], separated from the fetch so it can
/// run against a simulated instant.
pub(crate) fn apply_remote_state(app: &mut App, timers: Vec<Timer>, now: OffsetDateTime) {
    let live = timers.iter().find(|t| t.state.is_live()).cloned();
    app.update_timers(timers);

    let Some(timer) = live else {
        // No live remote timer: the local clock keeps whatever state the
        // user's own actions put it in.
        return;
    };

    match timer.state {
        TimerState::Running => {
            // Deadline is anchored to `now` here, so delay between the fetch
            // and this call cannot shift the countdown.
            let remaining = timer.remaining_seconds.max(0);
            app.clock.start(now + Duration::seconds(remaining));
        }
        TimerState::Overrunning => {
            // Back-date the origin so the stopwatch already reads the
            // elapsed overrun instead of restarting from zero.
            let elapsed = timer.remaining_seconds.unsigned_abs() as i64;
            app.clock.enter_overtime(now - Duration::seconds(elapsed));
        }
        _ => {}
    }
    app.current_uuid = Some(timer.id.uuid);
}

/// Refresh the displayed list without re-deriving the clock mode; the mode
/// transition for a user action has already been applied locally.
pub(super) async fn refresh_timer_list(app: &mut App, client: &ApiClient) -> Result<()> {
    let timers = client.fetch_timers().await?;
    app.update_timers(timers);
    Ok(())
}

/// Single entry point for user-triggered start/stop/reset on one timer.
/// The remote call happens before any local transition, so a failure leaves
/// the clock exactly as it was.
pub(super) async fn apply_operation(app: &mut App, client: &ApiClient, uuid: &str, op: TimerOperation) {
    let Some(timer) = app.timers.iter().find(|t| t.id.uuid == uuid).cloned() else {
        return;
    };
    let Some(duration) = timer.duration_seconds() else {
        // Unsupported timer kind; nothing to operate on.
        return;
    };

    // Redundant actions are dropped before any network traffic: starting a
    // countdown that is already running, or stopping an idle clock, would
    // duplicate both the remote call and the local transition.
    match op {
        TimerOperation::Start if app.clock.is_countdown_active() => return,
        TimerOperation::Stop if app.clock.is_idle() => return,
        _ => {}
    }

    // Single-slot latch: a second operation while one is pending is dropped,
    // not queued.
    if app.sync_in_flight {
        tracing::debug!(uuid = %timer.id.uuid, %op, "operation dropped, another is in flight");
        return;
    }
    app.sync_in_flight = true;

    match client.perform_operation(&timer.id.uuid, op).await {
        Ok(()) => {
            apply_local_transition(app, &timer, duration, op, OffsetDateTime::now_utc());
            app.clear_error();
            if let Err(e) = refresh_timer_list(app, client).await {
                app.set_status(format!("Warning: could not refresh timers: {}", e));
            }
        }
        Err(e) => {
            tracing::warn!(uuid = %timer.id.uuid, %op, error = %e, "timer operation failed");
            app.set_error(format!("Could not {} timer: {}", op, e));
        }
    }

    app.sync_in_flight = false;
}

/// Local clock transition once the remote has accepted the operation. Any
/// active overtime display is cleared first so switching timers never shows
/// a stale overrun.
fn apply_local_transition(
    app: &mut App,
    timer: &Timer,
    duration: i64,
    op: TimerOperation,
    now: OffsetDateTime,
) {
    if app.clock.is_overtime_active() {
        app.clock.reset(None, false, now);
    }

    match op {
        TimerOperation::Start => {
            let remaining = if timer.remaining_seconds > 0 {
                timer.remaining_seconds
            } else {
                duration
            };
            app.clock.start(now + Duration::seconds(remaining));
            app.current_uuid = Some(timer.id.uuid.clone());
            app.set_status(format!("Started {}", timer.id.name));
        }
        TimerOperation::Stop => {
            app.clock.stop(now);
            app.set_status(format!("Stopped {}", timer.id.name));
        }
        TimerOperation::Reset => {
            // Re-arm the full duration but leave the clock idle until the
            // next start.
            app.clock
                .reset(Some(now + Duration::seconds(duration)), false, now);
            app.current_uuid = None;
            app.set_status(format!("Reset {}", timer.id.name));
        }
    }
}

/// Apply one operation to every remote timer, then clear the local clock and
/// re-sync from scratch. Shares the in-flight latch with [`apply_operation`].
pub(super) async fn apply_bulk(app: &mut App, client: &ApiClient, op: TimerOperation) {
    if app.sync_in_flight {
        return;
    }
    app.sync_in_flight = true;

    match client.perform_bulk_operation(op).await {
        Ok(()) => {
            app.clock.reset(None, false, OffsetDateTime::now_utc());
            app.current_uuid = None;
            app.clear_error();
            app.set_status(format!("Applied {} to all timers", op));
            if let Err(e) = load_and_sync(app, client).await {
                app.set_status(format!("Warning: could not re-sync timers: {}", e));
            }
        }
        Err(e) => {
            app.set_error(format!("Could not {} all timers: {}", op, e));
        }
    }

    app.sync_in_flight = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use propresenter::domain::{Countdown, TimerId};

    const PRE_SERVICE: &str = "dev-timer-1";
    const SERMON: &str = "dev-timer-2";

    fn dev_setup() -> (App, ApiClient) {
        (App::new(), ApiClient::dev())
    }

    fn remote_timer(uuid: &str, state: TimerState, remaining_seconds: i64) -> Timer {
        Timer {
            id: TimerId {
                index: 0,
                name: uuid.to_string(),
                uuid: uuid.to_string(),
            },
            allows_overrun: true,
            countdown: Some(Countdown { duration: 300 }),
            state,
            time: String::new(),
            remaining_seconds,
        }
    }

    fn elapsed_seconds(app: &App) -> i64 {
        let snap = app.clock_snapshot();
        snap.hours * 3600 + snap.minutes * 60 + snap.seconds
    }

    fn operation_calls(client: &ApiClient) -> usize {
        client.dev_backend().unwrap().operation_calls()
    }

    #[test]
    fn running_reconciliation_anchors_the_deadline_at_now() {
        let mut app = App::new();
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();

        apply_remote_state(
            &mut app,
            vec![remote_timer("a", TimerState::Running, 300)],
            now,
        );

        assert!(app.clock.is_countdown_active());
        assert_eq!(app.clock.snapshot(now).total_seconds_remaining, 300);
    }

    #[test]
    fn overrun_reconciliation_backdates_the_origin_exactly() {
        let mut app = App::new();
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();

        // Remote reads -45s: the local stopwatch must already show 45s of
        // overrun, not restart at zero.
        apply_remote_state(
            &mut app,
            vec![remote_timer("a", TimerState::Overrunning, -45)],
            now,
        );

        let snap = app.clock.snapshot(now);
        assert!(snap.is_overtime_active);
        assert_eq!(snap.total_seconds_remaining, 45);
        assert_eq!((snap.hours, snap.minutes, snap.seconds), (0, 0, 45));
    }

    #[tokio::test]
    async fn sync_with_nothing_live_leaves_clock_idle() {
        let (mut app, client) = dev_setup();

        load_and_sync(&mut app, &client).await.unwrap();

        assert!(app.clock.is_idle());
        assert_eq!(app.current_uuid, None);
        assert_eq!(app.timers.len(), 4);
    }

    #[tokio::test]
    async fn sync_resumes_a_running_remote_timer() {
        let (mut app, client) = dev_setup();
        client
            .dev_backend()
            .unwrap()
            .set_remote_state(SERMON, TimerState::Running, 300);

        load_and_sync(&mut app, &client).await.unwrap();

        assert!(app.clock.is_countdown_active());
        assert_eq!(app.current_uuid.as_deref(), Some(SERMON));
        let remaining = app.clock_snapshot().total_seconds_remaining;
        assert!((299..=300).contains(&remaining), "remaining = {}", remaining);
    }

    #[tokio::test]
    async fn sync_resumes_an_overrunning_timer_at_its_elapsed_overrun() {
        let (mut app, client) = dev_setup();
        client
            .dev_backend()
            .unwrap()
            .set_remote_state(SERMON, TimerState::Overrunning, -45);

        load_and_sync(&mut app, &client).await.unwrap();

        assert!(app.clock.is_overtime_active());
        let elapsed = elapsed_seconds(&app);
        assert!((45..=46).contains(&elapsed), "elapsed = {}", elapsed);
    }

    #[tokio::test]
    async fn start_enters_countdown_and_tracks_the_timer() {
        let (mut app, client) = dev_setup();
        load_and_sync(&mut app, &client).await.unwrap();

        apply_operation(&mut app, &client, PRE_SERVICE, TimerOperation::Start).await;

        assert!(app.clock.is_countdown_active());
        assert_eq!(app.current_uuid.as_deref(), Some(PRE_SERVICE));
        assert_eq!(operation_calls(&client), 1);
        let remaining = app.clock_snapshot().total_seconds_remaining;
        assert!((599..=600).contains(&remaining), "remaining = {}", remaining);
    }

    #[tokio::test]
    async fn second_operation_while_one_is_pending_is_dropped() {
        let (mut app, client) = dev_setup();
        load_and_sync(&mut app, &client).await.unwrap();

        // Simulate an operation still awaiting its remote response.
        app.sync_in_flight = true;
        apply_operation(&mut app, &client, PRE_SERVICE, TimerOperation::Start).await;

        assert_eq!(operation_calls(&client), 0);
        assert!(app.clock.is_idle());
        // The pending operation still owns the latch.
        assert!(app.sync_in_flight);
    }

    #[tokio::test]
    async fn redundant_start_makes_no_remote_call() {
        let (mut app, client) = dev_setup();
        load_and_sync(&mut app, &client).await.unwrap();

        apply_operation(&mut app, &client, PRE_SERVICE, TimerOperation::Start).await;
        assert_eq!(operation_calls(&client), 1);

        // Already counting down: a second start is a silent no-op.
        apply_operation(&mut app, &client, SERMON, TimerOperation::Start).await;
        assert_eq!(operation_calls(&client), 1);
        assert_eq!(app.current_uuid.as_deref(), Some(PRE_SERVICE));
    }

    #[tokio::test]
    async fn redundant_stop_makes_no_remote_call() {
        let (mut app, client) = dev_setup();
        load_and_sync(&mut app, &client).await.unwrap();

        apply_operation(&mut app, &client, PRE_SERVICE, TimerOperation::Stop).await;

        assert_eq!(operation_calls(&client), 0);
    }

    #[tokio::test]
    async fn failed_remote_call_leaves_clock_untouched_and_releases_latch() {
        let (mut app, client) = dev_setup();
        load_and_sync(&mut app, &client).await.unwrap();
        client.dev_backend().unwrap().set_failing(true);

        apply_operation(&mut app, &client, PRE_SERVICE, TimerOperation::Start).await;

        assert!(app.clock.is_idle());
        assert_eq!(app.current_uuid, None);
        assert!(app.error_message.is_some());
        assert!(!app.sync_in_flight);

        // The released latch allows an explicit retry.
        client.dev_backend().unwrap().set_failing(false);
        apply_operation(&mut app, &client, PRE_SERVICE, TimerOperation::Start).await;
        assert!(app.clock.is_countdown_active());
    }

    #[tokio::test]
    async fn starting_another_timer_clears_active_overtime() {
        let (mut app, client) = dev_setup();
        load_and_sync(&mut app, &client).await.unwrap();
        app.clock.enter_overtime(OffsetDateTime::now_utc() - Duration::seconds(90));
        app.current_uuid = Some(SERMON.to_string());

        apply_operation(&mut app, &client, PRE_SERVICE, TimerOperation::Start).await;

        let snap = app.clock_snapshot();
        assert!(snap.is_countdown_active);
        assert!(!snap.is_overtime_active);
        assert_eq!(app.current_uuid.as_deref(), Some(PRE_SERVICE));
    }

    #[tokio::test]
    async fn stop_during_overtime_clears_the_overrun_display() {
        let (mut app, client) = dev_setup();
        load_and_sync(&mut app, &client).await.unwrap();
        app.clock.enter_overtime(OffsetDateTime::now_utc() - Duration::seconds(30));

        apply_operation(&mut app, &client, SERMON, TimerOperation::Stop).await;

        let snap = app.clock_snapshot();
        assert!(!snap.is_overtime_active);
        assert!(!snap.is_countdown_active);
        assert_eq!(elapsed_seconds(&app), 0);
    }

    #[tokio::test]
    async fn reset_rearms_the_full_duration_without_ticking() {
        let (mut app, client) = dev_setup();
        load_and_sync(&mut app, &client).await.unwrap();
        apply_operation(&mut app, &client, SERMON, TimerOperation::Start).await;

        apply_operation(&mut app, &client, SERMON, TimerOperation::Reset).await;

        assert!(app.clock.is_idle());
        assert_eq!(app.current_uuid, None);
        assert_eq!(app.clock_snapshot().total_seconds_remaining, 1800);
    }

    #[tokio::test]
    async fn bulk_reset_clears_everything_and_resyncs() {
        let (mut app, client) = dev_setup();
        client
            .dev_backend()
            .unwrap()
            .set_remote_state(SERMON, TimerState::Running, 300);
        load_and_sync(&mut app, &client).await.unwrap();
        assert!(app.clock.is_countdown_active());

        apply_bulk(&mut app, &client, TimerOperation::Reset).await;

        assert!(app.clock.is_idle());
        assert_eq!(app.current_uuid, None);
        assert_eq!(app.clock_snapshot().total_seconds_remaining, 0);
        assert_eq!(operation_calls(&client), 1);
        assert!(!app.sync_in_flight);
    }

    #[tokio::test]
    async fn operations_on_unsupported_timer_kinds_are_ignored() {
        let (mut app, client) = dev_setup();
        load_and_sync(&mut app, &client).await.unwrap();

        // "Walk-in loop" carries no countdown configuration.
        apply_operation(&mut app, &client, "dev-timer-4", TimerOperation::Start).await;

        assert!(app.clock.is_idle());
        assert_eq!(operation_calls(&client), 0);
    }
}
