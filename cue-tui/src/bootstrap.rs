use crate::api::ApiClient;
use crate::app::App;
use crate::runtime::load_and_sync;

/// Initial reconciliation. A timer left running by a previous session, or
/// started from another control surface, is resumed mid-count rather than
/// restarted; a dead remote shows up as the error banner, not a crash.
pub async fn initialize_app_state(app: &mut App, client: &ApiClient) {
    match load_and_sync(app, client).await {
        Ok(()) => {
            if app.clock.is_countdown_active() || app.clock.is_overtime_active() {
                app.set_status("Resumed live timer from ProPresenter".to_string());
            }
        }
        Err(e) => {
            app.set_error(format!("Could not reach ProPresenter: {}", e));
        }
    }
}
