use time::OffsetDateTime;

use crate::api::ApiClient;
use crate::app::{App, View};

use super::action_queue::Action;
use super::sync::{apply_bulk, apply_operation, load_and_sync, refresh_timer_list};

pub(super) async fn run_action(action: Action, app: &mut App, client: &ApiClient) {
    match action {
        Action::Sync => {
            if let Err(e) = load_and_sync(app, client).await {
                app.set_error(format!("Could not reach ProPresenter: {}", e));
            } else {
                app.clear_error();
            }
        }
        Action::Operation { uuid, op } => {
            apply_operation(app, client, &uuid, op).await;
        }
        Action::Bulk { op } => {
            apply_bulk(app, client, op).await;
        }
        Action::SubmitForm => {
            submit_form(app, client).await;
        }
        Action::ConfirmDelete => {
            confirm_delete(app, client).await;
        }
    }
}

/// Create or edit a timer from the dialog. Validation failures stay in the
/// dialog; remote failures do too, so the typed values are not lost.
async fn submit_form(app: &mut App, client: &ApiClient) {
    let Some(form) = app.form.clone() else {
        return;
    };

    let (name, duration_seconds) = match form.parse() {
        Ok(parsed) => parsed,
        Err(message) => {
            if let Some(form) = &mut app.form {
                form.error = Some(message);
            }
            return;
        }
    };

    let result = match &form.editing_uuid {
        Some(uuid) => client
            .edit_timer(uuid, duration_seconds, &name)
            .await
            .map(|_| ()),
        None => client.create_timer(duration_seconds, &name).await.map(|_| ()),
    };

    match result {
        Ok(()) => {
            let verb = if form.editing_uuid.is_some() {
                "Updated"
            } else {
                "Created"
            };
            app.form = None;
            app.navigate_to(View::Timers);
            app.set_status(format!("{} {}", verb, name));
            app.clear_error();
            if let Err(e) = refresh_timer_list(app, client).await {
                app.set_status(format!("Warning: could not refresh timers: {}", e));
            }
        }
        Err(e) => {
            if let Some(form) = &mut app.form {
                form.error = Some(format!("Save failed: {}", e));
            }
        }
    }
}

async fn confirm_delete(app: &mut App, client: &ApiClient) {
    let Some(ctx) = app.delete_context.take() else {
        return;
    };

    match client.delete_timer(&ctx.uuid).await {
        Ok(()) => {
            // Deleting the tracked timer halts the local display.
            if app.current_uuid.as_deref() == Some(ctx.uuid.as_str()) {
                app.clock.stop(OffsetDateTime::now_utc());
                app.current_uuid = None;
            }
            app.timers.retain(|t| t.id.uuid != ctx.uuid);
            app.set_status(format!("Deleted {}", ctx.name));
            app.clear_error();
            if let Err(e) = refresh_timer_list(app, client).await {
                app.set_status(format!("Warning: could not refresh timers: {}", e));
            }
        }
        Err(e) => {
            app.set_error(format!("Delete failed: {}", e));
        }
    }

    app.navigate_to(View::Timers);
}
