use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use propresenter::domain::TimerOperation;

use crate::app::{App, FormField, View};

use super::action_queue::{Action, ActionTx};

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match app.current_view {
        View::Timers => handle_timers_key(key, app, action_tx),
        View::EditTimer => handle_form_key(key, app, action_tx),
        View::ConfirmDelete => handle_delete_key(key, app, action_tx),
        View::Watch => handle_watch_key(key, app),
    }
}

fn handle_timers_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Enter | KeyCode::Char('s') => {
            enqueue_operation(app, action_tx, TimerOperation::Start);
        }
        KeyCode::Char('x') => {
            enqueue_operation(app, action_tx, TimerOperation::Stop);
        }
        KeyCode::Char('r') => {
            enqueue_operation(app, action_tx, TimerOperation::Reset);
        }
        KeyCode::Char('R') => {
            enqueue_action(
                action_tx,
                Action::Bulk {
                    op: TimerOperation::Reset,
                },
            );
        }
        KeyCode::Char('n') | KeyCode::Char('N') => app.enter_create_form(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.enter_edit_form(),
        KeyCode::Char('d') | KeyCode::Delete => app.enter_delete_confirm(),
        KeyCode::Char('f') | KeyCode::Char('F') => app.navigate_to(View::Watch),
        KeyCode::Char('g') => enqueue_action(action_tx, Action::Sync),
        KeyCode::Esc => app.clear_error(),
        _ => {}
    }
}

fn enqueue_operation(app: &App, action_tx: &ActionTx, op: TimerOperation) {
    if let Some(timer) = app.selected_timer() {
        enqueue_action(
            action_tx,
            Action::Operation {
                uuid: timer.id.uuid.clone(),
                op,
            },
        );
    }
}

fn handle_form_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.form.is_none() {
        app.navigate_to(View::Timers);
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.cancel_form();
            return;
        }
        KeyCode::Enter => {
            enqueue_action(action_tx, Action::SubmitForm);
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return;
        }
        _ => {}
    }

    let Some(form) = app.form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => form.next_field(),
        KeyCode::Backspace => form.focused_input_mut().backspace(),
        KeyCode::Left => form.focused_input_mut().move_left(),
        KeyCode::Right => form.focused_input_mut().move_right(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.focused_input_mut().clear();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            // The duration field only takes digits.
            if form.focused_field == FormField::Minutes && !c.is_ascii_digit() {
                return;
            }
            form.focused_input_mut().insert(c);
        }
        _ => {}
    }
}

fn handle_delete_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            enqueue_action(action_tx, Action::ConfirmDelete);
        }
        KeyCode::Char('n') | KeyCode::Esc => app.cancel_delete_confirm(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        _ => {}
    }
}

fn handle_watch_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Char('q') => {
            app.navigate_to(View::Timers);
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        _ => {}
    }
}
