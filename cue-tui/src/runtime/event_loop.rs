use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{backend::CrosstermBackend, Terminal};
use time::OffsetDateTime;

use crate::api::ApiClient;
use crate::app::App;
use crate::ui;

use super::action_queue::{channel, Action};
use super::actions::run_action;
use super::views::handle_view_key;

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ApiClient,
) -> Result<()> {
    // Background reconciliation: pick up timers started or stopped from
    // another control surface.
    let mut last_sync = Instant::now();
    const SYNC_INTERVAL: Duration = Duration::from_secs(60);

    let (action_tx, mut action_rx) = channel();

    loop {
        // Expiry watcher: the countdown-to-overtime transition happens here,
        // anchored at the deadline itself no matter how late this iteration
        // runs (see LocalClock::tick).
        if app.clock.tick(OffsetDateTime::now_utc()) {
            app.set_status("Countdown expired, counting overtime".to_string());
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_view_key(key, app, &action_tx);
            }
        }

        if last_sync.elapsed() >= SYNC_INTERVAL {
            let _ = action_tx.send(Action::Sync);
            last_sync = Instant::now();
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, client).await;
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
