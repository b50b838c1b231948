use propresenter::domain::{format_clock_time, Timer, TimerState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

use crate::app::App;
use crate::clock::ClockSnapshot;

pub(super) fn render_timer_list(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Timer list
            Constraint::Length(3), // Status
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_timers(frame, chunks[1], app);
    render_status(frame, chunks[2], app);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let tracked = match app.current_timer() {
        Some(timer) => format!(
            "{} - {}",
            timer.id.name,
            format_clock_time(timer.duration_seconds().unwrap_or(0))
        ),
        None => "no timer tracked".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(
            app.endpoint_label.as_str(),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(tracked, Style::default().fg(Color::White)),
    ]);

    let header = Paragraph::new(line).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Cue - ProPresenter Timers ")
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(header, area);
}

fn render_timers(frame: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let snapshot = app.clock_snapshot();

    let items: Vec<ListItem> = app
        .timers
        .iter()
        .enumerate()
        .map(|(i, timer)| ListItem::new(timer_row(app, timer, i == app.selected_index, &snapshot)))
        .collect();

    let border_style = if snapshot.is_overtime_active {
        Style::default().fg(Color::Red)
    } else if snapshot.is_countdown_active {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Timers ")
            .border_style(border_style)
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(list, area);
}

fn timer_row<'a>(
    app: &App,
    timer: &'a Timer,
    is_selected: bool,
    snapshot: &ClockSnapshot,
) -> Line<'a> {
    let is_tracked = app.current_uuid.as_deref() == Some(timer.id.uuid.as_str());

    let mut spans = vec![
        Span::styled(
            if is_tracked { "\u{25b6} " } else { "  " },
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("{:<24}", truncate(&timer.id.name, 24)),
            Style::default().fg(Color::Cyan),
        ),
    ];

    match timer.duration_seconds() {
        Some(duration) => {
            spans.push(Span::styled(
                format!("[{}]", format_clock_time(duration)),
                Style::default().fg(Color::Magenta),
            ));
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            spans.push(state_badge(timer.state));

            // Live local clock on the tracked row.
            if is_tracked && (snapshot.is_countdown_active || snapshot.is_overtime_active) {
                spans.push(Span::styled("  ", Style::default()));
                spans.push(watch_span(app, snapshot));
            }
        }
        None => {
            spans.push(Span::styled(
                "timer config not supported",
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    if is_selected {
        let flattened: String = spans.iter().map(|s| s.content.as_ref()).collect::<String>();
        return Line::from(Span::styled(
            flattened,
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}

fn state_badge(state: TimerState) -> Span<'static> {
    let (label, color) = match state {
        TimerState::Running => ("running", Color::Green),
        TimerState::Overrunning => ("overrunning", Color::Red),
        TimerState::Overran => ("overran", Color::Red),
        TimerState::Complete => ("complete", Color::Blue),
        TimerState::Stopped => ("stopped", Color::DarkGray),
    };
    Span::styled(format!("{:<11}", label), Style::default().fg(color))
}

/// The formatted local clock, colored by mode: green while counting down,
/// yellow in the last fifth of the configured duration, red in overtime.
fn watch_span(app: &App, snapshot: &ClockSnapshot) -> Span<'static> {
    let text = format!(
        "{:02}:{:02}:{:02}",
        snapshot.hours, snapshot.minutes, snapshot.seconds
    );

    let color = if snapshot.is_overtime_active {
        Color::Red
    } else if app.is_injury_time(snapshot) {
        Color::Yellow
    } else {
        Color::Green
    };

    Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}\u{2026}", cut)
    }
}

fn render_status(frame: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let snapshot = app.clock_snapshot();
    let contextual = if snapshot.is_overtime_active {
        "Overtime running (x: stop, r: reset)".to_string()
    } else if snapshot.is_countdown_active {
        "Countdown running (x: stop, r: reset)".to_string()
    } else {
        "No timer active (Enter/s to start the selected timer)".to_string()
    };
    let status_text = app.status_message.as_deref().unwrap_or(&contextual);

    let status_lower = status_text.to_lowercase();
    let is_warning = status_lower.contains("warning")
        || status_lower.contains("could not")
        || status_lower.contains("not supported");
    let is_success = status_lower.contains("started")
        || status_lower.contains("stopped")
        || status_lower.contains("reset")
        || status_lower.contains("created")
        || status_lower.contains("updated")
        || status_lower.contains("deleted");

    let (border_style, text_color) = if is_warning {
        (Style::default().fg(Color::Red), Color::Red)
    } else if is_success {
        (Style::default().fg(Color::Green), Color::Green)
    } else {
        (Style::default().fg(Color::White), Color::White)
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(text_color))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Status ")
                .border_style(border_style)
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(status, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let line = vec![
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(": Navigate  "),
        Span::styled("Enter/s", Style::default().fg(Color::Yellow)),
        Span::raw(": Start  "),
        Span::styled("x", Style::default().fg(Color::Yellow)),
        Span::raw(": Stop  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(": Reset  "),
        Span::styled("R", Style::default().fg(Color::Yellow)),
        Span::raw(": Reset all  "),
        Span::styled("n", Style::default().fg(Color::Yellow)),
        Span::raw(": New  "),
        Span::styled("e", Style::default().fg(Color::Yellow)),
        Span::raw(": Edit  "),
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::raw(": Delete  "),
        Span::styled("f", Style::default().fg(Color::Yellow)),
        Span::raw(": Watch  "),
        Span::styled("g", Style::default().fg(Color::Yellow)),
        Span::raw(": Refresh  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(": Quit"),
    ];

    let controls = Paragraph::new(Line::from(line))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    " Controls ",
                    Style::default().fg(Color::DarkGray),
                ))
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(controls, area);
}
