use propresenter::domain::format_clock_time;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Height of the large digit block (5 rows of pixels)
const CLOCK_ROWS: u16 = 5;

/// Full-screen watch: the local countdown/overtime clock in large block
/// digits, with the tracked timer's name and configured duration above it.
pub(super) fn render_watch_view(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let muted = Style::default().fg(Color::DarkGray);
    let snapshot = app.clock_snapshot();

    // Title + clock + blank + mode line
    let content_height = 1 + 1 + CLOCK_ROWS + 1 + 1;
    let hint_height: u16 = 1;
    let remaining = area.height.saturating_sub(content_height + hint_height);
    let top_pad = remaining / 2;
    let bot_pad = remaining - top_pad;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top_pad),
            Constraint::Length(content_height),
            Constraint::Length(bot_pad),
            Constraint::Length(hint_height),
        ])
        .split(area);

    let title = match app.current_timer() {
        Some(timer) => format!(
            "{} - {}",
            timer.id.name,
            format_clock_time(timer.duration_seconds().unwrap_or(0))
        ),
        None => "Event Timer".to_string(),
    };

    let time_str = format!(
        "{:02}:{:02}:{:02}",
        snapshot.hours, snapshot.minutes, snapshot.seconds
    );

    let digit_color = if snapshot.is_overtime_active {
        Color::Red
    } else if app.is_injury_time(&snapshot) {
        Color::Yellow
    } else if snapshot.is_countdown_active {
        Color::Green
    } else {
        Color::White
    };

    let mode_line = if snapshot.is_overtime_active {
        Span::styled("OVERTIME", Style::default().fg(Color::Red))
    } else if snapshot.is_countdown_active {
        Span::styled("Counting down", Style::default().fg(Color::Green))
    } else {
        Span::styled("Not running", muted)
    };

    let mut lines = vec![Line::from(Span::styled(title, muted)), Line::from("")];
    lines.extend(render_block_time(
        &time_str,
        Style::default().fg(digit_color).add_modifier(Modifier::BOLD),
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(mode_line));

    let clock = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(clock, rows[1]);

    let hint = Paragraph::new(Line::from(Span::styled("F / Esc:  Exit watch", muted)))
        .alignment(Alignment::Center);
    frame.render_widget(hint, rows[3]);
}

/// 5x5 bitmap per digit, row-major, 1 = filled cell.
const DIGIT_SIZE: usize = 5;

#[rustfmt::skip]
const DIGITS: [[u8; DIGIT_SIZE * DIGIT_SIZE]; 10] = [
    [ // 0
        1, 1, 1, 1, 1,
        1, 1, 0, 1, 1,
        1, 1, 0, 1, 1,
        1, 1, 0, 1, 1,
        1, 1, 1, 1, 1,
    ],
    [ // 1
        0, 0, 0, 1, 1,
        0, 0, 0, 1, 1,
        0, 0, 0, 1, 1,
        0, 0, 0, 1, 1,
        0, 0, 0, 1, 1,
    ],
    [ // 2
        1, 1, 1, 1, 1,
        0, 0, 0, 1, 1,
        1, 1, 1, 1, 1,
        1, 1, 0, 0, 0,
        1, 1, 1, 1, 1,
    ],
    [ // 3
        1, 1, 1, 1, 1,
        0, 0, 0, 1, 1,
        1, 1, 1, 1, 1,
        0, 0, 0, 1, 1,
        1, 1, 1, 1, 1,
    ],
    [ // 4
        1, 1, 0, 1, 1,
        1, 1, 0, 1, 1,
        1, 1, 1, 1, 1,
        0, 0, 0, 1, 1,
        0, 0, 0, 1, 1,
    ],
    [ // 5
        1, 1, 1, 1, 1,
        1, 1, 0, 0, 0,
        1, 1, 1, 1, 1,
        0, 0, 0, 1, 1,
        1, 1, 1, 1, 1,
    ],
    [ // 6
        1, 1, 1, 1, 1,
        1, 1, 0, 0, 0,
        1, 1, 1, 1, 1,
        1, 1, 0, 1, 1,
        1, 1, 1, 1, 1,
    ],
    [ // 7
        1, 1, 1, 1, 1,
        0, 0, 0, 1, 1,
        0, 0, 0, 1, 1,
        0, 0, 0, 1, 1,
        0, 0, 0, 1, 1,
    ],
    [ // 8
        1, 1, 1, 1, 1,
        1, 1, 0, 1, 1,
        1, 1, 1, 1, 1,
        1, 1, 0, 1, 1,
        1, 1, 1, 1, 1,
    ],
    [ // 9
        1, 1, 1, 1, 1,
        1, 1, 0, 1, 1,
        1, 1, 1, 1, 1,
        0, 0, 0, 1, 1,
        1, 1, 1, 1, 1,
    ],
];

/// Render a `HH:MM:SS` string as large block digits.
fn render_block_time(time_str: &str, style: Style) -> Vec<Line<'static>> {
    let symbol = "\u{2588}";
    let mut rows = vec![String::new(); DIGIT_SIZE];

    for ch in time_str.chars() {
        if ch == ':' {
            rows[0].push_str("     ");
            rows[1].push_str(" \u{2588}\u{2588}  ");
            rows[2].push_str("     ");
            rows[3].push_str(" \u{2588}\u{2588}  ");
            rows[4].push_str("     ");
        } else if let Some(digit) = ch.to_digit(10) {
            let pattern = &DIGITS[digit as usize];
            for (row_idx, row) in rows.iter_mut().enumerate() {
                for col in 0..DIGIT_SIZE {
                    if pattern[row_idx * DIGIT_SIZE + col] == 1 {
                        row.push_str(symbol);
                    } else {
                        row.push(' ');
                    }
                }
                row.push(' ');
            }
        }
    }

    rows.into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect()
}
