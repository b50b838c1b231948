use crate::app::{App, View};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

mod delete_dialog;
mod form_view;
mod timer_list;
mod utils;
mod watch;

pub fn render(frame: &mut Frame, app: &App) {
    match app.current_view {
        View::Timers => timer_list::render_timer_list(frame, app),
        View::EditTimer => form_view::render_timer_form(frame, app),
        View::ConfirmDelete => delete_dialog::render_delete_confirm(frame, app),
        View::Watch => watch::render_watch_view(frame, app),
    }

    // Remote-failure banner renders on top of any view until dismissed or
    // until the next call succeeds.
    if app.error_message.is_some() {
        render_error_banner(frame, app);
    }
}

fn render_error_banner(frame: &mut Frame, app: &App) {
    let Some(message) = &app.error_message else {
        return;
    };

    let area = utils::centered_rect(64, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(": Dismiss"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(Span::styled(
                    " ProPresenter Error ",
                    Style::default().fg(Color::Red),
                ))
                .padding(Padding::horizontal(2)),
        );

    frame.render_widget(paragraph, area);
}
