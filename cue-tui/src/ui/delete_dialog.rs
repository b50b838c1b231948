use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

use crate::app::App;

use super::utils::centered_rect;

pub(super) fn render_delete_confirm(frame: &mut Frame, app: &App) {
    let Some(ctx) = &app.delete_context else {
        return;
    };

    let area = centered_rect(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Delete timer "),
            Span::styled(
                ctx.name.as_str(),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("?"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Y/Enter", Style::default().fg(Color::Yellow)),
            Span::raw(": Delete  "),
            Span::styled("N/Esc", Style::default().fg(Color::Yellow)),
            Span::raw(": Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(Span::styled(
                    " Confirm Delete ",
                    Style::default().fg(Color::Red),
                ))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(paragraph, area);
}
