use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

use crate::app::{App, FormField, TextInput};

use super::utils::centered_rect;

pub(super) fn render_timer_form(frame: &mut Frame, app: &App) {
    let Some(form) = &app.form else {
        return;
    };

    let area = centered_rect(56, 12, frame.area());
    frame.render_widget(Clear, area);

    let title = if form.editing_uuid.is_some() {
        " Edit Timer "
    } else {
        " New Timer "
    };

    let mut lines = vec![
        Line::from(""),
        input_line(
            "Name:    ",
            &form.name,
            form.focused_field == FormField::Name,
        ),
        Line::from(""),
        input_line(
            "Minutes: ",
            &form.minutes,
            form.focused_field == FormField::Minutes,
        ),
        Line::from(""),
    ];

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(": Switch field  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(": Save  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": Cancel"),
    ]));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(Span::styled(title, Style::default().fg(Color::Yellow)))
                .padding(Padding::horizontal(2)),
        );

    frame.render_widget(paragraph, area);
}

/// A labelled input row; the focused field shows a block cursor.
fn input_line<'a>(label: &'a str, input: &'a TextInput, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![Span::styled(label, label_style)];
    if focused {
        let (before, after) = input.split_at_cursor();
        spans.push(Span::styled(
            before,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            "\u{2588}",
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled(
            after,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(
            input.value.as_str(),
            Style::default().fg(Color::White),
        ));
    }

    Line::from(spans)
}
