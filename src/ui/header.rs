use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;

fn toggle_span(label: &str, on: bool) -> Span<'static> {
    let (state, color) = if on {
        ("on", Color::Green)
    } else {
        ("off", Color::DarkGray)
    };
    Span::styled(format!("{label}: {state}  "), Style::default().fg(color))
}

pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let summary = &app.summary;
    let mut spans = vec![
        Span::styled(
            format!("~{} ", summary.changed),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("+{} ", summary.added),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("-{} ", summary.removed),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("={}  ", summary.same),
            Style::default().fg(Color::DarkGray),
        ),
        toggle_span("changes only", app.only_changes),
        toggle_span("words", app.word_highlight),
    ];

    if let Some(message) = &app.status_message {
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
