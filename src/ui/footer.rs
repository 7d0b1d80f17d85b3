use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const SHORTCUTS: &[(&str, &str)] = &[
    ("q", ":Quit  "),
    ("j/k", ":Scroll  "),
    ("d/u", ":Page  "),
    ("g/G", ":Top/Bottom  "),
    ("←/→/h/l/H/L", ":H-Scroll  "),
    ("c", ":Changes Only  "),
    ("w", ":Word Highlight  "),
    ("x", ":Swap  "),
    ("r", ":Reload  "),
    ("?", ":Hide Help"),
];

pub fn render_footer(f: &mut Frame, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let spans: Vec<Span> = SHORTCUTS
        .iter()
        .flat_map(|(key, action)| [Span::styled(*key, key_style), Span::raw(*action)])
        .collect();

    let footer = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).title("Shortcuts"))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });

    f.render_widget(footer, area);
}
