use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    app::App,
    ui::{footer::render_footer, header::render_header, side_by_side_diff::render_side_by_side_diff},
};

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    // Header, diff panels and optional footer
    let mut constraints = vec![Constraint::Length(1), Constraint::Min(0)];
    if app.show_shortcuts {
        constraints.push(Constraint::Length(3));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    render_header(f, chunks[0], app);
    render_side_by_side_diff(f, chunks[1], app);

    // Footer with keyboard shortcuts (if enabled)
    if app.show_shortcuts {
        render_footer(f, chunks[2]);
    }
}
