use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use syntect::{highlighting::Theme, parsing::SyntaxReference, parsing::SyntaxSet};

use crate::{
    app::App,
    diff_engine::{DiffRow, LineStatus},
    ui::{
        diff_utils::{apply_diff_highlight, compute_word_highlight, expand_tabs, skip_columns},
        highlight_line::highlight_line_content,
    },
};

pub const ADDED_BG: Color = Color::Rgb(0, 100, 0);
pub const REMOVED_BG: Color = Color::Rgb(139, 0, 0);
pub const CHANGED_LEFT_BG: Color = Color::Rgb(80, 0, 0);
pub const CHANGED_RIGHT_BG: Color = Color::Rgb(0, 60, 0);
pub const WORD_REMOVED_BG: Color = Color::Rgb(170, 30, 30);
pub const WORD_ADDED_BG: Color = Color::Rgb(20, 130, 20);
pub const FILLER_BG: Color = Color::Rgb(40, 40, 40);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

struct PanelContext<'a> {
    syntax: Option<&'a SyntaxReference>,
    syntax_set: &'a SyntaxSet,
    theme: &'a Theme,
    width: usize,
    // Horizontal scroll, applied to the text but never to the gutter.
    offset: usize,
}

fn gutter(number: Option<usize>) -> Span<'static> {
    let text = match number {
        Some(n) => format!("{n:4} "),
        None => "     ".to_string(),
    };
    Span::styled(text, Style::default().fg(Color::DarkGray))
}

fn filler_line(ctx: &PanelContext) -> Line<'static> {
    Line::from(vec![
        gutter(None),
        Span::styled(" ".repeat(ctx.width.saturating_sub(5)), Style::default().bg(FILLER_BG)),
    ])
}

fn line_background(status: LineStatus, side: Side) -> Option<Color> {
    match (status, side) {
        (LineStatus::Same, _) => None,
        (LineStatus::Added, _) => Some(ADDED_BG),
        (LineStatus::Removed, _) => Some(REMOVED_BG),
        (LineStatus::Changed, Side::Left) => Some(CHANGED_LEFT_BG),
        (LineStatus::Changed, Side::Right) => Some(CHANGED_RIGHT_BG),
    }
}

fn content_line(
    ctx: &PanelContext,
    number: Option<usize>,
    content: &str,
    background: Option<Color>,
) -> Line<'static> {
    let content = expand_tabs(content);
    let highlighted = highlight_line_content(&content, ctx.syntax, ctx.syntax_set, ctx.theme);
    let highlighted = match background {
        Some(bg) => highlighted
            .into_iter()
            .map(|span| Span::styled(span.content, span.style.bg(bg)))
            .collect(),
        None => highlighted,
    };
    let mut spans = vec![gutter(number)];
    spans.extend(skip_columns(highlighted, ctx.offset));
    Line::from(spans)
}

fn word_line(
    ctx: &PanelContext,
    number: Option<usize>,
    text: &str,
    ranges: &[std::ops::Range<usize>],
    base_bg: Color,
    highlight_bg: Color,
) -> Line<'static> {
    let highlighted = highlight_line_content(text, ctx.syntax, ctx.syntax_set, ctx.theme);
    let marked = apply_diff_highlight(highlighted, ranges, base_bg, highlight_bg);
    let mut spans = vec![gutter(number)];
    spans.extend(skip_columns(marked, ctx.offset));
    Line::from(spans)
}

/// Renders one row onto both panels. Each call yields exactly one line per
/// side so the panels stay aligned.
fn render_row(
    row: &DiffRow,
    word_highlight: bool,
    left: &PanelContext,
    right: &PanelContext,
) -> (Line<'static>, Line<'static>) {
    if row.status == LineStatus::Changed
        && word_highlight
        && let (Some(old), Some(new)) = (&row.left, &row.right)
    {
        let hl = compute_word_highlight(old, new);
        return (
            word_line(
                left,
                row.left_line_number,
                &hl.left_text,
                &hl.left_ranges,
                CHANGED_LEFT_BG,
                WORD_REMOVED_BG,
            ),
            word_line(
                right,
                row.right_line_number,
                &hl.right_text,
                &hl.right_ranges,
                CHANGED_RIGHT_BG,
                WORD_ADDED_BG,
            ),
        );
    }

    let old_line = match &row.left {
        Some(content) => content_line(
            left,
            row.left_line_number,
            content,
            line_background(row.status, Side::Left),
        ),
        None => filler_line(left),
    };
    let new_line = match &row.right {
        Some(content) => content_line(
            right,
            row.right_line_number,
            content,
            line_background(row.status, Side::Right),
        ),
        None => filler_line(right),
    };
    (old_line, new_line)
}

pub fn render_side_by_side_diff(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let visible_lines = area.height.saturating_sub(2) as usize;
    let panel_width = chunks[0].width.saturating_sub(2) as usize; // Width minus borders
    let left_label = app.input.left_label();
    let right_label = app.input.right_label();
    let theme = app.get_theme();

    let left_ctx = PanelContext {
        syntax: app.get_syntax_for_file(&left_label),
        syntax_set: app.get_syntax_set(),
        theme,
        width: panel_width,
        offset: app.horizontal_scroll_offset,
    };
    let right_ctx = PanelContext {
        syntax: app.get_syntax_for_file(&right_label),
        syntax_set: app.get_syntax_set(),
        theme,
        width: chunks[1].width.saturating_sub(2) as usize,
        offset: app.horizontal_scroll_offset,
    };

    let rows = app.visible_rows();
    let mut old_lines = Vec::new();
    let mut new_lines = Vec::new();

    if rows.is_empty() {
        let notice = Line::from(Span::styled(
            "No differences",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        old_lines.push(notice.clone());
        new_lines.push(notice);
    }

    for row in rows.iter().skip(app.scroll_offset).take(visible_lines) {
        let (old_line, new_line) = render_row(row, app.word_highlight, &left_ctx, &right_ctx);
        old_lines.push(old_line);
        new_lines.push(new_line);
    }

    let old_paragraph = Paragraph::new(Text::from(old_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Left: {left_label}")),
        );

    let new_paragraph = Paragraph::new(Text::from(new_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Right: {right_label}")),
        );

    f.render_widget(old_paragraph, chunks[0]);
    f.render_widget(new_paragraph, chunks[1]);

    // Render scrollbars for both panels
    let total_lines = rows.len();
    if total_lines > visible_lines {
        let mut scrollbar_state = ScrollbarState::new(total_lines).position(app.scroll_offset);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        f.render_stateful_widget(
            scrollbar.clone(),
            chunks[0].inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state.clone(),
        );

        f.render_stateful_widget(
            scrollbar,
            chunks[1].inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}
