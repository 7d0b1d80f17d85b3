//! Plain-text side-by-side rendering for `--print`.

use std::fmt::Write;

use crate::diff_engine::{
    DiffRow, DiffSummary, LineStatus, WordKind, WordPart, align_words, render_word_parts,
    visible_rows,
};
use crate::ui::diff_utils::expand_tabs;

const SEPARATOR: &str = " │ ";
// "1234 ~ " in front of each side's text.
const GUTTER: usize = 7;
const MIN_TEXT: usize = 8;

fn marker(status: LineStatus, present: bool) -> char {
    if !present {
        return ' ';
    }
    match status {
        LineStatus::Same => ' ',
        LineStatus::Changed => '~',
        LineStatus::Added => '+',
        LineStatus::Removed => '-',
    }
}

fn number(n: Option<usize>) -> String {
    n.map_or_else(|| "    ".to_string(), |n| format!("{n:>4}"))
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        let mut out = text.to_string();
        out.extend(std::iter::repeat_n(' ', width - count));
        out
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn marked_words(leading: &str, parts: &[WordPart]) -> String {
    let mut out = String::from(leading);
    for (idx, span) in render_word_parts(parts).iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        match span.kind {
            WordKind::Same => out.push_str(&span.text),
            WordKind::Removed => {
                let _ = write!(out, "[-{}-]", span.text);
            }
            WordKind::Added => {
                let _ = write!(out, "{{+{}+}}", span.text);
            }
        }
    }
    out
}

fn side_texts(row: &DiffRow, word_highlight: bool) -> (String, String) {
    if row.status == LineStatus::Changed
        && word_highlight
        && let (Some(old), Some(new)) = (&row.left, &row.right)
    {
        let words = align_words(old, new);
        return (
            marked_words(&expand_tabs(&words.leading_left), &words.left_parts),
            marked_words(&expand_tabs(&words.leading_right), &words.right_parts),
        );
    }
    (
        row.left.as_deref().map(expand_tabs).unwrap_or_default(),
        row.right.as_deref().map(expand_tabs).unwrap_or_default(),
    )
}

/// Renders the visible rows as two fixed-width columns followed by a
/// summary line.
pub fn render_plain(
    rows: &[DiffRow],
    only_changes: bool,
    word_highlight: bool,
    width: usize,
) -> String {
    let side_width = width.saturating_sub(SEPARATOR.chars().count()) / 2;
    let text_width = side_width.saturating_sub(GUTTER).max(MIN_TEXT);
    let mut out = String::new();

    for row in visible_rows(rows, only_changes) {
        let (left, right) = side_texts(row, word_highlight);
        let line = format!(
            "{} {} {}{}{} {} {}",
            number(row.left_line_number),
            marker(row.status, row.left.is_some()),
            fit(&left, text_width),
            SEPARATOR,
            number(row.right_line_number),
            marker(row.status, row.right.is_some()),
            fit(&right, text_width),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let _ = writeln!(out, "{}", DiffSummary::from_rows(rows));
    out
}
