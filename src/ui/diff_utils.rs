use ratatui::{style::Color, text::Span};
use std::ops::Range;

use crate::diff_engine::{align_words, render_word_line};

pub const TAB_WIDTH: usize = 4;

/// Replaces each tab with spaces up to the next tab stop.
pub fn expand_tabs(text: &str) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + TAB_WIDTH);
    let mut column = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

/// Drops the first `columns` characters across `spans`, keeping each
/// remaining span's style.
pub fn skip_columns(spans: Vec<Span<'static>>, columns: usize) -> Vec<Span<'static>> {
    if columns == 0 {
        return spans;
    }
    let mut remaining = columns;
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        if remaining == 0 {
            out.push(span);
            continue;
        }
        let count = span.content.chars().count();
        if count <= remaining {
            remaining -= count;
            continue;
        }
        let text: String = span.content.chars().skip(remaining).collect();
        remaining = 0;
        out.push(Span::styled(text, span.style));
    }
    out
}

/// Display text and highlight ranges for both sides of a changed row.
pub struct WordHighlight {
    pub left_text: String,
    pub left_ranges: Vec<Range<usize>>,
    pub right_text: String,
    pub right_ranges: Vec<Range<usize>>,
}

/// Word-aligns a changed line pair and lays each side out for rendering.
/// Runs of differing words are merged so the separating space is
/// highlighted too. Words never hold whitespace, so tabs can only sit in the
/// indentation, which is expanded before the ranges are taken.
pub fn compute_word_highlight(left: &str, right: &str) -> WordHighlight {
    let words = align_words(left, right);
    let (left_text, left_ranges) =
        render_word_line(&expand_tabs(&words.leading_left), &words.left_parts);
    let (right_text, right_ranges) =
        render_word_line(&expand_tabs(&words.leading_right), &words.right_parts);

    WordHighlight {
        left_text,
        left_ranges: merge_adjacent(left_ranges),
        right_text,
        right_ranges: merge_adjacent(right_ranges),
    }
}

fn merge_adjacent(ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        if let Some(last) = merged.last_mut()
            && last.end + 1 == range.start
        {
            last.end = range.end;
        } else {
            merged.push(range);
        }
    }
    merged
}

/// Applies diff highlighting to existing syntax highlighted spans.
///
/// * `spans` - The original syntax highlighted spans
/// * `diff_ranges` - The ranges that should be highlighted with the diff color
/// * `base_bg` - The background color for the whole line (e.g. dark red for removed)
/// * `highlight_bg` - The background color for the changed parts (e.g. bright red)
pub fn apply_diff_highlight<'a>(
    spans: Vec<Span<'a>>,
    diff_ranges: &[Range<usize>],
    base_bg: Color,
    highlight_bg: Color,
) -> Vec<Span<'a>> {
    if diff_ranges.is_empty() {
        return spans
            .into_iter()
            .map(|span| {
                let style = span.style.bg(base_bg);
                Span::styled(span.content, style)
            })
            .collect();
    }

    let mut new_spans = Vec::new();
    let mut current_idx = 0;

    for span in spans {
        let content = span.content;
        let len = content.len();
        let span_end = current_idx + len;
        let style = span.style;

        let mut last_processed = current_idx;

        for range in diff_ranges {
            if range.end <= current_idx {
                continue;
            }
            if range.start >= span_end {
                break;
            }

            let overlap_start = range.start.max(current_idx);
            let overlap_end = range.end.min(span_end);

            if overlap_start > last_processed {
                let sub_content =
                    &content[(last_processed - current_idx)..(overlap_start - current_idx)];
                new_spans.push(Span::styled(sub_content.to_string(), style.bg(base_bg)));
            }

            let sub_content = &content[(overlap_start - current_idx)..(overlap_end - current_idx)];
            new_spans.push(Span::styled(sub_content.to_string(), style.bg(highlight_bg)));

            last_processed = overlap_end;
        }

        if last_processed < span_end {
            let sub_content = &content[(last_processed - current_idx)..];
            new_spans.push(Span::styled(sub_content.to_string(), style.bg(base_bg)));
        }

        current_idx += len;
    }

    new_spans
}
