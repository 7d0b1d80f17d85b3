//! Line and word alignment based on a longest-common-subsequence table.
//!
//! Inputs are expected to be editor sized. The table costs O(m·n) memory, so
//! callers bound input size (see `input::InputPolicy`).

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Same,
    Changed,
    Added,
    Removed,
}

/// One displayed row of the side-by-side alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub left: Option<String>,
    pub right: Option<String>,
    pub status: LineStatus,
    pub left_line_number: Option<usize>,
    pub right_line_number: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    Same,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPart {
    pub text: String,
    pub kind: WordKind,
}

/// Word-level alignment of a changed line pair.
///
/// Leading indentation is kept out of the parts so it is never highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordDiff {
    pub left_parts: Vec<WordPart>,
    pub right_parts: Vec<WordPart>,
    pub leading_left: String,
    pub leading_right: String,
}

/// An inline span produced by [`render_word_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub text: String,
    pub kind: WordKind,
    /// Byte range of `text` within the space-joined line.
    pub range: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOp {
    Same { left: usize, right: usize },
    Added { right: usize },
    Removed { left: usize },
}

/// Computes the LCS edit script between `left` and `right`.
///
/// On ties the backtrack consumes from `right` first, so a replaced element
/// comes out as `Removed` followed by `Added` once the script is reversed.
fn edit_script<T: PartialEq>(left: &[T], right: &[T]) -> Vec<EditOp> {
    let m = left.len();
    let n = right.len();
    let width = n + 1;
    let mut dp = vec![0usize; (m + 1) * width];

    for i in 1..=m {
        for j in 1..=n {
            dp[i * width + j] = if left[i - 1] == right[j - 1] {
                dp[(i - 1) * width + (j - 1)] + 1
            } else {
                dp[(i - 1) * width + j].max(dp[i * width + (j - 1)])
            };
        }
    }

    let mut ops = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && left[i - 1] == right[j - 1] {
            ops.push(EditOp::Same {
                left: i - 1,
                right: j - 1,
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i * width + (j - 1)] >= dp[(i - 1) * width + j]) {
            ops.push(EditOp::Added { right: j - 1 });
            j -= 1;
        } else {
            ops.push(EditOp::Removed { left: i - 1 });
            i -= 1;
        }
    }

    ops.reverse();
    ops
}

/// Splits text into lines on `'\n'`. The empty string yields one empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Aligns two line sequences into side-by-side rows.
pub fn align_lines(left: &[&str], right: &[&str]) -> Vec<DiffRow> {
    let ops = edit_script(left, right);
    let mut rows = Vec::with_capacity(ops.len());
    let mut left_no = 1;
    let mut right_no = 1;

    let mut idx = 0;
    while idx < ops.len() {
        match (ops[idx], ops.get(idx + 1)) {
            (EditOp::Removed { left: l }, Some(&EditOp::Added { right: r })) => {
                rows.push(DiffRow {
                    left: Some(left[l].to_string()),
                    right: Some(right[r].to_string()),
                    status: LineStatus::Changed,
                    left_line_number: Some(left_no),
                    right_line_number: Some(right_no),
                });
                left_no += 1;
                right_no += 1;
                idx += 2;
                continue;
            }
            (EditOp::Removed { left: l }, _) => {
                rows.push(DiffRow {
                    left: Some(left[l].to_string()),
                    right: None,
                    status: LineStatus::Removed,
                    left_line_number: Some(left_no),
                    right_line_number: None,
                });
                left_no += 1;
            }
            (EditOp::Added { right: r }, _) => {
                rows.push(DiffRow {
                    left: None,
                    right: Some(right[r].to_string()),
                    status: LineStatus::Added,
                    left_line_number: None,
                    right_line_number: Some(right_no),
                });
                right_no += 1;
            }
            (EditOp::Same { left: l, .. }, _) => {
                let line = left[l].to_string();
                rows.push(DiffRow {
                    left: Some(line.clone()),
                    right: Some(line),
                    status: LineStatus::Same,
                    left_line_number: Some(left_no),
                    right_line_number: Some(right_no),
                });
                left_no += 1;
                right_no += 1;
            }
        }
        idx += 1;
    }

    rows
}

/// Splits both texts into lines and aligns them.
pub fn diff_texts(left: &str, right: &str) -> Vec<DiffRow> {
    align_lines(&split_lines(left), &split_lines(right))
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(line.len(), |(idx, _)| idx);
    &line[..end]
}

fn words(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Aligns the whitespace-separated words of a changed line pair.
pub fn align_words(left_line: &str, right_line: &str) -> WordDiff {
    let left_words = words(left_line);
    let right_words = words(right_line);

    let mut diff = WordDiff {
        leading_left: leading_whitespace(left_line).to_string(),
        leading_right: leading_whitespace(right_line).to_string(),
        ..WordDiff::default()
    };

    for op in edit_script(&left_words, &right_words) {
        match op {
            EditOp::Same { left, right } => {
                diff.left_parts.push(WordPart {
                    text: left_words[left].to_string(),
                    kind: WordKind::Same,
                });
                diff.right_parts.push(WordPart {
                    text: right_words[right].to_string(),
                    kind: WordKind::Same,
                });
            }
            EditOp::Removed { left } => diff.left_parts.push(WordPart {
                text: left_words[left].to_string(),
                kind: WordKind::Removed,
            }),
            EditOp::Added { right } => diff.right_parts.push(WordPart {
                text: right_words[right].to_string(),
                kind: WordKind::Added,
            }),
        }
    }

    diff
}

/// Lays word parts out as inline spans separated by a single space.
pub fn render_word_parts(parts: &[WordPart]) -> Vec<WordSpan> {
    let mut spans = Vec::with_capacity(parts.len());
    let mut offset = 0;
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            offset += 1;
        }
        let end = offset + part.text.len();
        spans.push(WordSpan {
            text: part.text.clone(),
            kind: part.kind,
            range: offset..end,
        });
        offset = end;
    }
    spans
}

/// Builds the display string for one side of a word diff along with the
/// byte ranges of the words that differ.
pub fn render_word_line(leading: &str, parts: &[WordPart]) -> (String, Vec<Range<usize>>) {
    let mut text = String::from(leading);
    let mut ranges = Vec::new();
    for span in render_word_parts(parts) {
        if span.range.start > 0 {
            text.push(' ');
        }
        if span.kind != WordKind::Same {
            let start = leading.len() + span.range.start;
            ranges.push(start..start + span.text.len());
        }
        text.push_str(&span.text);
    }
    (text, ranges)
}

/// Rows to display: everything, or only rows that are not `Same`.
pub fn visible_rows(rows: &[DiffRow], only_changes: bool) -> Vec<&DiffRow> {
    rows.iter()
        .filter(|row| !only_changes || row.status != LineStatus::Same)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffSummary {
    pub same: usize,
    pub changed: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffSummary {
    pub fn from_rows(rows: &[DiffRow]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            match row.status {
                LineStatus::Same => summary.same += 1,
                LineStatus::Changed => summary.changed += 1,
                LineStatus::Added => summary.added += 1,
                LineStatus::Removed => summary.removed += 1,
            }
            summary
        })
    }

    pub fn is_identical(&self) -> bool {
        self.changed == 0 && self.added == 0 && self.removed == 0
    }
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} changed, {} added, {} removed, {} unchanged",
            self.changed, self.added, self.removed, self.same
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(rows: &[DiffRow]) -> Vec<LineStatus> {
        rows.iter().map(|r| r.status).collect()
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines("a\r\nb"), vec!["a\r", "b"]);
    }

    #[test]
    fn test_empty_inputs() {
        let rows = diff_texts("", "");
        assert_eq!(
            rows,
            vec![DiffRow {
                left: Some(String::new()),
                right: Some(String::new()),
                status: LineStatus::Same,
                left_line_number: Some(1),
                right_line_number: Some(1),
            }]
        );
    }

    #[test]
    fn test_one_side_empty() {
        let rows = diff_texts("", "a\nb");
        assert!(rows.iter().all(|r| r.status != LineStatus::Same));
        assert_eq!(statuses(&rows), vec![LineStatus::Changed, LineStatus::Added]);
        assert_eq!(rows[0].left.as_deref(), Some(""));
        assert_eq!(rows[0].right.as_deref(), Some("a"));

        let rows = align_lines(&[], &["a", "b"]);
        assert_eq!(statuses(&rows), vec![LineStatus::Added, LineStatus::Added]);

        let rows = align_lines(&["a", "b"], &[]);
        assert_eq!(statuses(&rows), vec![LineStatus::Removed, LineStatus::Removed]);
        assert_eq!(rows[1].left_line_number, Some(2));
    }

    #[test]
    fn test_identical_inputs() {
        let rows = diff_texts("one\ntwo\nthree", "one\ntwo\nthree");
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.status == LineStatus::Same));
        assert_eq!(rows[2].left_line_number, Some(3));
        assert_eq!(rows[2].right_line_number, Some(3));
    }

    #[test]
    fn test_pure_addition() {
        let rows = diff_texts("a\nb", "a\nx\nb");
        assert_eq!(
            statuses(&rows),
            vec![LineStatus::Same, LineStatus::Added, LineStatus::Same]
        );
        assert_eq!((rows[0].left_line_number, rows[0].right_line_number), (Some(1), Some(1)));
        assert_eq!(rows[1].left, None);
        assert_eq!(rows[1].left_line_number, None);
        assert_eq!(rows[1].right.as_deref(), Some("x"));
        assert_eq!(rows[1].right_line_number, Some(2));
        assert_eq!((rows[2].left_line_number, rows[2].right_line_number), (Some(2), Some(3)));
    }

    #[test]
    fn test_pure_removal() {
        let rows = diff_texts("a\nb\nc", "a\nc");
        assert_eq!(
            statuses(&rows),
            vec![LineStatus::Same, LineStatus::Removed, LineStatus::Same]
        );
        assert_eq!(rows[1].left.as_deref(), Some("b"));
        assert_eq!(rows[1].left_line_number, Some(2));
        assert_eq!(rows[1].right_line_number, None);
        assert_eq!((rows[2].left_line_number, rows[2].right_line_number), (Some(3), Some(2)));
    }

    #[test]
    fn test_single_line_change() {
        let rows = diff_texts("version: 1.0.0", "version: 1.1.0");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, LineStatus::Changed);
        assert_eq!(rows[0].left.as_deref(), Some("version: 1.0.0"));
        assert_eq!(rows[0].right.as_deref(), Some("version: 1.1.0"));
        assert_eq!(rows[0].left_line_number, Some(1));
        assert_eq!(rows[0].right_line_number, Some(1));

        let words = align_words("version: 1.0.0", "version: 1.1.0");
        assert_eq!(
            words.left_parts,
            vec![
                WordPart { text: "version:".into(), kind: WordKind::Same },
                WordPart { text: "1.0.0".into(), kind: WordKind::Removed },
            ]
        );
        assert_eq!(
            words.right_parts,
            vec![
                WordPart { text: "version:".into(), kind: WordKind::Same },
                WordPart { text: "1.1.0".into(), kind: WordKind::Added },
            ]
        );
    }

    #[test]
    fn test_removed_then_two_added() {
        let rows = diff_texts("a\nold\nz", "a\nnew1\nnew2\nz");
        assert_eq!(
            statuses(&rows),
            vec![
                LineStatus::Same,
                LineStatus::Changed,
                LineStatus::Added,
                LineStatus::Same
            ]
        );
        assert_eq!(rows[1].left.as_deref(), Some("old"));
        assert_eq!(rows[1].right.as_deref(), Some("new1"));
        assert_eq!(rows[2].right.as_deref(), Some("new2"));
        assert_eq!(rows[3].right_line_number, Some(4));
    }

    #[test]
    fn test_tie_break_prefers_added() {
        // Both "x" and "y" are optimal single matches; the backtrack keeps the
        // earlier right-hand line as added.
        let rows = diff_texts("x\ny", "y\nx");
        assert_eq!(
            statuses(&rows),
            vec![LineStatus::Removed, LineStatus::Same, LineStatus::Added]
        );
        assert_eq!(rows[0].left.as_deref(), Some("x"));
        assert_eq!(rows[1].left.as_deref(), Some("y"));
        assert_eq!(rows[2].right.as_deref(), Some("x"));
    }

    #[test]
    fn test_consecutive_changes_pair_in_order() {
        let rows = diff_texts("a\nb", "c\nd");
        // Ops: removed a, removed b, added c, added d. Only the adjacent
        // removed/added pair in the middle merges.
        assert_eq!(
            statuses(&rows),
            vec![LineStatus::Removed, LineStatus::Changed, LineStatus::Added]
        );
        assert_eq!(rows[1].left.as_deref(), Some("b"));
        assert_eq!(rows[1].right.as_deref(), Some("c"));
    }

    #[test]
    fn test_align_words_leading_whitespace() {
        let words = align_words("    let x = 1;", "\tlet  x = 2;");
        assert_eq!(words.leading_left, "    ");
        assert_eq!(words.leading_right, "\t");
        assert!(words.left_parts.iter().all(|p| !p.text.starts_with(' ')));
        assert_eq!(words.left_parts.last().map(|p| p.kind), Some(WordKind::Removed));
        assert_eq!(words.right_parts.last().map(|p| p.kind), Some(WordKind::Added));
        assert_eq!(words.right_parts[1].text, "x");
        assert_eq!(words.right_parts[1].kind, WordKind::Same);
    }

    #[test]
    fn test_align_words_blank_line() {
        let words = align_words("   ", "foo bar");
        assert!(words.left_parts.is_empty());
        assert_eq!(words.leading_left, "   ");
        assert_eq!(words.right_parts.len(), 2);
        assert!(words.right_parts.iter().all(|p| p.kind == WordKind::Added));
    }

    #[test]
    fn test_render_word_parts_single_space() {
        let words = align_words("a   b  c", "a b d");
        let spans = render_word_parts(&words.left_parts);
        let joined: String = spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(joined, "a b c");
        assert_eq!(spans[2].range, 4..5);
        assert_eq!(spans[2].kind, WordKind::Removed);
    }

    #[test]
    fn test_render_word_line_ranges() {
        let words = align_words("  foo bar baz", "  foo qux baz");
        let (text, ranges) = render_word_line(&words.leading_left, &words.left_parts);
        assert_eq!(text, "  foo bar baz");
        assert_eq!(ranges, vec![6..9]);
        assert_eq!(&text[ranges[0].clone()], "bar");

        let (text, ranges) = render_word_line(&words.leading_right, &words.right_parts);
        assert_eq!(&text[ranges[0].clone()], "qux");
    }

    #[test]
    fn test_visible_rows_filter() {
        let rows = diff_texts("a\nb\nc\nd", "a\nB\nc\nd\ne");
        let all = visible_rows(&rows, false);
        assert_eq!(all.len(), rows.len());

        let changes = visible_rows(&rows, true);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].status, LineStatus::Changed);
        assert_eq!(changes[0].left_line_number, Some(2));
        assert_eq!(changes[1].status, LineStatus::Added);
        assert_eq!(changes[1].right_line_number, Some(5));
    }

    #[test]
    fn test_summary() {
        let rows = diff_texts("a\nb\nc", "a\nB\nc\nd");
        let summary = DiffSummary::from_rows(&rows);
        assert_eq!(
            summary,
            DiffSummary {
                same: 2,
                changed: 1,
                added: 1,
                removed: 0
            }
        );
        assert!(!summary.is_identical());
        assert_eq!(summary.to_string(), "1 changed, 1 added, 0 removed, 2 unchanged");
        assert!(DiffSummary::from_rows(&diff_texts("x", "x")).is_identical());
    }

    #[test]
    fn test_role_swap_flips_unique_alignment() {
        let forward = diff_texts("a\nb\nc\nd", "a\nc\nd\ne");
        let backward = diff_texts("a\nc\nd\ne", "a\nb\nc\nd");
        assert_eq!(forward.len(), backward.len());
        for (f, b) in forward.iter().zip(&backward) {
            let flipped = match f.status {
                LineStatus::Added => LineStatus::Removed,
                LineStatus::Removed => LineStatus::Added,
                other => other,
            };
            assert_eq!(b.status, flipped);
            assert_eq!(f.left, b.right);
            assert_eq!(f.right, b.left);
            assert_eq!(f.left_line_number, b.right_line_number);
        }
    }

    #[test]
    fn test_role_swap_can_change_row_count() {
        let forward = diff_texts(" \n\n", "\na");
        let statuses: Vec<_> = forward.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                LineStatus::Removed,
                LineStatus::Removed,
                LineStatus::Same,
                LineStatus::Added
            ]
        );

        let backward = diff_texts("\na", " \n\n");
        let statuses: Vec<_> = backward.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![LineStatus::Added, LineStatus::Same, LineStatus::Changed]
        );
        assert_eq!(backward[2].left.as_deref(), Some("a"));
        assert_eq!(backward[2].right.as_deref(), Some(""));
    }

    #[test]
    fn test_whitespace_is_unicode_white_space() {
        let words = align_words("\u{85}a b", "\u{feff}a b");
        assert_eq!(words.leading_left, "\u{85}");
        assert_eq!(words.leading_right, "");
        assert_eq!(words.right_parts[0].text, "\u{feff}a");
        assert_eq!(words.right_parts[0].kind, WordKind::Added);
    }

    #[test]
    fn test_unicode_words() {
        let words = align_words("héllo wörld", "héllo wörld!");
        assert_eq!(words.left_parts[1].kind, WordKind::Removed);
        let (text, ranges) = render_word_line(&words.leading_right, &words.right_parts);
        assert_eq!(&text[ranges[0].clone()], "wörld!");
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;
        use similar::{ChangeTag, TextDiff};

        fn text() -> impl Strategy<Value = String> {
            prop::collection::vec("[abc ]{0,4}", 0..12).prop_map(|lines| lines.join("\n"))
        }

        proptest! {
            #[test]
            fn identity_diff_is_all_same(s in text()) {
                let rows = diff_texts(&s, &s);
                prop_assert_eq!(rows.len(), split_lines(&s).len());
                for (row, line) in rows.iter().zip(split_lines(&s)) {
                    prop_assert_eq!(row.status, LineStatus::Same);
                    prop_assert_eq!(row.left.as_deref(), Some(line));
                    prop_assert_eq!(row.right.as_deref(), Some(line));
                }
            }

            #[test]
            fn rows_conserve_lines_and_number_monotonically(a in text(), b in text()) {
                let rows = diff_texts(&a, &b);
                let left_numbers: Vec<usize> =
                    rows.iter().filter_map(|r| r.left_line_number).collect();
                let right_numbers: Vec<usize> =
                    rows.iter().filter_map(|r| r.right_line_number).collect();
                let left_lines = split_lines(&a);
                let right_lines = split_lines(&b);

                prop_assert_eq!(left_numbers, (1..=left_lines.len()).collect::<Vec<_>>());
                prop_assert_eq!(right_numbers, (1..=right_lines.len()).collect::<Vec<_>>());

                for row in &rows {
                    match row.status {
                        LineStatus::Same => {
                            prop_assert_eq!(&row.left, &row.right);
                            prop_assert!(row.left.is_some());
                        }
                        LineStatus::Changed => {
                            prop_assert!(row.left.is_some() && row.right.is_some());
                        }
                        LineStatus::Added => {
                            prop_assert!(row.left.is_none() && row.left_line_number.is_none());
                            prop_assert!(row.right.is_some());
                        }
                        LineStatus::Removed => {
                            prop_assert!(row.right.is_none() && row.right_line_number.is_none());
                            prop_assert!(row.left.is_some());
                        }
                    }
                    if let Some(n) = row.left_line_number {
                        prop_assert_eq!(row.left.as_deref(), Some(left_lines[n - 1]));
                    }
                    if let Some(n) = row.right_line_number {
                        prop_assert_eq!(row.right.as_deref(), Some(right_lines[n - 1]));
                    }
                }
            }

            #[test]
            fn same_rows_match_reference_lcs_length(a in text(), b in text()) {
                let rows = diff_texts(&a, &b);
                let left_lines = split_lines(&a);
                let right_lines = split_lines(&b);
                let reference = TextDiff::from_slices(&left_lines, &right_lines);
                let equal = reference
                    .iter_all_changes()
                    .filter(|c| c.tag() == ChangeTag::Equal)
                    .count();
                let same = rows.iter().filter(|r| r.status == LineStatus::Same).count();
                prop_assert_eq!(same, equal);
            }

            #[test]
            fn edit_count_is_invariant_under_role_swap(a in text(), b in text()) {
                // A changed row carries two edits, so rows alone may differ.
                let edits = |rows: &[DiffRow]| {
                    rows.len() + rows.iter().filter(|r| r.status == LineStatus::Changed).count()
                };
                prop_assert_eq!(edits(&diff_texts(&a, &b)), edits(&diff_texts(&b, &a)));
            }

            #[test]
            fn word_parts_rebuild_collapsed_line(a in "[ab \t]{0,16}", b in "[ab \t]{0,16}") {
                let words = align_words(&a, &b);
                let collapse = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
                let rebuild = |parts: &[WordPart]| {
                    parts.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(" ")
                };
                prop_assert_eq!(rebuild(&words.left_parts), collapse(&a));
                prop_assert_eq!(rebuild(&words.right_parts), collapse(&b));
                prop_assert!(words.left_parts.iter().all(|p| p.kind != WordKind::Added));
                prop_assert!(words.right_parts.iter().all(|p| p.kind != WordKind::Removed));
            }

            #[test]
            fn filter_keeps_non_same_rows_in_order(a in text(), b in text()) {
                let rows = diff_texts(&a, &b);
                let expected: Vec<&DiffRow> =
                    rows.iter().filter(|r| r.status != LineStatus::Same).collect();
                prop_assert_eq!(visible_rows(&rows, true), expected);
            }
        }
    }
}
