pub mod diff_utils;
pub mod footer;
pub mod header;
pub mod highlight_line;
pub mod render_ui;
pub mod side_by_side_diff;
