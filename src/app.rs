use crossterm::event::KeyCode;
use syntect::{
    highlighting::{Theme, ThemeSet},
    parsing::SyntaxSet,
};
use tracing::{debug, error, warn};

use crate::config::{DEFAULT_THEME, Settings};
use crate::diff_engine::{DiffRow, DiffSummary, diff_texts, visible_rows};
use crate::input::{DiffInput, InputPolicy};

const PAGE: usize = 10;
const H_STEP: usize = 4;
const H_PAGE: usize = 20;

pub struct App {
    pub input: DiffInput,
    pub rows: Vec<DiffRow>,
    pub summary: DiffSummary,
    pub only_changes: bool,
    pub word_highlight: bool,
    pub show_shortcuts: bool,
    pub syntax_enabled: bool,
    pub scroll_offset: usize,
    pub horizontal_scroll_offset: usize,
    pub status_message: Option<String>,
    pub syntax_set: SyntaxSet,
    pub theme_set: ThemeSet,
    theme_name: String,
    policy: InputPolicy,
}

impl App {
    pub fn new(input: DiffInput, settings: &Settings) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme_name = if theme_set.themes.contains_key(&settings.theme) {
            settings.theme.clone()
        } else {
            warn!(theme = %settings.theme, "unknown theme, using {}", DEFAULT_THEME);
            DEFAULT_THEME.to_string()
        };

        let mut app = Self {
            input,
            rows: Vec::new(),
            summary: DiffSummary::default(),
            only_changes: settings.only_changes,
            word_highlight: settings.word_highlight,
            show_shortcuts: true,
            syntax_enabled: settings.syntax,
            scroll_offset: 0,
            horizontal_scroll_offset: 0,
            status_message: None,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            theme_name,
            policy: settings.policy,
        };
        app.recompute();
        app
    }

    /// Re-aligns both buffers from scratch.
    pub fn recompute(&mut self) {
        self.rows = diff_texts(&self.input.left, &self.input.right);
        self.summary = DiffSummary::from_rows(&self.rows);
        debug!(rows = self.rows.len(), summary = %self.summary, "aligned inputs");
        self.clamp_scroll();
    }

    pub fn visible_rows(&self) -> Vec<&DiffRow> {
        visible_rows(&self.rows, self.only_changes)
    }

    pub fn visible_count(&self) -> usize {
        if self.only_changes {
            self.rows.len() - self.summary.same
        } else {
            self.rows.len()
        }
    }

    fn clamp_scroll(&mut self) {
        let max = self.visible_count().saturating_sub(1);
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max = self.visible_count().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.visible_count().saturating_sub(1);
    }

    pub fn scroll_right(&mut self, columns: usize) {
        self.horizontal_scroll_offset += columns;
    }

    pub fn scroll_left(&mut self, columns: usize) {
        self.horizontal_scroll_offset = self.horizontal_scroll_offset.saturating_sub(columns);
    }

    pub fn toggle_changes_only(&mut self) {
        self.only_changes = !self.only_changes;
        debug!(only_changes = self.only_changes, "toggled filter");
        self.clamp_scroll();
    }

    pub fn toggle_word_highlight(&mut self) {
        self.word_highlight = !self.word_highlight;
        debug!(word_highlight = self.word_highlight, "toggled word highlight");
    }

    pub fn toggle_shortcuts(&mut self) {
        self.show_shortcuts = !self.show_shortcuts;
    }

    pub fn swap_sides(&mut self) {
        self.input.swap();
        self.recompute();
    }

    pub fn reload(&mut self) {
        match self.input.reload(self.policy) {
            Ok(()) => {
                self.status_message = None;
                self.recompute();
            }
            Err(err) => {
                error!(%err, "reload failed");
                self.status_message = Some(err.to_string());
            }
        }
    }

    /// Applies one key press. Returns `false` when the viewer should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::Char('d') | KeyCode::PageDown => self.scroll_down(PAGE),
            KeyCode::Char('u') | KeyCode::PageUp => self.scroll_up(PAGE),
            KeyCode::Char('g') | KeyCode::Home => self.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.scroll_to_bottom(),
            KeyCode::Char('l') | KeyCode::Right => self.scroll_right(H_STEP),
            KeyCode::Char('h') | KeyCode::Left => self.scroll_left(H_STEP),
            KeyCode::Char('L') => self.scroll_right(H_PAGE),
            KeyCode::Char('H') => self.scroll_left(H_PAGE),
            KeyCode::Char('c') => self.toggle_changes_only(),
            KeyCode::Char('w') => self.toggle_word_highlight(),
            KeyCode::Char('x') => self.swap_sides(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('?') => self.toggle_shortcuts(),
            _ => {}
        }
        true
    }

    pub fn get_syntax_for_file(
        &self,
        filename: &str,
    ) -> Option<&syntect::parsing::SyntaxReference> {
        if !self.syntax_enabled {
            return None;
        }

        // Try by extension first
        if let Some(extension) = std::path::Path::new(filename).extension()
            && let Some(ext_str) = extension.to_str()
        {
            match ext_str {
                "ts" | "tsx" => {
                    // TypeScript isn't in default syntect, use JavaScript syntax
                    return self
                        .syntax_set
                        .find_syntax_by_extension("js")
                        .or_else(|| self.syntax_set.find_syntax_by_name("JavaScript"));
                }
                "jsx" => return self.syntax_set.find_syntax_by_extension("js"),
                "cc" | "cxx" | "hpp" => return self.syntax_set.find_syntax_by_extension("cpp"),
                _ => {}
            }
            if let Some(syntax) = self.syntax_set.find_syntax_by_extension(ext_str) {
                return Some(syntax);
            }
        }

        // Only the extension is trusted; stdin and missing files have none.
        None
    }

    pub fn get_theme(&self) -> &Theme {
        &self.theme_set.themes[&self.theme_name]
    }

    pub fn get_syntax_set(&self) -> &SyntaxSet {
        &self.syntax_set
    }
}
