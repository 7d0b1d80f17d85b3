use std::path::PathBuf;

use clap::Parser;

use crate::input::{DEFAULT_MAX_LINES, InputPolicy, Source};

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Left (old) file, or "-" for stdin
    pub left: PathBuf,

    /// Right (new) file, or "-" for stdin
    pub right: PathBuf,

    /// Start with unchanged lines hidden
    #[arg(short = 'c', long)]
    pub changes_only: bool,

    /// Start with word-level highlighting of changed lines turned off
    #[arg(long)]
    pub no_word_highlight: bool,

    /// Print a plain side-by-side diff to stdout instead of opening the viewer
    #[arg(short, long)]
    pub print: bool,

    /// Maximum lines per input (0 disables the limit)
    #[arg(long, env = "SIDEDIFF_MAX_LINES", default_value_t = DEFAULT_MAX_LINES)]
    pub max_lines: usize,

    /// Syntect theme used for syntax highlighting
    #[arg(long, env = "SIDEDIFF_THEME", default_value = DEFAULT_THEME)]
    pub theme: String,

    /// Disable syntax highlighting
    #[arg(long)]
    pub no_syntax: bool,

    /// Total output width for --print
    #[arg(long, default_value_t = 160)]
    pub width: usize,

    /// Write logs to this file
    #[arg(long, env = "SIDEDIFF_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Resolved runtime settings shared by the viewer and the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub left: Source,
    pub right: Source,
    pub only_changes: bool,
    pub word_highlight: bool,
    pub print: bool,
    pub policy: InputPolicy,
    pub theme: String,
    pub syntax: bool,
    pub width: usize,
}

impl Settings {
    pub fn from_args(args: &Args) -> Self {
        Self {
            left: Source::parse(&args.left),
            right: Source::parse(&args.right),
            only_changes: args.changes_only,
            word_highlight: !args.no_word_highlight,
            print: args.print,
            policy: InputPolicy {
                max_lines: args.max_lines,
            },
            theme: args.theme.clone(),
            syntax: !args.no_syntax,
            width: args.width,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            left: Source::Stdin,
            right: Source::Stdin,
            only_changes: false,
            word_highlight: true,
            print: false,
            policy: InputPolicy::default(),
            theme: DEFAULT_THEME.to_string(),
            syntax: true,
            width: 160,
        }
    }
}
