use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub const DEFAULT_MAX_LINES: usize = 10_000;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {label}: {source}")]
    Io {
        label: String,
        #[source]
        source: io::Error,
    },

    #[error("{label} has {lines} lines, more than the limit of {max} (see --max-lines)")]
    TooLarge {
        label: String,
        lines: usize,
        max: usize,
    },

    #[error("stdin can only be used for one side")]
    DuplicateStdin,
}

/// Where one side of the diff comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Stdin,
}

impl Source {
    /// `-` means stdin, anything else is a path.
    pub fn parse(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            Source::Stdin
        } else {
            Source::Path(arg.to_path_buf())
        }
    }

    pub fn label(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Stdin => "<stdin>".to_string(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Upper bound on lines per side. The alignment table grows with the product
/// of both line counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPolicy {
    /// `0` disables the check.
    pub max_lines: usize,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}

/// Lines as the aligner sees them: an empty text is one empty line.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

impl InputPolicy {
    pub fn check(&self, label: &str, text: &str) -> Result<(), InputError> {
        if self.max_lines == 0 {
            return Ok(());
        }
        let lines = line_count(text);
        if lines > self.max_lines {
            return Err(InputError::TooLarge {
                label: label.to_string(),
                lines,
                max: self.max_lines,
            });
        }
        Ok(())
    }
}

pub fn load_source(source: &Source) -> Result<String, InputError> {
    let label = source.label();
    let result = match source {
        Source::Path(path) => fs::read_to_string(path),
        Source::Stdin => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    result.map_err(|source| InputError::Io { label, source })
}

fn reread(source: Option<&Source>, policy: InputPolicy) -> Result<Option<String>, InputError> {
    match source {
        Some(source @ Source::Path(_)) => {
            let text = load_source(source)?;
            policy.check(&source.label(), &text)?;
            Ok(Some(text))
        }
        _ => Ok(None),
    }
}

/// The two text buffers being compared.
#[derive(Debug, Clone)]
pub struct DiffInput {
    pub left: String,
    pub right: String,
    pub left_source: Option<Source>,
    pub right_source: Option<Source>,
}

impl DiffInput {
    #[cfg(test)]
    pub fn from_strings(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            left_source: None,
            right_source: None,
        }
    }

    pub fn load(left: Source, right: Source, policy: InputPolicy) -> Result<Self, InputError> {
        if left == Source::Stdin && right == Source::Stdin {
            return Err(InputError::DuplicateStdin);
        }

        let left_text = load_source(&left)?;
        policy.check(&left.label(), &left_text)?;
        let right_text = load_source(&right)?;
        policy.check(&right.label(), &right_text)?;

        info!(
            left = %left,
            right = %right,
            left_lines = line_count(&left_text),
            right_lines = line_count(&right_text),
            "loaded inputs"
        );

        Ok(Self {
            left: left_text,
            right: right_text,
            left_source: Some(left),
            right_source: Some(right),
        })
    }

    /// Re-reads file-backed sides. Stdin and in-memory buffers are kept.
    /// Both sides are replaced together or not at all.
    pub fn reload(&mut self, policy: InputPolicy) -> Result<(), InputError> {
        let left = reread(self.left_source.as_ref(), policy)?;
        let right = reread(self.right_source.as_ref(), policy)?;
        if let Some(text) = left {
            self.left = text;
        }
        if let Some(text) = right {
            self.right = text;
        }
        Ok(())
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
        std::mem::swap(&mut self.left_source, &mut self.right_source);
    }

    pub fn left_label(&self) -> String {
        self.left_source
            .as_ref()
            .map_or_else(|| "left".to_string(), Source::label)
    }

    pub fn right_label(&self) -> String {
        self.right_source
            .as_ref()
            .map_or_else(|| "right".to_string(), Source::label)
    }
}
