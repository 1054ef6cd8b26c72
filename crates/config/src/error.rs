//! Error types for settings loading and validation.

use std::{
    cmp::{max, min},
    fmt::Write as _,
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while loading, parsing, or validating settings.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// RON parse error with a line/column location and excerpt.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        col: usize,
        /// Human-readable error message.
        message: String,
        /// Rendered excerpt including a caret at the error location.
        excerpt: String,
    },
    #[error("{message}")]
    /// A value parsed but is not acceptable.
    Validation {
        /// Optional path associated with the validation error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Render a human-friendly error message including location and an excerpt when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse {
                path,
                line,
                col,
                message,
                excerpt,
            } => match path {
                Some(p) => format!(
                    "Settings parse error at {}:{}:{}\n{}\n{}",
                    p.display(),
                    line,
                    col,
                    message,
                    excerpt
                ),
                None => format!(
                    "Settings parse error at line {}, column {}\n{}\n{}",
                    line, col, message, excerpt
                ),
            },
            Self::Validation { path, message } => match path {
                Some(p) => format!("Settings validation error at {}\n{}", p.display(), message),
                None => format!("Settings validation error\n{}", message),
            },
        }
    }

    /// Access the optional path attached to this error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Validation { path, .. } => {
                path.as_deref()
            }
        }
    }

    /// Attach `path` to this error.
    #[must_use]
    pub fn with_path(self, p: &Path) -> Self {
        let p = Some(p.to_path_buf());
        match self {
            Self::Read { message, .. } => Self::Read { path: p, message },
            Self::Parse {
                line,
                col,
                message,
                excerpt,
                ..
            } => Self::Parse {
                path: p,
                line,
                col,
                message,
                excerpt,
            },
            Self::Validation { message, .. } => Self::Validation { path: p, message },
        }
    }
}

/// Build a small 2–3 line excerpt with a caret at `(line_no, col_no)`.
pub fn excerpt_at(source: &str, line_no: usize, col_no: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let total = lines.len();
    let start = max(1usize, line_no.saturating_sub(2));
    let end = min(total, line_no + 1);

    let mut out = String::new();
    for n in start..=end {
        let text = lines.get(n - 1).copied().unwrap_or("");
        let _ignored = writeln!(out, " {:>4} | {}", n, text);
        if n == line_no {
            let prefix = format!(" {:>4} | ", n);
            let _ignored = writeln!(
                out,
                "{}{}^",
                " ".repeat(prefix.len()),
                " ".repeat(col_no.saturating_sub(1))
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_points_at_column() {
        let src = "(\n  picker: (\n    cursor: 3,\n  ),\n)";
        let ex = excerpt_at(src, 3, 13);
        let lines: Vec<&str> = ex.lines().collect();
        assert_eq!(lines[0], "    1 | (");
        assert_eq!(lines[2], "    3 |     cursor: 3,");
        let caret = lines[3];
        assert_eq!(caret.find('^'), Some(" 1234 | ".len() + 12));
        assert_eq!(lines[4], "    4 |   ),");
    }

    #[test]
    fn pretty_includes_path() {
        let e = Error::Validation {
            path: None,
            message: "bad".into(),
        }
        .with_path(Path::new("/tmp/s.ron"));
        assert_eq!(e.path(), Some(Path::new("/tmp/s.ron")));
        assert!(e.pretty().contains("/tmp/s.ron"));
    }
}
