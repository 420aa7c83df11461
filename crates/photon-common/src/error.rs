//! The error taxonomy described in spec §7: every failure the CORE can raise
//! funnels into one of these five variants so the driver and the REPL can
//! report it uniformly through `showError`.

use std::fmt;
use std::path::PathBuf;

use ariadne::{Label, Report, ReportKind, Source};

use crate::span::Span;

/// A single error produced anywhere in the Photon CORE.
#[derive(Debug, Clone)]
pub enum PhotonError {
    /// A reduction failed, or a valid parse used a construct this engine
    /// does not support (e.g. mixed-type map keys).
    Syntax {
        filename: String,
        line: u32,
        column: u32,
        snippet: String,
        message: String,
    },
    /// Scope lookup failed where resolution was required.
    NameNotFound { name: String, span: Option<Span> },
    /// A module file could not be found, or a sub-engine failed while
    /// transpiling it.
    Import {
        module: String,
        reason: String,
        source: Option<Box<PhotonError>>,
    },
    /// A module import formed a cycle back to a module already being loaded.
    ImportCycle { chain: Vec<PathBuf> },
    /// A valid parse whose semantics the engine does not yet model, e.g. a
    /// native-extension import.
    Unsupported { message: String },
    /// Source file open/read failure.
    Io { path: PathBuf, reason: String },
}

impl fmt::Display for PhotonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotonError::Syntax {
                filename,
                line,
                column,
                message,
                ..
            } => write!(f, "{filename}:{line}:{column}: syntax error: {message}"),
            PhotonError::NameNotFound { name, .. } => {
                write!(f, "name not found: '{name}'")
            }
            PhotonError::Import {
                module, reason, ..
            } => write!(f, "cannot import '{module}': {reason}"),
            PhotonError::ImportCycle { chain } => {
                let names: Vec<String> = chain.iter().map(|p| p.display().to_string()).collect();
                write!(f, "import cycle detected: {}", names.join(" -> "))
            }
            PhotonError::Unsupported { message } => write!(f, "unsupported construct: {message}"),
            PhotonError::Io { path, reason } => {
                write!(f, "I/O error on '{}': {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for PhotonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PhotonError::Import { source, .. } => source.as_deref().map(|e| e as _),
            _ => None,
        }
    }
}

impl PhotonError {
    pub fn syntax(filename: impl Into<String>, line: u32, column: u32, snippet: impl Into<String>, message: impl Into<String>) -> Self {
        PhotonError::Syntax {
            filename: filename.into(),
            line,
            column,
            snippet: snippet.into(),
            message: message.into(),
        }
    }

    pub fn name_not_found(name: impl Into<String>, span: Option<Span>) -> Self {
        PhotonError::NameNotFound {
            name: name.into(),
            span,
        }
    }

    /// Render this error to stderr with source-span labels via `ariadne`,
    /// mirroring how the teacher's CLI renders parse/type diagnostics.
    pub fn eprint(&self, source: &str) {
        match self {
            PhotonError::Syntax {
                filename,
                message,
                ..
            } => {
                let start = self.primary_span().map(|s| s.start as usize).unwrap_or(0);
                let end = self
                    .primary_span()
                    .map(|s| s.end as usize)
                    .unwrap_or(start + 1)
                    .max(start + 1);
                let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
                    .with_message(message)
                    .with_label(Label::new(start..end).with_message(message))
                    .finish()
                    .eprint(Source::from(source));
                let _ = filename;
            }
            other => eprintln!("error: {other}"),
        }
    }

    fn primary_span(&self) -> Option<Span> {
        match self {
            PhotonError::NameNotFound { span, .. } => *span,
            _ => None,
        }
    }
}

pub type PhotonResult<T> = Result<T, PhotonError>;
