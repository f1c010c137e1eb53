//! Miette-based diagnostics for configuration files.

use miette::{Diagnostic, Report, SourceSpan};
use thiserror::Error;

use crate::cli::output;
use crate::error::{ConfigError, Error};

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(showdown::config))]
pub struct ConfigDiagnostic {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: src.into(),
            span: (offset, len).into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Build a diagnostic for `err` against the file it came from.
    ///
    /// Returns `None` for errors that carry no location, such as I/O
    /// failures.
    #[must_use]
    pub fn from_error(err: &Error, src: &str) -> Option<Self> {
        match err {
            Error::Config(ConfigError::Parse(parse)) => {
                let span = parse.span().unwrap_or(0..0);
                Some(
                    Self::new(parse.message(), src, span.start, span.len())
                        .with_help("check the TOML syntax near the marked location"),
                )
            }
            Error::Config(ConfigError::InvalidValue { field, reason }) => {
                let (offset, len) = locate_key(src, field).unwrap_or((0, 0));
                Some(
                    Self::new(format!("invalid value for {field}: {reason}"), src, offset, len)
                        .with_help("run `showdown config init` for a documented template"),
                )
            }
            _ => None,
        }
    }
}

/// Byte span of the first line that assigns `key`.
fn locate_key(src: &str, key: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in src.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(key) {
            if rest.trim_start().starts_with('=') {
                let start = offset + (line.len() - trimmed.len());
                return Some((start, line.trim_end().len() - (line.len() - trimmed.len())));
            }
        }
        offset += line.len();
    }
    None
}

/// Render a located configuration error on stderr. JSON mode leaves error
/// reporting to the caller.
pub fn report_config_error(err: &Error, src: &str) {
    if output::is_json() {
        return;
    }
    if let Some(diagnostic) = ConfigDiagnostic::from_error(err, src) {
        eprintln!("{:?}", Report::new(diagnostic));
    }
}
