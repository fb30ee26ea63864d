//! Miette diagnostics for errors that deserve source context.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A configuration file error pointing at the offending TOML.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(mcdesk::config))]
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
    pub fn new(message: impl Into<String>, src: impl Into<String>, offset: usize, len: usize) -> Self {
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

    /// Build from a TOML parse failure, when it carries a location.
    #[must_use]
    pub fn from_toml(err: &toml::de::Error, src: &str) -> Option<Self> {
        let span = err.span()?;
        let len = span.end.saturating_sub(span.start).max(1);
        Some(
            Self::new(err.message(), src, span.start, len)
                .with_help("see `mcdesk config show` for the expected layout"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_keep_their_location() {
        let src = "[api]\ntimeout_ms = \"soon\"\n";
        let err = toml::from_str::<crate::config::Config>(src).unwrap_err();
        let diagnostic = ConfigDiagnostic::from_toml(&err, src).unwrap();
        let offset: usize = diagnostic.span.offset();
        assert!(offset >= 6, "span should point into the [api] table");
        assert!(diagnostic.help.is_some());
    }
}
