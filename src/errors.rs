//! Plotscript Error Handling - Unified Encapsulated API
//!
//! Every failure in the engine, from the parser to the plot compiler, is a
//! [`PlotscriptError`]. Errors are created through the [`ErrorReporting`] trait
//! so that codes, phases and help text stay consistent across the crate.

use miette::{Diagnostic, SourceSpan};
use miette::{LabeledSpan, NamedSource};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Named source text attached to diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a source context for text that did not come from a file
    /// (command-line expressions, REPL lines, session messages).
    pub fn inline(content: impl Into<String>) -> Self {
        Self::from_file("<input>", content)
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

/// The single error type
#[derive(Debug, Clone)]
pub struct PlotscriptError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Where it happened
    pub source_info: SourceInfo,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

/// All error kinds. The runtime variants mirror the language's error taxonomy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("Error: invalid expression. could not parse: {message}")]
    Parse { message: String },

    #[error("Error: wrong number of arguments to {procedure}: expected {expected}, got {actual}")]
    Argument {
        procedure: String,
        expected: String,
        actual: usize,
    },

    #[error("Error: {procedure} expected {expected}, got {actual}")]
    Type {
        procedure: String,
        expected: String,
        actual: String,
    },

    #[error("Error: unbound symbol '{symbol}'")]
    UnboundSymbol { symbol: String },

    #[error("Error: unknown procedure '{name}'")]
    UnknownProcedure { name: String },

    #[error("Error: cannot redefine reserved name '{name}'")]
    Redefinition { name: String },

    #[error("Error: cannot plot: {message}")]
    PlotDomain { message: String },

    #[error("Error: recursion limit of {limit} nested evaluations exceeded")]
    RecursionLimit { limit: usize },

    #[error("Error: could not read '{path}': {message}")]
    Io { path: String, message: String },
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Option<Arc<NamedSource<String>>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Runtime,
    Plot,
    Io,
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Parse { .. } => ErrorCategory::Parse,
            Self::Argument { .. }
            | Self::Type { .. }
            | Self::UnboundSymbol { .. }
            | Self::UnknownProcedure { .. }
            | Self::Redefinition { .. }
            | Self::RecursionLimit { .. } => ErrorCategory::Runtime,
            Self::PlotDomain { .. } => ErrorCategory::Plot,
            Self::Io { .. } => ErrorCategory::Io,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse_error",
            Self::Argument { .. } => "argument_error",
            Self::Type { .. } => "type_error",
            Self::UnboundSymbol { .. } => "unbound_symbol",
            Self::UnknownProcedure { .. } => "unknown_procedure",
            Self::Redefinition { .. } => "redefinition",
            Self::PlotDomain { .. } => "plot_domain",
            Self::RecursionLimit { .. } => "recursion_limit",
            Self::Io { .. } => "io_error",
        }
    }

    fn default_help(&self) -> Option<String> {
        match self {
            Self::Parse { .. } => Some(
                "a program is a single parenthesised expression such as (+ 1 2)".into(),
            ),
            Self::UnboundSymbol { symbol } => Some(format!(
                "bind it first with (define {} <expression>)",
                symbol
            )),
            Self::Redefinition { .. } => Some(
                "built-in procedures, special forms and the constants pi, e and I cannot be rebound"
                    .into(),
            ),
            Self::PlotDomain { .. } => Some(
                "plot data needs at least two distinct x values and two distinct y values".into(),
            ),
            _ => None,
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "could not parse",
            Self::Argument { .. } => "wrong number of arguments",
            Self::Type { .. } => "wrong argument type",
            Self::UnboundSymbol { .. } => "unbound symbol",
            Self::UnknownProcedure { .. } => "not a procedure",
            Self::Redefinition { .. } => "reserved name",
            Self::PlotDomain { .. } => "degenerate plot data",
            Self::RecursionLimit { .. } => "recursion too deep",
            Self::Io { .. } => "unreadable",
        }
    }
}

impl PlotscriptError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Attach program source to an error raised without one. Errors that
    /// already carry a source (parse errors) are left untouched.
    pub fn with_source(mut self, source: &SourceContext) -> Self {
        if self.source_info.source.is_none() {
            self.source_info.source = Some(source.to_named_source());
            self.source_info.primary_span = (0..source.content.len()).into();
        }
        self
    }
}

impl std::error::Error for PlotscriptError {}

impl fmt::Display for PlotscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl Diagnostic for PlotscriptError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.source_info.source.as_ref()?;
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_info
            .source
            .as_deref()
            .map(|s| s as &dyn miette::SourceCode)
    }
}

// ============================================================================
// ERROR CONSTRUCTION
// ============================================================================

/// Context-aware error creation - each context knows how to create appropriate errors
pub trait ErrorReporting {
    /// Create an error with context-appropriate enhancements
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> PlotscriptError;

    fn arity(&self, procedure: &str, expected: &str, actual: usize) -> PlotscriptError {
        self.report(
            ErrorKind::Argument {
                procedure: procedure.into(),
                expected: expected.into(),
                actual,
            },
            unspanned(),
        )
    }

    fn type_mismatch(&self, procedure: &str, expected: &str, actual: &str) -> PlotscriptError {
        self.report(
            ErrorKind::Type {
                procedure: procedure.into(),
                expected: expected.into(),
                actual: actual.into(),
            },
            unspanned(),
        )
    }

    fn unbound_symbol(&self, symbol: &str) -> PlotscriptError {
        self.report(
            ErrorKind::UnboundSymbol {
                symbol: symbol.into(),
            },
            unspanned(),
        )
    }

    fn unknown_procedure(&self, name: &str) -> PlotscriptError {
        self.report(ErrorKind::UnknownProcedure { name: name.into() }, unspanned())
    }

    fn redefinition(&self, name: &str) -> PlotscriptError {
        self.report(ErrorKind::Redefinition { name: name.into() }, unspanned())
    }

    fn plot_domain(&self, message: &str) -> PlotscriptError {
        self.report(
            ErrorKind::PlotDomain {
                message: message.into(),
            },
            unspanned(),
        )
    }
}

/// General-purpose error creation context, parameterised by pipeline phase.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub source: Option<SourceContext>,
    pub phase: &'static str,
}

impl ErrorContext {
    /// Context for evaluation and procedure failures; source is attached
    /// later at the top-level boundary.
    pub const fn runtime() -> Self {
        Self {
            source: None,
            phase: "runtime",
        }
    }

    pub const fn plot() -> Self {
        Self {
            source: None,
            phase: "plot",
        }
    }

    pub fn parser(source: SourceContext) -> Self {
        Self {
            source: Some(source),
            phase: "parse",
        }
    }

    pub const fn io() -> Self {
        Self {
            source: None,
            phase: "io",
        }
    }
}

impl ErrorReporting for ErrorContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> PlotscriptError {
        let error_code = format!("plotscript::{}::{}", self.phase, kind.code_suffix());
        let help = kind.default_help();

        PlotscriptError {
            kind,
            source_info: SourceInfo {
                source: self.source.as_ref().map(SourceContext::to_named_source),
                primary_span: span,
                phase: self.phase.to_string(),
            },
            diagnostic_info: DiagnosticInfo { help, error_code },
        }
    }
}

/// Shared context for built-in procedures, which have no source of their own.
pub const RUNTIME: ErrorContext = ErrorContext::runtime();

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a PlotscriptError with full miette diagnostics
pub fn print_error(error: PlotscriptError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// Placeholder span for errors not tied to a source location.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_errors_get_phase_codes() {
        let err = RUNTIME.arity("+", "at least 1", 0);
        assert_eq!(err.diagnostic_info.error_code, "plotscript::runtime::argument_error");
        assert_eq!(err.category(), ErrorCategory::Runtime);
        assert!(err.to_string().starts_with("Error:"));
    }

    #[test]
    fn with_source_only_fills_missing_source() {
        let src = SourceContext::inline("(foo)");
        let err = RUNTIME.unbound_symbol("foo").with_source(&src);
        assert!(err.source_info.source.is_some());
        assert_eq!(err.source_info.primary_span, SourceSpan::from(0..5));

        let parse_ctx = ErrorContext::parser(SourceContext::inline("(+ 1"));
        let parse_err = parse_ctx
            .report(
                ErrorKind::Parse {
                    message: "unbalanced".into(),
                },
                SourceSpan::from(4..4),
            )
            .with_source(&src);
        assert_eq!(parse_err.source_info.primary_span, SourceSpan::from(4..4));
    }
}
