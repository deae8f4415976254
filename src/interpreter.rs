//! The embedding entry point: one environment plus the program most recently
//! parsed into it.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::ast::Expression;
use crate::errors::{ErrorContext, ErrorKind, PlotscriptError, SourceContext};
use crate::errors::{unspanned, ErrorReporting};
use crate::runtime::{evaluate_with_config, EngineConfig, Environment};
use crate::syntax::parse;

#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    env: Environment,
    config: EngineConfig,
    program: Option<(Expression, SourceContext)>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Parses `source` and holds it as the pending program. On failure the
    /// previous program is discarded.
    pub fn parse_stream(&mut self, source: &str) -> Result<(), PlotscriptError> {
        self.parse_named("<input>", source)
    }

    fn parse_named(&mut self, name: &str, source: &str) -> Result<(), PlotscriptError> {
        self.program = None;
        let context = SourceContext::from_file(name, source);
        let program = parse(source, context.clone())?;
        self.program = Some((program, context));
        Ok(())
    }

    /// Evaluates the pending program. Errors carry the program source.
    pub fn evaluate(&mut self) -> Result<Expression, PlotscriptError> {
        let Some((program, source)) = &self.program else {
            return Err(ErrorContext::parser(SourceContext::inline("")).report(
                ErrorKind::Parse {
                    message: "no program has been parsed".into(),
                },
                unspanned(),
            ));
        };
        evaluate_with_config(program, &mut self.env, self.config)
            .map_err(|e| e.with_source(source))
    }

    /// Parses and evaluates in one step.
    pub fn eval_source(&mut self, source: &str) -> Result<Expression, PlotscriptError> {
        self.parse_stream(source)?;
        self.evaluate()
    }

    /// Parses and evaluates a named source, such as a file.
    pub fn eval_named(&mut self, name: &str, source: &str) -> Result<Expression, PlotscriptError> {
        self.parse_named(name, source)?;
        self.evaluate()
    }

    /// Reads and evaluates a program file.
    pub fn eval_file(&mut self, path: &Path) -> Result<Expression, PlotscriptError> {
        let source = fs::read_to_string(path).map_err(|e| {
            ErrorContext::io().report(
                ErrorKind::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                },
                unspanned(),
            )
        })?;
        self.eval_named(&path.display().to_string(), &source)
    }

    /// Evaluates a startup script whose definitions become part of this
    /// interpreter's environment. A failing script leaves the environment as
    /// it was.
    pub fn load_startup(&mut self, path: &Path) -> Result<(), PlotscriptError> {
        let saved = self.env.clone();
        match self.eval_file(path) {
            Ok(_) => {
                debug!(path = %path.display(), "startup file loaded");
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "startup file failed");
                self.env = saved;
                Err(e)
            }
        }
    }

    /// Discards every binding and reinstalls the defaults.
    pub fn reset(&mut self) {
        self.env.reset();
        self.program = None;
    }
}
