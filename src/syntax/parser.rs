//! Plotscript Parser
//!
//! Converts source text into a single [`Expression`] tree. The parser is purely
//! syntactic: it never consults an environment.

use crate::ast::{Atom, Expression};
use crate::errors::{ErrorContext, ErrorKind, ErrorReporting, PlotscriptError, SourceContext};
use miette::SourceSpan;
use pest::{error::Error, iterators::Pair, Parser};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct PlotscriptParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse a program into its expression tree.
pub fn parse(source_text: &str, source_context: SourceContext) -> Result<Expression, PlotscriptError> {
    let context = ErrorContext::parser(source_context);

    let mut pairs = PlotscriptParser::parse(Rule::program, source_text)
        .map_err(|e| convert_parse_error(e, &context))?;

    let expression = pairs
        .next()
        .and_then(|program| program.into_inner().find(|p| p.as_rule() == Rule::expression))
        .ok_or_else(|| {
            context.report(
                ErrorKind::Parse {
                    message: "empty program".into(),
                },
                SourceSpan::from(0..source_text.len()),
            )
        })?;

    build_expression(expression, &context)
}

// ============================================================================
// AST BUILDERS
// ============================================================================

fn build_expression(pair: Pair<Rule>, context: &ErrorContext) -> Result<Expression, PlotscriptError> {
    match pair.as_rule() {
        Rule::expression => {
            let span = get_span(&pair);
            let mut inner = pair.into_inner();
            let head = match inner.next() {
                Some(head) => build_atom(head, context)?,
                None => return Err(make_error(context, "missing head", span)),
            };
            let tail = inner
                .map(|p| build_expression(p, context))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expression::new(head, tail))
        }
        _ => Ok(Expression::atom(build_atom(pair, context)?)),
    }
}

fn build_atom(pair: Pair<Rule>, context: &ErrorContext) -> Result<Atom, PlotscriptError> {
    let span = get_span(&pair);

    match pair.as_rule() {
        Rule::number => pair
            .as_str()
            .parse::<f64>()
            .map(Atom::Number)
            .map_err(|_| make_error(context, &format!("invalid number '{}'", pair.as_str()), span)),
        Rule::string => Ok(Atom::String(unescape_string(pair.as_str()))),
        Rule::symbol => Ok(Atom::symbol(pair.as_str())),
        other => Err(make_error(
            context,
            &format!("expected an atom, found {:?}", other),
            span,
        )),
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn get_span(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    SourceSpan::from(span.start()..span.end())
}

fn unescape_string(text: &str) -> String {
    // Remove surrounding quotes
    let inner = &text[1..text.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn make_error(context: &ErrorContext, message: &str, span: SourceSpan) -> PlotscriptError {
    context.report(
        ErrorKind::Parse {
            message: message.to_string(),
        },
        span,
    )
}

fn convert_parse_error(error: Error<Rule>, context: &ErrorContext) -> PlotscriptError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => SourceSpan::from(pos..pos),
        pest::error::InputLocation::Span((start, end)) => SourceSpan::from(start..end),
    };

    let rendered = error.to_string();
    let message = if rendered.contains("expected EOI") {
        "expected exactly one expression"
    } else if rendered.contains("expected number, string, or symbol") {
        "expected an atom"
    } else if rendered.contains("expected expression") {
        "expected an expression"
    } else {
        "syntax error"
    };

    make_error(context, message, span)
}
