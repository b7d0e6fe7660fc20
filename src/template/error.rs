//! Errors raised while compiling or executing templates

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use super::lexer::{Span, Token};

/// A single syntax problem in template text
#[derive(Error, Debug, Clone, PartialEq)]
#[error("syntax error at {span:?}: {message}")]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
    pub expected: Vec<String>,
}

/// Template text could not be compiled
#[derive(Error, Debug, Clone)]
#[error("template {source_text:?} does not compile: {}", format_syntax_errors(.errors))]
pub struct CompileError {
    pub source_text: String,
    pub errors: Vec<SyntaxError>,
}

fn format_syntax_errors(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CompileError {
    pub fn new(source_text: impl Into<String>, errors: Vec<SyntaxError>) -> Self {
        Self {
            source_text: source_text.into(),
            errors,
        }
    }

    /// Format the errors with source context using ariadne
    pub fn format(&self, filename: &str) -> String {
        let mut buf = Vec::new();
        for error in &self.errors {
            let expected_str = if error.expected.is_empty() {
                String::new()
            } else {
                format!("\nExpected: {}", error.expected.join(", "))
            };

            let written = Report::build(ReportKind::Error, filename, error.span.start)
                .with_message(&error.message)
                .with_label(
                    Label::new((filename, error.span.clone()))
                        .with_message(format!("{}{}", error.message, expected_str))
                        .with_color(Color::Red),
                )
                .finish()
                .write((filename, Source::from(self.source_text.as_str())), &mut buf);
            if written.is_err() {
                buf.extend_from_slice(error.to_string().as_bytes());
                buf.push(b'\n');
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A compiled template failed against its resolution scope
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The owner has no name under the referenced key
    #[error("unable to resolve variable '{key}'")]
    Unresolved { key: String },

    /// Evaluating a name required its own value
    #[error("circular name reference detected: {chain}")]
    CircularReference { chain: String },

    /// The name under a referenced key failed for another reason
    #[error("name '{key}' could not be computed: {message}")]
    Failed { key: String, message: String },
}

impl EvaluationError {
    pub fn unresolved(key: impl Into<String>) -> Self {
        Self::Unresolved { key: key.into() }
    }

    pub fn circular(chain: impl Into<String>) -> Self {
        Self::CircularReference {
            chain: chain.into(),
        }
    }

    pub fn failed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for SyntaxError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of template".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of template".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        SyntaxError {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Text(s) => format!("text {:?}", s),
        Token::Open => "'${'".to_string(),
        Token::Ident(s) => format!("name '{}'", s),
        Token::Close => "'}'".to_string(),
        Token::Unexpected(s) => format!("character '{}'", s),
    }
}
