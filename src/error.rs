//! Error types for parsing and running layout scripts

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::layout::LayoutError;
use crate::script::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                report(
                    source,
                    filename,
                    span,
                    message,
                    &format!("{}{}", message, expected_str),
                    None,
                )
            }
        }
    }
}

/// Errors raised while running a parsed script against a layout
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    #[error("unknown anchor '{name}'")]
    UnknownAnchor {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    #[error("'{name}' names a border or margin anchor and cannot be rebound")]
    ReservedName { name: String, span: Span },

    #[error("{source}")]
    Layout { source: LayoutError, span: Span },
}

impl From<Vec<ParseError>> for ScriptError {
    fn from(errors: Vec<ParseError>) -> Self {
        ScriptError::Parse(errors)
    }
}

impl ScriptError {
    /// Wrap a layout error raised by the statement at `span`
    pub fn layout(source: LayoutError, span: Span) -> Self {
        Self::Layout { source, span }
    }

    /// Source location of the error, if it has exactly one
    pub fn span(&self) -> Option<Span> {
        match self {
            ScriptError::Parse(errors) => match errors.as_slice() {
                [ParseError::Syntax { span, .. }] => Some(span.clone()),
                _ => None,
            },
            ScriptError::UnknownAnchor { span, .. }
            | ScriptError::ReservedName { span, .. }
            | ScriptError::Layout { span, .. } => Some(span.clone()),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            ScriptError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            ScriptError::UnknownAnchor {
                name,
                span,
                suggestions,
            } => {
                let help = if suggestions.is_empty() {
                    None
                } else {
                    Some(format!("did you mean {}?", suggestions.join(", ")))
                };
                report(
                    source,
                    filename,
                    span,
                    &self.to_string(),
                    &format!("'{}' is not defined", name),
                    help,
                )
            }
            ScriptError::ReservedName { span, .. } => {
                report(source, filename, span, &self.to_string(), "reserved name", None)
            }
            ScriptError::Layout { source: err, span } => report(
                source,
                filename,
                span,
                "layout error",
                &err.to_string(),
                None,
            ),
        }
    }
}

fn report(
    source: &str,
    filename: &str,
    span: &Span,
    message: &str,
    label: &str,
    help: Option<String>,
) -> String {
    let mut builder = Report::build(ReportKind::Error, filename, span.start)
        .with_message(message)
        .with_label(
            Label::new((filename, span.clone()))
                .with_message(label)
                .with_color(Color::Red),
        );
    if let Some(help) = help {
        builder = builder.with_help(help);
    }

    let mut buf = Vec::new();
    if builder
        .finish()
        .write((filename, Source::from(source)), &mut buf)
        .is_err()
    {
        return format!("{}: {}", message, label);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        // Format the message based on the reason
        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) if **tok == Token::Error => "Unrecognized input".to_string(),
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        // Format expected tokens nicely
        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

fn keyword(tok: &Token) -> Option<&'static str> {
    let word = match tok {
        Token::Margins => "margins",
        Token::Gap => "gap",
        Token::Let => "let",
        Token::Anchor => "anchor",
        Token::Relate => "relate",
        Token::To => "to",
        Token::Absolute => "absolute",
        Token::AutoSize => "autosize",
        Token::On => "on",
        Token::Off => "off",
        Token::Horizontal => "horizontal",
        Token::Vertical => "vertical",
        Token::ColLeft => "col_left",
        Token::ColRight => "col_right",
        Token::RowTop => "row_top",
        Token::RowBottom => "row_bottom",
        Token::Stub => "stub",
        Token::At => "at",
        Token::Cell => "cell",
        Token::Cells => "cells",
        Token::Null => "null",
        _ => return None,
    };
    Some(word)
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    if let Some(word) = keyword(tok) {
        return format!("keyword '{}'", word);
    }
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::HexColor(c) => format!("color {}", c),
        Token::Minus => "'-'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Equals => "'='".to_string(),
        Token::Error => "unrecognized input".to_string(),
        _ => format!("{:?}", tok),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_token_keywords() {
        assert_eq!(format_token(&Token::ColLeft), "keyword 'col_left'");
        assert_eq!(format_token(&Token::Number(3)), "number 3");
        assert_eq!(format_token(&Token::Comma), "','");
    }

    #[test]
    fn test_parse_error_report_mentions_message() {
        let err = ParseError::Syntax {
            span: 4..5,
            message: "Unexpected ','".to_string(),
            expected: vec!["number".to_string()],
        };
        let text = err.format("gap , 5", "layout.fl");
        assert!(text.contains("Unexpected ','"));
        assert!(text.contains("layout.fl"));
    }

    #[test]
    fn test_unknown_anchor_report_has_suggestions() {
        let err = ScriptError::UnknownAnchor {
            name: "lft".to_string(),
            span: 10..13,
            suggestions: vec!["left".to_string()],
        };
        let text = err.format("relate a to lft", "layout.fl");
        assert!(text.contains("unknown anchor 'lft'"));
        assert!(text.contains("did you mean left?"));
        assert_eq!(err.span(), Some(10..13));
    }
}
