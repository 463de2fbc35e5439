//! Lexer for the layout script using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Layout settings
    #[token("margins")]
    Margins,
    #[token("gap")]
    Gap,

    // Anchor statements
    #[token("let")]
    Let,
    #[token("anchor")]
    Anchor,
    #[token("relate")]
    Relate,
    #[token("to")]
    To,
    #[token("absolute")]
    Absolute,
    #[token("autosize")]
    AutoSize,
    #[token("on")]
    On,
    #[token("off")]
    Off,
    #[token("horizontal")]
    Horizontal,
    #[token("vertical")]
    Vertical,

    // Generated row and column anchors
    #[token("col_left")]
    ColLeft,
    #[token("col_right")]
    ColRight,
    #[token("row_top")]
    RowTop,
    #[token("row_bottom")]
    RowBottom,

    // Children
    #[token("stub")]
    Stub,
    #[token("at")]
    At,
    #[token("cell")]
    Cell,
    #[token("cells")]
    Cells,
    #[token("null")]
    Null,

    #[token("-")]
    Minus,
    #[token("+")]
    Plus,

    // Delimiters
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape(&s[1..s.len()-1])
    })]
    String(String),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i32>().ok())]
    Number(i32),

    #[regex(r"#[0-9a-fA-F]{6}", |lex| lex.slice().to_string())]
    HexColor(String),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"--[^\n]*", logos::skip)]
    DashComment,

    /// Input the lexer could not make sense of
    Error,
}

/// Resolve backslash escapes in a string literal body; `\n` and `\t` are
/// control characters, any other escaped character stands for itself
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Lex input string into tokens with spans
///
/// Unrecognized input becomes [`Token::Error`] so the parser reports it at
/// the right place instead of silently skipping it.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Error), span))
}
