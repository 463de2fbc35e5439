//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::layout::Orientation;
use crate::script::ast::*;
use crate::script::lexer::Token;

/// Parse script source code into an AST
pub fn parse(input: &str) -> Result<Script, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::script::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    script_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn script_parser<'a, I>() -> impl Parser<'a, I, Script, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Basic token parsers
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    };

    let string_literal = select! {
        Token::String(s) => s,
    };

    let hex_color = select! {
        Token::HexColor(c) => c,
    };

    let number = select! {
        Token::Number(n) => n,
    };

    // Optionally negative integer
    let int = just(Token::Minus)
        .or_not()
        .then(number.clone())
        .map(|(minus, n)| if minus.is_some() { -n } else { n });

    // Explicitly signed offset: `+ 5` or `- 5`
    let offset = choice((just(Token::Plus).to(1), just(Token::Minus).to(-1)))
        .then(number)
        .map(|(sign, n)| sign * n);

    let comma = just(Token::Comma);

    let pair = int
        .clone()
        .then_ignore(comma.clone())
        .then(int.clone())
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    let quad = int
        .clone()
        .then_ignore(comma.clone())
        .then(int.clone())
        .then_ignore(comma.clone())
        .then(int.clone())
        .then_ignore(comma.clone())
        .then(int.clone())
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
        .map(|(((a, b), c), d)| (a, b, c, d));

    let lane_index = int
        .clone()
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    // Anchor references: generated lanes or names
    let anchor_ref = choice((
        just(Token::ColLeft)
            .ignore_then(lane_index.clone())
            .map(AnchorRef::ColumnLeft),
        just(Token::ColRight)
            .ignore_then(lane_index.clone())
            .map(AnchorRef::ColumnRight),
        just(Token::RowTop)
            .ignore_then(lane_index.clone())
            .map(AnchorRef::RowTop),
        just(Token::RowBottom)
            .ignore_then(lane_index.clone())
            .map(AnchorRef::RowBottom),
        identifier.clone().map(AnchorRef::Named),
    ))
    .map_with(|r, e| Spanned::new(r, span_range(&e.span())));

    let orientation = choice((
        just(Token::Horizontal).to(Orientation::Horizontal),
        just(Token::Vertical).to(Orientation::Vertical),
    ));

    // `margins 10 10 10 10`
    let margins = just(Token::Margins)
        .ignore_then(int.clone())
        .then(int.clone())
        .then(int.clone())
        .then(int.clone())
        .map(|(((top, left), bottom), right)| Statement::Margins {
            top,
            left,
            bottom,
            right,
        });

    // `gap 5 5`
    let gap = just(Token::Gap)
        .ignore_then(int.clone())
        .then(int.clone())
        .map(|(horizontal, vertical)| Statement::Gap {
            horizontal,
            vertical,
        });

    // `anchor(horizontal, 40)`, `anchor(ref, 5)` or `anchor(ref)`
    let anchor_expr = just(Token::Anchor).ignore_then(
        choice((
            orientation
                .then_ignore(comma.clone())
                .then(int.clone())
                .map(|(o, position)| AnchorExpr::Absolute(o, position)),
            anchor_ref
                .clone()
                .then(comma.clone().ignore_then(int.clone()).or_not())
                .map(|(related, offset)| match offset {
                    Some(offset) => AnchorExpr::Relative(related, offset),
                    None => AnchorExpr::AutoSize(related),
                }),
        ))
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
    );

    let let_decl = just(Token::Let)
        .ignore_then(identifier.clone().map_with(|id, e| Spanned::new(id, span_range(&e.span()))))
        .then_ignore(just(Token::Equals))
        .then(anchor_expr)
        .map(|(name, value)| Statement::Let { name, value });

    // `relate a to b + 5`
    let relate = just(Token::Relate)
        .ignore_then(anchor_ref.clone())
        .then_ignore(just(Token::To))
        .then(anchor_ref.clone())
        .then(offset.or_not())
        .map(|((anchor, related), offset)| Statement::Relate {
            anchor,
            related,
            offset,
        });

    // `absolute a 40`
    let absolute = just(Token::Absolute)
        .ignore_then(anchor_ref.clone())
        .then(int.clone())
        .map(|(anchor, position)| Statement::Absolute { anchor, position });

    // `autosize a on`
    let autosize = just(Token::AutoSize)
        .ignore_then(anchor_ref.clone())
        .then(choice((just(Token::On).to(true), just(Token::Off).to(false))))
        .map(|(anchor, enabled)| Statement::AutoSize { anchor, enabled });

    // Stub placement
    let edge = choice((
        just(Token::Null).to(None::<Spanned<AnchorRef>>),
        anchor_ref.clone().map(Some),
    ));
    let edges = edge
        .clone()
        .then_ignore(comma.clone())
        .then(edge.clone())
        .then_ignore(comma.clone())
        .then(edge.clone())
        .then_ignore(comma.clone())
        .then(edge)
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
        .map(|(((top, left), bottom), right)| Placement::Edges {
            top,
            left,
            bottom,
            right,
        });
    let placement = choice((
        just(Token::Cells)
            .ignore_then(quad)
            .map(|(begin_column, begin_row, end_column, end_row)| Placement::Cells {
                begin_column,
                begin_row,
                end_column,
                end_row,
            }),
        just(Token::Cell)
            .ignore_then(pair.clone())
            .map(|(column, row)| Placement::Cell { column, row }),
        edges,
    ));

    // `stub "label" (80, 20) #ff0000 at cell(0, 0)`
    let stub = just(Token::Stub)
        .ignore_then(string_literal.or_not())
        .then(pair.or_not())
        .then(hex_color.or_not())
        .then_ignore(just(Token::At))
        .then(placement)
        .map(|(((label, size), fill), placement)| {
            Statement::Stub(StubDecl {
                label,
                size,
                fill,
                placement,
            })
        });

    let statement = choice((margins, gap, let_decl, relate, absolute, autosize, stub))
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
        .boxed();

    // A script is a list of statements
    statement
        .repeated()
        .collect()
        .then_ignore(end())
        .map(|statements| Script { statements })
}
