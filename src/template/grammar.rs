//! Template parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::{Segment, Template};
use super::error::{CompileError, SyntaxError};
use super::lexer::{self, Token};

/// Parse template text into a [`Template`]
pub fn parse(input: &str) -> Result<Template, CompileError> {
    let len = input.len();

    let token_iter = lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    template_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            let errors: Vec<SyntaxError> = errs.into_iter().map(|e| e.into()).collect();
            CompileError::new(input, errors)
        })
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn template_parser<'a, I>() -> impl Parser<'a, I, Template, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let literal = select! {
        Token::Text(s) => Segment::Literal(s),
    };

    let key = select! {
        Token::Ident(s) => s,
    };

    let reference = key
        .delimited_by(just(Token::Open), just(Token::Close))
        .map_with(|key, e| Segment::Reference {
            key,
            span: span_range(&e.span()),
        });

    choice((literal, reference))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|segments| Template {
            segments: merge_literals(segments),
        })
}

/// Join adjacent literal segments
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if let (Some(Segment::Literal(prev)), Segment::Literal(next)) =
            (merged.last_mut(), &segment)
        {
            prev.push_str(next);
            continue;
        }
        merged.push(segment);
    }
    merged
}
