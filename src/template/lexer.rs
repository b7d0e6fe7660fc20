//! Lexer for template text using logos
//!
//! Template text switches between two modes. Outside a reference everything
//! is literal (whitespace included). After `${` the lexer morphs into
//! reference mode, where whitespace is skipped, until the closing `}`.

use logos::{Lexer, Logos};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
enum TextToken {
    #[token("${")]
    Open,

    #[regex(r"[^$]+")]
    Run,

    #[token("$")]
    Dollar,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
enum RefToken {
    #[token("}")]
    Close,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Tokens of both modes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Literal text between references
    Text(String),
    /// `${`
    Open,
    /// Key referenced inside `${ }`
    Ident(String),
    /// `}`
    Close,
    /// Anything reference mode cannot recognize
    Unexpected(String),
}

enum Mode<'s> {
    Text(Lexer<'s, TextToken>),
    Reference(Lexer<'s, RefToken>),
    Done,
}

/// Iterator over the tokens of a template
pub struct TemplateLexer<'s> {
    mode: Mode<'s>,
}

impl<'s> TemplateLexer<'s> {
    pub fn new(input: &'s str) -> Self {
        Self {
            mode: Mode::Text(TextToken::lexer(input)),
        }
    }
}

impl Iterator for TemplateLexer<'_> {
    type Item = (Token, Span);

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.mode, Mode::Done) {
            Mode::Text(mut lex) => {
                let tok = lex.next()?;
                let span = lex.span();
                let token = match tok {
                    Ok(TextToken::Open) => {
                        self.mode = Mode::Reference(lex.morph());
                        return Some((Token::Open, span));
                    }
                    Ok(TextToken::Run) | Ok(TextToken::Dollar) => {
                        Token::Text(lex.slice().to_string())
                    }
                    Err(()) => Token::Unexpected(lex.slice().to_string()),
                };
                self.mode = Mode::Text(lex);
                Some((token, span))
            }
            Mode::Reference(mut lex) => {
                let tok = lex.next()?;
                let span = lex.span();
                let token = match tok {
                    Ok(RefToken::Close) => {
                        self.mode = Mode::Text(lex.morph());
                        return Some((Token::Close, span));
                    }
                    Ok(RefToken::Ident) => Token::Ident(lex.slice().to_string()),
                    Err(()) => Token::Unexpected(lex.slice().to_string()),
                };
                self.mode = Mode::Reference(lex);
                Some((token, span))
            }
            Mode::Done => None,
        }
    }
}

/// Lex template text into tokens with spans
pub fn lex(input: &str) -> TemplateLexer<'_> {
    TemplateLexer::new(input)
}
