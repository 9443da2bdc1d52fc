use logos::Logos;

use crate::tokens::{Token, TokenType};

/// Two token window over normalized source text.
///
/// The lexer can start at any byte offset of the text, spans of the
/// produced tokens are always absolute.
#[derive(Clone)]
pub struct Lexer<'a> {
    tokens: logos::Lexer<'a, TokenType>,
    offset: usize,
    curr_token: Token,
    peek_token: Token,
}

impl<'source> Lexer<'source> {
    const DUMMY: Token = Token {
        typ: TokenType::Eof,
        span: 0..0,
    };

    pub fn new(source: &'source str) -> Self {
        Self::starting_at(source, 0)
    }

    pub fn starting_at(source: &'source str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut lex = Self {
            tokens: TokenType::lexer(&source[offset..]),
            offset,
            curr_token: Self::DUMMY,
            peek_token: Self::DUMMY,
        };
        lex.advance();
        lex.advance();
        lex
    }

    pub fn advance(&mut self) -> Token {
        let new_peek = self.bump();
        let peek = std::mem::replace(&mut self.peek_token, new_peek);
        std::mem::replace(&mut self.curr_token, peek)
    }

    pub fn current(&self) -> &Token {
        &self.curr_token
    }

    pub fn peek(&self) -> &Token {
        &self.peek_token
    }

    fn bump(&mut self) -> Token {
        match self.tokens.next() {
            Some(typ) => {
                let span = self.tokens.span();
                Token {
                    typ,
                    span: span.start + self.offset..span.end + self.offset,
                }
            }
            None => {
                let end = self.offset + self.tokens.source().len();
                Token {
                    typ: TokenType::Eof,
                    span: end..end,
                }
            }
        }
    }
}

/// One based line and column of a byte offset.
pub fn line_col(source: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(source.len());
    let before = &source.as_bytes()[..pos];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |nl| nl + 1);
    (line, pos - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::Lexer;
    use super::Token;
    use super::TokenType::{self, *};

    macro_rules! assert_token {
        ($p:pat, $e:expr) => {
            let t = $e;
            if let Token { typ: $p, .. } = t {
            } else {
                let repr = stringify!($p);
                panic!("Unexpected token {t:?}. Expected {repr}");
            }
        };
    }
    macro_rules! assert_lex {
        ([$($p:pat),*$(,)?], $l:expr) => {
            let mut lex = $l;
            $(assert_token!($p, lex.advance()));*;
            assert_token!(Eof, lex.advance());
        };
    }

    #[test]
    fn empty_input_gives_eof() {
        let l = Lexer::new("");
        assert_token!(Eof, l.current());
        assert_token!(Eof, l.peek());
    }

    #[test]
    fn advancing_tokens_past_eof_yields_eof() {
        assert_lex!([Eof, Eof, Eof, Eof], Lexer::new(""));
    }

    #[test]
    fn lexing_a_rule() {
        assert_lex!(
            [
                Identifier(_),
                LParen,
                Integer(2),
                RParen,
                ImpliedBy,
                Not,
                Identifier(_),
                LParen,
                Variable(_),
                Comma,
                Wildcard,
                RParen,
                Dot,
            ],
            Lexer::new("c(2):- not b(X,_).")
        );
    }

    #[test]
    fn lexing_numbers_and_bounds() {
        assert_lex!(
            [Integer(1), LBrace, Identifier(_), Colon, Identifier(_), RBrace, Integer(-4), Dot],
            Lexer::new("1 { a : b } -4.")
        );
    }

    #[test]
    fn keyword_prefix_is_an_identifier() {
        let l = Lexer::new("nota");
        assert_eq!(l.current().typ, Identifier("nota".to_owned()));
    }

    #[test]
    fn underscore_prefixed_names_are_variables() {
        let l = Lexer::new("_Tmp _");
        assert_eq!(l.current().typ, Variable("_Tmp".to_owned()));
        assert_eq!(l.peek().typ, Wildcard);
    }

    #[test]
    fn lexing_strings_keeps_escapes() {
        let l = Lexer::new(r#""les amis, \"coucou\".""#);
        match l.current() {
            Token {
                typ: TokenType::Text(s),
                ..
            } if s == r#"les amis, \"coucou\"."# => {}
            t => panic!("value of s is wrong {t:#?}"),
        }
    }

    #[test]
    fn unknown_characters_are_errors() {
        assert_lex!([Identifier(_), Error, Dot], Lexer::new("a * ."));
    }

    #[test]
    fn spans_are_absolute_when_starting_mid_text() {
        let source = "a. bc.";
        let l = Lexer::starting_at(source, 2);
        assert_eq!(l.current().span, 3..5);
        assert_eq!(&source[l.current().span.clone()], "bc");
        assert_eq!(l.peek().span, 5..6);
    }

    #[test]
    fn line_and_column() {
        let source = "a.\n  b.";
        assert_eq!(super::line_col(source, 0), (1, 1));
        assert_eq!(super::line_col(source, 5), (2, 3));
    }
}
