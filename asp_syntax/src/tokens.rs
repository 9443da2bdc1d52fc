use std::{fmt, ops::Range};

use logos::Logos;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub typ: TokenType,
    pub span: Range<usize>,
}

#[derive(Logos, Debug, PartialEq, Eq, Clone)]
pub enum TokenType {
    // Keywords
    #[token("not")]
    Not,

    // Literals
    #[regex(r"[a-z][_a-zA-Z0-9]*", |lex| lex.slice().to_owned())]
    Identifier(String),
    #[regex(r"[A-Z][_a-zA-Z0-9]*", |lex| lex.slice().to_owned())]
    #[regex(r"_[_a-zA-Z0-9]+", |lex| lex.slice().to_owned())]
    Variable(String),
    #[token("_")]
    Wildcard,
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse())]
    Integer(i64),
    /// Content between the quotes, escapes left untouched.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_owned()
    })]
    Text(String),

    // Grouping
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // Operators
    #[token(":-")]
    ImpliedBy,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // Others
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    #[error]
    Error,

    Eof,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenType::*;
        match self {
            Not => write!(f, "`not`"),
            Identifier(id) => write!(f, "identifier `{id}`"),
            Variable(var) => write!(f, "variable `{var}`"),
            Wildcard => write!(f, "`_`"),
            Integer(i) => write!(f, "number `{i}`"),
            Text(t) => write!(f, "text \"{t}\""),
            LBrace => write!(f, "`{{`"),
            RBrace => write!(f, "`}}`"),
            LParen => write!(f, "`(`"),
            RParen => write!(f, "`)`"),
            ImpliedBy => write!(f, "`:-`"),
            Colon => write!(f, "`:`"),
            Semicolon => write!(f, "`;`"),
            Comma => write!(f, "`,`"),
            Dot => write!(f, "`.`"),
            Whitespace => write!(f, "whitespace"),
            Error => write!(f, "unrecognized input"),
            Eof => write!(f, "end of input"),
        }
    }
}
