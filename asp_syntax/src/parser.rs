use std::ops::Range;

use thiserror::Error;

use crate::{
    builder::Builder,
    lexer::{line_col, Lexer},
    tokens::{Token, TokenType},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error at {line}:{column} [{span:?}] {msg}")]
pub struct SyntaxError {
    pub span: Range<usize>,
    pub line: usize,
    pub column: usize,
    pub msg: String,
    /// Clause text read so far, up to the offending token.
    pub clause: String,
}

enum ParseErr {
    /// The rule matched but ended with an error.
    Err(SyntaxError),
    /// Rule could not match.
    WrongRule,
}

type ParseRes<T> = Result<T, ParseErr>;

/// Deepest allowed nesting of argument lists and disjunctions.
const MAX_NESTING: usize = 128;

trait SyntaxContext
where
    Self: Sized,
{
    /// Turns a rule that could not match into an error
    /// naming what was expected at the current token.
    fn or_expected<B: Builder>(self, parser: &Parser<'_, '_, B>, what: &str) -> Self;
}

impl<T> SyntaxContext for ParseRes<T> {
    fn or_expected<B: Builder>(self, parser: &Parser<'_, '_, B>, what: &str) -> Self {
        match self {
            Err(ParseErr::WrongRule) => Err(ParseErr::Err(parser.expected(what))),
            res => res,
        }
    }
}

/// Recursive descent recognizer producing one clause per call.
///
/// The parser owns no state across clauses besides the position it was
/// created at, so it is rebuilt for every clause by the sequence driving it.
pub struct Parser<'source, 'b, B> {
    source: &'source str,
    lexer: Lexer<'source>,
    builder: &'b mut B,
    clause_start: usize,
    consumed: usize,
    depth: usize,
}

impl<'source, 'b, B: Builder> Parser<'source, 'b, B> {
    pub fn new(source: &'source str, offset: usize, builder: &'b mut B) -> Self {
        let lexer = Lexer::starting_at(source, offset);
        Self {
            source,
            clause_start: lexer.current().span.start,
            lexer,
            builder,
            consumed: offset,
            depth: 0,
        }
    }

    pub fn eof(&self) -> bool {
        self.lexer.current().typ == TokenType::Eof
    }

    /// Offset right after the last consumed token.
    pub fn position(&self) -> usize {
        self.consumed
    }

    pub fn parse_clause(&mut self) -> Result<B::Node, SyntaxError> {
        self.clause_start = self.curr_pos();
        let res = match self.lexer.current().typ {
            TokenType::ImpliedBy => self.parse_constraint(),
            _ => self.parse_rule_or_fact(),
        };
        match res {
            Ok(clause) => Ok(clause),
            Err(ParseErr::Err(err)) => Err(err),
            Err(ParseErr::WrongRule) => Err(self.expected("a fact, a rule or a constraint")),
        }
    }

    /// Skips tokens up to and including the next `.`.
    /// Returns false if the input ended first.
    pub fn skip_clause(&mut self) -> bool {
        loop {
            match self.lexer.current().typ {
                TokenType::Eof => return false,
                TokenType::Dot => {
                    self.advance();
                    return true;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn parse_constraint(&mut self) -> ParseRes<B::Node> {
        self.match_token(TokenType::ImpliedBy)?;
        let body = self.parse_body()?;
        self.match_token(TokenType::Dot)
            .or_expected(self, "`,`, `;` or `.` after a body literal")?;
        Ok(self.builder.constraint(body))
    }

    fn parse_rule_or_fact(&mut self) -> ParseRes<B::Node> {
        let head = self.parse_head()?;
        if self.match_token(TokenType::Dot).is_ok() {
            return Ok(head);
        }
        self.match_token(TokenType::ImpliedBy)
            .or_expected(self, "`.` or `:-` after the head")?;
        let body = self.parse_body()?;
        self.match_token(TokenType::Dot)
            .or_expected(self, "`,`, `;` or `.` after a body literal")?;
        Ok(self.builder.rule(head, body))
    }

    fn parse_head(&mut self) -> ParseRes<B::Node> {
        match self.lexer.current().typ {
            TokenType::Identifier(_) => {
                let term = self.parse_term()?;
                Ok(self.builder.term_node(term))
            }
            TokenType::LParen => self.parse_disjunction(),
            TokenType::Integer(_) | TokenType::LBrace => self.parse_selection(),
            _ => wrong_rule(),
        }
    }

    fn parse_body(&mut self) -> ParseRes<Vec<B::Node>> {
        let mut literals = vec![self.parse_body_literal().or_expected(self, "a body literal")?];
        while matches!(
            self.lexer.current().typ,
            TokenType::Comma | TokenType::Semicolon
        ) {
            self.advance();
            literals.push(self.parse_body_literal().or_expected(self, "a body literal")?);
        }
        Ok(literals)
    }

    fn parse_body_literal(&mut self) -> ParseRes<B::Node> {
        let negated = self.match_token(TokenType::Not).is_ok();
        let template = if negated {
            self.parse_term().or_expected(self, "a literal after `not`")?
        } else {
            self.parse_term()?
        };
        self.parse_conditional(negated, template)
    }

    /// What follows a literal's term, `: condition, ...` makes it conditional.
    fn parse_conditional(&mut self, negated: bool, template: B::Term) -> ParseRes<B::Node> {
        if self.match_token(TokenType::Colon).is_err() {
            return Ok(if negated {
                self.builder.negated_term(template)
            } else {
                self.builder.term_node(template)
            });
        }
        let mut conditions = vec![self.parse_term().or_expected(self, "a condition after `:`")?];
        // a comma not followed by a term belongs to the enclosing body
        while self.lexer.current().typ == TokenType::Comma
            && matches!(self.lexer.peek().typ, TokenType::Identifier(_))
        {
            self.advance();
            conditions.push(self.parse_term()?);
        }
        Ok(self.builder.forall(negated, template, conditions))
    }

    fn parse_term(&mut self) -> ParseRes<B::Term> {
        let name = self.parse_identifier()?;
        let beg = self.curr_pos();
        if self.match_token(TokenType::LParen).is_err() {
            return Ok(self.builder.term(name, Vec::new()));
        }
        let args = self.nested(beg, |parser| {
            let args =
                parser.parse_delimited(Self::parse_argument, TokenType::Comma, "an argument")?;
            parser
                .match_token(TokenType::RParen)
                .or_expected(parser, "`,` or `)` in the argument list")?;
            Ok(args)
        })?;
        Ok(self.builder.term(name, args))
    }

    fn parse_argument(&mut self) -> ParseRes<B::Node> {
        match self.lexer.current().typ.clone() {
            TokenType::Identifier(_) => {
                let term = self.parse_term()?;
                Ok(self.builder.term_node(term))
            }
            TokenType::LParen => self.parse_disjunction(),
            TokenType::Variable(name) => {
                self.advance();
                Ok(self.builder.variable(name))
            }
            TokenType::Wildcard => {
                self.advance();
                Ok(self.builder.wildcard())
            }
            TokenType::Integer(value) => {
                self.advance();
                Ok(self.builder.number(value))
            }
            TokenType::Text(raw) => {
                self.advance();
                Ok(self.builder.text(raw))
            }
            _ => wrong_rule(),
        }
    }

    fn parse_disjunction(&mut self) -> ParseRes<B::Node> {
        let beg = self.curr_pos();
        self.match_token(TokenType::LParen)?;
        let branches = self.nested(beg, |parser| {
            let mut branches = vec![parser.parse_branch()?];
            while parser.match_token(TokenType::Semicolon).is_ok() {
                branches.push(parser.parse_branch()?);
            }
            parser
                .match_token(TokenType::RParen)
                .or_expected(parser, "`,`, `;` or `)` in the disjunction")?;
            Ok(branches)
        })?;
        if branches.len() < 2 {
            return Err(self.error(
                beg..self.consumed,
                "A disjunction needs at least two branches separated by `;`",
            ));
        }
        Ok(self.builder.disjunction(branches))
    }

    fn parse_branch(&mut self) -> ParseRes<Vec<B::Term>> {
        self.parse_delimited(Self::parse_term, TokenType::Comma, "a term")
    }

    fn parse_selection(&mut self) -> ParseRes<B::Node> {
        let beg = self.curr_pos();
        let lower = self.parse_optional_bound();
        self.match_token(TokenType::LBrace)
            .or_expected(self, "`{` opening the selection")?;
        let literals = self.parse_delimited(
            Self::parse_selection_element,
            TokenType::Semicolon,
            "a literal or a conditional literal",
        )?;
        self.match_token(TokenType::RBrace)
            .or_expected(self, "`;` or `}` in the selection")?;
        let upper = self.parse_optional_bound();
        if let (Some(lower), Some(upper)) = (lower, upper) {
            if lower > upper {
                return Err(self.error(
                    beg..self.consumed,
                    format!(
                        "Selection lower bound {lower} is greater than its upper bound {upper}"
                    ),
                ));
            }
        }
        Ok(self.builder.selection(lower.unwrap_or(0), upper, literals))
    }

    fn parse_selection_element(&mut self) -> ParseRes<B::Node> {
        let template = self.parse_term()?;
        self.parse_conditional(false, template)
    }

    fn parse_optional_bound(&mut self) -> Option<i64> {
        if let TokenType::Integer(bound) = self.lexer.current().typ {
            self.advance();
            Some(bound)
        } else {
            None
        }
    }

    fn parse_identifier(&mut self) -> ParseRes<String> {
        if let Token {
            typ: TokenType::Identifier(_),
            ..
        } = self.lexer.current()
        {
            let id = self.advance();
            match id.typ {
                TokenType::Identifier(id) => Ok(id),
                _ => unreachable!("we already checked that this token is an identifier"),
            }
        } else {
            wrong_rule()
        }
    }

    /// Runs `rule` one nesting level deeper, `beg` is where the level opened.
    fn nested<T>(
        &mut self,
        beg: usize,
        rule: impl FnOnce(&mut Self) -> ParseRes<T>,
    ) -> ParseRes<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(
                beg..beg + 1,
                format!("Nesting too deep, at most {MAX_NESTING} levels are allowed"),
            ));
        }
        self.depth += 1;
        let res = rule(self);
        self.depth -= 1;
        res
    }

    /// One or more items separated by `delimiter`.
    fn parse_delimited<T>(
        &mut self,
        parser: impl Fn(&mut Self) -> ParseRes<T>,
        delimiter: TokenType,
        what: &str,
    ) -> ParseRes<Vec<T>> {
        let mut items = vec![parser(self).or_expected(self, what)?];
        while self.lexer.current().typ == delimiter {
            self.advance();
            items.push(parser(self).or_expected(self, what)?);
        }
        Ok(items)
    }
}

fn wrong_rule<T>() -> ParseRes<T> {
    Err(ParseErr::WrongRule)
}

impl<'source, 'b, B> Parser<'source, 'b, B> {
    fn advance(&mut self) -> Token {
        let token = self.lexer.advance();
        self.consumed = token.span.end;
        token
    }

    #[inline(always)]
    fn curr_pos(&self) -> usize {
        self.lexer.current().span.start
    }

    fn error(&self, span: Range<usize>, msg: impl Into<String>) -> ParseErr {
        ParseErr::Err(self.syntax_error(span, msg))
    }

    fn syntax_error(&self, span: Range<usize>, msg: impl Into<String>) -> SyntaxError {
        let (line, column) = line_col(self.source, span.start);
        let end = span.end.clamp(self.clause_start, self.source.len());
        SyntaxError {
            clause: self.source[self.clause_start.min(end)..end].trim().to_owned(),
            span,
            line,
            column,
            msg: msg.into(),
        }
    }

    fn expected(&self, what: &str) -> SyntaxError {
        let current = self.lexer.current();
        self.syntax_error(
            current.span.clone(),
            format!("Expected {} got {}", what, current.typ),
        )
    }

    fn match_token(&mut self, typ: TokenType) -> ParseRes<Token> {
        if self.lexer.current().typ == typ {
            Ok(self.advance())
        } else {
            wrong_rule()
        }
    }
}
