use std::iter::FusedIterator;

use crate::{
    builder::Builder,
    normalizer::{normalize, UnterminatedLiteral},
    parser::Parser,
    ParseError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Resume after the next `.` following a syntax error
    /// instead of ending the sequence.
    pub recover: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { recover: true }
    }
}

/// Lazy sequence of the clauses of a program, in source order.
///
/// Every call to `next` parses exactly one clause, nothing past the last
/// requested clause is looked at. Errors come out in place of the clause
/// they were found in.
#[derive(Debug, Clone)]
pub struct Clauses<B> {
    text: String,
    cursor: usize,
    unterminated: Option<UnterminatedLiteral>,
    pending: Option<UnterminatedLiteral>,
    builder: B,
    options: Options,
    finished: bool,
}

impl<B: Builder> Clauses<B> {
    pub fn new(source: &str, builder: B, options: Options) -> Self {
        let normalized = normalize(source);
        Self {
            text: normalized.text,
            cursor: 0,
            pending: normalized.unterminated.clone(),
            unterminated: normalized.unterminated,
            builder,
            options,
            finished: false,
        }
    }

    /// Starts over from the first clause.
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.pending = self.unterminated.clone();
        self.finished = false;
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn into_builder(self) -> B {
        self.builder
    }
}

impl<B: Builder> Iterator for Clauses<B> {
    type Item = Result<B::Node, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut parser = Parser::new(&self.text, self.cursor, &mut self.builder);
        if parser.eof() {
            self.finished = true;
            return self.pending.take().map(|err| Err(err.into()));
        }
        tracing::trace!(cursor = self.cursor, "parsing clause");
        match parser.parse_clause() {
            Ok(clause) => {
                self.cursor = parser.position();
                Some(Ok(clause))
            }
            // the clause was cut short by the literal that never ends
            Err(_) if parser.eof() && self.pending.is_some() => {
                self.finished = true;
                self.pending.take().map(|err| Err(err.into()))
            }
            Err(err) => {
                if self.options.recover {
                    parser.skip_clause();
                    self.cursor = parser.position();
                    tracing::debug!(%err, resume_at = self.cursor, "resynchronized after syntax error");
                } else {
                    self.finished = true;
                }
                Some(Err(err.into()))
            }
        }
    }
}

impl<B: Builder> FusedIterator for Clauses<B> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{Forall, Node, Term},
        builder::AstBuilder,
        normalizer::LiteralKind,
        parse_program, parse_program_with,
    };

    fn var(name: &str) -> Node {
        Node::Variable(name.to_owned())
    }

    fn constant(name: &str) -> Node {
        Node::Term(Term::constant(name))
    }

    #[test]
    fn yields_one_value_per_clause_in_order() {
        let clauses: Vec<_> = parse_program("a. b(1). c(2):- not b(2).")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            clauses,
            vec![
                constant("a"),
                Node::Term(Term::new("b", vec![Node::Number(1)])),
                Node::Rule {
                    head: Box::new(Node::Term(Term::new("c", vec![Node::Number(2)]))),
                    body: vec![Node::NotTerm(Term::new("b", vec![Node::Number(2)]))],
                },
            ]
        );
    }

    #[test]
    fn conditional_literal_in_constraint() {
        let clauses: Vec<_> = parse_program(":- not obj(X):obj(X).").collect();
        assert_eq!(
            clauses,
            vec![Ok(Node::Constraint {
                body: vec![Node::NotForall(Forall {
                    template: Term::new("obj", vec![var("X")]),
                    conditions: vec![Term::new("obj", vec![var("X")])],
                })],
            })]
        );
    }

    #[test]
    fn reparsing_gives_equal_sequences() {
        let source = "rel(a,(c;d)). x :- . obj(X):- rel(X,_) ; rel(X,Y): att(Y).";
        let first: Vec<_> = parse_program(source).collect();
        let second: Vec<_> = parse_program(source).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn restart_replays_the_sequence() {
        let mut clauses = parse_program("a. b. c.");
        let first: Vec<_> = clauses.by_ref().take(2).collect();
        clauses.restart();
        let again: Vec<_> = clauses.by_ref().collect();
        assert_eq!(first[..], again[..2]);
        assert_eq!(again.len(), 3);
    }

    #[test]
    fn partial_consumption_does_not_reach_later_errors() {
        let mut clauses = parse_program("a. b. c(.");
        assert_eq!(clauses.next(), Some(Ok(constant("a"))));
        assert_eq!(clauses.next(), Some(Ok(constant("b"))));
        assert!(matches!(clauses.next(), Some(Err(ParseError::Syntax(_)))));
        assert_eq!(clauses.next(), None);
        assert_eq!(clauses.next(), None);
    }

    #[test]
    fn resynchronizes_on_next_terminator() {
        let results: Vec<_> = parse_program("a. b(,). c.").collect();
        assert_eq!(results.len(), 3);
        assert!(matches!(results[1], Err(ParseError::Syntax(_))));
        assert_eq!(results[2], Ok(constant("c")));
    }

    #[test]
    fn without_recovery_the_first_error_ends_the_sequence() {
        let options = Options { recover: false };
        let results: Vec<_> = parse_program_with("a. b(,). c.", AstBuilder, options).collect();
        assert_eq!(results.len(), 2);
        assert!(results[1].is_err());
    }

    #[test]
    fn unterminated_text_surfaces_after_earlier_clauses() {
        let results: Vec<_> = parse_program("a.\nb(\"open).\nc.").collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], Ok(constant("a")));
        match &results[1] {
            Err(ParseError::Unterminated(err)) => {
                assert_eq!(err.kind, LiteralKind::Text);
                assert_eq!((err.line, err.column), (2, 3));
            }
            other => panic!("expected an unterminated literal, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_block_comment_after_complete_clauses() {
        let results: Vec<_> = parse_program("a. b. %* no end").collect();
        assert_eq!(results.len(), 3);
        assert!(matches!(
            &results[2],
            Err(ParseError::Unterminated(UnterminatedLiteral {
                kind: LiteralKind::BlockComment,
                ..
            }))
        ));
    }

    #[test]
    fn degraded_multiline_comment_is_pinned() {
        let source = r"
            %    *%
            %*
            ai.
            b: %bug
            :c- *%
            % *
            ok.
        ";
        let results: Vec<_> = parse_program(source).collect();
        let clauses: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(clauses, vec![&constant("ai")]);
        assert_eq!(results.len(), 2);
        assert!(matches!(results[1], Err(ParseError::Syntax(_))));
    }

    #[test]
    fn well_formed_multiline_comment_is_elided() {
        let source = "
            %* first line.
               second line :- here.
            *%
            ok.
        ";
        let clauses: Vec<_> = parse_program(source).collect();
        assert_eq!(clauses, vec![Ok(constant("ok"))]);
    }

    #[test]
    fn percent_in_single_line_block_comment_keeps_the_rest_of_the_line() {
        let clauses: Vec<_> = parse_program("%* 50% *% a.").collect();
        assert_eq!(clauses, vec![Ok(constant("a"))]);
    }

    #[test]
    fn empty_program_has_no_clauses() {
        assert_eq!(parse_program("  % nothing\n").count(), 0);
        assert_eq!(parse_program("").count(), 0);
    }
}
