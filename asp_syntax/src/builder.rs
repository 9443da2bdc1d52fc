//! Strategies materializing the productions recognized by the parser.
//!
//! The parser calls exactly one method per successful production and never
//! looks at the values it gets back, so a strategy decides alone what a
//! clause turns into.

use asp_sexpr::{SExpr, ToSExpr};
use asp_sexpr_proc_macro::sexpr;

use crate::ast;

pub trait Builder {
    /// A term before it is placed in an argument, a literal or a head.
    type Term;
    type Node;

    fn term(&mut self, name: String, args: Vec<Self::Node>) -> Self::Term;
    fn term_node(&mut self, term: Self::Term) -> Self::Node;
    fn negated_term(&mut self, term: Self::Term) -> Self::Node;
    fn rule(&mut self, head: Self::Node, body: Vec<Self::Node>) -> Self::Node;
    fn constraint(&mut self, body: Vec<Self::Node>) -> Self::Node;
    fn disjunction(&mut self, branches: Vec<Vec<Self::Term>>) -> Self::Node;
    fn forall(
        &mut self,
        negated: bool,
        template: Self::Term,
        conditions: Vec<Self::Term>,
    ) -> Self::Node;
    fn selection(&mut self, lower: i64, upper: Option<i64>, literals: Vec<Self::Node>)
        -> Self::Node;
    fn text(&mut self, raw: String) -> Self::Node;
    fn number(&mut self, value: i64) -> Self::Node;
    fn variable(&mut self, name: String) -> Self::Node;
    fn wildcard(&mut self) -> Self::Node;
}

/// Default strategy, builds [`ast::Node`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstBuilder;

impl Builder for AstBuilder {
    type Term = ast::Term;
    type Node = ast::Node;

    fn term(&mut self, name: String, args: Vec<ast::Node>) -> ast::Term {
        ast::Term { name, args }
    }

    fn term_node(&mut self, term: ast::Term) -> ast::Node {
        ast::Node::Term(term)
    }

    fn negated_term(&mut self, term: ast::Term) -> ast::Node {
        ast::Node::NotTerm(term)
    }

    fn rule(&mut self, head: ast::Node, body: Vec<ast::Node>) -> ast::Node {
        ast::Node::Rule {
            head: Box::new(head),
            body,
        }
    }

    fn constraint(&mut self, body: Vec<ast::Node>) -> ast::Node {
        ast::Node::Constraint { body }
    }

    fn disjunction(&mut self, branches: Vec<Vec<ast::Term>>) -> ast::Node {
        ast::Node::Disjunction(branches)
    }

    fn forall(&mut self, negated: bool, template: ast::Term, conditions: Vec<ast::Term>) -> ast::Node {
        let forall = ast::Forall {
            template,
            conditions,
        };
        if negated {
            ast::Node::NotForall(forall)
        } else {
            ast::Node::Forall(forall)
        }
    }

    fn selection(&mut self, lower: i64, upper: Option<i64>, literals: Vec<ast::Node>) -> ast::Node {
        ast::Node::Selection {
            lower,
            upper,
            literals,
        }
    }

    fn text(&mut self, raw: String) -> ast::Node {
        ast::Node::Text(raw)
    }

    fn number(&mut self, value: i64) -> ast::Node {
        ast::Node::Number(value)
    }

    fn variable(&mut self, name: String) -> ast::Node {
        ast::Node::Variable(name)
    }

    fn wildcard(&mut self) -> ast::Node {
        ast::Node::Wildcard
    }
}

/// Builds tagged s-expressions without going through [`ast::Node`],
/// `(term rel ((term a ()) X))` and the like.
#[derive(Debug, Clone, Copy, Default)]
pub struct SExprBuilder;

/// Name and arguments kept apart so a conditional literal can
/// lay out its template as `(forall name (args) (conditions))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SExprTerm {
    pub name: String,
    pub args: Vec<SExpr>,
}

impl ToSExpr for SExprTerm {
    fn to_sexpr(self) -> SExpr {
        let SExprTerm { name, args } = self;
        sexpr!((term #name $args))
    }
}

impl Builder for SExprBuilder {
    type Term = SExprTerm;
    type Node = SExpr;

    fn term(&mut self, name: String, args: Vec<SExpr>) -> SExprTerm {
        SExprTerm { name, args }
    }

    fn term_node(&mut self, term: SExprTerm) -> SExpr {
        term.to_sexpr()
    }

    fn negated_term(&mut self, term: SExprTerm) -> SExpr {
        sexpr!((not $term))
    }

    fn rule(&mut self, head: SExpr, body: Vec<SExpr>) -> SExpr {
        sexpr!((rule $head $body))
    }

    fn constraint(&mut self, body: Vec<SExpr>) -> SExpr {
        sexpr!((constraint $body))
    }

    fn disjunction(&mut self, branches: Vec<Vec<SExprTerm>>) -> SExpr {
        sexpr!((disjunction @branches))
    }

    fn forall(&mut self, negated: bool, template: SExprTerm, conditions: Vec<SExprTerm>) -> SExpr {
        let SExprTerm { name, args } = template;
        let forall = sexpr!((forall #name $args $conditions));
        if negated {
            sexpr!((not $forall))
        } else {
            forall
        }
    }

    fn selection(&mut self, lower: i64, upper: Option<i64>, literals: Vec<SExpr>) -> SExpr {
        sexpr!((selection $lower $upper $literals))
    }

    fn text(&mut self, raw: String) -> SExpr {
        sexpr!((text $raw))
    }

    fn number(&mut self, value: i64) -> SExpr {
        sexpr!($value)
    }

    fn variable(&mut self, name: String) -> SExpr {
        sexpr!(#name)
    }

    fn wildcard(&mut self) -> SExpr {
        sexpr!(_)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_program, parse_program_with, Options};

    /// Source text rendered back into a flat, solver ready form.
    #[derive(Default)]
    struct Rendering;

    impl Builder for Rendering {
        type Term = String;
        type Node = String;

        fn term(&mut self, name: String, args: Vec<String>) -> String {
            if args.is_empty() {
                name
            } else {
                format!("{name}({})", args.join(","))
            }
        }
        fn term_node(&mut self, term: String) -> String {
            term
        }
        fn negated_term(&mut self, term: String) -> String {
            format!("not {term}")
        }
        fn rule(&mut self, head: String, body: Vec<String>) -> String {
            format!("{head}:-{}.", body.join(";"))
        }
        fn constraint(&mut self, body: Vec<String>) -> String {
            format!(":-{}.", body.join(";"))
        }
        fn disjunction(&mut self, branches: Vec<Vec<String>>) -> String {
            let branches: Vec<_> = branches.iter().map(|b| b.join(",")).collect();
            format!("({})", branches.join(";"))
        }
        fn forall(&mut self, negated: bool, template: String, conditions: Vec<String>) -> String {
            let not = if negated { "not " } else { "" };
            format!("{not}{template}:{}", conditions.join(","))
        }
        fn selection(&mut self, lower: i64, upper: Option<i64>, literals: Vec<String>) -> String {
            let upper = upper.map(|u| u.to_string()).unwrap_or_default();
            format!("{lower}{{{}}}{upper}", literals.join(";"))
        }
        fn text(&mut self, raw: String) -> String {
            format!("\"{raw}\"")
        }
        fn number(&mut self, value: i64) -> String {
            value.to_string()
        }
        fn variable(&mut self, name: String) -> String {
            name
        }
        fn wildcard(&mut self) -> String {
            "_".to_owned()
        }
    }

    const PROGRAM: &str = r#"
        a. b("les amis, \"coucou\".").
        rel(c,(e(1),f;g,h(2))).
        c:- not rel(X,Y): obj(X), att(Y) ; rel(c,_).
        :- not obj(X):obj(X).
        2 { sel(X): obj(X) } 4:- anatom.
        { con(X,Y): obj(X), att(Y, 2) }.
    "#;

    #[test]
    fn sexpr_builder_agrees_with_ast_builder() {
        let from_ast: Vec<SExpr> = parse_program(PROGRAM)
            .map(|clause| clause.map(ToSExpr::to_sexpr))
            .collect::<Result<_, _>>()
            .unwrap();
        let direct: Vec<SExpr> = parse_program_with(PROGRAM, SExprBuilder, Options::default())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(from_ast.len(), 7);
        similar_asserts::assert_eq!(expected: from_ast, actual: direct);
    }

    #[test]
    fn custom_strategy_plugs_into_the_parser() {
        let rendered: Vec<String> = parse_program_with(PROGRAM, Rendering, Options::default())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            rendered,
            vec![
                "a",
                r#"b("les amis, \"coucou\".")"#,
                "rel(c,(e(1),f;g,h(2)))",
                "c:-not rel(X,Y):obj(X),att(Y);rel(c,_).",
                ":-not obj(X):obj(X).",
                "2{sel(X):obj(X)}4:-anatom.",
                "0{con(X,Y):obj(X),att(Y,2)}",
            ]
        );
    }
}
