pub mod visitor;

use asp_sexpr_proc_macro::sexpr;
pub use visitor::Visitor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub clauses: Vec<Node>,
}

/// Functor applied to an ordered argument list, `a` has no arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    pub name: String,
    pub args: Vec<Node>,
}

impl Term {
    pub fn new(name: impl Into<String>, args: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

/// Conditional literal `template : condition, ...`, instantiated once
/// for every binding satisfying all the conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Forall {
    pub template: Term,
    pub conditions: Vec<Term>,
}

impl Forall {
    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// Arguments of the template, usually the variables bound by the conditions.
    pub fn variables(&self) -> &[Node] {
        &self.template.args
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Term(Term),
    NotTerm(Term),
    Rule {
        head: Box<Node>,
        body: Vec<Node>,
    },
    Constraint {
        body: Vec<Node>,
    },
    /// At least two branches, each a non empty conjunction of terms.
    Disjunction(Vec<Vec<Term>>),
    Forall(Forall),
    NotForall(Forall),
    Selection {
        lower: i64,
        upper: Option<i64>,
        literals: Vec<Node>,
    },
    /// Raw content of a text literal, escapes included.
    Text(String),
    Number(i64),
    Variable(String),
    Wildcard,
}

impl Node {
    /// A clause with no body.
    pub fn is_fact(&self) -> bool {
        matches!(
            self,
            Node::Term(_) | Node::Disjunction(_) | Node::Selection { .. }
        )
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Node::NotTerm(_) | Node::NotForall(_))
    }
}

impl From<Term> for Node {
    fn from(term: Term) -> Self {
        Node::Term(term)
    }
}

impl asp_sexpr::ToSExpr for Program {
    fn to_sexpr(self) -> asp_sexpr::SExpr {
        sexpr!(${self.clauses})
    }
}

impl asp_sexpr::ToSExpr for Term {
    fn to_sexpr(self) -> asp_sexpr::SExpr {
        let Term { name, args } = self;
        sexpr!((term #name $args))
    }
}

impl asp_sexpr::ToSExpr for Forall {
    fn to_sexpr(self) -> asp_sexpr::SExpr {
        let Forall {
            template: Term { name, args },
            conditions,
        } = self;
        sexpr!((forall #name $args $conditions))
    }
}

impl asp_sexpr::ToSExpr for Node {
    fn to_sexpr(self) -> asp_sexpr::SExpr {
        match self {
            Node::Term(t) => sexpr!($t),
            Node::NotTerm(t) => sexpr!((not $t)),
            Node::Rule { head, body } => sexpr!((rule $head $body)),
            Node::Constraint { body } => sexpr!((constraint $body)),
            Node::Disjunction(branches) => sexpr!((disjunction @branches)),
            Node::Forall(f) => sexpr!($f),
            Node::NotForall(f) => sexpr!((not $f)),
            Node::Selection {
                lower,
                upper,
                literals,
            } => sexpr!((selection $lower $upper $literals)),
            Node::Text(raw) => sexpr!((text $raw)),
            Node::Number(n) => sexpr!($n),
            Node::Variable(name) => sexpr!(#name),
            Node::Wildcard => sexpr!(_),
        }
    }
}
