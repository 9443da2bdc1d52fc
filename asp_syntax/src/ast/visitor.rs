use crate::ast;

pub trait Visitor<'ast>: Sized {
    fn visit(&mut self, node: &'ast ast::Program) {
        walk_program(self, node)
    }

    fn visit_node(&mut self, node: &'ast ast::Node) {
        walk_node(self, node)
    }

    fn visit_term(&mut self, term: &'ast ast::Term) {
        walk_term(self, term)
    }

    fn visit_negated_term(&mut self, term: &'ast ast::Term) {
        self.visit_term(term)
    }

    fn visit_rule(&mut self, head: &'ast ast::Node, body: &'ast [ast::Node]) {
        walk_rule(self, head, body)
    }

    fn visit_constraint(&mut self, body: &'ast [ast::Node]) {
        walk_body(self, body)
    }

    fn visit_disjunction(&mut self, branches: &'ast [Vec<ast::Term>]) {
        walk_disjunction(self, branches)
    }

    fn visit_forall(&mut self, forall: &'ast ast::Forall, _negated: bool) {
        walk_forall(self, forall)
    }

    fn visit_selection(&mut self, _lower: i64, _upper: Option<i64>, literals: &'ast [ast::Node]) {
        walk_body(self, literals)
    }

    fn visit_text(&mut self, _raw: &'ast str) {}

    fn visit_number(&mut self, _value: i64) {}

    fn visit_variable(&mut self, _name: &'ast str) {}

    fn visit_wildcard(&mut self) {}
}

pub fn walk_program<'ast, V: Visitor<'ast>>(v: &mut V, node: &'ast ast::Program) {
    for clause in &node.clauses {
        v.visit_node(clause);
    }
}

pub fn walk_node<'ast, V: Visitor<'ast>>(v: &mut V, node: &'ast ast::Node) {
    match node {
        ast::Node::Term(term) => v.visit_term(term),
        ast::Node::NotTerm(term) => v.visit_negated_term(term),
        ast::Node::Rule { head, body } => v.visit_rule(head, body),
        ast::Node::Constraint { body } => v.visit_constraint(body),
        ast::Node::Disjunction(branches) => v.visit_disjunction(branches),
        ast::Node::Forall(forall) => v.visit_forall(forall, false),
        ast::Node::NotForall(forall) => v.visit_forall(forall, true),
        ast::Node::Selection {
            lower,
            upper,
            literals,
        } => v.visit_selection(*lower, *upper, literals),
        ast::Node::Text(raw) => v.visit_text(raw),
        ast::Node::Number(value) => v.visit_number(*value),
        ast::Node::Variable(name) => v.visit_variable(name),
        ast::Node::Wildcard => v.visit_wildcard(),
    }
}

pub fn walk_term<'ast, V: Visitor<'ast>>(v: &mut V, term: &'ast ast::Term) {
    for arg in &term.args {
        v.visit_node(arg);
    }
}

pub fn walk_rule<'ast, V: Visitor<'ast>>(v: &mut V, head: &'ast ast::Node, body: &'ast [ast::Node]) {
    v.visit_node(head);
    walk_body(v, body);
}

pub fn walk_body<'ast, V: Visitor<'ast>>(v: &mut V, body: &'ast [ast::Node]) {
    for literal in body {
        v.visit_node(literal);
    }
}

pub fn walk_disjunction<'ast, V: Visitor<'ast>>(v: &mut V, branches: &'ast [Vec<ast::Term>]) {
    for term in branches.iter().flatten() {
        v.visit_term(term);
    }
}

pub fn walk_forall<'ast, V: Visitor<'ast>>(v: &mut V, forall: &'ast ast::Forall) {
    v.visit_term(&forall.template);
    for condition in &forall.conditions {
        v.visit_term(condition);
    }
}
