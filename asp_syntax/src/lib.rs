//! Front end for Answer Set Programming source text.
//!
//! Text goes through comment elision ([`normalizer`]), then a recursive
//! descent [`parser`] that hands every recognized production to a
//! [`builder::Builder`]. [`Clauses`] drives the parser one clause at a time.
//!
//! ```ignore
//! for clause in asp_syntax::parse_program("a. b(X) :- a, c(X).") {
//!     println!("{:?}", clause?);
//! }
//! ```

pub mod ast;
pub mod builder;
pub mod clauses;
pub mod lexer;
pub mod normalizer;
pub mod parser;
pub mod tokens;

use thiserror::Error;

pub use builder::{AstBuilder, Builder, SExprBuilder};
pub use clauses::{Clauses, Options};
pub use normalizer::{LiteralKind, UnterminatedLiteral};
pub use parser::SyntaxError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Unterminated(#[from] UnterminatedLiteral),
}

/// Clauses of `source` as [`ast::Node`] values.
pub fn parse_program(source: &str) -> Clauses<AstBuilder> {
    parse_program_with(source, AstBuilder, Options::default())
}

pub fn parse_program_with<B: Builder>(source: &str, builder: B, options: Options) -> Clauses<B> {
    Clauses::new(source, builder, options)
}

/// Parses the whole program, failing on the first error.
pub fn parse_all(source: &str) -> Result<ast::Program, ParseError> {
    let clauses = parse_program(source).collect::<Result<Vec<_>, _>>()?;
    Ok(ast::Program { clauses })
}
