use std::{collections::BTreeSet, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use colored::Colorize;
use tracing::Level;

use asp_syntax::{
    ast::{self, Visitor},
    AstBuilder, Options, ParseError, SExprBuilder,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    file: PathBuf,

    /// Print clauses as tagged s-expressions
    #[arg(long)]
    sexpr: bool,

    /// Print name/arity of every predicate in the program
    #[arg(long)]
    predicates: bool,

    /// Stop at the first syntax error
    #[arg(long)]
    no_recover: bool,

    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[derive(Default)]
struct Predicates {
    seen: BTreeSet<(String, usize)>,
}

/// Terms reached outside of arguments are literals, arguments are not walked
/// so function symbols and constants are left out.
impl<'ast> Visitor<'ast> for Predicates {
    fn visit_term(&mut self, term: &'ast ast::Term) {
        self.seen.insert((term.name.clone(), term.args.len()));
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(if args.debug { Level::DEBUG } else { Level::WARN })
        .init();
    let source = std::fs::read_to_string(&args.file)
        .wrap_err_with(|| format!("Could not read {}", args.file.display()))?;
    let options = Options {
        recover: !args.no_recover,
    };
    let errors = if args.sexpr {
        let clauses = asp_syntax::parse_program_with(&source, SExprBuilder, options);
        report(clauses, |clause| println!("{clause}"))
    } else if args.predicates {
        let mut predicates = Predicates::default();
        let clauses = asp_syntax::parse_program_with(&source, AstBuilder, options);
        let errors = report(clauses, |clause| predicates.visit_node(&clause));
        for (name, arity) in &predicates.seen {
            println!("{name}/{arity}");
        }
        errors
    } else {
        let clauses = asp_syntax::parse_program_with(&source, AstBuilder, options);
        report(clauses, |clause| println!("{clause:?}"))
    };
    if errors > 0 {
        bail!("{} error(s) in {}", errors, args.file.display());
    }
    Ok(())
}

/// Feeds parsed clauses to `on_clause` and prints errors as they come.
fn report<T>(
    clauses: impl Iterator<Item = Result<T, ParseError>>,
    mut on_clause: impl FnMut(T),
) -> usize {
    let mut errors = 0;
    for clause in clauses {
        match clause {
            Ok(clause) => on_clause(clause),
            Err(err) => {
                errors += 1;
                eprintln!("{} {}", "error:".red().bold(), err);
                if let ParseError::Syntax(err) = &err {
                    eprintln!("{} {}", "   in:".dimmed(), err.clause);
                }
            }
        }
    }
    errors
}
