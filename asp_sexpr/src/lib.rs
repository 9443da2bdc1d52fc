#[derive(Clone, PartialEq, Eq)]
pub enum SExpr {
    List(Vec<SExpr>),
    Atom(Atom),
}

#[derive(Clone, PartialEq, Eq)]
pub enum Atom {
    Symbol(String),
    Number(i64),
    String(String),
}

impl SExpr {
    pub fn symbol(name: impl Into<String>) -> Self {
        SExpr::Atom(Atom::Symbol(name.into()))
    }

    pub fn list(items: impl IntoIterator<Item = SExpr>) -> Self {
        SExpr::List(items.into_iter().collect())
    }
}

/// Conversion used by the `sexpr!` macro for `$value` interpolation
/// and `@values` splicing.
pub trait ToSExpr {
    fn to_sexpr(self) -> SExpr;
}

impl ToSExpr for SExpr {
    fn to_sexpr(self) -> SExpr {
        self
    }
}

impl ToSExpr for String {
    fn to_sexpr(self) -> SExpr {
        SExpr::Atom(Atom::String(self))
    }
}

impl ToSExpr for &str {
    fn to_sexpr(self) -> SExpr {
        SExpr::Atom(Atom::String(self.to_owned()))
    }
}

impl ToSExpr for bool {
    fn to_sexpr(self) -> SExpr {
        SExpr::symbol(if self { "true" } else { "false" })
    }
}

// only types that widen into i64 without loss
macro_rules! number_to_sexpr {
    ($($t:ty),*$(,)?) => {
        $(impl ToSExpr for $t {
            fn to_sexpr(self) -> SExpr {
                SExpr::Atom(Atom::Number(i64::from(self)))
            }
        })*
    };
}

number_to_sexpr![i8, i16, i32, i64, u8, u16, u32];

impl<T: ToSExpr> ToSExpr for Vec<T> {
    fn to_sexpr(self) -> SExpr {
        SExpr::List(self.into_iter().map(ToSExpr::to_sexpr).collect())
    }
}

impl<T: ToSExpr> ToSExpr for Box<T> {
    fn to_sexpr(self) -> SExpr {
        (*self).to_sexpr()
    }
}

/// `None` becomes the `none` symbol.
impl<T: ToSExpr> ToSExpr for Option<T> {
    fn to_sexpr(self) -> SExpr {
        match self {
            Some(inner) => inner.to_sexpr(),
            None => SExpr::symbol("none"),
        }
    }
}

impl std::fmt::Debug for SExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::List(l) => {
                write!(f, "(")?;
                for (i, e) in l.iter().enumerate() {
                    if i != 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:?}", e)?;
                }
                write!(f, ")")
            }
            SExpr::Atom(a) => write!(f, "{:?}", a),
        }
    }
}

impl std::fmt::Debug for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Atom::Symbol(s) => write!(f, "`{}", s),
            Atom::Number(n) => write!(f, "{}", n),
            Atom::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl std::fmt::Display for SExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::List(l) => {
                write!(f, "(")?;
                for (i, e) in l.iter().enumerate() {
                    if i != 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, ")")
            }
            SExpr::Atom(Atom::Symbol(s)) => write!(f, "{}", s),
            SExpr::Atom(Atom::Number(n)) => write!(f, "{}", n),
            SExpr::Atom(Atom::String(s)) => write!(f, "\"{}\"", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_omits_symbol_markers() {
        let expr = SExpr::list([
            SExpr::symbol("term"),
            SExpr::symbol("b"),
            SExpr::list([2i64.to_sexpr(), "x".to_sexpr()]),
        ]);
        assert_eq!(expr.to_string(), r#"(term b (2 "x"))"#);
        assert_eq!(format!("{expr:?}"), r#"(`term `b (2 "x"))"#);
    }

    #[test]
    fn unsigned_numbers_widen() {
        assert_eq!(u32::MAX.to_sexpr(), SExpr::Atom(Atom::Number(4_294_967_295)));
        assert_eq!(i8::MIN.to_sexpr(), SExpr::Atom(Atom::Number(-128)));
    }

    #[test]
    fn missing_option_is_none_symbol() {
        assert_eq!(None::<i64>.to_sexpr(), SExpr::symbol("none"));
        assert_eq!(Some(4i64).to_sexpr(), SExpr::Atom(Atom::Number(4)));
    }
}
