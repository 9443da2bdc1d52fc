extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{
    braced, bracketed, parenthesized, parse_macro_input, token, Expr, Ident, LitBool, LitInt,
    LitStr, Result, Token,
};

enum SExprParser {
    /// Expression evaluating to a single `SExpr`.
    Single(TokenStream2),
    /// Expression evaluating to an iterator of `ToSExpr` values,
    /// spliced into the enclosing list.
    Splice(TokenStream2),
}

fn parse_interpolated(input: ParseStream) -> Result<TokenStream2> {
    if input.peek(token::Brace) {
        let content;
        braced!(content in input);
        let expr: Expr = content.parse()?;
        return Ok(quote! { #expr });
    }
    let ident = input.call(Ident::parse_any)?;
    Ok(quote! { #ident })
}

fn parse_list(content: ParseStream) -> Result<TokenStream2> {
    let mut pushes = Vec::new();
    while !content.is_empty() {
        let push = match content.parse::<SExprParser>()? {
            SExprParser::Single(expr) => quote! { __items.push(#expr); },
            SExprParser::Splice(expr) => quote! {
                __items.extend(
                    ::core::iter::IntoIterator::into_iter(#expr)
                        .map(::asp_sexpr::ToSExpr::to_sexpr),
                );
            },
        };
        pushes.push(push);
    }
    Ok(quote! {
        {
            #[allow(unused_mut)]
            let mut __items: ::std::vec::Vec<::asp_sexpr::SExpr> = ::std::vec::Vec::new();
            #(#pushes)*
            ::asp_sexpr::SExpr::List(__items)
        }
    })
}

impl Parse for SExprParser {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(token::Paren) {
            let content;
            parenthesized!(content in input);
            return Ok(Self::Single(parse_list(&content)?));
        }
        if input.peek(token::Bracket) {
            let content;
            bracketed!(content in input);
            return Ok(Self::Single(parse_list(&content)?));
        }
        if input.peek(token::Brace) {
            let content;
            braced!(content in input);
            return Ok(Self::Single(parse_list(&content)?));
        }
        if input.peek(Token![$]) {
            input.parse::<Token![$]>()?;
            let value = parse_interpolated(input)?;
            return Ok(Self::Single(quote! {
                ::asp_sexpr::ToSExpr::to_sexpr(#value)
            }));
        }
        if input.peek(Token![#]) {
            input.parse::<Token![#]>()?;
            let value = parse_interpolated(input)?;
            return Ok(Self::Single(quote! {
                ::asp_sexpr::SExpr::Atom(::asp_sexpr::Atom::Symbol(
                    ::std::string::ToString::to_string(&#value),
                ))
            }));
        }
        if input.peek(Token![@]) {
            input.parse::<Token![@]>()?;
            let value = parse_interpolated(input)?;
            return Ok(Self::Splice(value));
        }
        if input.peek(Token![-]) && input.peek2(LitInt) {
            input.parse::<Token![-]>()?;
            let num: LitInt = input.parse()?;
            return Ok(Self::Single(quote! {
                ::asp_sexpr::SExpr::Atom(::asp_sexpr::Atom::Number(-#num))
            }));
        }
        if input.peek(LitStr) {
            let s: LitStr = input.parse()?;
            return Ok(Self::Single(quote! {
                ::asp_sexpr::SExpr::Atom(::asp_sexpr::Atom::String(#s.to_string()))
            }));
        }
        if input.peek(LitInt) {
            let num: LitInt = input.parse()?;
            return Ok(Self::Single(quote! {
                ::asp_sexpr::SExpr::Atom(::asp_sexpr::Atom::Number(#num))
            }));
        }
        if input.peek(LitBool) {
            let b: LitBool = input.parse()?;
            let b = if b.value { "true" } else { "false" };
            return Ok(Self::Single(quote! {
                ::asp_sexpr::SExpr::Atom(::asp_sexpr::Atom::Symbol(#b.to_string()))
            }));
        }
        if input.peek(Token![_]) {
            input.parse::<Token![_]>()?;
            return Ok(Self::Single(quote! {
                ::asp_sexpr::SExpr::Atom(::asp_sexpr::Atom::Symbol("_".to_string()))
            }));
        }
        if input.peek(Ident::peek_any) {
            let ident = input.call(Ident::parse_any)?;
            let name = ident.to_string();
            return Ok(Self::Single(quote! {
                ::asp_sexpr::SExpr::Atom(::asp_sexpr::Atom::Symbol(#name.to_string()))
            }));
        }
        Err(input.error("Not a valid sexpr"))
    }
}

#[proc_macro]
pub fn sexpr(tokens: TokenStream) -> TokenStream {
    match parse_macro_input!(tokens as SExprParser) {
        SExprParser::Single(parsed) => quote! { #parsed }.into(),
        SExprParser::Splice(_) => {
            syn::Error::new(proc_macro2::Span::call_site(), "Cannot splice outside of a list")
                .to_compile_error()
                .into()
        }
    }
}
