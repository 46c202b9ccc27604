//! Text input for polynomials and polynomial equations.
//!
//! Grammar, with the usual precedence:
//!
//! ```text
//! relation := expr ( "==" expr )?
//! expr     := term (("+" | "-") term)*
//! term     := unary ("*" unary)*
//! unary    := ("-" | "+") unary | power
//! power    := atom (("^" | "**") integer)?
//! atom     := integer | identifier | "(" expr ")"
//! ```
//!
//! Integers are decimal or `0x` hexadecimal. An equation `A == B` stands
//! for the polynomial `A - B`.

use std::sync::Arc;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, char, digit1, hex_digit1, multispace0};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded, tuple};
use nom::IResult;
use smallroots_integers::Integer;

use crate::error::PolyError;
use crate::ordering::TermOrder;
use crate::polynomial::Polynomial;
use crate::ring::PolyRing;
use crate::variable::Variable;

#[derive(Debug, Clone)]
enum Expr {
    Int(Integer),
    Var(String),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Pow(Box<Expr>, u32),
}

impl Expr {
    fn collect_names(&self, out: &mut Vec<String>) {
        match self {
            Expr::Int(_) => {}
            Expr::Var(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) => {
                a.collect_names(out);
                b.collect_names(out);
            }
            Expr::Neg(a) | Expr::Pow(a, _) => a.collect_names(out),
        }
    }

    fn build(&self, ring: &Arc<PolyRing>) -> Result<Polynomial<Integer>, PolyError> {
        Ok(match self {
            Expr::Int(n) => Polynomial::constant(ring.clone(), n.clone()),
            Expr::Var(name) => Polynomial::variable(ring.clone(), &Variable::new(name))
                .ok_or_else(|| PolyError::UnknownVariable(name.clone()))?,
            Expr::Add(a, b) => a.build(ring)? + b.build(ring)?,
            Expr::Sub(a, b) => a.build(ring)? - b.build(ring)?,
            Expr::Mul(a, b) => a.build(ring)? * b.build(ring)?,
            Expr::Neg(a) => -a.build(ring)?,
            Expr::Pow(a, k) => a.build(ring)?.pow(*k),
        })
    }
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    delimited(multispace0, inner, multispace0)
}

fn integer(input: &str) -> IResult<&str, Integer> {
    map_res(
        alt((recognize(pair(tag("0x"), hex_digit1)), digit1)),
        Integer::parse_token,
    )(input)
}

fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        String::from,
    )(input)
}

fn atom(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        map(integer, Expr::Int),
        map(identifier, Expr::Var),
        delimited(char('('), expr, char(')')),
    )))(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = atom(input)?;
    let (input, exp) = opt(preceded(
        ws(alt((tag("**"), tag("^")))),
        ws(map_res(digit1, str::parse::<u32>)),
    ))(input)?;
    Ok((
        input,
        match exp {
            Some(k) => Expr::Pow(Box::new(base), k),
            None => base,
        },
    ))
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |e| Expr::Neg(Box::new(e))),
        preceded(ws(char('+')), unary),
        power,
    ))(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(preceded(ws(char('*')), unary))(input)?;
    Ok((
        input,
        rest.into_iter()
            .fold(first, |acc, e| Expr::Mul(Box::new(acc), Box::new(e))),
    ))
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(tuple((ws(alt((char('+'), char('-')))), term)))(input)?;
    Ok((
        input,
        rest.into_iter().fold(first, |acc, (op, e)| {
            if op == '+' {
                Expr::Add(Box::new(acc), Box::new(e))
            } else {
                Expr::Sub(Box::new(acc), Box::new(e))
            }
        }),
    ))
}

fn parse_expr(text: &str, whole: &str) -> Result<Expr, PolyError> {
    all_consuming(expr)(text)
        .map(|(_, e)| e)
        .map_err(|err| PolyError::Syntax {
            input: whole.to_string(),
            reason: match err {
                nom::Err::Error(e) | nom::Err::Failure(e) => {
                    format!("unexpected input at `{}`", e.input.trim())
                }
                nom::Err::Incomplete(_) => "incomplete input".to_string(),
            },
        })
}

fn parse_relation(text: &str) -> Result<Expr, PolyError> {
    for op in ["<=", ">=", "!=", "<", ">"] {
        if text.contains(op) {
            return Err(PolyError::UnsupportedRelation(text.to_string()));
        }
    }
    let sides: Vec<&str> = if text.contains("==") {
        text.split("==").collect()
    } else {
        text.split('=').collect()
    };
    match sides.as_slice() {
        [single] => parse_expr(single, text),
        [lhs, rhs] => Ok(Expr::Sub(
            Box::new(parse_expr(lhs, text)?),
            Box::new(parse_expr(rhs, text)?),
        )),
        _ => Err(PolyError::Syntax {
            input: text.to_string(),
            reason: "more than one `==`".to_string(),
        }),
    }
}

/// Parses expressions or equations into one fresh integer polynomial ring.
///
/// The ring's generators are the identifiers in order of first occurrence.
///
/// # Errors
///
/// Returns a [`PolyError`] on malformed input or an unsupported relation.
pub fn parse_polynomials<S: AsRef<str>>(
    inputs: &[S],
) -> Result<(Arc<PolyRing>, Vec<Polynomial<Integer>>), PolyError> {
    let exprs = inputs
        .iter()
        .map(|s| parse_relation(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let mut names = Vec::new();
    for e in &exprs {
        e.collect_names(&mut names);
    }
    let ring = PolyRing::from_names(&names[..], TermOrder::default())?;
    let polys = exprs
        .iter()
        .map(|e| e.build(&ring))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((ring, polys))
}

/// Parses an expression or equation in an existing ring.
///
/// # Errors
///
/// Returns [`PolyError::UnknownVariable`] for names outside `ring`, or a
/// syntax error.
pub fn parse_polynomial_in(
    ring: &Arc<PolyRing>,
    input: &str,
) -> Result<Polynomial<Integer>, PolyError> {
    parse_relation(input)?.build(ring)
}
