//! Strong Gröbner bases over ℤ.
//!
//! Over a Euclidean ring, S-polynomials alone are not enough: whenever
//! neither leading coefficient of a pair divides the other, the
//! G-polynomial (the Bezout combination of the two leading terms) must
//! be reduced as well. Reduction is Euclidean: a term `c*m` is reduced by
//! `g` when `lm(g) | m`, replacing `c` by its symmetric remainder modulo
//! `lc(g)`.
//!
//! The result is a strong basis: every leading term of the ideal is
//! divisible, coefficient and monomial, by the leading term of some
//! basis element.

use num_traits::Zero;
use rustc_hash::FxHashSet;
use smallroots_integers::Integer;
use smallroots_poly::{Monomial, Polynomial};
use tracing::trace;

use crate::criteria::{chain_criterion, select_pair, CriticalPair};

/// Normal form of `f` with respect to `basis`.
///
/// Every term is reduced as far as Euclidean division of its coefficient
/// by a matching leading coefficient allows.
#[must_use]
pub fn reduce(f: &Polynomial<Integer>, basis: &[Polynomial<Integer>]) -> Polynomial<Integer> {
    let mut p = f.clone();
    let mut remainder: Vec<(Monomial, Integer)> = Vec::new();
    while let Some((m, c)) = p.leading_term().cloned() {
        let step = basis.iter().find_map(|g| {
            let (lm, lc) = g.leading_term()?;
            let shift = m.div(lm)?;
            let q = c.div_round(lc);
            (!q.is_zero()).then(|| g.mul_term(&shift, &q))
        });
        match step {
            Some(sub) => p = p - sub,
            None => {
                remainder.push((m, c));
                p = p.tail();
            }
        }
    }
    Polynomial::from_terms(f.ring().clone(), remainder)
}

/// `(lt(g) | lt(f))` in the strong sense: monomial and coefficient.
fn strongly_divides(g: &Polynomial<Integer>, f: &Polynomial<Integer>) -> bool {
    match (g.leading_term(), f.leading_term()) {
        (Some((mg, cg)), Some((mf, cf))) => mg.divides(mf) && cf.is_divisible_by(cg),
        _ => false,
    }
}

fn positive(f: Polynomial<Integer>) -> Polynomial<Integer> {
    if f.leading_coeff().is_some_and(Integer::is_negative) {
        -f
    } else {
        f
    }
}

fn s_polynomial(f: &Polynomial<Integer>, g: &Polynomial<Integer>) -> Option<Polynomial<Integer>> {
    let (mf, cf) = f.leading_term()?;
    let (mg, cg) = g.leading_term()?;
    let lcm_m = mf.lcm(mg);
    let lcm_c = cf.lcm(cg);
    let a = f.mul_term(&lcm_m.div(mf)?, &lcm_c.div_exact(cf)?);
    let b = g.mul_term(&lcm_m.div(mg)?, &lcm_c.div_exact(cg)?);
    Some(a - b)
}

fn g_polynomial(f: &Polynomial<Integer>, g: &Polynomial<Integer>) -> Option<Polynomial<Integer>> {
    let (mf, cf) = f.leading_term()?;
    let (mg, cg) = g.leading_term()?;
    if cf.is_divisible_by(cg) || cg.is_divisible_by(cf) {
        return None;
    }
    let (_, u, v) = cf.extended_gcd(cg);
    let lcm_m = mf.lcm(mg);
    let a = f.mul_term(&lcm_m.div(mf)?, &u);
    let b = g.mul_term(&lcm_m.div(mg)?, &v);
    Some(a + b)
}

struct Builder {
    basis: Vec<Polynomial<Integer>>,
    leading: Vec<Monomial>,
    pairs: Vec<CriticalPair>,
    processed: FxHashSet<(usize, usize)>,
}

impl Builder {
    fn insert(&mut self, f: &Polynomial<Integer>) {
        let r = positive(reduce(f, &self.basis));
        let Some(lm) = r.leading_monomial().cloned() else {
            return;
        };
        let k = self.basis.len();
        for (i, lm_i) in self.leading.iter().enumerate() {
            self.pairs.push(CriticalPair::new(i, k, lm_i, &lm));
        }
        self.leading.push(lm);
        self.basis.push(r);
    }
}

/// Computes a minimal, tail-reduced strong Gröbner basis of the ideal
/// generated by `generators`, with positive leading coefficients.
///
/// The order is the one of the generators' ring. The zero ideal yields an
/// empty basis.
#[must_use]
pub fn groebner_basis(generators: &[Polynomial<Integer>]) -> Vec<Polynomial<Integer>> {
    let Some(first) = generators.first() else {
        return Vec::new();
    };
    let order = first.ring().order().clone();
    let mut builder = Builder {
        basis: Vec::new(),
        leading: Vec::new(),
        pairs: Vec::new(),
        processed: FxHashSet::default(),
    };
    for g in generators {
        builder.insert(g);
    }

    while let Some(pair) = select_pair(&mut builder.pairs, &order) {
        let (i, j) = (pair.i, pair.j);
        // the chain criterion needs the third leading coefficient to divide both
        let skip_s = {
            let (ci, cj) = (builder.basis[i].leading_coeff(), builder.basis[j].leading_coeff());
            chain_criterion(&pair, &builder.leading, &builder.processed, |k| {
                match (ci, cj, builder.basis[k].leading_coeff()) {
                    (Some(ci), Some(cj), Some(ck)) => {
                        ci.is_divisible_by(ck) && cj.is_divisible_by(ck)
                    }
                    _ => false,
                }
            })
        };
        builder.processed.insert((i, j));
        let (f, g) = (builder.basis[i].clone(), builder.basis[j].clone());
        if let Some(h) = g_polynomial(&f, &g) {
            builder.insert(&h);
        }
        if !skip_s {
            if let Some(h) = s_polynomial(&f, &g) {
                builder.insert(&h);
            }
        }
    }
    trace!(
        target: "smallroots::Groebner",
        size = builder.basis.len(),
        "strong basis before minimisation"
    );
    minimise(builder.basis)
}

fn minimise(basis: Vec<Polynomial<Integer>>) -> Vec<Polynomial<Integer>> {
    let mut kept: Vec<Polynomial<Integer>> = Vec::new();
    for (i, g) in basis.iter().enumerate() {
        let redundant = basis.iter().enumerate().any(|(j, h)| {
            if i == j || !strongly_divides(h, g) {
                return false;
            }
            // equal leading terms: keep the earliest
            !strongly_divides(g, h) || j < i
        });
        if !redundant {
            kept.push(g.clone());
        }
    }
    let mut reduced = Vec::with_capacity(kept.len());
    for (i, g) in kept.iter().enumerate() {
        let others: Vec<Polynomial<Integer>> = kept
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, h)| h.clone())
            .collect();
        let Some((m, c)) = g.leading_term() else {
            continue;
        };
        let head = Polynomial::monomial(g.ring().clone(), m.clone(), c.clone());
        reduced.push(head + reduce(&g.tail(), &others));
    }
    let order = reduced
        .first()
        .map(|g| g.ring().order().clone())
        .unwrap_or_default();
    reduced.sort_by(|a, b| match (a.leading_term(), b.leading_term()) {
        (Some((ma, ca)), Some((mb, cb))) => order.compare(ma, mb).then_with(|| ca.cmp(cb)),
        _ => std::cmp::Ordering::Equal,
    });
    reduced
}
