//! Reduced Gröbner bases over ℚ (Buchberger's algorithm).

use rustc_hash::FxHashSet;
use smallroots_integers::Rational;
use smallroots_poly::{Monomial, Polynomial, TermOrder};

use crate::criteria::{chain_criterion, product_criterion, select_pair, CriticalPair};

/// Full reduction of `f` by `basis`.
#[must_use]
pub fn reduce(f: &Polynomial<Rational>, basis: &[Polynomial<Rational>]) -> Polynomial<Rational> {
    let mut p = f.clone();
    let mut remainder: Vec<(Monomial, Rational)> = Vec::new();
    while let Some((m, c)) = p.leading_term().cloned() {
        let step = basis.iter().find_map(|g| {
            let (lm, lc) = g.leading_term()?;
            let shift = m.div(lm)?;
            let q = &c / lc;
            Some(g.mul_term(&shift, &q))
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

fn s_polynomial(f: &Polynomial<Rational>, g: &Polynomial<Rational>) -> Option<Polynomial<Rational>> {
    let (mf, cf) = f.leading_term()?;
    let (mg, cg) = g.leading_term()?;
    let lcm = mf.lcm(mg);
    let a = f.mul_term(&lcm.div(mf)?, &cf.inv()?);
    let b = g.mul_term(&lcm.div(mg)?, &cg.inv()?);
    Some(a - b)
}

/// Computes the reduced Gröbner basis of `generators` under `order`.
///
/// Elements are monic and sorted by increasing leading monomial.
#[must_use]
pub fn rational_groebner_basis(
    generators: &[Polynomial<Rational>],
    order: &TermOrder,
) -> Vec<Polynomial<Rational>> {
    let mut basis: Vec<Polynomial<Rational>> = Vec::new();
    let mut leading: Vec<Monomial> = Vec::new();
    let mut pairs: Vec<CriticalPair> = Vec::new();
    let mut processed: FxHashSet<(usize, usize)> = FxHashSet::default();

    let insert = |f: Polynomial<Rational>,
                  basis: &mut Vec<Polynomial<Rational>>,
                  leading: &mut Vec<Monomial>,
                  pairs: &mut Vec<CriticalPair>| {
        let r = reduce(&f, basis).monic();
        let Some(lm) = r.leading_monomial().cloned() else {
            return;
        };
        let k = basis.len();
        for (i, lm_i) in leading.iter().enumerate() {
            pairs.push(CriticalPair::new(i, k, lm_i, &lm));
        }
        leading.push(lm);
        basis.push(r);
    };

    for g in generators {
        insert(g.with_order(order.clone()), &mut basis, &mut leading, &mut pairs);
    }
    while let Some(pair) = select_pair(&mut pairs, order) {
        let skip = product_criterion(&leading[pair.i], &leading[pair.j])
            || chain_criterion(&pair, &leading, &processed, |_| true);
        processed.insert((pair.i, pair.j));
        if skip {
            continue;
        }
        if let Some(h) = s_polynomial(&basis[pair.i], &basis[pair.j]) {
            insert(h, &mut basis, &mut leading, &mut pairs);
        }
    }

    // minimal basis: drop elements whose leading monomial is a multiple of another's
    let mut kept: Vec<Polynomial<Rational>> = Vec::new();
    for (i, g) in basis.iter().enumerate() {
        let redundant = leading.iter().enumerate().any(|(j, lm_j)| {
            j != i && lm_j.divides(&leading[i]) && (lm_j != &leading[i] || j < i)
        });
        if !redundant {
            kept.push(g.clone());
        }
    }
    let mut reduced: Vec<Polynomial<Rational>> = kept
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let others: Vec<_> = kept
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, h)| h.clone())
                .collect();
            reduce(g, &others).monic()
        })
        .collect();
    reduced.sort_by(|a, b| match (a.leading_monomial(), b.leading_monomial()) {
        (Some(ma), Some(mb)) => order.compare(ma, mb),
        _ => std::cmp::Ordering::Equal,
    });
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_poly::{parse_polynomial_in, PolyRing};

    #[test]
    fn test_lex_basis_is_triangular() {
        let ring = PolyRing::from_names(&["x", "y"], TermOrder::Lex).unwrap();
        let gens: Vec<_> = ["x^2 + y^2 - 25", "x - y - 1"]
            .iter()
            .map(|s| parse_polynomial_in(&ring, s).unwrap().to_rational())
            .collect();
        let gb = rational_groebner_basis(&gens, &TermOrder::Lex);
        // y^2 + y - 12 and x - y - 1
        assert_eq!(gb.len(), 2);
        assert_eq!(gb[0].to_string(), "y^2 + y - 12");
        assert_eq!(gb[1].to_string(), "x - y - 1");
    }

    #[test]
    fn test_inconsistent_system() {
        let ring = PolyRing::from_names(&["x"], TermOrder::Lex).unwrap();
        let gens: Vec<_> = ["2*x - 1", "x"]
            .iter()
            .map(|s| parse_polynomial_in(&ring, s).unwrap().to_rational())
            .collect();
        let gb = rational_groebner_basis(&gens, &TermOrder::Lex);
        assert_eq!(gb.len(), 1);
        assert!(gb[0].is_constant());
    }
}
