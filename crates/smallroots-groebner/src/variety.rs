//! Integer points of zero-dimensional ideals.
//!
//! The ideal is brought to a reduced lex basis over ℚ. For a
//! zero-dimensional ideal that basis is triangular: the elements whose
//! smallest variable is `x_k` only involve `x_k, ..., x_{n-1}`. Points are
//! then built from the last variable up, keeping integer roots only.

use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use smallroots_integers::{Integer, Rational};
use smallroots_poly::{integer_roots, Polynomial, TermOrder};
use tracing::debug;

use crate::error::VarietyError;
use crate::rational::rational_groebner_basis;

/// All integer points of the ideal generated by `polys`.
///
/// Each point has one value per generator of the polynomials' ring, in
/// ring order. An inconsistent system yields no points.
///
/// # Errors
///
/// Returns [`VarietyError::PositiveDimensional`] when the ideal has
/// infinitely many points.
pub fn integer_points(polys: &[Polynomial<Rational>]) -> Result<Vec<Vec<Integer>>, VarietyError> {
    let Some(first) = polys.first() else {
        return Ok(Vec::new());
    };
    let n = first.ring().num_vars();
    let basis = rational_groebner_basis(polys, &TermOrder::Lex);
    if basis.iter().any(Polynomial::is_constant) {
        return Ok(Vec::new());
    }
    let zero_dimensional = (0..n).all(|i| {
        basis.iter().any(|g| {
            g.leading_monomial()
                .and_then(smallroots_poly::Monomial::as_pure_power)
                .is_some_and(|(j, _)| j == i)
        })
    });
    if !zero_dimensional {
        return Err(VarietyError::PositiveDimensional { basis });
    }

    // level k holds the elements whose smallest variable is x_k
    let mut levels: Vec<Vec<&Polynomial<Rational>>> = vec![Vec::new(); n];
    for g in &basis {
        if let Some(&k) = g.variable_indices().first() {
            levels[k].push(g);
        }
    }

    let mut points = Vec::new();
    let mut values: FxHashMap<usize, Rational> = FxHashMap::default();
    extend(&levels, n, &mut values, &mut points);
    debug!(target: "smallroots::Variety", count = points.len(), "integer points found");
    Ok(points)
}

fn extend(
    levels: &[Vec<&Polynomial<Rational>>],
    k: usize,
    values: &mut FxHashMap<usize, Rational>,
    points: &mut Vec<Vec<Integer>>,
) {
    if k == 0 {
        let point = (0..levels.len())
            .map(|i| values.get(&i).map_or_else(Integer::default, Rational::floor))
            .collect();
        points.push(point);
        return;
    }
    let var = k - 1;
    let specialised: Vec<Polynomial<Rational>> = levels[var]
        .iter()
        .map(|g| g.partial_evaluate(values))
        .filter(|g| !g.is_zero())
        .collect();
    if specialised.iter().any(Polynomial::is_constant) {
        return;
    }
    let Some(coeffs) = specialised.first().and_then(|g| g.univariate_coeffs(var)) else {
        return;
    };
    let denom = coeffs
        .iter()
        .fold(Integer::one(), |l, c| l.lcm(&c.denominator()));
    let int_coeffs: Vec<Integer> = coeffs
        .iter()
        .map(|c| {
            (c.numerator() * &denom)
                .div_exact(&c.denominator())
                .unwrap_or_default()
        })
        .collect();
    for root in integer_roots(&int_coeffs) {
        let value = Rational::from(&root);
        let all_vanish = specialised.iter().skip(1).all(|g| {
            g.univariate_coeffs(var).is_some_and(|cs| {
                cs.iter()
                    .rev()
                    .fold(Rational::zero(), |acc, c| acc * &value + c)
                    .is_zero()
            })
        });
        if all_vanish {
            values.insert(var, value);
            extend(levels, var, values, points);
            values.remove(&var);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_poly::{parse_polynomials, parse_polynomial_in, PolyRing};

    #[test]
    fn test_circle_and_line() {
        let (_, polys) = parse_polynomials(&["x^2 + y^2 - 25", "x - y - 1"]).unwrap();
        let polys: Vec<_> = polys.iter().map(Polynomial::to_rational).collect();
        let points = integer_points(&polys).unwrap();
        let expect = |x: i64, y: i64| vec![Integer::new(x), Integer::new(y)];
        assert_eq!(points.len(), 2);
        assert!(points.contains(&expect(4, 3)));
        assert!(points.contains(&expect(-3, -4)));
    }

    #[test]
    fn test_rational_points_are_dropped() {
        let (_, polys) = parse_polynomials(&["2*x - 1", "y - 3"]).unwrap();
        let polys: Vec<_> = polys.iter().map(Polynomial::to_rational).collect();
        assert!(integer_points(&polys).unwrap().is_empty());
    }

    #[test]
    fn test_positive_dimensional() {
        let ring = PolyRing::from_names(&["x", "y"], TermOrder::Lex).unwrap();
        let f = parse_polynomial_in(&ring, "x - 2*y").unwrap().to_rational();
        assert!(matches!(
            integer_points(&[f]),
            Err(VarietyError::PositiveDimensional { .. })
        ));
    }
}
