//! Reading roots and relations off reduced lattices.

use num_traits::One;
use smallroots_integers::{Integer, Rational};
use smallroots_model::{BoundSet, Error, Lattice, PartialSolutionSet, Relation, Result};
use smallroots_poly::Monomial;
use tracing::{debug, info};

/// Integer relations from a reduced dual lattice.
///
/// A row whose scaled L1 norm is below the smallest possible modulus is a
/// polynomial whose value at any bounded root is smaller than the modulus
/// while divisible by it, so it vanishes over the integers. With
/// `use_l1 == false` the scaled L2 norm over `sqrt(dimension)` is compared
/// instead.
///
/// # Errors
///
/// Returns [`Error::Failure`] if no row is short and
/// [`Error::InvalidInput`] if the lattice has no modulus.
pub fn integer_relations(lattice: &Lattice, bounds: &BoundSet, use_l1: bool) -> Result<Vec<Relation>> {
    let Some(modulus) = &lattice.modulus else {
        return Err(Error::invalid("integer relations need a lattice of modular relations"));
    };
    let bound = bounds.lower_bound(modulus)?;
    let max_l1 = Rational::from(&bound);
    let max_l2_squared = Rational::from(&bound * &bound * Integer::from(lattice.dimension()));

    let short: Vec<usize> = (0..lattice.rank())
        .filter(|&i| {
            if use_l1 {
                lattice.l1_norm(i).is_some_and(|n| n < max_l1)
            } else {
                lattice.l2_norm_squared(i).is_some_and(|n| n < max_l2_squared)
            }
        })
        .collect();
    info!(
        target: "smallroots::HowgraveGraham",
        "found {} integer relation(s) in the lattice", short.len()
    );

    let mut relations = Vec::with_capacity(short.len());
    for i in short {
        let polynomial = lattice.relation(i)?.polynomial;
        if polynomial.is_zero() {
            continue;
        }
        debug!(target: "smallroots::HowgraveGraham", "{polynomial}");
        relations.push(Relation::integer(polynomial));
    }
    if relations.is_empty() {
        return Err(Error::failure("lattice reduction found no short vectors"));
    }
    Ok(relations)
}

/// The root encoded by a reduced primal lattice.
///
/// Rows with scaled infinity norm at most one are candidates. A root is
/// only read off when there is exactly one candidate and the columns
/// include the constant monomial and every generator.
///
/// # Errors
///
/// Returns [`Error::Failure`] in every other case, including a candidate
/// whose entries are not the monomials of its own generator values.
pub fn primal_root(lattice: &Lattice) -> Result<PartialSolutionSet> {
    let short: Vec<usize> = (0..lattice.rank())
        .filter(|&i| lattice.inf_norm(i).is_some_and(|n| n <= Rational::one()))
        .collect();
    debug!(
        target: "smallroots::PrimalRecovery",
        "found {} short vector(s) in the primal lattice", short.len()
    );
    if short.is_empty() {
        return Err(Error::failure("lattice reduction found no short vectors"));
    }

    let n = lattice.ring.num_vars();
    let one = lattice.monomials.iter().position(Monomial::is_one);
    let generators: Option<Vec<usize>> = (0..n)
        .map(|i| {
            let x = Monomial::var(i, n);
            lattice.monomials.iter().position(|m| *m == x)
        })
        .collect();
    match (short.as_slice(), one, generators) {
        ([i], Some(one), Some(generators)) => root_from_vector(lattice, *i, one, &generators),
        _ => Err(Error::failure("unable to extract a root from the primal lattice")),
    }
}

fn root_from_vector(
    lattice: &Lattice,
    row: usize,
    one: usize,
    generators: &[usize],
) -> Result<PartialSolutionSet> {
    let entries = &lattice.vector(row)[..lattice.monomials.len()];
    let negate = entries[one].is_negative();
    let entries: Vec<Integer> = entries
        .iter()
        .map(|x| if negate { -x } else { x.clone() })
        .collect();
    let values: Vec<Integer> = generators.iter().map(|&c| entries[c].clone()).collect();

    let consistent = lattice.monomials.iter().zip(&entries).all(|(m, x)| {
        let value = m
            .support()
            .fold(Integer::one(), |acc, i| acc * values[i].pow(m.exponent(i)));
        value == *x
    });
    if !consistent {
        return Err(Error::failure("short vector is not an evaluation vector"));
    }
    Ok(vec![lattice.ring.variables().iter().cloned().zip(values).collect()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DualBuilder, LatticeBuilder, PrimalBuilder};
    use crate::reduction::LatticeReduction;
    use smallroots_lattice::{InProcess, LllConfig};
    use smallroots_lattice::DenseMatrix;
    use smallroots_model::{Bound, RelationSet, Scale};
    use smallroots_poly::{parse_polynomials, PolyRing, TermOrder, Variable};

    fn reduction() -> LatticeReduction {
        LatticeReduction::new(Box::new(InProcess(LllConfig::default())), 64)
    }

    fn modular(exprs: &[&str], modulus: i64) -> RelationSet {
        let (_, polys) = parse_polynomials(exprs).unwrap();
        RelationSet::new(
            polys
                .into_iter()
                .map(|f| Relation::modular(f, Integer::new(modulus)))
                .collect(),
        )
        .unwrap()
    }

    fn bounded_x(b: i64) -> BoundSet {
        [(Variable::new("x"), Bound::symmetric(&Integer::new(b)))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_integer_relations_vanish_at_root() {
        let rels = modular(&["x^2 - 9", "1009*x", "1009"], 1009);
        let bounds = bounded_x(4);
        let reduced = reduction().run(&DualBuilder.build(&rels, &bounds).unwrap()).unwrap();
        let root = [(Variable::new("x"), Integer::new(3))].into_iter().collect();
        for use_l1 in [true, false] {
            let found = integer_relations(&reduced, &bounds, use_l1).unwrap();
            assert!(!found.is_empty());
            for rel in &found {
                assert!(rel.is_integer());
                assert!(rel.check(&root).unwrap());
            }
        }
    }

    #[test]
    fn test_integer_relations_need_short_rows() {
        // the root may be as large as the modulus, nothing is short
        let rels = modular(&["x^2 + x + 1"], 7);
        let bounds = bounded_x(1000);
        let lattice = DualBuilder.build(&rels, &bounds).unwrap();
        assert!(matches!(
            integer_relations(&lattice, &bounds, true),
            Err(Error::Failure(_))
        ));
    }

    #[test]
    fn test_primal_root() {
        let rels = modular(&["x - 5"], 101);
        let reduced = reduction()
            .run(&PrimalBuilder.build(&rels, &bounded_x(8)).unwrap())
            .unwrap();
        let roots = primal_root(&reduced).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].get(&Variable::new("x")), Some(&Integer::new(5)));
    }

    #[test]
    fn test_primal_root_needs_constant_column() {
        let rels = modular(&["x"], 101);
        let reduced = reduction()
            .run(&PrimalBuilder.build(&rels, &bounded_x(8)).unwrap())
            .unwrap();
        assert!(matches!(primal_root(&reduced), Err(Error::Failure(_))));
    }

    #[test]
    fn test_primal_root_rejects_inconsistent_vector() {
        // x = 2 from the generator column, but the x^2 column holds 5
        let ring = PolyRing::from_names(&["x"], TermOrder::Grevlex).unwrap();
        let int = Integer::new;
        let lattice = Lattice {
            basis: DenseMatrix::from_rows(vec![vec![int(5), int(2), int(1)]]),
            monomials: vec![
                Monomial::from_exponents(&[2]),
                Monomial::from_exponents(&[1]),
                Monomial::one(1),
            ],
            ring,
            modulus: None,
            scale_factors: Some(vec![
                Scale::Finite(Rational::from_i64(1, 5)),
                Scale::Finite(Rational::from_i64(1, 2)),
                Scale::Finite(Rational::one()),
            ]),
            is_primal: true,
        };
        assert!(matches!(primal_root(&lattice), Err(Error::Failure(_))));
    }
}
