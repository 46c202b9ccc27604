//! Coppersmith lattices from shift relations.

use std::cmp::Ordering;

use num_traits::{One, Zero};
use smallroots_integers::{Integer, Rational};
use smallroots_lattice::DenseMatrix;
use smallroots_model::{BoundSet, Error, Lattice, Relation, RelationSet, Result, Scale};
use smallroots_poly::{Monomial, PolyRing};
use tracing::{debug, info};

/// Turns a batch of shift relations into a lattice.
pub trait LatticeBuilder {
    /// Builds the lattice for `relations` under `bounds`.
    ///
    /// # Errors
    ///
    /// Builder specific; missing bounds always propagate.
    fn build(&self, relations: &RelationSet, bounds: &BoundSet) -> Result<Lattice>;
}

/// Every monomial occurring in `relations`, ascending in the ring's order.
fn sorted_monomials(relations: &RelationSet) -> Vec<Monomial> {
    let ring: &PolyRing = relations.ring();
    let mut monomials: Vec<Monomial> = relations
        .iter()
        .flat_map(|r| r.polynomial.monomials().cloned().collect::<Vec<_>>())
        .collect();
    monomials.sort_by(|a, b| ring.order().compare(a, b));
    monomials.dedup_by(|a, b| ring.order().compare(a, b) == Ordering::Equal);
    monomials
}

fn column_of(monomials: &[Monomial], m: &Monomial) -> Result<usize> {
    monomials
        .iter()
        .position(|x| x == m)
        .ok_or_else(|| Error::invalid(format!("monomial {m:?} has no column")))
}

/// Howgrave-Graham's dual construction: one row per relation holding its
/// coefficients, with column `m` scaled by the bound on `m`.
///
/// A short vector is a polynomial whose value at the root is smaller than
/// the modulus, and hence zero over the integers.
#[derive(Clone, Copy, Debug, Default)]
pub struct DualBuilder;

impl LatticeBuilder for DualBuilder {
    fn build(&self, relations: &RelationSet, bounds: &BoundSet) -> Result<Lattice> {
        let modulus = relations[0].modulus.clone();
        if relations.iter().any(|r| r.modulus != modulus) {
            return Err(Error::invalid("shift relations must share one modulus"));
        }
        let ring = relations.ring().clone();
        let monomials = sorted_monomials(relations);
        debug!(
            target: "smallroots::LatticeBuilder",
            "building lattice of rank {} and dimension {}", relations.len(), monomials.len()
        );

        let mut basis = DenseMatrix::zeros(relations.len(), monomials.len());
        for (i, rel) in relations.iter().enumerate() {
            for (m, c) in rel.polynomial.terms() {
                basis[(i, column_of(&monomials, m)?)] = c.clone();
            }
        }
        let scale_factors = monomials
            .iter()
            .map(|m| Ok(Scale::from(bounds.monomial_bound(m, ring.variables())?)))
            .collect::<Result<Vec<_>>>()?;

        let lattice = Lattice {
            basis,
            monomials,
            ring,
            modulus,
            scale_factors: Some(scale_factors),
            is_primal: false,
        };
        info!(
            target: "smallroots::LatticeBuilder",
            "built a dual lattice basis of rank {} and dimension {}",
            lattice.rank(),
            lattice.dimension()
        );
        Ok(lattice)
    }
}

/// Coppersmith's primal construction.
///
/// Rows are indexed by monomials (identity block) followed by one row per
/// modular relation; columns are the monomials followed by one column per
/// relation. A lattice vector with zero relation columns is an evaluation
/// vector `(m(x))_m` of a common root, and the monomial columns are scaled
/// by the inverse bounds so that it is short.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrimalBuilder;

impl LatticeBuilder for PrimalBuilder {
    fn build(&self, relations: &RelationSet, bounds: &BoundSet) -> Result<Lattice> {
        let ring = relations.ring().clone();
        let monomials = sorted_monomials(relations);
        let moduli = relations
            .iter()
            .enumerate()
            .filter_map(|(j, r)| r.modulus.as_ref().map(|m| (j, m)))
            .map(|(j, m)| match m.as_integer() {
                Some(n) => Ok((j, n.clone())),
                None => Err(Error::UnsupportedModulus(format!(
                    "the primal lattice needs a known modulus, not {m}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        let n = monomials.len();
        let rank = n + moduli.len();
        let dimension = n + relations.len();
        debug!(
            target: "smallroots::LatticeBuilder",
            "building lattice of rank {rank} and dimension {dimension}"
        );

        let mut basis = DenseMatrix::zeros(rank, dimension);
        for i in 0..n {
            basis[(i, i)] = Integer::one();
        }
        for (j, rel) in relations.iter().enumerate() {
            for (m, c) in rel.polynomial.terms() {
                basis[(column_of(&monomials, m)?, n + j)] = c.clone();
            }
        }
        for (k, (j, modulus)) in moduli.into_iter().enumerate() {
            basis[(n + k, n + j)] = modulus;
        }

        let mut scale_factors = Vec::with_capacity(dimension);
        for m in &monomials {
            let b = bounds.monomial_bound(m, ring.variables())?;
            if b.is_zero() {
                return Err(Error::invalid(format!("monomial {m:?} is bounded by zero")));
            }
            scale_factors.push(Scale::Finite(Rational::new(Integer::one(), b)));
        }
        scale_factors.extend(std::iter::repeat(Scale::Infinite).take(relations.len()));

        let lattice = Lattice {
            basis,
            monomials,
            ring,
            modulus: None,
            scale_factors: Some(scale_factors),
            is_primal: true,
        };
        info!(
            target: "smallroots::LatticeBuilder",
            "built a primal lattice basis of rank {} and dimension {}",
            lattice.rank(),
            lattice.dimension()
        );
        Ok(lattice)
    }
}

/// Relations that a primal lattice accepts: known or no modulus.
#[must_use]
pub fn primal_compatible(relations: &[Relation]) -> bool {
    relations
        .iter()
        .all(|r| r.modulus.as_ref().map_or(true, |m| !m.is_symbolic()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_model::{Bound, Modulus};
    use smallroots_poly::{parse_polynomials, Variable};

    fn setup(modulus: impl Into<Modulus> + Clone) -> (RelationSet, BoundSet) {
        let (_, polys) = parse_polynomials(&["x^2 + 3*x + 2", "7*x", "7"]).unwrap();
        let rels = RelationSet::new(
            polys
                .into_iter()
                .map(|f| Relation::modular(f, modulus.clone()))
                .collect(),
        )
        .unwrap();
        let bounds = [
            (Variable::new("x"), Bound::symmetric(&Integer::new(10))),
            (Variable::new("p"), Bound::new(Integer::new(5), Integer::new(9))),
        ]
        .into_iter()
        .collect();
        (rels, bounds)
    }

    #[test]
    fn test_dual_layout() {
        let (rels, bounds) = setup(Integer::new(49));
        let lattice = DualBuilder.build(&rels, &bounds).unwrap();
        assert_eq!((lattice.rank(), lattice.dimension()), (3, 3));
        assert!(!lattice.is_primal);
        // columns 1, x, x^2
        assert_eq!(lattice.monomials[0], Monomial::one(1));
        assert_eq!(
            lattice.vector(0),
            &[Integer::new(2), Integer::new(3), Integer::new(1)]
        );
        assert_eq!(
            lattice.scale_factors.as_ref().unwrap()[2],
            Scale::from(Integer::new(100))
        );
        assert_eq!(lattice.relation(1).unwrap(), rels[1]);
    }

    #[test]
    fn test_dual_rejects_mixed_moduli() {
        let (_, polys) = parse_polynomials(&["x + 1", "x"]).unwrap();
        let rels = RelationSet::new(vec![
            Relation::modular(polys[0].clone(), Integer::new(5)),
            Relation::modular(polys[1].clone(), Integer::new(7)),
        ])
        .unwrap();
        let bounds = [(Variable::new("x"), Bound::symmetric(&Integer::new(2)))]
            .into_iter()
            .collect();
        assert!(matches!(
            DualBuilder.build(&rels, &bounds),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_primal_layout() {
        let (rels, bounds) = setup(Integer::new(49));
        let lattice = PrimalBuilder.build(&rels, &bounds).unwrap();
        // three monomial rows plus three modulus rows
        assert_eq!((lattice.rank(), lattice.dimension()), (6, 6));
        assert!(lattice.is_primal);
        assert_eq!(lattice.basis[(0, 3)], Integer::new(2));
        assert_eq!(lattice.basis[(2, 3)], Integer::new(1));
        assert_eq!(lattice.basis[(4, 4)], Integer::new(49));
        assert_eq!(lattice.basis[(4, 1)], Integer::zero());
        let scales = lattice.scale_factors.as_ref().unwrap();
        assert_eq!(scales[1], Scale::Finite(Rational::from_i64(1, 10)));
        assert!(scales[3..].iter().all(Scale::is_infinite));
    }

    #[test]
    fn test_primal_rejects_symbolic_modulus() {
        let (rels, bounds) = setup(Variable::new("p"));
        assert!(!primal_compatible(rels.relations()));
        assert!(matches!(
            PrimalBuilder.build(&rels, &bounds),
            Err(Error::UnsupportedModulus(_))
        ));
        // the dual construction has no such restriction
        assert!(DualBuilder.build(&rels, &bounds).is_ok());
    }
}
