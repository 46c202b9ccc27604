//! Reduction of scaled lattices.
//!
//! Finite scales are brought to a common denominator so the scaled
//! basis is integral. Infinite scales become a large power of two; if
//! the short rows of the reduced basis still touch an infinite column,
//! that power is squared and the basis reduced again.

use num_traits::{One, Zero};
use smallroots_integers::{Integer, Rational};
use smallroots_lattice::{DenseMatrix, LatticeError, LatticeReducer};
use smallroots_model::{Error, Lattice, Result, Scale};
use tracing::debug;

/// Penalty rounds before giving up on the infinite columns.
const MAX_PENALTY_ROUNDS: usize = 8;

/// Reduces [`Lattice`]s with a [`LatticeReducer`] backend.
pub struct LatticeReduction {
    reducer: Box<dyn LatticeReducer>,
    infinity_bits: usize,
}

impl LatticeReduction {
    /// Wraps a backend; infinite scales start at `2^infinity_bits`.
    #[must_use]
    pub fn new(reducer: Box<dyn LatticeReducer>, infinity_bits: usize) -> Self {
        Self {
            reducer,
            infinity_bits,
        }
    }

    fn reduce_integral(&self, basis: &DenseMatrix<Integer>) -> Result<DenseMatrix<Integer>> {
        self.reducer.reduce(basis).map_err(|e| match e {
            LatticeError::DependentRows { row } => {
                Error::failure(format!("lattice basis is degenerate at row {row}"))
            }
            other => Error::Lattice(other),
        })
    }

    /// A reduced basis of the same lattice, unscaled, with the same
    /// monomials, modulus and scales.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Failure`] if the basis is degenerate or the
    /// infinite columns cannot be cleared, and [`Error::Lattice`] if the
    /// backend fails.
    pub fn run(&self, lattice: &Lattice) -> Result<Lattice> {
        let Some(scales) = &lattice.scale_factors else {
            return Ok(lattice.with_basis(self.reduce_integral(&lattice.basis)?));
        };
        debug!(target: "smallroots::LatticeReduction", "beginning lattice reduction");

        let denominator = scales.iter().fold(Integer::one(), |acc, s| match s {
            Scale::Finite(s) => acc.lcm(&s.denominator()),
            Scale::Infinite => acc,
        });
        let mut inf_factor = Integer::pow2(self.infinity_bits);
        let mut int_scales = scales
            .iter()
            .map(|s| match s {
                Scale::Finite(s) => (s * &Rational::from(&denominator))
                    .to_integer()
                    .ok_or_else(|| Error::invalid("scale does not clear its denominator")),
                Scale::Infinite => Ok(inf_factor.clone()),
            })
            .collect::<Result<Vec<Integer>>>()?;
        if int_scales.iter().any(Integer::is_zero) {
            return Err(Error::invalid("zero column scale"));
        }

        let mut scaled = lattice.basis.clone();
        for (j, s) in int_scales.iter().enumerate() {
            scaled.scale_col(j, s);
        }

        let infinite: Vec<usize> = (0..scales.len()).filter(|&j| scales[j].is_infinite()).collect();
        let short_rows = lattice.rank().saturating_sub(infinite.len());
        let mut rounds = 0;
        let reduced = loop {
            let reduced = self.reduce_integral(&scaled)?;
            let clear = (0..short_rows).all(|i| infinite.iter().all(|&j| reduced[(i, j)].is_zero()));
            if clear {
                break reduced;
            }
            rounds += 1;
            if rounds >= MAX_PENALTY_ROUNDS {
                return Err(Error::failure("infinite columns could not be cleared"));
            }
            debug!(
                target: "smallroots::LatticeReduction",
                "short vectors touch infinite columns, raising the penalty"
            );
            inf_factor = &inf_factor * &inf_factor;
            scaled = reduced;
            for &j in &infinite {
                int_scales[j] = &int_scales[j] * &inf_factor;
                scaled.scale_col(j, &inf_factor);
            }
        };

        let mut basis = reduced;
        for i in 0..basis.num_rows() {
            for (j, s) in int_scales.iter().enumerate() {
                let entry = &mut basis[(i, j)];
                *entry = entry
                    .div_exact(s)
                    .ok_or_else(|| Error::invalid("reduced basis is not a multiple of its scales"))?;
            }
        }
        debug!(target: "smallroots::LatticeReduction", "done");
        Ok(lattice.with_basis(basis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DualBuilder, LatticeBuilder, PrimalBuilder};
    use smallroots_lattice::{InProcess, LllConfig};
    use smallroots_model::{Bound, BoundSet, Relation, RelationSet};
    use smallroots_poly::{parse_polynomials, Variable};

    fn reduction() -> LatticeReduction {
        LatticeReduction::new(Box::new(InProcess(LllConfig::default())), 64)
    }

    #[test]
    fn test_dual_reduction_finds_integer_relation() {
        // x^2 - 9 is already short and vanishes at x = 3 over the integers
        let (_, polys) = parse_polynomials(&["x^2 - 9", "1009*x", "1009"]).unwrap();
        let rels = RelationSet::new(
            polys
                .into_iter()
                .map(|f| Relation::modular(f, Integer::new(1009)))
                .collect(),
        )
        .unwrap();
        let bounds: BoundSet = [(Variable::new("x"), Bound::symmetric(&Integer::new(4)))]
            .into_iter()
            .collect();
        let lattice = DualBuilder.build(&rels, &bounds).unwrap();
        let reduced = reduction().run(&lattice).unwrap();
        assert_eq!(reduced.rank(), 3);
        let first = reduced.relation(0).unwrap();
        let root = [(Variable::new("x"), Integer::new(3))].into_iter().collect();
        assert!(first.check(&root).unwrap());
        // short enough to hold over the integers
        let l1 = reduced.l1_norm(0).unwrap();
        assert!(l1 < Rational::from(Integer::new(1009)));
    }

    #[test]
    fn test_primal_reduction_clears_infinite_columns() {
        let (_, polys) = parse_polynomials(&["x - 5"]).unwrap();
        let rels = RelationSet::new(vec![Relation::modular(polys[0].clone(), Integer::new(101))])
            .unwrap();
        let bounds: BoundSet = [(Variable::new("x"), Bound::symmetric(&Integer::new(8)))]
            .into_iter()
            .collect();
        let lattice = PrimalBuilder.build(&rels, &bounds).unwrap();
        let reduced = reduction().run(&lattice).unwrap();
        // rank 3, one infinite column: the first two rows avoid it
        for i in 0..2 {
            assert!(reduced.vector(i)[2].is_zero());
        }
        assert!(reduced.scaled_vector(0).is_some());
    }
}
