//! Relation ideals of increasing multiplicity.
//!
//! The moduli of the input relations are split into pairwise coprime
//! factors `q_1, ..., q_k` (integers found by repeated gcd splitting, plus
//! the unknown moduli as symbols). Every modulus is then an exponent
//! vector over these factors, and the relations sharing one exponent
//! vector generate a base ideal. For a multiplicity `m ∈ ℕ^k` the ideal
//!
//! ```text
//! J(m) = J_∞ + Σ_e J_e · J(m − e + d)
//! ```
//!
//! vanishes at the bounded root modulo `Π q_i^m_i`; `d` ranges over the
//! vectors below `e` that no smaller, already used `d` dominates.

use std::collections::BTreeMap;
use std::sync::Arc;

use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use smallroots_integers::Integer;
use smallroots_model::{BoundSet, Error, Modulus, RelationIdeal, RelationSet, Result};
use smallroots_poly::{PolyRing, Polynomial, Variable};
use tracing::{debug, info};

use crate::combinations::WeightedCombinations;

/// A pairwise coprime factor of the moduli.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Factor {
    /// A known integer greater than one.
    Integer(Integer),
    /// An unknown modulus.
    Symbol(Variable),
}

impl Factor {
    fn modulus(&self) -> Modulus {
        match self {
            Self::Integer(q) => Modulus::known(q.clone()),
            Self::Symbol(p) => Modulus::symbol(p.clone()),
        }
    }
}

/// Splits `values` into pairwise coprime integers greater than one whose
/// products give back every input.
#[must_use]
pub fn coprime_factors(values: &[Integer]) -> Vec<Integer> {
    let mut set: Vec<Integer> = values
        .iter()
        .map(Integer::abs)
        .filter(|v| *v > Integer::one())
        .collect();
    set.sort();
    set.dedup();
    'split: loop {
        for i in 0..set.len() {
            for j in i + 1..set.len() {
                let g = set[i].gcd(&set[j]);
                if g.is_one() {
                    continue;
                }
                let a = &set[i] / &g;
                let b = &set[j] / &g;
                set.swap_remove(j);
                set.swap_remove(i);
                set.extend([g, a, b].into_iter().filter(|v| *v > Integer::one()));
                set.sort();
                set.dedup();
                continue 'split;
            }
        }
        return set;
    }
}

/// Divides the integer coefficient of `m` by `g`.
fn divide_coefficient(m: &Modulus, g: &Integer) -> Modulus {
    m.symbols().fold(
        Modulus::known(m.coefficient() / g),
        |acc, (p, e)| &acc * &Modulus::symbol(p.clone()).pow(e),
    )
}

/// Every vector `d` with `0 ≤ d_i ≤ limits_i`, last coordinate fastest.
fn box_points(limits: &[u32]) -> Vec<Vec<u32>> {
    let mut points = vec![Vec::new()];
    for &limit in limits {
        points = points
            .into_iter()
            .flat_map(|p| {
                (0..=limit).map(move |d| {
                    let mut q = p.clone();
                    q.push(d);
                    q
                })
            })
            .collect();
    }
    points
}

/// Yields `(J(m), J_∞)` for multiplicities `m` of increasing modulus
/// size.
///
/// When no relation carries a modulus, `(J_∞, J_∞)` is yielded once.
/// Otherwise generation stops at the first multiplicity whose total
/// exceeds [`RelationIdealGenerator::with_max_multiplicity`].
pub struct RelationIdealGenerator {
    ring: Arc<PolyRing>,
    factors: Vec<Factor>,
    base: Vec<(Vec<u32>, RelationIdeal)>,
    ideal_inf: RelationIdeal,
    memo: FxHashMap<Vec<u32>, RelationIdeal>,
    multiplicities: Option<WeightedCombinations>,
    bounds: BoundSet,
    max_multiplicity: u32,
    done: bool,
}

impl RelationIdealGenerator {
    /// Prepares the base ideals of `relations`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBound`] if an unknown modulus has no lower
    /// bound.
    pub fn new(relations: &RelationSet, bounds: &BoundSet) -> Result<Self> {
        let ring = relations.ring().clone();

        // cancel factors shared by the coefficients and the modulus
        let mut integer_polys = Vec::new();
        let mut modular: Vec<(Polynomial<Integer>, Modulus)> = Vec::new();
        for rel in relations {
            match &rel.modulus {
                Some(m) if !(m.as_integer().is_some_and(Zero::is_zero)) => {
                    let g = rel.polynomial.content().gcd(m.coefficient());
                    if g.is_zero() || g.is_one() {
                        modular.push((rel.polynomial.clone(), m.clone()));
                    } else {
                        let f = rel
                            .polynomial
                            .div_exact(&g)
                            .ok_or_else(|| Error::invalid("content does not divide"))?;
                        modular.push((f, divide_coefficient(m, &g)));
                    }
                }
                _ => integer_polys.push(rel.polynomial.clone()),
            }
        }
        modular.retain(|(f, m)| {
            let trivial = m.as_integer().is_some_and(One::is_one);
            if trivial {
                debug!(target: "smallroots::RelationIdealGenerator", "dropping {f} modulo 1");
            }
            !trivial
        });

        let coefficients: Vec<Integer> = modular.iter().map(|(_, m)| m.coefficient().clone()).collect();
        let mut factors: Vec<Factor> = coprime_factors(&coefficients)
            .into_iter()
            .map(Factor::Integer)
            .collect();
        let mut symbols: Vec<Variable> = modular
            .iter()
            .flat_map(|(_, m)| m.symbols().map(|(p, _)| p.clone()).collect::<Vec<_>>())
            .collect();
        symbols.sort();
        symbols.dedup();
        factors.extend(symbols.into_iter().map(Factor::Symbol));

        let mut grouped: BTreeMap<Vec<u32>, (Modulus, Vec<Polynomial<Integer>>)> = BTreeMap::new();
        for (f, m) in modular {
            let exp = exponent_vector(&m, &factors)?;
            grouped.entry(exp).or_insert_with(|| (m, Vec::new())).1.push(f);
        }
        // every integer factor gets an ideal containing the factor itself
        let n = factors.len();
        for (i, q) in factors.iter().enumerate() {
            if let Factor::Integer(q) = q {
                let mut exp = vec![0; n];
                exp[i] = 1;
                grouped
                    .entry(exp)
                    .or_insert_with(|| (Modulus::known(q.clone()), Vec::new()))
                    .1
                    .push(Polynomial::constant(ring.clone(), q.clone()));
            }
        }

        let base = grouped
            .into_iter()
            .map(|(exp, (m, polys))| Ok((exp, RelationIdeal::new(polys, ring.clone(), Some(m))?)))
            .collect::<Result<Vec<_>>>()?;
        info!(
            target: "smallroots::RelationIdealGenerator",
            "recovered {} modular ideal(s)", base.len()
        );

        let multiplicities = if base.is_empty() {
            None
        } else {
            let weights = factors
                .iter()
                .map(|q| Ok(bounds.lower_bound(&q.modulus())?.log2()))
                .collect::<Result<Vec<f64>>>()?;
            Some(WeightedCombinations::new(&weights))
        };

        Ok(Self {
            ideal_inf: RelationIdeal::new(integer_polys, ring.clone(), None)?,
            ring,
            factors,
            base,
            memo: FxHashMap::default(),
            multiplicities,
            bounds: bounds.clone(),
            max_multiplicity: u32::MAX,
            done: false,
        })
    }

    /// Caps the total multiplicity `Σ m_i` of the yielded ideals.
    #[must_use]
    pub fn with_max_multiplicity(mut self, max: u32) -> Self {
        self.max_multiplicity = max;
        self
    }

    /// The pairwise coprime factors of the moduli.
    #[must_use]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// The ideal of the integer relations.
    #[must_use]
    pub fn ideal_inf(&self) -> &RelationIdeal {
        &self.ideal_inf
    }

    fn modulus_of(&self, multiplicity: &[u32]) -> Modulus {
        self.factors
            .iter()
            .zip(multiplicity)
            .fold(Modulus::known(Integer::one()), |acc, (q, &k)| &acc * &q.modulus().pow(k))
    }

    /// `J(multiplicity)`, memoized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] only on internal inconsistency.
    pub fn ideal(&mut self, multiplicity: &[u32]) -> Result<RelationIdeal> {
        if multiplicity.iter().all(|&k| k == 0) {
            let one = Polynomial::one(self.ring.clone());
            return RelationIdeal::new(vec![one], self.ring.clone(), Some(Modulus::known(Integer::one())));
        }
        if let Some(j) = self.memo.get(multiplicity) {
            return Ok(j.clone());
        }

        let mut j = self.ideal_inf.clone();
        for b in 0..self.base.len() {
            let (exp, j1) = self.base[b].clone();
            let mut applied: Vec<Vec<u32>> = Vec::new();
            for diff in box_points(&exp) {
                if diff == exp {
                    continue;
                }
                if applied
                    .iter()
                    .any(|a| a.iter().zip(&diff).all(|(x, y)| x <= y))
                {
                    break;
                }
                let smaller: Option<Vec<u32>> = multiplicity
                    .iter()
                    .zip(&exp)
                    .zip(&diff)
                    .map(|((&m, &e), &d)| (m + d).checked_sub(e))
                    .collect();
                let Some(smaller) = smaller else {
                    continue;
                };
                let j2 = self.ideal(&smaller)?;
                applied.push(diff);
                j = j.try_add(&j1.try_mul(&j2)?)?;
            }
        }
        // each summand vanishes modulo a multiple of this
        j.modulus = Some(self.modulus_of(multiplicity));
        debug!(
            target: "smallroots::RelationIdealGenerator",
            "generated ideal for multiplicity {multiplicity:?}"
        );
        self.memo.insert(multiplicity.to_vec(), j.clone());
        Ok(j)
    }
}

fn exponent_vector(m: &Modulus, factors: &[Factor]) -> Result<Vec<u32>> {
    let mut rest = m.coefficient().clone();
    let mut exp = Vec::with_capacity(factors.len());
    for q in factors {
        exp.push(match q {
            Factor::Integer(q) => {
                let mut e = 0;
                while rest.is_divisible_by(q) {
                    rest = &rest / q;
                    e += 1;
                }
                e
            }
            Factor::Symbol(p) => m.exponent(p),
        });
    }
    if rest.is_one() {
        Ok(exp)
    } else {
        Err(Error::invalid(format!("modulus {m} is not covered by its factors")))
    }
}

impl Iterator for RelationIdealGenerator {
    type Item = Result<(RelationIdeal, RelationIdeal)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(multiplicities) = self.multiplicities.as_mut() else {
            self.done = true;
            return Some(Ok((self.ideal_inf.clone(), self.ideal_inf.clone())));
        };
        let (exp, _) = multiplicities.find(|(e, _)| e.iter().any(|&k| k > 0))?;
        if exp.iter().sum::<u32>() > self.max_multiplicity {
            info!(
                target: "smallroots::RelationIdealGenerator",
                "reached multiplicity {exp:?}, past the limit of {}", self.max_multiplicity
            );
            self.done = true;
            return None;
        }
        let result = self.ideal(&exp).and_then(|j| {
            let modulus = j.modulus.clone().unwrap_or_else(|| Modulus::known(Integer::one()));
            let bits = self.bounds.lower_bound(&modulus)?.log2();
            info!(
                target: "smallroots::RelationIdealGenerator",
                "generated ideal of multiplicity {exp:?} with {bits:.1}-bit modulus"
            );
            Ok((j, self.ideal_inf.clone()))
        });
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_model::{Bound, Relation};
    use smallroots_poly::parse_polynomials;

    fn int(n: i64) -> Integer {
        Integer::new(n)
    }

    #[test]
    fn test_coprime_factors() {
        let mut f = coprime_factors(&[int(12), int(18), int(1), int(35)]);
        f.sort();
        // 12 = 2^2 * 3, 18 = 2 * 3^2, 35 = 5 * 7
        for v in [int(12), int(18), int(35)] {
            let mut rest = v;
            for q in &f {
                while rest.is_divisible_by(q) {
                    rest = &rest / q;
                }
            }
            assert!(rest.is_one());
        }
        for (i, a) in f.iter().enumerate() {
            for b in &f[i + 1..] {
                assert!(a.gcd(b).is_one());
            }
        }
        assert_eq!(f, vec![int(2), int(3), int(35)]);
    }

    #[test]
    fn test_box_points_order() {
        let pts = box_points(&[1, 2]);
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], vec![0, 0]);
        assert_eq!(pts[1], vec![0, 1]);
        assert_eq!(pts[5], vec![1, 2]);
    }

    #[test]
    fn test_integer_only_yields_once() {
        let (_, polys) = parse_polynomials(&["x - 3"]).unwrap();
        let rels = RelationSet::new(vec![Relation::integer(polys[0].clone())]).unwrap();
        let gen = RelationIdealGenerator::new(&rels, &BoundSet::new()).unwrap();
        let all: Vec<_> = gen.collect();
        assert_eq!(all.len(), 1);
        let (j, j_inf) = all.into_iter().next().unwrap().unwrap();
        assert!(j.modulus.is_none() && j_inf.modulus.is_none());
    }

    #[test]
    fn test_powers_of_one_modulus() {
        let (_, polys) = parse_polynomials(&["x^2 + 3*x + 7"]).unwrap();
        let f = polys[0].clone();
        let rels = RelationSet::new(vec![Relation::modular(f.clone(), int(101))]).unwrap();
        let bounds = [(Variable::new("x"), Bound::symmetric(&int(5)))].into_iter().collect();
        let mut gen = RelationIdealGenerator::new(&rels, &bounds).unwrap();
        assert_eq!(gen.factors(), &[Factor::Integer(int(101))]);

        let (j1, _) = gen.next().unwrap().unwrap();
        assert_eq!(j1.modulus, Some(Modulus::known(int(101))));
        assert!(j1.reduce(&f).is_zero());

        let (j2, _) = gen.next().unwrap().unwrap();
        assert_eq!(j2.modulus, Some(Modulus::known(int(101 * 101))));
        assert!(j2.reduce(&(&f * &f)).is_zero());
        assert!(j2.reduce(&f.scale(&int(101))).is_zero());
        assert!(!j2.reduce(&f).is_zero());
    }

    #[test]
    fn test_multiplicity_limit_ends_generation() {
        let (_, polys) = parse_polynomials(&["x^2 + 3*x + 7"]).unwrap();
        let rels = RelationSet::new(vec![Relation::modular(polys[0].clone(), int(101))]).unwrap();
        let bounds = [(Variable::new("x"), Bound::symmetric(&int(5)))].into_iter().collect();
        let gen = RelationIdealGenerator::new(&rels, &bounds)
            .unwrap()
            .with_max_multiplicity(3);
        let moduli: Vec<_> = gen.map(|r| r.unwrap().0.modulus).collect();
        assert_eq!(
            moduli,
            vec![
                Some(Modulus::known(int(101))),
                Some(Modulus::known(int(101 * 101))),
                Some(Modulus::known(int(101 * 101 * 101))),
            ]
        );
    }

    #[test]
    fn test_shared_content_is_cancelled() {
        let (_, polys) = parse_polynomials(&["6*x + 4"]).unwrap();
        let rels = RelationSet::new(vec![Relation::modular(polys[0].clone(), int(22))]).unwrap();
        let bounds = [(Variable::new("x"), Bound::symmetric(&int(5)))].into_iter().collect();
        let gen = RelationIdealGenerator::new(&rels, &bounds).unwrap();
        // 6x + 4 = 0 mod 22 becomes 3x + 2 = 0 mod 11
        assert_eq!(gen.factors(), &[Factor::Integer(int(11))]);
    }

    #[test]
    fn test_symbolic_modulus_needs_lower_bound() {
        let (_, polys) = parse_polynomials(&["x + 5"]).unwrap();
        let rels =
            RelationSet::new(vec![Relation::modular(polys[0].clone(), Variable::new("p"))]).unwrap();
        let bounds: BoundSet = [(Variable::new("x"), Bound::symmetric(&int(5)))].into_iter().collect();
        assert!(matches!(
            RelationIdealGenerator::new(&rels, &bounds),
            Err(Error::MissingBound(_))
        ));
        let mut bounds = bounds;
        bounds.insert(Variable::new("p"), Bound::new(int(1 << 20), int(1 << 21)));
        let mut gen = RelationIdealGenerator::new(&rels, &bounds).unwrap();
        let (j, _) = gen.next().unwrap().unwrap();
        assert_eq!(j.modulus, Some(Modulus::symbol(Variable::new("p"))));
    }
}
