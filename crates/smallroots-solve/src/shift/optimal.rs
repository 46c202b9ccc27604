//! Shift relations with provable guarantees.
//!
//! For each ideal `J` of the generator and each monomial `m` bounded by
//! the modulus, the shift with leading monomial `m` is taken from the
//! Gröbner basis of `J`: the element `g` with `LM(g) | m` and smallest
//! leading coefficient, multiplied up to `m` and with its tail reduced.

use num_traits::One;
use rustc_hash::FxHashSet;
use smallroots_integers::Integer;
use smallroots_model::{BoundSet, Relation, RelationIdeal, RelationSet, Result};
use smallroots_poly::{Monomial, Polynomial};
use tracing::{debug, info};

use crate::combinations::{is_intermediate_size, WeightedCombinations};
use crate::config::SolverConfig;
use crate::ideal::RelationIdealGenerator;

/// Monomials still to visit for one ideal.
struct IdealState {
    ideal: RelationIdeal,
    monomials: WeightedCombinations,
    max_weight: Option<f64>,
    inf_leading: Vec<Monomial>,
    visited: usize,
    shifts: Vec<Relation>,
}

/// Batches of shift relations, ideal by ideal.
///
/// Within one ideal, prefixes of the shift list are yielded at the
/// sizes accepted by [`is_intermediate_size`] and the full list at the
/// end. A prefix is only yielded when it grew.
///
/// Selection ends once more consecutive ideals than there are modulus
/// factors contribute no leading monomial that an earlier ideal did not.
pub struct OptimalShifts {
    ideals: RelationIdealGenerator,
    bounds: BoundSet,
    log_bounds: Vec<f64>,
    use_intermediate_sizes: bool,
    max_relations: usize,
    current: Option<IdealState>,
    seen: FxHashSet<Monomial>,
    stalled: usize,
    finished: bool,
}

impl OptimalShifts {
    /// Prepares the selection for `relations`.
    ///
    /// # Errors
    ///
    /// Returns [`smallroots_model::Error::MissingBound`] if an unknown or
    /// a modulus is unbounded.
    pub fn new(relations: &RelationSet, bounds: &BoundSet, config: &SolverConfig) -> Result<Self> {
        let log_bounds = relations
            .variables()
            .iter()
            .map(|v| Ok(bounds.abs_bound(v)?.log2()))
            .collect::<Result<Vec<f64>>>()?;
        Ok(Self {
            ideals: RelationIdealGenerator::new(relations, bounds)?
                .with_max_multiplicity(config.max_multiplicity),
            bounds: bounds.clone(),
            log_bounds,
            use_intermediate_sizes: config.use_intermediate_sizes,
            max_relations: config.max_shift_relations,
            current: None,
            seen: FxHashSet::default(),
            stalled: 0,
            finished: false,
        })
    }

    fn start(&self, ideal: RelationIdeal, ideal_inf: &RelationIdeal) -> Result<IdealState> {
        let (max_weight, inf_leading) = match &ideal.modulus {
            Some(m) => (
                Some(self.bounds.upper_bound(m)?.log2()),
                ideal_inf
                    .groebner_basis()
                    .iter()
                    .filter_map(|g| g.leading_monomial().cloned())
                    .collect(),
            ),
            None => (None, Vec::new()),
        };
        Ok(IdealState {
            ideal,
            monomials: WeightedCombinations::new(&self.log_bounds),
            max_weight,
            inf_leading,
            visited: 0,
            shifts: Vec::new(),
        })
    }

    fn batch(shifts: &[Relation]) -> Result<RelationSet> {
        RelationSet::new(shifts.to_vec())
    }

    /// Tracks whether the shifts of a finished ideal reached new leading
    /// monomials.
    fn record_leading(&mut self, shifts: &[Relation]) {
        let mut fresh = 0;
        for m in shifts.iter().filter_map(|r| r.polynomial.leading_monomial()) {
            if self.seen.insert(m.clone()) {
                fresh += 1;
            }
        }
        if fresh > 0 {
            self.stalled = 0;
            return;
        }
        self.stalled += 1;
        if self.stalled > self.ideals.factors().len() {
            info!(
                target: "smallroots::OptimalShifts",
                "{} ideal(s) in a row added no leading monomial, stopping", self.stalled
            );
            self.finished = true;
        }
    }

    /// Advances the current ideal until a batch is due. `Ok(None)` means
    /// the ideal is exhausted.
    fn advance(&mut self) -> Result<Option<RelationSet>> {
        let use_intermediate = self.use_intermediate_sizes;
        let max_relations = self.max_relations;
        let Some(state) = self.current.as_mut() else {
            return Ok(None);
        };
        loop {
            let exhausted = state.shifts.len() >= max_relations
                || (state.max_weight.is_none() && state.visited >= max_relations);
            let next = if exhausted { None } else { state.monomials.next() };
            let below = |(_, w): &(Vec<u32>, f64)| state.max_weight.map_or(true, |mw| *w < mw);
            let Some((exps, _)) = next.filter(below) else {
                info!(
                    target: "smallroots::OptimalShifts",
                    "computed {} shift relation(s) with monomials below the modulus",
                    state.shifts.len()
                );
                let pending = !(use_intermediate && is_intermediate_size(state.shifts.len()));
                let shifts = std::mem::take(&mut state.shifts);
                self.current = None;
                self.record_leading(&shifts);
                return if pending && !shifts.is_empty() {
                    Self::batch(&shifts).map(Some)
                } else {
                    Ok(None)
                };
            };
            state.visited += 1;
            let m = Monomial::from_exponents(&exps);
            if state.inf_leading.iter().any(|lm| lm.divides(&m)) {
                continue;
            }
            if let Some(shift) = shift_with_leading(&m, &state.ideal) {
                state.shifts.push(shift);
                if use_intermediate && is_intermediate_size(state.shifts.len()) {
                    return Self::batch(&state.shifts).map(Some);
                }
            }
        }
    }
}

/// The shift relation of `ideal` with leading monomial `m`, if any basis
/// element's leading monomial divides `m`.
fn shift_with_leading(m: &Monomial, ideal: &RelationIdeal) -> Option<Relation> {
    let g = ideal
        .groebner_basis()
        .iter()
        .filter(|g| g.leading_monomial().is_some_and(|lm| lm.divides(m)))
        .min_by_key(|g| g.leading_coeff().map(Integer::abs))?;
    let (lm, _) = g.leading_term()?;
    let h = g.mul_term(&m.div(lm)?, &Integer::one());
    let (hm, hc) = h.leading_term()?;
    let lt = Polynomial::monomial(h.ring().clone(), hm.clone(), hc.clone());
    let tail = ideal.reduce(&h.tail());
    Some(Relation::new(lt + tail, ideal.modulus.clone()))
}

impl Iterator for OptimalShifts {
    type Item = Result<RelationSet>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                if self.finished {
                    return None;
                }
                let (ideal, ideal_inf) = match self.ideals.next()? {
                    Ok(pair) => pair,
                    Err(e) => return Some(Err(e)),
                };
                debug!(
                    target: "smallroots::OptimalShifts",
                    "generating shift relations for every monomial"
                );
                match self.start(ideal, &ideal_inf) {
                    Ok(state) => self.current = Some(state),
                    Err(e) => return Some(Err(e)),
                }
            }
            match self.advance() {
                Ok(Some(batch)) => return Some(Ok(batch)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
