//! The [`find_small_roots`] entry point.
//!
//! The entry point is permissive about how a problem is written down:
//! relations may be typed [`Relation`]s, polynomials, or expression
//! strings; bounds may be a typed [`BoundSet`], a map, a list or a single
//! number; the modulus may be known, symbolic, or given per relation.
//! Everything is converted into a [`Problem`] before solving.

use std::collections::BTreeMap;
use std::sync::Arc;

use smallroots_integers::Integer;
use smallroots_model::{
    Bound, BoundSet, Error, Problem, Relation, RelationSet, Result, SolutionSet,
};
use smallroots_poly::{parse_polynomial_in, parse_polynomials, PolyRing, Polynomial, Variable};
use smallroots_solve::{AutomatedPartialSolver, AutomatedSolver, Solver, SolverConfig};
use tracing::{debug, info};

/// One input relation.
///
/// All relations passed to [`find_small_roots`] must use the same kind of
/// representation; [`RelationInput::Polynomial`] and
/// [`RelationInput::Residue`] count as the same kind.
#[derive(Clone, Debug)]
pub enum RelationInput {
    /// A fully specified relation. No modulus options may be given.
    Relation(Relation),
    /// An integer polynomial; its modulus comes from [`ModulusOptions`].
    Polynomial(Polynomial<Integer>),
    /// A polynomial with coefficients taken modulo the given integer.
    Residue(Polynomial<Integer>, Integer),
    /// An expression `f` or an equation `A == B` in text form.
    Expression(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InputKind {
    Relation,
    Polynomial,
    Expression,
}

impl RelationInput {
    fn kind(&self) -> InputKind {
        match self {
            Self::Relation(_) => InputKind::Relation,
            Self::Polynomial(_) | Self::Residue(..) => InputKind::Polynomial,
            Self::Expression(_) => InputKind::Expression,
        }
    }
}

/// One end-pair of a bound in a [`BoundsInput::Map`].
#[derive(Clone, Debug)]
pub enum BoundSpec {
    /// `lower < x < upper`.
    Interval(Integer, Integer),
    /// `-b < x < b`.
    Abs(Integer),
}

/// Bounds on the unknowns.
#[derive(Clone, Debug)]
pub enum BoundsInput {
    /// Already typed bounds.
    Typed(BoundSet),
    /// Bounds by variable.
    Map(Vec<(Variable, BoundSpec)>),
    /// Absolute bounds, one per ring generator in order.
    PerVariable(Vec<Integer>),
    /// The same absolute bound for every ring generator.
    Uniform(Integer),
}

/// A modulus value.
#[derive(Clone, Debug)]
pub enum ModulusValue {
    /// A known integer modulus.
    Known(Integer),
    /// An unknown modulus with the given name.
    Named(String),
}

/// A setting that is absent, shared by all relations, or per relation.
#[derive(Clone, Debug, Default)]
pub enum PerRelation<T> {
    /// Not given.
    #[default]
    Unset,
    /// One value for every relation.
    Shared(T),
    /// One optional value per relation.
    List(Vec<Option<T>>),
}

impl<T> PerRelation<T> {
    fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    fn list_len(&self) -> Option<usize> {
        match self {
            Self::List(items) => Some(items.len()),
            _ => None,
        }
    }

    fn at(&self, i: usize) -> Option<&T> {
        match self {
            Self::Unset => None,
            Self::Shared(value) => Some(value),
            Self::List(items) => items.get(i).and_then(Option::as_ref),
        }
    }
}

/// Modulus information for relations given as polynomials or expressions.
///
/// An unknown modulus needs a lower bound. Leaving [`Self::modulus`] unset
/// while giving a lower bound declares an unnamed unknown modulus.
#[derive(Clone, Debug, Default)]
pub struct ModulusOptions {
    /// The modulus itself.
    pub modulus: PerRelation<ModulusValue>,
    /// A known multiple of an unknown modulus.
    pub multiple: PerRelation<Integer>,
    /// Exclusive lower bound of an unknown modulus.
    pub lower_bound: PerRelation<Integer>,
    /// Exclusive upper bound of an unknown modulus.
    pub upper_bound: PerRelation<Integer>,
}

impl ModulusOptions {
    /// A known modulus shared by every relation.
    #[must_use]
    pub fn known(n: Integer) -> Self {
        Self {
            modulus: PerRelation::Shared(ModulusValue::Known(n)),
            ..Self::default()
        }
    }

    /// An unnamed unknown modulus with a known multiple and lower bound.
    #[must_use]
    pub fn divisor_of(multiple: Integer, lower_bound: Integer) -> Self {
        Self {
            multiple: PerRelation::Shared(multiple),
            lower_bound: PerRelation::Shared(lower_bound),
            ..Self::default()
        }
    }

    fn is_per_relation(&self) -> bool {
        self.modulus.is_list()
            || self.multiple.is_list()
            || self.lower_bound.is_list()
            || self.upper_bound.is_list()
    }

    fn is_unset(&self) -> bool {
        matches!(self.modulus, PerRelation::Unset)
            && matches!(self.multiple, PerRelation::Unset)
            && matches!(self.lower_bound, PerRelation::Unset)
            && matches!(self.upper_bound, PerRelation::Unset)
    }
}

/// A consistent description of one modulus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModulusInfo {
    /// A known modulus.
    Known(Integer),
    /// An unknown modulus.
    Symbolic {
        /// Its name, if the caller chose one.
        name: Option<Variable>,
        /// A known multiple.
        multiple: Option<Integer>,
        /// Exclusive lower bound.
        lower: Integer,
        /// Exclusive upper bound, defaulting to the multiple.
        upper: Option<Integer>,
    },
}

/// A polynomial given either directly or as an expression.
#[derive(Clone, Debug)]
pub enum PolynomialInput {
    /// A polynomial in the relations' ring.
    Polynomial(Polynomial<Integer>),
    /// An expression over the relations' variables.
    Expression(String),
}

impl PolynomialInput {
    fn into_polynomial(self, ring: &Arc<PolyRing>) -> Result<Polynomial<Integer>> {
        match self {
            Self::Polynomial(f) if f.ring() == ring => Ok(f),
            Self::Polynomial(_) => Err(Error::RingMismatch),
            Self::Expression(text) => Ok(parse_polynomial_in(ring, &text)?),
        }
    }
}

/// Options of [`find_small_roots`].
#[derive(Clone, Debug, Default)]
pub struct FindOptions {
    /// Modulus of polynomial and expression relations.
    pub modulus: ModulusOptions,
    /// Nonlinear terms to linearize with fresh unknowns.
    pub unraveled_linearization: Vec<PolynomialInput>,
    /// Return the first partial solutions instead of completing them.
    pub allow_partial_solutions: bool,
    /// Known solutions, keyed by variable name, to check intermediate
    /// results against.
    pub expected_solution: Vec<BTreeMap<String, Integer>>,
    /// Solver settings. Its linearization list is replaced by
    /// [`Self::unraveled_linearization`].
    pub solver: SolverConfig,
}

/// Describes a single modulus consistently.
///
/// Returns `None` when nothing is given.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when a known modulus comes with a
/// multiple or bounds, or an unknown modulus lacks a lower bound.
pub fn parse_modulus(
    modulus: Option<&ModulusValue>,
    multiple: Option<&Integer>,
    lower_bound: Option<&Integer>,
    upper_bound: Option<&Integer>,
) -> Result<Option<ModulusInfo>> {
    let name = match modulus {
        Some(ModulusValue::Known(n)) => {
            if multiple.is_some() {
                return Err(Error::invalid("do not set both an integer modulus and a modulus multiple"));
            }
            if lower_bound.is_some() || upper_bound.is_some() {
                return Err(Error::invalid("do not set both an integer modulus and modulus bounds"));
            }
            return Ok(Some(ModulusInfo::Known(n.clone())));
        }
        Some(ModulusValue::Named(name)) => Some(Variable::new(name)),
        None if multiple.is_none() && lower_bound.is_none() && upper_bound.is_none() => {
            return Ok(None);
        }
        None => None,
    };
    let lower = lower_bound
        .cloned()
        .ok_or_else(|| Error::invalid("an unknown modulus needs a lower bound"))?;
    Ok(Some(ModulusInfo::Symbolic {
        name,
        multiple: multiple.cloned(),
        lower,
        upper: upper_bound.or(multiple).cloned(),
    }))
}

/// Describes the modulus of each of `count` relations.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when per-relation lists are mixed with
/// shared values, or when list lengths disagree with each other or with
/// `count`.
pub fn parse_moduli(options: &ModulusOptions, count: usize) -> Result<Vec<Option<ModulusInfo>>> {
    if options.is_per_relation() {
        let shared = [
            matches!(options.modulus, PerRelation::Shared(_)),
            matches!(options.multiple, PerRelation::Shared(_)),
            matches!(options.lower_bound, PerRelation::Shared(_)),
            matches!(options.upper_bound, PerRelation::Shared(_)),
        ];
        if shared.contains(&true) {
            return Err(Error::invalid(
                "if one modulus setting is a list, the others must be lists or unset",
            ));
        }
        let lengths = [
            options.modulus.list_len(),
            options.multiple.list_len(),
            options.lower_bound.list_len(),
            options.upper_bound.list_len(),
        ];
        if lengths.iter().flatten().any(|&n| n != count) {
            return Err(Error::invalid("there must be exactly one modulus per relation"));
        }
    }
    (0..count)
        .map(|i| {
            parse_modulus(
                options.modulus.at(i),
                options.multiple.at(i),
                options.lower_bound.at(i),
                options.upper_bound.at(i),
            )
        })
        .collect()
}

/// A name for an unnamed unknown modulus that clashes with nothing.
fn fresh_modulus_name(ring: &PolyRing, taken: &[Variable], shared: bool) -> Variable {
    let free = |v: &Variable| !ring.contains(v) && !taken.contains(v);
    if shared {
        for name in ["p", "q"] {
            let v = Variable::new(name);
            if free(&v) {
                return v;
            }
        }
    }
    (0..)
        .map(|i| Variable::new(format!("p_{i}")))
        .find(free)
        .unwrap_or_else(|| Variable::new("p"))
}

/// Turns the caller's relations into a [`RelationSet`].
///
/// Also returns the modulus description of each relation, with every
/// unknown modulus named.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an empty or mixed list, or a
/// modulus given where the relations already carry one; parse and ring
/// errors propagate.
pub fn parse_relations(
    inputs: Vec<RelationInput>,
    options: &ModulusOptions,
) -> Result<(RelationSet, Vec<Option<ModulusInfo>>)> {
    let Some(kind) = inputs.first().map(RelationInput::kind) else {
        return Err(Error::invalid("at least one relation is required"));
    };
    if inputs.iter().any(|r| r.kind() != kind) {
        return Err(Error::invalid("all relations must use the same representation"));
    }
    let mut moduli = parse_moduli(options, inputs.len())?;

    let mut polys = Vec::with_capacity(inputs.len());
    let mut residues = Vec::with_capacity(inputs.len());
    match kind {
        InputKind::Expression => {
            let texts: Vec<String> = inputs
                .into_iter()
                .filter_map(|r| match r {
                    RelationInput::Expression(text) => Some(text),
                    _ => None,
                })
                .collect();
            polys = parse_polynomials(&texts)?.1;
            residues.resize(polys.len(), None);
        }
        InputKind::Polynomial | InputKind::Relation => {
            let mut relations = Vec::new();
            for input in inputs {
                match input {
                    RelationInput::Relation(r) => relations.push(r),
                    RelationInput::Polynomial(f) => {
                        polys.push(f);
                        residues.push(None);
                    }
                    RelationInput::Residue(f, n) => {
                        polys.push(f.reduce_mod(&n));
                        residues.push(Some(n));
                    }
                    RelationInput::Expression(_) => {}
                }
            }
            if !relations.is_empty() {
                if !options.is_unset() {
                    return Err(Error::invalid(
                        "a modulus must not be given when the relations carry their own",
                    ));
                }
                return Ok((RelationSet::new(relations)?, moduli));
            }
        }
    }

    if residues.iter().any(Option::is_some) {
        if !options.is_unset() {
            return Err(Error::invalid(
                "a modulus must not be given when the polynomials carry their own",
            ));
        }
        let relations = polys
            .into_iter()
            .zip(residues)
            .map(|(f, n)| Relation::new(f, n.map(Into::into)))
            .collect();
        return Ok((RelationSet::new(relations)?, moduli));
    }

    let ring = polys[0].ring().clone();
    let shared = !options.is_per_relation();
    let mut taken: Vec<Variable> = Vec::new();
    let mut relations = Vec::with_capacity(polys.len());
    for (f, info) in polys.into_iter().zip(moduli.iter_mut()) {
        match info {
            None => relations.push(Relation::integer(f)),
            Some(ModulusInfo::Known(n)) => relations.push(Relation::modular(f, n.clone())),
            Some(ModulusInfo::Symbolic { name, multiple, .. }) => {
                let p = match name {
                    Some(p) => p.clone(),
                    None if shared && !taken.is_empty() => taken[0].clone(),
                    None => fresh_modulus_name(&ring, &taken, shared),
                };
                *name = Some(p.clone());
                relations.push(Relation::modular(f, p.clone()));
                if !taken.contains(&p) {
                    if let Some(m) = multiple {
                        // the multiple vanishes modulo p
                        relations.push(Relation::modular(
                            Polynomial::constant(ring.clone(), m.clone()),
                            p.clone(),
                        ));
                    }
                    taken.push(p);
                }
            }
        }
    }
    Ok((RelationSet::new(relations)?, moduli))
}

fn positive(b: &Integer) -> Result<()> {
    if b.is_positive() {
        Ok(())
    } else {
        Err(Error::invalid(format!("bounds must be positive, got {b}")))
    }
}

/// Turns the caller's bounds into a [`BoundSet`].
///
/// Unknown moduli receive their `(lower, upper)` bounds.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for non-positive absolute bounds or a
/// list whose length differs from the number of unknowns.
pub fn parse_bounds(
    bounds: BoundsInput,
    ring: &PolyRing,
    moduli: &[Option<ModulusInfo>],
) -> Result<BoundSet> {
    let mut bounds = match bounds {
        BoundsInput::Typed(bounds) => bounds,
        BoundsInput::Map(entries) => entries
            .into_iter()
            .map(|(v, spec)| match spec {
                BoundSpec::Interval(lower, upper) => Ok((v, Bound::new(lower, upper))),
                BoundSpec::Abs(b) => positive(&b).map(|()| (v, Bound::symmetric(&b))),
            })
            .collect::<Result<BoundSet>>()?,
        BoundsInput::PerVariable(list) => {
            if list.len() != ring.num_vars() {
                return Err(Error::invalid(format!(
                    "a list of bounds must have one entry per unknown, expected {}",
                    ring.num_vars()
                )));
            }
            list.iter().try_for_each(positive)?;
            ring.variables()
                .iter()
                .cloned()
                .zip(list.iter().map(Bound::symmetric))
                .collect()
        }
        BoundsInput::Uniform(b) => {
            positive(&b)?;
            ring.variables()
                .iter()
                .map(|v| (v.clone(), Bound::symmetric(&b)))
                .collect()
        }
    };
    for info in moduli.iter().flatten() {
        if let ModulusInfo::Symbolic {
            name: Some(p),
            lower,
            upper,
            ..
        } = info
        {
            bounds.insert(
                p.clone(),
                Bound {
                    lower: Some(lower.clone()),
                    upper: upper.clone(),
                },
            );
        }
    }
    Ok(bounds)
}

/// Expected solutions keyed by variable name.
fn parse_solutions(solutions: &[BTreeMap<String, Integer>]) -> SolutionSet {
    solutions
        .iter()
        .map(|s| s.iter().map(|(k, v)| (Variable::new(k), v.clone())).collect())
        .collect()
}

/// Finds the bounded integer roots of a system of relations.
///
/// With [`FindOptions::allow_partial_solutions`] the first partial
/// solutions are returned as soon as some unknowns are determined;
/// otherwise every unknown and every unknown modulus is solved for.
///
/// # Errors
///
/// Returns [`Error::NoRootsFound`] when every strategy was exhausted or no
/// bounded solution was found. Malformed input is reported as
/// [`Error::InvalidInput`], [`Error::RingMismatch`] or [`Error::Parse`].
pub fn find_small_roots(
    relations: Vec<RelationInput>,
    bounds: BoundsInput,
    options: &FindOptions,
) -> Result<SolutionSet> {
    let (relations, moduli) = parse_relations(relations, &options.modulus)?;
    let bounds = parse_bounds(bounds, relations.ring(), &moduli)?;
    let expected = parse_solutions(&options.expected_solution);

    let mut config = options.solver.clone();
    config.unraveled_linearization = options
        .unraveled_linearization
        .iter()
        .cloned()
        .map(|f| f.into_polynomial(relations.ring()))
        .collect::<Result<_>>()?;

    let problem = Problem::new(relations, bounds);
    debug!(target: "smallroots::Wrapper", "solving {problem}");
    let solved = if options.allow_partial_solutions {
        let mut solver = AutomatedPartialSolver::new(problem, config);
        if !expected.is_empty() {
            solver.set_expected(expected);
        }
        solver.solve()
    } else {
        let mut solver = AutomatedSolver::new(problem, config);
        if !expected.is_empty() {
            solver.set_expected(expected);
        }
        solver.solve()
    };
    match solved {
        Ok(solutions) if solutions.is_empty() => {
            info!(target: "smallroots::Wrapper", "no bounded solution found");
            Err(Error::NoRootsFound)
        }
        Ok(solutions) => {
            info!(target: "smallroots::Wrapper", "found {} solution(s)", solutions.len());
            Ok(solutions)
        }
        Err(e) if e.is_retryable() => {
            info!(target: "smallroots::Wrapper", "every strategy failed: {e}");
            Err(Error::NoRootsFound)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Integer {
        Integer::new(n)
    }

    fn expressions(texts: &[&str]) -> Vec<RelationInput> {
        texts
            .iter()
            .map(|t| RelationInput::Expression((*t).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_modulus() {
        assert_eq!(parse_modulus(None, None, None, None).unwrap(), None);
        let known = ModulusValue::Known(int(97));
        assert_eq!(
            parse_modulus(Some(&known), None, None, None).unwrap(),
            Some(ModulusInfo::Known(int(97)))
        );
        assert!(parse_modulus(Some(&known), Some(&int(194)), None, None).is_err());
        assert!(parse_modulus(Some(&known), None, Some(&int(10)), None).is_err());

        // the upper bound defaults to the multiple
        let info = parse_modulus(None, Some(&int(3233)), Some(&int(50)), None).unwrap();
        assert_eq!(
            info,
            Some(ModulusInfo::Symbolic {
                name: None,
                multiple: Some(int(3233)),
                lower: int(50),
                upper: Some(int(3233)),
            })
        );
        let named = ModulusValue::Named("r".into());
        assert!(matches!(
            parse_modulus(Some(&named), None, None, None),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_moduli_lists() {
        let options = ModulusOptions {
            modulus: PerRelation::List(vec![Some(ModulusValue::Known(int(7))), None]),
            ..ModulusOptions::default()
        };
        let moduli = parse_moduli(&options, 2).unwrap();
        assert_eq!(moduli, vec![Some(ModulusInfo::Known(int(7))), None]);
        assert!(parse_moduli(&options, 3).is_err());

        let mixed = ModulusOptions {
            lower_bound: PerRelation::Shared(int(10)),
            ..options
        };
        assert!(parse_moduli(&mixed, 2).is_err());
    }

    #[test]
    fn test_unnamed_modulus_is_named_p() {
        let options = ModulusOptions::divisor_of(int(3233), int(40));
        let (relations, moduli) = parse_relations(expressions(&["x + 11"]), &options).unwrap();
        // the multiple becomes a relation of its own
        assert_eq!(relations.len(), 2);
        assert_eq!(relations.unknown_moduli(), &[Variable::new("p")]);
        let bounds = parse_bounds(BoundsInput::Uniform(int(5)), relations.ring(), &moduli).unwrap();
        assert_eq!(
            bounds.get(&Variable::new("p")),
            Some(&Bound::new(int(40), int(3233)))
        );
    }

    #[test]
    fn test_modulus_name_avoids_unknowns() {
        let options = ModulusOptions::divisor_of(int(3233), int(40));
        let (relations, _) = parse_relations(expressions(&["p + q"]), &options).unwrap();
        assert_eq!(relations.unknown_moduli(), &[Variable::new("p_0")]);
    }

    #[test]
    fn test_rejects_mixed_representations() {
        let (_, polys) = parse_polynomials(&["x - 1"]).unwrap();
        let inputs = vec![
            RelationInput::Polynomial(polys[0].clone()),
            RelationInput::Expression("x - 2".into()),
        ];
        assert!(matches!(
            parse_relations(inputs, &ModulusOptions::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_redundant_modulus() {
        let (_, polys) = parse_polynomials(&["x - 1"]).unwrap();
        let residue = vec![RelationInput::Residue(polys[0].clone(), int(17))];
        assert!(parse_relations(residue.clone(), &ModulusOptions::known(int(17))).is_err());
        let (relations, _) = parse_relations(residue, &ModulusOptions::default()).unwrap();
        // coefficients are reduced to non-negative representatives
        assert_eq!(relations[0].polynomial.to_string(), "x + 16");

        let typed = vec![RelationInput::Relation(Relation::integer(polys[0].clone()))];
        assert!(parse_relations(typed, &ModulusOptions::known(int(17))).is_err());
    }

    #[test]
    fn test_parse_bounds_shapes() {
        let (ring, _) = parse_polynomials(&["x + y"]).unwrap();
        let list = parse_bounds(BoundsInput::PerVariable(vec![int(3), int(9)]), &ring, &[]).unwrap();
        assert_eq!(list.get(&Variable::new("y")), Some(&Bound::new(int(-9), int(9))));
        assert!(parse_bounds(BoundsInput::PerVariable(vec![int(3)]), &ring, &[]).is_err());
        assert!(parse_bounds(BoundsInput::PerVariable(vec![int(3), int(0)]), &ring, &[]).is_err());
        assert!(parse_bounds(BoundsInput::Uniform(int(-1)), &ring, &[]).is_err());
        assert!(parse_bounds(BoundsInput::Uniform(int(0)), &ring, &[]).is_err());

        let map = BoundsInput::Map(vec![
            (Variable::new("x"), BoundSpec::Abs(int(4))),
            (Variable::new("y"), BoundSpec::Interval(int(0), int(100))),
        ]);
        let map = parse_bounds(map, &ring, &[]).unwrap();
        assert_eq!(map.get(&Variable::new("x")), Some(&Bound::new(int(-4), int(4))));
        assert_eq!(map.get(&Variable::new("y")), Some(&Bound::new(int(0), int(100))));
    }

    #[test]
    fn test_linearization_terms_must_share_ring() {
        let (_, other) = parse_polynomials(&["z"]).unwrap();
        let options = FindOptions {
            modulus: ModulusOptions::known(int(97)),
            unraveled_linearization: vec![PolynomialInput::Polynomial(other[0].clone())],
            ..FindOptions::default()
        };
        assert!(matches!(
            find_small_roots(expressions(&["x*y + 1"]), BoundsInput::Uniform(int(5)), &options),
            Err(Error::RingMismatch)
        ));
    }
}
