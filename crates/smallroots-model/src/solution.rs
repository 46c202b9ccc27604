//! Variable assignments.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use smallroots_integers::Integer;
use smallroots_poly::Variable;

/// A map from variables (ring generators or modulus symbols) to values.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct PartialSolution(BTreeMap<Variable, Integer>);

/// A partial solution that assigns every unknown of its problem,
/// unknown moduli included.
pub type Solution = PartialSolution;

/// Partial solutions in discovery order.
pub type PartialSolutionSet = Vec<PartialSolution>;

/// Solutions in discovery order.
pub type SolutionSet = Vec<Solution>;

impl PartialSolution {
    /// The empty assignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `v`, if assigned.
    #[must_use]
    pub fn get(&self, v: &Variable) -> Option<&Integer> {
        self.0.get(v)
    }

    /// True if `v` is assigned.
    #[must_use]
    pub fn contains(&self, v: &Variable) -> bool {
        self.0.contains_key(v)
    }

    /// Assigns `v`, returning the previous value.
    pub fn insert(&mut self, v: Variable, value: Integer) -> Option<Integer> {
        self.0.insert(v, value)
    }

    /// Removes `v`.
    pub fn remove(&mut self, v: &Variable) -> Option<Integer> {
        self.0.remove(v)
    }

    /// Number of assigned variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Assigned variables in name order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.0.keys()
    }

    /// `(variable, value)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, Variable, Integer> {
        self.0.iter()
    }

    /// Values for `variables`, in that order, if all are assigned.
    #[must_use]
    pub fn values_for(&self, variables: &[Variable]) -> Option<Vec<Integer>> {
        variables.iter().map(|v| self.0.get(v).cloned()).collect()
    }

    /// The union of both assignments. Entries of `other` win.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.0.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        out
    }

    /// Keeps only the listed variables.
    #[must_use]
    pub fn restricted_to(&self, variables: &[Variable]) -> Self {
        self.0
            .iter()
            .filter(|(k, _)| variables.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Consumes the assignment into its map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<Variable, Integer> {
        self.0
    }
}

impl FromIterator<(Variable, Integer)> for PartialSolution {
    fn from_iter<T: IntoIterator<Item = (Variable, Integer)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<Variable, Integer>> for PartialSolution {
    fn from(map: BTreeMap<Variable, Integer>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a PartialSolution {
    type Item = (&'a Variable, &'a Integer);
    type IntoIter = btree_map::Iter<'a, Variable, Integer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PartialSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

impl fmt::Debug for PartialSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
