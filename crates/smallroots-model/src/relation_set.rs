//! Ordered collections of relations over one ring.

use std::fmt;
use std::ops::{Index, Range};
use std::sync::Arc;

use smallroots_poly::{PolyRing, Variable};

use crate::error::{Error, Result};
use crate::relation::Relation;
use crate::solution::PartialSolution;

/// A non-empty list of relations sharing one polynomial ring.
#[derive(Clone, PartialEq, Eq)]
pub struct RelationSet {
    relations: Vec<Relation>,
    ring: Arc<PolyRing>,
    unknown_moduli: Vec<Variable>,
}

impl RelationSet {
    /// Collects `relations`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty list and
    /// [`Error::RingMismatch`] if the rings differ.
    pub fn new(relations: Vec<Relation>) -> Result<Self> {
        let ring = relations
            .first()
            .map(|r| r.ring().clone())
            .ok_or_else(|| Error::invalid("list of relations cannot be empty"))?;
        if relations.iter().any(|r| *r.ring() != ring) {
            return Err(Error::RingMismatch);
        }
        let mut unknown_moduli: Vec<Variable> =
            relations.iter().flat_map(Relation::unknown_moduli).collect();
        unknown_moduli.sort();
        unknown_moduli.dedup();
        Ok(Self {
            relations,
            ring,
            unknown_moduli,
        })
    }

    /// The shared ring.
    #[must_use]
    pub fn ring(&self) -> &Arc<PolyRing> {
        &self.ring
    }

    /// Generators of the shared ring.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        self.ring.variables()
    }

    /// Symbols occurring in any modulus, sorted by name.
    #[must_use]
    pub fn unknown_moduli(&self) -> &[Variable] {
        &self.unknown_moduli
    }

    /// The relations.
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Iterates over the relations.
    pub fn iter(&self) -> std::slice::Iter<'_, Relation> {
        self.relations.iter()
    }

    /// Number of relations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Never true for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// True if every relation holds at `solution`.
    ///
    /// # Errors
    ///
    /// Propagates [`Relation::check`] errors.
    pub fn check(&self, solution: &PartialSolution) -> Result<bool> {
        for rel in &self.relations {
            if !rel.check(solution)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The relations in `range`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty range.
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        Self::new(self.relations[range].to_vec())
    }

    /// Both lists, `self` first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] if the rings differ.
    pub fn concat(&self, other: &Self) -> Result<Self> {
        let mut relations = self.relations.clone();
        relations.extend(other.relations.iter().cloned());
        Self::new(relations)
    }

    /// Consumes the set into its relations.
    #[must_use]
    pub fn into_relations(self) -> Vec<Relation> {
        self.relations
    }
}

impl Index<usize> for RelationSet {
    type Output = Relation;

    fn index(&self, i: usize) -> &Relation {
        &self.relations[i]
    }
}

impl<'a> IntoIterator for &'a RelationSet {
    type Item = &'a Relation;
    type IntoIter = std::slice::Iter<'a, Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.relations.iter()
    }
}

impl fmt::Display for RelationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RelationSet in {:?} (", self.ring)?;
        for rel in &self.relations {
            writeln!(f, "\t{rel},")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for RelationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len() == 1 {
            write!(f, "RelationSet with 1 relation in {:?}", self.ring)
        } else {
            write!(f, "RelationSet with {} relations in {:?}", self.len(), self.ring)
        }
    }
}
