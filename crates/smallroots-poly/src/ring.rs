//! Explicit polynomial rings.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::PolyError;
use crate::ordering::TermOrder;
use crate::variable::Variable;

/// A polynomial ring: an ordered list of generators plus a term order.
///
/// Two rings are equal when their generators and orders agree, so a ring
/// rebuilt from the same names is interchangeable with the original.
#[derive(Clone)]
pub struct PolyRing {
    variables: Vec<Variable>,
    order: TermOrder,
    index: FxHashMap<Variable, usize>,
}

impl PolyRing {
    /// Builds a ring over the given generators.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::DuplicateVariable`] if two generators share a name.
    pub fn new(variables: Vec<Variable>, order: TermOrder) -> Result<Arc<Self>, PolyError> {
        let mut index = FxHashMap::default();
        for (i, v) in variables.iter().enumerate() {
            if index.insert(v.clone(), i).is_some() {
                return Err(PolyError::DuplicateVariable(v.name().to_string()));
            }
        }
        Ok(Arc::new(Self {
            variables,
            order,
            index,
        }))
    }

    /// Builds a ring from generator names.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::DuplicateVariable`] if two names coincide.
    pub fn from_names<S: AsRef<str>>(names: &[S], order: TermOrder) -> Result<Arc<Self>, PolyError> {
        Self::new(names.iter().map(Variable::new).collect(), order)
    }

    /// The generators, in order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Number of generators.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// The term order.
    #[must_use]
    pub fn order(&self) -> &TermOrder {
        &self.order
    }

    /// Position of a generator.
    #[must_use]
    pub fn index_of(&self, v: &Variable) -> Option<usize> {
        self.index.get(v).copied()
    }

    /// True if `v` is a generator of this ring.
    #[must_use]
    pub fn contains(&self, v: &Variable) -> bool {
        self.index.contains_key(v)
    }

    /// The same generators under another term order.
    #[must_use]
    pub fn with_order(&self, order: TermOrder) -> Arc<Self> {
        Arc::new(Self {
            variables: self.variables.clone(),
            order,
            index: self.index.clone(),
        })
    }
}

impl PartialEq for PolyRing {
    fn eq(&self, other: &Self) -> bool {
        self.variables == other.variables && self.order == other.order
    }
}

impl Eq for PolyRing {}

impl fmt::Debug for PolyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZZ[")?;
        for (i, v) in self.variables.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "] ({})", self.order)
    }
}

impl fmt::Display for PolyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
