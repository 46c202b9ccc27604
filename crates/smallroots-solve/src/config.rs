//! Solver configuration.

use smallroots_integers::{Integer, Rational};
use smallroots_lattice::{LllConfig, ReducerKind};
use smallroots_poly::Polynomial;

use crate::reduction::LatticeReduction;

/// Knobs shared by every solver in a run.
///
/// The numeric thresholds are empirical; they are kept here rather than
/// hard-coded so that callers can tune them.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Force the primal (`Some(true)`) or dual (`Some(false)`) lattice
    /// construction. `None` decides per problem.
    pub use_primal_strategy: Option<bool>,

    /// Force graph-based pruning of shift relations on or off.
    pub use_graph_optimization: Option<bool>,

    /// Try smaller prefixes of the shift relations before the full set.
    pub use_intermediate_sizes: bool,

    /// Nonlinear terms `g_i(x)` to replace by fresh unknowns `u_i`.
    pub unraveled_linearization: Vec<Polynomial<Integer>>,

    /// Lattice reduction backend.
    pub reducer: ReducerKind,

    /// Lovász constant for in-process LLL.
    pub lll_delta: Rational,

    /// Most candidates the linear solver may enumerate.
    pub linear_candidate_cap: usize,

    /// Judge dual vectors by their L1 norm; otherwise the L2 norm over
    /// `sqrt(dimension)` stands in for it.
    pub use_l1_norm: bool,

    /// Shortest scaled vector length below which enumeration is hopeless.
    pub linear_min_shortest: f64,

    /// Coefficients below this absolute value count as small when deciding
    /// on graph pruning.
    pub small_coefficient_threshold: Integer,

    /// Bits of the finite stand-in for an infinite column scale.
    pub infinity_bits: usize,

    /// Largest batch of shift relations to build a lattice from.
    pub max_shift_relations: usize,

    /// Largest total multiplicity of the relation ideals tried.
    pub max_multiplicity: u32,

    /// Nesting limit for solvers that re-enter the automated solver.
    pub max_recursion_depth: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            use_primal_strategy: None,
            use_graph_optimization: None,
            use_intermediate_sizes: true,
            unraveled_linearization: Vec::new(),
            reducer: ReducerKind::Auto,
            lll_delta: Rational::from_i64(99, 100),
            linear_candidate_cap: 100,
            use_l1_norm: true,
            linear_min_shortest: 0.01,
            small_coefficient_threshold: Integer::new(100),
            infinity_bits: 1000,
            max_shift_relations: 160,
            max_multiplicity: 16,
            max_recursion_depth: 8,
        }
    }
}

impl SolverConfig {
    /// LLL parameters derived from this configuration.
    #[must_use]
    pub fn lll(&self) -> LllConfig {
        LllConfig {
            delta: self.lll_delta.clone(),
        }
    }

    /// The configured reduction backend with its infinity stand-in.
    #[must_use]
    pub fn reduction(&self) -> LatticeReduction {
        LatticeReduction::new(self.reducer.build(self.lll()), self.infinity_bits)
    }
}
