//! Solvers for multivariate Coppersmith problems.
//!
//! The partial solvers may recover only some of the unknowns:
//!
//! - [`LinearSolver`] handles linear relations by reduction and
//!   enumeration
//! - [`GroebnerSolver`] takes the integer points of the integer relations
//! - [`CoppersmithSolver`] builds lattices from shift relations
//! - [`AutomatedPartialSolver`] tries the three in that order
//!
//! [`AutomatedSolver`] completes partial solutions by solving what is
//! left after substituting them.

mod automated;
mod coppersmith;
mod full;
mod groebner;
mod linear;

pub use automated::AutomatedPartialSolver;
pub use coppersmith::CoppersmithSolver;
pub use full::AutomatedSolver;
pub use groebner::GroebnerSolver;
pub use linear::LinearSolver;

use smallroots_model::{Problem, Result, SolutionSet};
use tracing::warn;

/// A solving strategy for one problem.
pub trait Solver {
    /// What a successful run returns.
    type Output;

    /// The problem being solved.
    fn problem(&self) -> &Problem;

    /// Storage for the expected solutions, if any.
    fn expected_slot(&mut self) -> &mut Option<SolutionSet>;

    /// Registers known solutions, used only to log whether intermediate
    /// steps keep them. Solutions that do not solve the problem are
    /// reported and ignored.
    fn set_expected(&mut self, expected: SolutionSet) {
        match self.problem().check(&expected) {
            Ok(true) => *self.expected_slot() = Some(expected),
            Ok(false) => {
                warn!(target: "smallroots::Solver", "expected solution is not a solution, ignoring it");
            }
            Err(e) => {
                warn!(target: "smallroots::Solver", "could not check the expected solution: {e}");
            }
        }
    }

    /// Runs the strategy.
    ///
    /// # Errors
    ///
    /// [`smallroots_model::Error::Failure`] means the strategy found
    /// nothing; other errors are fatal.
    fn solve(&mut self) -> Result<Self::Output>;

    /// True when the last failed [`Solver::solve`] showed that no root
    /// lies inside the bounds, so that no other strategy needs to run.
    fn is_conclusive(&self) -> bool {
        false
    }
}
