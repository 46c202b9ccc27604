//! Reduction backends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use smallroots_integers::Integer;
use tracing::warn;

use crate::error::LatticeError;
use crate::flatter::{is_not_installed, Flatter};
use crate::lll::{lll_reduce, LllConfig};
use crate::matrix::DenseMatrix;

static MISSING_FLATTER: Once = Once::new();

/// Something that LLL-reduces integer bases.
pub trait LatticeReducer {
    /// Returns a reduced basis of the row lattice of `basis`, with the
    /// same shape.
    ///
    /// # Errors
    ///
    /// Backend specific; see [`LatticeError`].
    fn reduce(&self, basis: &DenseMatrix<Integer>) -> Result<DenseMatrix<Integer>, LatticeError>;
}

/// Which backend to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReducerKind {
    /// `flatter` when installed, in-process LLL otherwise.
    #[default]
    Auto,
    /// Always `flatter`; a missing executable is an error.
    Flatter,
    /// Always the in-process LLL.
    InProcess,
}

impl ReducerKind {
    /// Instantiates the backend.
    #[must_use]
    pub fn build(self, lll: LllConfig) -> Box<dyn LatticeReducer> {
        match self {
            Self::Auto => Box::new(AutoReducer::new(lll)),
            Self::Flatter => Box::new(Flatter::default()),
            Self::InProcess => Box::new(InProcess(lll)),
        }
    }
}

/// Exact integral LLL.
#[derive(Clone, Debug, Default)]
pub struct InProcess(pub LllConfig);

impl LatticeReducer for InProcess {
    fn reduce(&self, basis: &DenseMatrix<Integer>) -> Result<DenseMatrix<Integer>, LatticeError> {
        Ok(lll_reduce(basis, &self.0)?.basis)
    }
}

impl LatticeReducer for Flatter {
    fn reduce(&self, basis: &DenseMatrix<Integer>) -> Result<DenseMatrix<Integer>, LatticeError> {
        self.run(basis)
    }
}

/// Tries `flatter` and falls back to in-process LLL once it is known to
/// be missing.
#[derive(Debug)]
pub struct AutoReducer {
    flatter: Flatter,
    fallback: InProcess,
    missing: AtomicBool,
}

impl AutoReducer {
    /// Uses `flatter` from `PATH`.
    #[must_use]
    pub fn new(lll: LllConfig) -> Self {
        Self::with_flatter(Flatter::default(), lll)
    }

    /// Uses the given `flatter` executable.
    #[must_use]
    pub fn with_flatter(flatter: Flatter, lll: LllConfig) -> Self {
        Self {
            flatter,
            fallback: InProcess(lll),
            missing: AtomicBool::new(false),
        }
    }
}

impl LatticeReducer for AutoReducer {
    fn reduce(&self, basis: &DenseMatrix<Integer>) -> Result<DenseMatrix<Integer>, LatticeError> {
        if !self.missing.load(Ordering::Relaxed) {
            match self.flatter.run(basis) {
                Err(e) if is_not_installed(&e) => {
                    self.missing.store(true, Ordering::Relaxed);
                    MISSING_FLATTER.call_once(|| {
                        warn!(
                            target: "smallroots::LatticeReduction",
                            "flatter is not installed, using in-process LLL instead; \
                             install https://github.com/keeganryan/flatter for faster lattice reduction"
                        );
                    });
                }
                result => return result,
            }
        }
        self.fallback.reduce(basis)
    }
}
