//! Bridge to the external `flatter` reducer.
//!
//! `flatter` reads a matrix from stdin and writes the reduced matrix to
//! stdout, both in the bracketed format
//!
//! ```text
//! [[0x1 0x0 0x3]
//! [0x0 0x1 -0x2]
//! ]
//! ```

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use smallroots_integers::Integer;
use tracing::{debug, info};

use crate::error::LatticeError;
use crate::matrix::DenseMatrix;

/// Serialises a basis in `flatter`'s input format.
#[must_use]
pub fn to_flatter_string(basis: &DenseMatrix<Integer>) -> String {
    let rows: Vec<String> = basis
        .rows()
        .map(|row| {
            let entries: Vec<String> = row.iter().map(Integer::to_hex_string).collect();
            format!("[{}]", entries.join(" "))
        })
        .collect();
    format!("[{}\n]\n", rows.join("\n"))
}

/// Parses `flatter`'s output format. Entries may be decimal or hex.
///
/// # Errors
///
/// Returns [`LatticeError::MalformedOutput`] if the text is not a
/// rectangular bracketed matrix.
pub fn from_flatter_string(text: &str) -> Result<DenseMatrix<Integer>, LatticeError> {
    let malformed = |what: &str| LatticeError::MalformedOutput(what.to_string());
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.pop() != Some("") || lines.pop() != Some("]") {
        return Err(malformed("missing closing bracket"));
    }
    let mut rows = Vec::with_capacity(lines.len());
    for line in lines {
        let inner = line.trim_start_matches('[').trim_end_matches(']');
        let row = inner
            .split_whitespace()
            .map(Integer::parse_token)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LatticeError::MalformedOutput(e.to_string()))?;
        rows.push(row);
    }
    let width = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != width) {
        return Err(malformed("ragged rows"));
    }
    Ok(DenseMatrix::from_rows(rows))
}

/// The `flatter` executable.
#[derive(Clone, Debug)]
pub struct Flatter {
    program: PathBuf,
}

impl Default for Flatter {
    fn default() -> Self {
        Self {
            program: PathBuf::from("flatter"),
        }
    }
}

impl Flatter {
    /// Uses the executable at `program` instead of `flatter` on `PATH`.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs the executable on `basis`.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::Io`] if the process cannot be spawned (with
    /// kind [`ErrorKind::NotFound`] when it is not installed), and
    /// [`LatticeError::ReducerFailed`] or
    /// [`LatticeError::MalformedOutput`] if it misbehaves.
    pub fn run(&self, basis: &DenseMatrix<Integer>) -> Result<DenseMatrix<Integer>, LatticeError> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let input = to_flatter_string(basis);
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes())?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(LatticeError::ReducerFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let text = String::from_utf8_lossy(&output.stdout);
        let reduced = from_flatter_string(&text)?;
        if reduced.num_cols() != basis.num_cols() || reduced.num_rows() != basis.num_rows() {
            debug!(
                target: "smallroots::Flatter",
                rows = reduced.num_rows(),
                cols = reduced.num_cols(),
                "unexpected output shape"
            );
            return Err(LatticeError::MalformedOutput(format!(
                "expected {}x{}, got {}x{}",
                basis.num_rows(),
                basis.num_cols(),
                reduced.num_rows(),
                reduced.num_cols()
            )));
        }
        info!(target: "smallroots::Flatter", rows = basis.num_rows(), "reduced lattice basis using flatter");
        Ok(reduced)
    }
}

/// True if `err` means the executable is missing.
#[must_use]
pub fn is_not_installed(err: &LatticeError) -> bool {
    matches!(err, LatticeError::Io(io) if io.kind() == ErrorKind::NotFound)
}
