//! Closest-vector enumeration (Schnorr-Euchner).
//!
//! Given Gram-Schmidt data for a basis `b_0..b_{n-1}`, a target with
//! orthogonal coordinates `τ`, and a squared radius `R²`, visit every
//! integer vector `x` with
//!
//! ```text
//! Σ_i (x_i + Σ_{j>i} x_j μ_ji − τ_i)² ‖b*_i‖²  ≤  R²
//! ```
//!
//! The search is depth-first from the last coordinate down. At each
//! level candidates are tried in order of increasing distance from the
//! projected center, so a branch is abandoned as soon as its partial
//! distance exceeds the radius.

use tracing::debug;

use crate::gso::GramSchmidt;

/// Decision returned by the enumeration callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Keep enumerating.
    Continue,
    /// Stop immediately.
    Stop,
}

/// Enumeration limits.
#[derive(Clone, Debug)]
pub struct EnumerationConfig {
    /// Maximum number of search-tree nodes to visit.
    pub max_nodes: u64,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            max_nodes: 10_000_000,
        }
    }
}

/// Statistics of an enumeration run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumStats {
    /// Nodes visited in the search tree.
    pub nodes_explored: u64,
    /// Vectors reported to the callback.
    pub solutions_found: usize,
    /// The callback asked to stop.
    pub stopped: bool,
    /// The node limit was reached before the tree was exhausted.
    pub truncated: bool,
}

/// Relative slack on the radius, absorbing floating point error.
const RADIUS_SLACK: f64 = 1e-9;

struct Search<'a, F> {
    gso: &'a GramSchmidt,
    target: &'a [f64],
    radius_sq: f64,
    max_nodes: u64,
    coeffs: Vec<i64>,
    stats: EnumStats,
    callback: F,
}

impl<F: FnMut(&[i64]) -> Control> Search<'_, F> {
    fn center(&self, k: usize) -> f64 {
        let n = self.coeffs.len();
        #[allow(clippy::cast_precision_loss)]
        let shift: f64 = (k + 1..n)
            .map(|j| self.coeffs[j] as f64 * self.gso.mu(j, k))
            .sum();
        self.target[k] - shift
    }

    /// Visits level `k` with `partial` accumulated from the levels above.
    /// Returns false once the search must end.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn visit(&mut self, k: usize, partial: f64) -> bool {
        let c = self.center(k);
        let r = self.gso.r(k);
        let mut up = c.round() as i64;
        let mut down = up - 1;
        let (mut up_open, mut down_open) = (true, true);
        while up_open || down_open {
            self.stats.nodes_explored += 1;
            if self.stats.nodes_explored > self.max_nodes {
                self.stats.truncated = true;
                return false;
            }
            let du = (up as f64 - c).abs();
            let dd = (c - down as f64).abs();
            let take_up = up_open && (!down_open || du <= dd);
            let x = if take_up { up } else { down };
            let dist = (x as f64 - c).powi(2) * r + partial;
            if dist > self.radius_sq {
                // this side only moves further from the center
                if take_up {
                    up_open = false;
                } else {
                    down_open = false;
                }
                continue;
            }
            if take_up {
                up += 1;
            } else {
                down -= 1;
            }
            self.coeffs[k] = x;
            if k == 0 {
                self.stats.solutions_found += 1;
                if (self.callback)(&self.coeffs) == Control::Stop {
                    self.stats.stopped = true;
                    return false;
                }
            } else if !self.visit(k - 1, dist) {
                return false;
            }
        }
        self.coeffs[k] = 0;
        true
    }
}

/// Enumerates all integer combinations within `radius_sq` of the target.
///
/// `target` holds the target's coordinates in the orthogonal basis (see
/// [`GramSchmidt::from_canonical`]) and `radius_sq` is in the same shifted
/// units (see [`GramSchmidt::normalize_squared`]). `callback` receives the
/// coefficient vector of every candidate.
pub fn enumerate<F>(
    gso: &GramSchmidt,
    target: &[f64],
    radius_sq: f64,
    config: &EnumerationConfig,
    callback: F,
) -> EnumStats
where
    F: FnMut(&[i64]) -> Control,
{
    let n = gso.len();
    if n == 0 {
        return EnumStats::default();
    }
    let mut search = Search {
        gso,
        target,
        radius_sq: radius_sq * (1.0 + RADIUS_SLACK),
        max_nodes: config.max_nodes,
        coeffs: vec![0; n],
        stats: EnumStats::default(),
        callback,
    };
    search.visit(n - 1, 0.0);
    debug!(
        target: "smallroots::Enumeration",
        nodes = search.stats.nodes_explored,
        found = search.stats.solutions_found,
        stopped = search.stats.stopped,
        truncated = search.stats.truncated,
        "enumeration finished"
    );
    search.stats
}
