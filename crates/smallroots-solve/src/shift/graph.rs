//! Heuristic pruning of shift relations.
//!
//! Each relation of a suitable batch is a vertex, with an edge from the
//! relation to every relation leading one of its other monomials. A
//! closed vertex set is again suitable. Its weight is how far the
//! leading terms lie below the batch average, and the heaviest closed
//! set is found as a minimum cut (Picard's reduction). Pruning repeats
//! until the weight gain vanishes.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use smallroots_integers::Integer;
use smallroots_model::{BoundSet, Error, Relation, RelationSet, Result};
use smallroots_poly::{Monomial, Polynomial};
use tracing::{debug, info};

use super::leading_term_bits;
use crate::combinations::is_suitable;

/// Gains below this count as zero.
const CONVERGENCE: f64 = 1e-6;

/// Residual capacities below this count as saturated.
const SATURATED: f64 = 1e-12;

#[derive(Clone, Debug)]
struct Edge {
    to: usize,
    rev: usize,
    cap: f64,
}

/// Edmonds-Karp on a small dense network.
struct FlowNetwork {
    adj: Vec<Vec<Edge>>,
}

impl FlowNetwork {
    fn new(n: usize) -> Self {
        Self {
            adj: vec![Vec::new(); n],
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, cap: f64) {
        let rev_from = self.adj[to].len();
        let rev_to = self.adj[from].len();
        self.adj[from].push(Edge {
            to,
            rev: rev_from,
            cap,
        });
        self.adj[to].push(Edge {
            to: from,
            rev: rev_to,
            cap: 0.0,
        });
    }

    /// Breadth-first search in the residual network; returns the edge used
    /// to enter each reached vertex.
    fn bfs(&self, source: usize) -> Vec<Option<(usize, usize)>> {
        let mut parent = vec![None; self.adj.len()];
        let mut seen = vec![false; self.adj.len()];
        seen[source] = true;
        let mut queue = VecDeque::from([source]);
        while let Some(u) = queue.pop_front() {
            for (k, e) in self.adj[u].iter().enumerate() {
                if e.cap > SATURATED && !seen[e.to] {
                    seen[e.to] = true;
                    parent[e.to] = Some((u, k));
                    queue.push_back(e.to);
                }
            }
        }
        parent
    }

    fn max_flow(&mut self, source: usize, sink: usize) {
        loop {
            let parent = self.bfs(source);
            if parent[sink].is_none() {
                return;
            }
            let mut bottleneck = f64::INFINITY;
            let mut v = sink;
            while let Some((u, k)) = parent[v] {
                bottleneck = bottleneck.min(self.adj[u][k].cap);
                v = u;
            }
            let mut v = sink;
            while let Some((u, k)) = parent[v] {
                self.adj[u][k].cap -= bottleneck;
                let (to, rev) = (self.adj[u][k].to, self.adj[u][k].rev);
                self.adj[to][rev].cap += bottleneck;
                v = u;
            }
        }
    }

    /// Vertices reachable from `source` in the residual network.
    fn source_side(&self, source: usize) -> Vec<bool> {
        let parent = self.bfs(source);
        (0..self.adj.len())
            .map(|v| v == source || parent[v].is_some())
            .collect()
    }
}

/// The closed vertex set of largest total weight.
///
/// `edges` lists pairs `(i, j)` meaning "choosing `i` forces `j`". The
/// result is sorted.
#[must_use]
pub fn maximum_closure(weights: &[f64], edges: &[(usize, usize)]) -> Vec<usize> {
    let n = weights.len();
    let (source, sink) = (n, n + 1);
    let mut net = FlowNetwork::new(n + 2);
    for &(i, j) in edges {
        net.add_edge(i, j, f64::INFINITY);
    }
    for (i, &w) in weights.iter().enumerate() {
        if w > 0.0 {
            net.add_edge(source, i, w);
        } else {
            net.add_edge(i, sink, -w);
        }
    }
    net.max_flow(source, sink);
    let side = net.source_side(source);
    (0..n).filter(|&i| side[i]).collect()
}

/// Wraps a batch source and keeps, from each suitable batch, the subset
/// whose leading terms promise a short vector.
///
/// Batches whose average leading term is not below the modulus are
/// dropped. A batch that is not suitable, or mixes moduli, yields
/// [`Error::InvalidInput`].
pub struct GraphShifts<I> {
    inner: I,
    bounds: BoundSet,
}

impl<I> GraphShifts<I> {
    /// Prunes the batches of `inner`.
    #[must_use]
    pub fn new(inner: I, bounds: &BoundSet) -> Self {
        Self {
            inner,
            bounds: bounds.clone(),
        }
    }

    /// One pruning step; `None` once the gain is negligible.
    fn refine_once(
        &self,
        polys: &[Polynomial<Integer>],
    ) -> Result<Option<Vec<Polynomial<Integer>>>> {
        let index: FxHashMap<&Monomial, usize> = polys
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.leading_monomial().map(|m| (m, i)))
            .collect();
        let mut edges = Vec::new();
        for (i, f) in polys.iter().enumerate() {
            for m in f.monomials().skip(1) {
                if let Some(&j) = index.get(m) {
                    edges.push((i, j));
                }
            }
        }

        let bits = polys
            .iter()
            .map(|f| leading_term_bits(f, &self.bounds))
            .collect::<Result<Vec<f64>>>()?;
        #[allow(clippy::cast_precision_loss)]
        let avg = bits.iter().sum::<f64>() / bits.len() as f64;
        let weights: Vec<f64> = bits.iter().map(|b| avg - b).collect();

        let subset = maximum_closure(&weights, &edges);
        let gain: f64 = subset.iter().map(|&i| weights[i]).sum();
        if gain.abs() < CONVERGENCE {
            return Ok(None);
        }
        Ok(Some(subset.into_iter().map(|i| polys[i].clone()).collect()))
    }

    /// Prunes one batch; `None` if the result is not worth a lattice.
    fn refine(&self, batch: RelationSet) -> Result<Option<RelationSet>> {
        let modulus = batch[0].modulus.clone();
        let polys: Vec<Polynomial<Integer>> = batch.iter().map(|r| r.polynomial.clone()).collect();
        let Some(m) = modulus.as_ref() else {
            return Ok(Some(batch));
        };
        if batch.iter().any(|r| r.modulus != modulus) {
            return Err(Error::invalid("shift relations of one batch need a common modulus"));
        }
        if !is_suitable(&polys) {
            return Err(Error::invalid(format!(
                "batch of {} shift relation(s) is not suitable for pruning",
                batch.len()
            )));
        }
        debug!(target: "smallroots::GraphShifts", "pruning {} relation(s)", polys.len());

        let mut current = polys;
        let mut iterations = 0;
        while !current.is_empty() {
            iterations += 1;
            match self.refine_once(&current)? {
                Some(next) => current = next,
                None => break,
            }
        }
        debug!(
            target: "smallroots::GraphShifts",
            "converged after {iterations} iteration(s) on {} relation(s)", current.len()
        );
        if current.is_empty() {
            return Ok(None);
        }

        let bits = current
            .iter()
            .map(|f| leading_term_bits(f, &self.bounds))
            .collect::<Result<Vec<f64>>>()?;
        #[allow(clippy::cast_precision_loss)]
        let expected = bits.iter().sum::<f64>() / bits.len() as f64;
        if expected < self.bounds.lower_bound(m)?.log2() {
            info!(
                target: "smallroots::GraphShifts",
                "kept {} of {} shift relation(s)", current.len(), batch.len()
            );
            let relations = current
                .into_iter()
                .map(|f| Relation::new(f, modulus.clone()))
                .collect();
            RelationSet::new(relations).map(Some)
        } else {
            debug!(
                target: "smallroots::GraphShifts",
                "expected shortest vector is not below the modulus, skipping"
            );
            Ok(None)
        }
    }
}

impl<I: Iterator<Item = Result<RelationSet>>> Iterator for GraphShifts<I> {
    type Item = Result<RelationSet>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let batch = match self.inner.next()? {
                Ok(batch) => batch,
                Err(e) => return Some(Err(e)),
            };
            match self.refine(batch) {
                Ok(Some(refined)) => return Some(Ok(refined)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
