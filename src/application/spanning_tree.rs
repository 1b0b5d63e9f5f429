// Maximum-weight "spanning tree" encoder
//
// The model keeps every vertex on at most one selected edge and forbids
// selecting two edges that share an endpoint. Those rules describe a
// maximum-weight matching: connectivity, the |V| - 1 edge count and cycle
// freedom are not part of the model.

use super::model_builder::BinaryModel;
use crate::domain::{
    models::SolverConfig,
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType},
};
use log::debug;
use std::collections::BTreeSet;
use std::hash::Hash;

/// Unordered pair of vertices. `Edge::new(a, b) == Edge::new(b, a)`.
///
/// Endpoints are stored in ascending order, so `(2, 1)` becomes `(1, 2)`.
/// Reversed or parallel copies of an edge therefore share one key, and an
/// edge list containing both is rejected as a duplicate key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge<V> {
    low: V,
    high: V,
}

impl<V: Ord> Edge<V> {
    pub fn new(a: V, b: V) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Endpoints in ascending order
    pub fn endpoints(&self) -> (&V, &V) {
        (&self.low, &self.high)
    }

    pub fn touches(&self, vertex: &V) -> bool {
        self.low == *vertex || self.high == *vertex
    }

    pub fn shares_endpoint(&self, other: &Edge<V>) -> bool {
        other.touches(&self.low) || other.touches(&self.high)
    }
}

impl<V: Ord> From<(V, V)> for Edge<V> {
    fn from((a, b): (V, V)) -> Self {
        Edge::new(a, b)
    }
}

/// Optimal objective and the selected edges, in input order
#[derive(Debug, Clone)]
pub struct SpanningTreeSolution<V> {
    pub objective: f64,
    pub selected: Vec<Edge<V>>,
}

#[derive(Debug, Clone)]
pub struct SpanningTreeEncoder {
    pair_exclusion: bool,
    config: SolverConfig,
}

impl Default for SpanningTreeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanningTreeEncoder {
    pub fn new() -> Self {
        Self {
            pair_exclusion: true,
            config: SolverConfig::default(),
        }
    }

    /// Toggle the pairwise `x(i) + x(j) <= 1` rows for edges sharing an
    /// endpoint. The degree rows already imply them.
    pub fn with_pair_exclusion(mut self, enabled: bool) -> Self {
        self.pair_exclusion = enabled;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn encode<V>(&self, edges: &[Edge<V>], weights: &[f64]) -> Result<BinaryModel<Edge<V>>>
    where
        V: Ord + Hash + Clone,
    {
        if edges.len() != weights.len() {
            return Err(SolverError::InputShapeMismatch {
                what: "weights".to_string(),
                expected: edges.len(),
                found: weights.len(),
            });
        }

        let mut model =
            BinaryModel::new("max_weight_spanning_tree").with_config(self.config.clone());
        model.add_binary_vars("x", edges)?;
        model.set_objective(
            OptimizationType::Maximize,
            edges.iter().zip(weights.iter().copied()),
        )?;

        let vertices: BTreeSet<&V> = edges
            .iter()
            .flat_map(|e| {
                let (a, b) = e.endpoints();
                [a, b]
            })
            .collect();
        for (k, vertex) in vertices.iter().enumerate() {
            model.add_constraint(
                format!("degree[{}]", k),
                edges
                    .iter()
                    .filter(|e| e.touches(vertex))
                    .map(|e| (e, 1.0)),
                ConstraintType::LessThanOrEqual,
                1.0,
            )?;
        }

        if self.pair_exclusion {
            for (i, first) in edges.iter().enumerate() {
                for (j, second) in edges.iter().enumerate().skip(i + 1) {
                    if first.shares_endpoint(second) {
                        model.add_constraint(
                            format!("exclusive[{},{}]", i, j),
                            [(first, 1.0), (second, 1.0)],
                            ConstraintType::LessThanOrEqual,
                            1.0,
                        )?;
                    }
                }
            }
        }

        debug!(
            "encoded {} edges over {} vertices into {} constraints",
            edges.len(),
            vertices.len(),
            model.num_constraints()
        );
        Ok(model)
    }

    pub fn solve<V>(
        &self,
        solver: &dyn SolverService,
        edges: &[Edge<V>],
        weights: &[f64],
    ) -> Result<SpanningTreeSolution<V>>
    where
        V: Ord + Hash + Clone,
    {
        let model = self.encode(edges, weights)?;
        let solution = model.solve(solver)?;

        Ok(SpanningTreeSolution {
            objective: solution.objective(),
            selected: edges
                .iter()
                .filter(|e| solution.is_selected(e))
                .cloned()
                .collect(),
        })
    }
}

/// Solve the edge-selection model with the default encoder settings
pub fn max_weight_spanning_tree<V>(
    solver: &dyn SolverService,
    edges: &[Edge<V>],
    weights: &[f64],
) -> Result<SpanningTreeSolution<V>>
where
    V: Ord + Hash + Clone,
{
    SpanningTreeEncoder::new().solve(solver, edges, weights)
}
