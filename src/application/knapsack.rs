// 0/1 knapsack encoder: one binary variable per item, maximize total value
// under a single capacity row

use super::model_builder::BinaryModel;
use crate::domain::{
    models::SolverConfig,
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType},
};
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct KnapsackSolution<I> {
    pub objective: f64,
    /// Every input item mapped to whether it was packed
    pub selection: HashMap<I, bool>,
    order: Vec<I>,
}

impl<I: Eq + Hash> KnapsackSolution<I> {
    pub fn is_selected(&self, item: &I) -> bool {
        self.selection.get(item).copied().unwrap_or(false)
    }

    /// Packed items in input order
    pub fn selected_items(&self) -> Vec<&I> {
        self.order.iter().filter(|i| self.is_selected(i)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnapsackEncoder {
    config: SolverConfig,
}

impl KnapsackEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn encode<I>(
        &self,
        items: &[I],
        weights: &[f64],
        values: &[f64],
        capacity: f64,
    ) -> Result<BinaryModel<I>>
    where
        I: Eq + Hash + Clone,
    {
        for (what, found) in [("weights", weights.len()), ("values", values.len())] {
            if found != items.len() {
                return Err(SolverError::InputShapeMismatch {
                    what: what.to_string(),
                    expected: items.len(),
                    found,
                });
            }
        }
        if !capacity.is_finite() {
            return Err(SolverError::InvalidProblem(format!(
                "capacity must be finite, got {}",
                capacity
            )));
        }

        let mut model = BinaryModel::new("knapsack").with_config(self.config.clone());
        model.add_binary_vars("x", items)?;
        model.set_objective(
            OptimizationType::Maximize,
            items.iter().zip(values.iter().copied()),
        )?;
        model.add_constraint(
            "capacity",
            items.iter().zip(weights.iter().copied()),
            ConstraintType::LessThanOrEqual,
            capacity,
        )?;

        debug!("encoded {} items against capacity {}", items.len(), capacity);
        Ok(model)
    }

    pub fn solve<I>(
        &self,
        solver: &dyn SolverService,
        items: &[I],
        weights: &[f64],
        values: &[f64],
        capacity: f64,
    ) -> Result<KnapsackSolution<I>>
    where
        I: Eq + Hash + Clone,
    {
        let model = self.encode(items, weights, values, capacity)?;
        let solution = model.solve(solver)?;

        Ok(KnapsackSolution {
            objective: solution.objective(),
            selection: items
                .iter()
                .map(|item| (item.clone(), solution.is_selected(item)))
                .collect(),
            order: items.to_vec(),
        })
    }
}

/// Solve a 0/1 knapsack instance with the default encoder settings
pub fn knapsack<I>(
    solver: &dyn SolverService,
    items: &[I],
    weights: &[f64],
    values: &[f64],
    capacity: f64,
) -> Result<KnapsackSolution<I>>
where
    I: Eq + Hash + Clone,
{
    KnapsackEncoder::new().solve(solver, items, weights, values, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SolutionStatus;
    use crate::solver::BranchAndBoundSolver;

    const ITEMS: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn test_textbook_instance() {
        let solution = knapsack(
            &BranchAndBoundSolver::new(),
            &ITEMS,
            &[2.0, 3.0, 4.0],
            &[3.0, 4.0, 5.0],
            5.0,
        )
        .unwrap();

        assert_eq!(solution.objective, 7.0);
        assert!(solution.selection["a"]);
        assert!(solution.selection["b"]);
        assert!(!solution.selection["c"]);
        assert_eq!(solution.selected_items(), vec![&"a", &"b"]);
    }

    #[test]
    fn test_zero_capacity() {
        let solution = knapsack(
            &BranchAndBoundSolver::new(),
            &ITEMS,
            &[2.0, 3.0, 4.0],
            &[3.0, 4.0, 5.0],
            0.0,
        )
        .unwrap();

        assert_eq!(solution.objective, 0.0);
        assert_eq!(solution.selection.len(), 3);
        assert!(solution.selection.values().all(|&packed| !packed));
    }

    #[test]
    fn test_capacity_row() {
        let model = KnapsackEncoder::new()
            .encode(&ITEMS, &[2.0, 3.0, 4.0], &[3.0, 4.0, 5.0], 5.0)
            .unwrap();
        let problem = model.to_problem();
        assert_eq!(problem.constraints.len(), 1);
        assert_eq!(problem.constraints[0].coefficients, vec![2.0, 3.0, 4.0]);
        assert_eq!(problem.constraints[0].bound, 5.0);
        assert_eq!(problem.objective.coefficients, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_values_shape_mismatch() {
        let err = knapsack(
            &BranchAndBoundSolver::new(),
            &ITEMS,
            &[2.0, 3.0, 4.0],
            &[3.0, 4.0],
            5.0,
        )
        .unwrap_err();

        match err {
            SolverError::InputShapeMismatch {
                what,
                expected,
                found,
            } => {
                assert_eq!(what, "values");
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_negative_capacity_is_infeasible() {
        let err = knapsack(
            &BranchAndBoundSolver::new(),
            &ITEMS,
            &[2.0, 3.0, 4.0],
            &[3.0, 4.0, 5.0],
            -1.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SolverError::SolverFailure {
                status: SolutionStatus::Infeasible,
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_capacity() {
        let solver = BranchAndBoundSolver::new();
        let err = knapsack(&solver, &ITEMS, &[1.0; 3], &[1.0; 3], f64::NAN).unwrap_err();
        assert!(matches!(err, SolverError::InvalidProblem(_)));
    }
}
