// Binary model builder: keyed 0/1 variables, a linear objective and linear
// constraints, lowered to a dense OptimizationProblem for any SolverService

use crate::domain::{
    models::{
        Constraint, ObjectiveFunction, OptimizationProblem, SolverConfig, SolverStatistics,
    },
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::hash::Hash;

/// A variable is considered selected when the solver reports more than this
pub const SELECTION_THRESHOLD: f64 = 0.5;

const VIOLATION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
struct LinearRow {
    name: String,
    terms: Vec<(usize, f64)>,
    constraint_type: ConstraintType,
    bound: f64,
}

/// Optimization model over binary variables indexed by keys of type `K`
#[derive(Debug, Clone)]
pub struct BinaryModel<K> {
    name: String,
    names: Vec<String>,
    index: HashMap<K, usize>,
    optimization_type: OptimizationType,
    objective: Vec<(usize, f64)>,
    rows: Vec<LinearRow>,
    config: SolverConfig,
}

impl<K: Eq + Hash + Clone> BinaryModel<K> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            names: Vec::new(),
            index: HashMap::new(),
            optimization_type: OptimizationType::Maximize,
            objective: Vec::new(),
            rows: Vec::new(),
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Add one binary variable per key. Keys must be unique across the model.
    pub fn add_binary_vars<'k, I>(&mut self, prefix: &str, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = &'k K>,
        K: 'k,
    {
        for key in keys {
            if self.index.contains_key(key) {
                return Err(SolverError::InvalidProblem(format!(
                    "duplicate key for variable collection '{}' (position {})",
                    prefix,
                    self.names.len()
                )));
            }
            let position = self.names.len();
            self.index.insert(key.clone(), position);
            self.names.push(format!("{}[{}]", prefix, position));
        }
        Ok(())
    }

    pub fn set_objective<'k, I>(
        &mut self,
        optimization_type: OptimizationType,
        terms: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (&'k K, f64)>,
        K: 'k,
    {
        self.optimization_type = optimization_type;
        self.objective = self.resolve_terms(terms)?;
        Ok(())
    }

    pub fn add_constraint<'k, I>(
        &mut self,
        name: impl Into<String>,
        terms: I,
        constraint_type: ConstraintType,
        bound: f64,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (&'k K, f64)>,
        K: 'k,
    {
        let terms = self.resolve_terms(terms)?;
        self.rows.push(LinearRow {
            name: name.into(),
            terms,
            constraint_type,
            bound,
        });
        Ok(())
    }

    fn resolve_terms<'k, I>(&self, terms: I) -> Result<Vec<(usize, f64)>>
    where
        I: IntoIterator<Item = (&'k K, f64)>,
        K: 'k,
    {
        terms
            .into_iter()
            .map(|(key, coeff)| {
                self.index
                    .get(key)
                    .map(|&i| (i, coeff))
                    .ok_or_else(|| {
                        SolverError::InvalidProblem(format!(
                            "term refers to a key that is not a variable of model '{}'",
                            self.name
                        ))
                    })
            })
            .collect()
    }

    pub fn num_variables(&self) -> usize {
        self.names.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.rows.len()
    }

    /// Lower the keyed model into the dense representation backends consume
    pub fn to_problem(&self) -> OptimizationProblem {
        let n = self.names.len();
        let dense = |terms: &[(usize, f64)]| {
            let mut coefficients = vec![0.0; n];
            for &(i, coeff) in terms {
                coefficients[i] += coeff;
            }
            coefficients
        };

        let coefficients = dense(self.objective.as_slice());
        let objective = ObjectiveFunction::new(self.optimization_type, coefficients)
            .with_names(self.names.clone());

        self.rows.iter().fold(
            OptimizationProblem::new(objective)
                .with_name(self.name.clone())
                .with_config(self.config.clone()),
            |problem, row| {
                problem.add_constraint(
                    Constraint::new(row.constraint_type, dense(row.terms.as_slice()), row.bound)
                        .with_name(row.name.clone()),
                )
            },
        )
    }

    /// Optimize with `solver`, failing unless the backend proves optimality
    pub fn solve(&self, solver: &dyn SolverService) -> Result<ModelSolution<'_, K>> {
        if self.names.is_empty() {
            return self.solve_empty();
        }

        let problem = self.to_problem();
        debug!(
            "solving '{}' with {}: {} binary variables, {} constraints",
            self.name,
            solver.name(),
            problem.num_variables(),
            problem.constraints.len()
        );

        let solution = solver.solve(&problem)?;
        if !solution.is_optimal() {
            warn!(
                "'{}' finished with status {}: {}",
                self.name, solution.status, solution.message
            );
            return Err(SolverError::SolverFailure {
                status: solution.status,
                message: solution.message,
            });
        }

        if solution.variable_values.len() != self.names.len() {
            return Err(SolverError::ExecutionFailed(format!(
                "{} returned {} values for {} variables",
                solver.name(),
                solution.variable_values.len(),
                self.names.len()
            )));
        }

        let rounded: Vec<f64> = solution
            .variable_values
            .iter()
            .map(|&v| if v > SELECTION_THRESHOLD { 1.0 } else { 0.0 })
            .collect();
        if let Some(row) = problem
            .constraints
            .iter()
            .find(|c| !c.is_satisfied_by(&rounded, VIOLATION_TOLERANCE))
        {
            warn!(
                "rounded solution of '{}' violates constraint '{}'",
                self.name, row.name
            );
            return Err(SolverError::SolverFailure {
                status: SolutionStatus::Error,
                message: format!(
                    "{} returned values whose rounding violates constraint '{}'",
                    solver.name(),
                    row.name
                ),
            });
        }

        let objective = solution
            .optimal_value
            .unwrap_or_else(|| problem.objective.evaluate(&solution.variable_values));
        info!(
            "'{}' solved to optimality by {}: objective {} in {:.3} ms",
            self.name,
            solver.name(),
            objective,
            solution.statistics.solve_time_ms
        );

        Ok(ModelSolution {
            index: &self.index,
            objective,
            values: solution.variable_values,
            statistics: solution.statistics,
        })
    }

    // A model without variables is decided by evaluating its constraints at zero
    fn solve_empty(&self) -> Result<ModelSolution<'_, K>> {
        if let Some(row) = self
            .rows
            .iter()
            .find(|row| !row.constraint_type.holds(0.0, row.bound, VIOLATION_TOLERANCE))
        {
            return Err(SolverError::SolverFailure {
                status: SolutionStatus::Infeasible,
                message: format!(
                    "constraint '{}' cannot hold without variables (0 {} {})",
                    row.name, row.constraint_type, row.bound
                ),
            });
        }

        debug!("'{}' has no variables, objective is 0", self.name);
        Ok(ModelSolution {
            index: &self.index,
            objective: 0.0,
            values: Vec::new(),
            statistics: SolverStatistics {
                num_constraints: self.rows.len() as u32,
                ..SolverStatistics::default()
            },
        })
    }
}

/// Optimal assignment of a [`BinaryModel`]
#[derive(Debug)]
pub struct ModelSolution<'m, K> {
    index: &'m HashMap<K, usize>,
    objective: f64,
    values: Vec<f64>,
    statistics: SolverStatistics,
}

impl<K: Eq + Hash> ModelSolution<'_, K> {
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Raw solver value of the variable for `key`
    pub fn value(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&i| self.values[i])
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.value(key).is_some_and(|v| v > SELECTION_THRESHOLD)
    }

    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }
}
