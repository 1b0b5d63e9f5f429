use super::value_objects::{ConstraintType, OptimizationType, SolutionStatus, SolverBackend};

/// Objective function to minimize or maximize.
///
/// Every column is a binary decision variable; `variable_names` labels them.
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub coefficients: Vec<f64>,
    pub variable_names: Vec<String>,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType, coefficients: Vec<f64>) -> Self {
        let variable_names = (0..coefficients.len()).map(|i| format!("x{}", i)).collect();

        Self {
            optimization_type,
            coefficients,
            variable_names,
        }
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.variable_names = names;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Objective value of an assignment given in variable order
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coeff, value)| coeff * value)
            .sum()
    }
}

/// Linear constraint on variables
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub coefficients: Vec<f64>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, coefficients: Vec<f64>, bound: f64) -> Self {
        Self {
            constraint_type,
            coefficients,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Left-hand side of the constraint for an assignment given in variable order
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coeff, value)| coeff * value)
            .sum()
    }

    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        self.constraint_type
            .holds(self.lhs(values), self.bound, tolerance)
    }
}

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit in seconds
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which the backend may stop
    pub gap_tolerance: Option<f64>,
    /// Only honored by the branch-and-bound backend
    pub node_limit: Option<u64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            node_limit: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_gap_tolerance(mut self, gap: f64) -> Self {
        self.gap_tolerance = Some(gap);
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Complete binary optimization problem
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            objective,
            constraints: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.num_variables()
    }

    /// Statistics skeleton describing the size of this problem
    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            nodes_explored: 0,
            solve_time_ms: 0.0,
            num_variables: self.num_variables() as u32,
            num_constraints: self.constraints.len() as u32,
        }
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub nodes_explored: u64,
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
}

/// Solution to an optimization problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    /// Objective of `variable_values`, present whenever an assignment was returned
    pub optimal_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            optimal_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    /// Attach the best assignment found by a search that stopped early
    pub fn with_incumbent(mut self, value: f64, variable_values: Vec<f64>) -> Self {
        self.optimal_value = Some(value);
        self.variable_values = variable_values;
        self
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_evaluation() {
        let c = Constraint::new(ConstraintType::LessThanOrEqual, vec![2.0, 3.0, 4.0], 5.0);
        assert_eq!(c.lhs(&[1.0, 1.0, 0.0]), 5.0);
        assert!(c.is_satisfied_by(&[1.0, 1.0, 0.0], 0.0));
        assert!(!c.is_satisfied_by(&[0.0, 1.0, 1.0], 1e-9));
    }

    #[test]
    fn test_problem_statistics() {
        let problem = OptimizationProblem::new(ObjectiveFunction::new(
            OptimizationType::Maximize,
            vec![1.0, 2.0],
        ))
        .add_constraint(Constraint::new(
            ConstraintType::LessThanOrEqual,
            vec![1.0, 1.0],
            1.0,
        ));

        let stats = problem.statistics();
        assert_eq!(stats.num_variables, 2);
        assert_eq!(stats.num_constraints, 1);
        assert_eq!(problem.objective.variable_names, vec!["x0", "x1"]);
    }

    #[test]
    fn test_solution_constructors() {
        let solution = Solution::optimal(7.0, vec![1.0, 1.0, 0.0]);
        assert!(solution.is_optimal());
        assert_eq!(solution.optimal_value, Some(7.0));

        let failed = Solution::new(SolutionStatus::Infeasible, "no point");
        assert!(!failed.is_optimal());
        assert_eq!(failed.optimal_value, None);

        let stopped =
            Solution::new(SolutionStatus::TimeLimit, "stopped").with_incumbent(4.0, vec![1.0]);
        assert!(!stopped.is_optimal());
        assert_eq!(stopped.variable_values, vec![1.0]);
    }
}
