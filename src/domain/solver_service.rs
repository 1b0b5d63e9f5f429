// Domain service interface for solving optimization problems
// Every backend implements this contract; encoders only ever see the trait

use super::models::{OptimizationProblem, Solution};
use super::value_objects::SolutionStatus;

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Input shape mismatch: {what} has {found} entries, expected {expected}")]
    InputShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("Solver finished with status {status}: {message}")]
    SolverFailure {
        status: SolutionStatus,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
///
/// Backends are swapped behind this trait without touching the encoders.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<Vec<String>> {
        let mut errors = Vec::new();

        // Check objective has coefficients
        if problem.objective.coefficients.is_empty() {
            errors.push("Objective must have at least one coefficient".to_string());
        }

        let num_vars = problem.num_variables();

        // Check names match objective
        let num_names = problem.objective.variable_names.len();
        if num_names != num_vars {
            errors.push(format!(
                "Number of variable names ({}) doesn't match objective coefficients ({})",
                num_names, num_vars
            ));
        }

        if let Some(i) = problem
            .objective
            .coefficients
            .iter()
            .position(|c| !c.is_finite())
        {
            errors.push(format!("Objective coefficient {} is not finite", i));
        }

        // Check constraints
        for (i, constraint) in problem.constraints.iter().enumerate() {
            if constraint.num_variables() != num_vars {
                errors.push(format!(
                    "Constraint {} has {} coefficients but problem has {} variables",
                    i,
                    constraint.num_variables(),
                    num_vars
                ));
            }
            if !constraint.bound.is_finite()
                || constraint.coefficients.iter().any(|c| !c.is_finite())
            {
                errors.push(format!(
                    "Constraint {} '{}' has a non-finite coefficient or bound",
                    i, constraint.name
                ));
            }
        }

        if errors.is_empty() {
            Ok(Vec::new())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
