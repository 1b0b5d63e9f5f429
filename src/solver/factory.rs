use crate::domain::{
    models::OptimizationProblem,
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use crate::solver::BranchAndBoundSolver;
#[cfg(feature = "cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver based on the problem configuration
    pub fn create_solver(problem: &OptimizationProblem) -> Result<Arc<dyn SolverService>> {
        Self::create_from_backend(problem.solver_config.backend)
    }

    /// Create a solver for a specific backend
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Ok(Self::default_solver()),
            SolverBackend::BranchAndBound => Ok(Arc::new(BranchAndBoundSolver::new())),
            #[cfg(feature = "cbc")]
            SolverBackend::CoinCbc => Ok(Arc::new(CoinCbcSolver::new())),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => Ok(Arc::new(HighsSolver::new())),
            #[allow(unreachable_patterns)]
            other => Err(SolverError::SolverNotAvailable(format!(
                "{} backend was not compiled into this build",
                other
            ))),
        }
    }

    /// Get the default solver: HiGHS, then CBC, then the built-in branch and bound
    pub fn default_solver() -> Arc<dyn SolverService> {
        #[cfg(feature = "highs")]
        {
            Arc::new(HighsSolver::new())
        }
        #[cfg(all(feature = "cbc", not(feature = "highs")))]
        {
            Arc::new(CoinCbcSolver::new())
        }
        #[cfg(not(any(feature = "cbc", feature = "highs")))]
        {
            Arc::new(BranchAndBoundSolver::new())
        }
    }
}
