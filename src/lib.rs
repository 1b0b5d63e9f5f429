// Domain layer: problem model, solver contract and errors
pub mod domain;

// Application layer: binary model builder and problem encoders
pub mod application;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, ObjectiveFunction, OptimizationProblem, OptimizationType, Result,
    Solution, SolutionStatus, SolverBackend, SolverConfig, SolverError, SolverService,
    SolverStatistics,
};

pub use application::{
    knapsack, max_weight_spanning_tree, BinaryModel, Edge, KnapsackEncoder, KnapsackSolution,
    ModelSolution, SpanningTreeEncoder, SpanningTreeSolution,
};

pub use solver::{BranchAndBoundSolver, SolverFactory};

#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;

#[cfg(feature = "highs")]
pub use solver::HighsSolver;
