// HiGHS adapter
// Translates the domain model into a HiGHS row-wise problem

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use log::debug;
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;

        let mut pb = RowProblem::default();
        // One binary column per variable, the objective lives on the columns
        let vars: Vec<_> = problem
            .objective
            .coefficients
            .iter()
            .map(|&obj_coeff| pb.add_integer_column(obj_coeff, 0.0..=1.0))
            .collect();

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .coefficients
                .iter()
                .zip(&vars)
                .filter(|(coeff, _)| **coeff != 0.0)
                .map(|(&coeff, &col)| (col, coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = match problem.objective.optimization_type {
            OptimizationType::Maximize => Sense::Maximise,
            OptimizationType::Minimize => Sense::Minimise,
        };

        let mut model = pb.optimise(sense);
        if !config.verbose {
            model.make_quiet();
        }
        if let Some(seconds) = config.time_limit {
            model.set_option("time_limit", seconds);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        debug!(
            "HiGHS model '{}': {} variables, {} constraints",
            problem.name,
            vars.len(),
            problem.constraints.len()
        );

        let solved = model.solve();

        let mut statistics = problem.statistics();
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let actual_obj = problem.objective.evaluate(&variable_values);

                Ok(DomainSolution::optimal(actual_obj, variable_values)
                    .with_statistics(statistics)
                    .with_message(format!("Optimal solution found for '{}'", problem.name)))
            }
            HighsModelStatus::Infeasible => Ok(DomainSolution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(DomainSolution::new(
                    SolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
                .with_statistics(statistics))
            }
            HighsModelStatus::ReachedTimeLimit => Ok(DomainSolution::new(
                SolutionStatus::TimeLimit,
                "HiGHS stopped at the configured time limit",
            )
            .with_statistics(statistics)),
            HighsModelStatus::ReachedIterationLimit => Ok(DomainSolution::new(
                SolutionStatus::IterationLimit,
                "HiGHS stopped at its iteration limit",
            )
            .with_statistics(statistics)),
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
