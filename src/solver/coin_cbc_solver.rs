// COIN-OR CBC adapter
// Translates the domain model into a good_lp model solved by CBC

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolutionStatus as GoodLpStatus, SolverModel,
    Variable as GoodLpVariable, WithMipGap, WithTimeLimit,
};
use log::debug;
use std::time::Instant;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let num_vars = problem.num_variables();
        let config = &problem.solver_config;

        // Build variables using good_lp
        let mut vars = variables!();
        let lp_variables: Vec<GoodLpVariable> = (0..num_vars)
            .map(|_| vars.add(variable().binary()))
            .collect();

        let mut obj_expr: Expression = 0.into();
        for (&coeff, &var) in problem.objective.coefficients.iter().zip(&lp_variables) {
            if coeff != 0.0 {
                obj_expr += coeff * var;
            }
        }

        let unsolved = match problem.objective.optimization_type {
            OptimizationType::Maximize => vars.maximise(obj_expr),
            OptimizationType::Minimize => vars.minimise(obj_expr),
        };
        let mut lp_model = unsolved.using(coin_cbc::coin_cbc);

        for constraint in &problem.constraints {
            let mut lhs: Expression = 0.into();
            for (&coeff, &var) in constraint.coefficients.iter().zip(&lp_variables) {
                if coeff != 0.0 {
                    lhs += coeff * var;
                }
            }

            lp_model = match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
                ConstraintType::Equal => lp_model.with(lhs.eq(constraint.bound)),
                ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(constraint.bound)),
            };
        }

        lp_model.set_parameter("log", if config.verbose { "1" } else { "0" });
        if let Some(seconds) = config.time_limit {
            lp_model = lp_model.with_time_limit(seconds);
        }
        if let Some(gap) = config.gap_tolerance {
            lp_model = lp_model.with_mip_gap(gap as f32).map_err(|e| {
                SolverError::InvalidProblem(format!("Invalid gap tolerance {}: {:?}", gap, e))
            })?;
        }

        debug!(
            "CBC model '{}': {} variables, {} constraints",
            problem.name,
            num_vars,
            problem.constraints.len()
        );

        let solution_result = lp_model.solve();

        let mut statistics = problem.statistics();
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        match solution_result {
            Ok(sol) => {
                let variable_values: Vec<f64> =
                    lp_variables.iter().map(|&var| sol.value(var)).collect();
                let actual_obj = problem.objective.evaluate(&variable_values);

                let solution = match map_status(sol.status()) {
                    SolutionStatus::Optimal => DomainSolution::optimal(actual_obj, variable_values)
                        .with_message(format!("Optimal solution found for '{}'", problem.name)),
                    status => DomainSolution::new(
                        status,
                        format!("CBC stopped early on '{}'", problem.name),
                    )
                    .with_incumbent(actual_obj, variable_values),
                };
                Ok(solution.with_statistics(statistics))
            }
            Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
                SolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Status of a solve that returned an assignment
fn map_status(status: GoodLpStatus) -> SolutionStatus {
    match status {
        GoodLpStatus::Optimal => SolutionStatus::Optimal,
        GoodLpStatus::TimeLimit => SolutionStatus::TimeLimit,
        GoodLpStatus::GapLimit => SolutionStatus::Feasible,
    }
}
