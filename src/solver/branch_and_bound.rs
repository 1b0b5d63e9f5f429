// Branch-and-bound adapter
// Pure Rust backend; every column of the problem is a binary variable.
// Depth-first search over 0/1 assignments, pruning on constraint
// reachability and on an optimistic objective bound.

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};
use log::debug;
use std::time::{Duration, Instant};

const FEASIBILITY_TOLERANCE: f64 = 1e-9;
const TIME_CHECK_INTERVAL: u64 = 1024;

pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Why the search stopped before proving optimality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interruption {
    Time,
    Nodes,
}

/// Row of the search: coefficients permuted into branching order plus
/// the reachable range of the remaining suffix.
struct Row {
    constraint_type: ConstraintType,
    coefficients: Vec<f64>,
    bound: f64,
    // suffix_min[k] / suffix_max[k]: smallest / largest contribution of positions k..n
    suffix_min: Vec<f64>,
    suffix_max: Vec<f64>,
}

impl Row {
    fn new(constraint_type: ConstraintType, coefficients: Vec<f64>, bound: f64) -> Self {
        let n = coefficients.len();
        let mut suffix_min = vec![0.0; n + 1];
        let mut suffix_max = vec![0.0; n + 1];
        for k in (0..n).rev() {
            suffix_min[k] = suffix_min[k + 1] + coefficients[k].min(0.0);
            suffix_max[k] = suffix_max[k + 1] + coefficients[k].max(0.0);
        }
        Self {
            constraint_type,
            coefficients,
            bound,
            suffix_min,
            suffix_max,
        }
    }

    fn reachable(&self, lhs: f64, depth: usize) -> bool {
        let low = lhs + self.suffix_min[depth];
        let high = lhs + self.suffix_max[depth];
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => low <= self.bound + FEASIBILITY_TOLERANCE,
            ConstraintType::GreaterThanOrEqual => high >= self.bound - FEASIBILITY_TOLERANCE,
            ConstraintType::Equal => {
                low <= self.bound + FEASIBILITY_TOLERANCE
                    && high >= self.bound - FEASIBILITY_TOLERANCE
            }
        }
    }
}

struct Search {
    // objective in branching order, always maximized
    gains: Vec<f64>,
    gain_suffix: Vec<f64>,
    rows: Vec<Row>,
    lhs: Vec<f64>,
    assignment: Vec<bool>,
    incumbent: Option<(f64, Vec<bool>)>,
    nodes: u64,
    node_limit: Option<u64>,
    deadline: Option<Instant>,
    interrupted: Option<Interruption>,
}

impl Search {
    fn new(gains: Vec<f64>, rows: Vec<Row>) -> Self {
        let n = gains.len();
        let mut gain_suffix = vec![0.0; n + 1];
        for k in (0..n).rev() {
            gain_suffix[k] = gain_suffix[k + 1] + gains[k].max(0.0);
        }
        let num_rows = rows.len();
        Self {
            gains,
            gain_suffix,
            rows,
            lhs: vec![0.0; num_rows],
            assignment: vec![false; n],
            incumbent: None,
            nodes: 0,
            node_limit: None,
            deadline: None,
            interrupted: None,
        }
    }

    fn out_of_budget(&mut self) -> bool {
        if self.interrupted.is_some() {
            return true;
        }
        if let Some(limit) = self.node_limit {
            if self.nodes >= limit {
                self.interrupted = Some(Interruption::Nodes);
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if self.nodes % TIME_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                self.interrupted = Some(Interruption::Time);
                return true;
            }
        }
        false
    }

    fn explore(&mut self, depth: usize, gain: f64) {
        if self.out_of_budget() {
            return;
        }
        self.nodes += 1;

        if !self
            .rows
            .iter()
            .zip(&self.lhs)
            .all(|(row, &lhs)| row.reachable(lhs, depth))
        {
            return;
        }
        if let Some((best, _)) = &self.incumbent {
            if gain + self.gain_suffix[depth] <= *best + FEASIBILITY_TOLERANCE {
                return;
            }
        }

        if depth == self.gains.len() {
            self.incumbent = Some((gain, self.assignment.clone()));
            return;
        }

        // promising value first so a good incumbent shows up early
        let first = self.gains[depth] >= 0.0;
        for value in [first, !first] {
            self.assign(depth, value);
            let next_gain = if value { gain + self.gains[depth] } else { gain };
            self.explore(depth + 1, next_gain);
            self.unassign(depth, value);
        }
    }

    fn assign(&mut self, depth: usize, value: bool) {
        self.assignment[depth] = value;
        if value {
            for (lhs, row) in self.lhs.iter_mut().zip(&self.rows) {
                *lhs += row.coefficients[depth];
            }
        }
    }

    fn unassign(&mut self, depth: usize, value: bool) {
        self.assignment[depth] = false;
        if value {
            for (lhs, row) in self.lhs.iter_mut().zip(&self.rows) {
                *lhs -= row.coefficients[depth];
            }
        }
    }
}

impl SolverService for BranchAndBoundSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();
        let num_vars = problem.num_variables();
        let sense = match problem.objective.optimization_type {
            OptimizationType::Maximize => 1.0,
            OptimizationType::Minimize => -1.0,
        };

        // Branch on the largest objective gains first
        let mut order: Vec<usize> = (0..num_vars).collect();
        order.sort_by(|&a, &b| {
            let ga = sense * problem.objective.coefficients[a];
            let gb = sense * problem.objective.coefficients[b];
            gb.total_cmp(&ga)
        });

        let gains = order
            .iter()
            .map(|&i| sense * problem.objective.coefficients[i])
            .collect();
        let rows = problem
            .constraints
            .iter()
            .map(|c| {
                Row::new(
                    c.constraint_type,
                    order.iter().map(|&i| c.coefficients[i]).collect(),
                    c.bound,
                )
            })
            .collect();

        let mut search = Search::new(gains, rows);
        search.node_limit = problem.solver_config.node_limit;
        search.deadline = problem
            .solver_config
            .time_limit
            .map(|secs| start_time + Duration::from_secs_f64(secs.max(0.0)));
        search.explore(0, 0.0);

        let mut statistics = problem.statistics();
        statistics.nodes_explored = search.nodes;
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "branch and bound explored {} nodes in {:.3} ms",
            statistics.nodes_explored, statistics.solve_time_ms
        );

        let incumbent_values = search.incumbent.as_ref().map(|(_, assignment)| {
            let mut values = vec![0.0; num_vars];
            for (pos, &i) in order.iter().enumerate() {
                if assignment[pos] {
                    values[i] = 1.0;
                }
            }
            values
        });

        let solution = match (search.interrupted, incumbent_values) {
            (None, Some(values)) => {
                let value = problem.objective.evaluate(&values);
                DomainSolution::optimal(value, values)
                    .with_message(format!("Optimal solution found for '{}'", problem.name))
            }
            (None, None) => DomainSolution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            (Some(reason), values) => {
                let status = match reason {
                    Interruption::Time => SolutionStatus::TimeLimit,
                    Interruption::Nodes => SolutionStatus::NodeLimit,
                };
                let solution = DomainSolution::new(
                    status,
                    format!("Search stopped after {} nodes", search.nodes),
                );
                match values {
                    Some(values) => {
                        let value = problem.objective.evaluate(&values);
                        solution.with_incumbent(value, values)
                    }
                    None => solution,
                }
            }
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "Branch and Bound"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
