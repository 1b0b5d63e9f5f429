#![cfg(any(feature = "cbc", feature = "highs"))]

use approx::assert_abs_diff_eq;
use combilp::{
    knapsack, max_weight_spanning_tree, BranchAndBoundSolver, Edge, KnapsackEncoder,
    SolutionStatus, SolverConfig, SolverError, SolverService,
};

fn native_solvers() -> Vec<Box<dyn SolverService>> {
    let mut solvers: Vec<Box<dyn SolverService>> = Vec::new();
    #[cfg(feature = "cbc")]
    solvers.push(Box::new(combilp::CoinCbcSolver::new()));
    #[cfg(feature = "highs")]
    solvers.push(Box::new(combilp::HighsSolver::new()));
    solvers
}

#[test]
fn knapsack_matches_branch_and_bound() {
    let items = ["a", "b", "c", "d", "e", "f"];
    let weights = [2.0, 3.0, 4.0, 5.0, 9.0, 1.5];
    let values = [3.0, 4.0, 5.0, 8.0, 10.0, 1.0];
    let expected = knapsack(&BranchAndBoundSolver::new(), &items, &weights, &values, 12.0)
        .unwrap()
        .objective;

    for solver in native_solvers() {
        let solution = knapsack(solver.as_ref(), &items, &weights, &values, 12.0).unwrap();
        assert_abs_diff_eq!(solution.objective, expected, epsilon = 1e-6);
    }
}

#[test]
fn textbook_knapsack() {
    for solver in native_solvers() {
        let solution = knapsack(
            solver.as_ref(),
            &["a", "b", "c"],
            &[2.0, 3.0, 4.0],
            &[3.0, 4.0, 5.0],
            5.0,
        )
        .unwrap();
        assert_abs_diff_eq!(solution.objective, 7.0, epsilon = 1e-6);
        assert!(solution.selection["a"] && solution.selection["b"]);
        assert!(!solution.selection["c"]);
    }
}

#[test]
fn triangle_matches_branch_and_bound() {
    let edges = vec![
        Edge::new(1, 2),
        Edge::new(2, 3),
        Edge::new(1, 3),
        Edge::new(3, 4),
    ];
    let weights = [5.0, 1.0, 1.0, 2.0];

    for solver in native_solvers() {
        let solution = max_weight_spanning_tree(solver.as_ref(), &edges, &weights).unwrap();
        assert_abs_diff_eq!(solution.objective, 7.0, epsilon = 1e-6);
        assert_eq!(solution.selected, vec![Edge::new(1, 2), Edge::new(3, 4)]);
    }
}

#[cfg(feature = "cbc")]
#[test]
fn cbc_gap_limited_solve_is_optimal_or_reported() {
    let items: Vec<u32> = (0..14).collect();
    let weights: Vec<f64> = items.iter().map(|&i| f64::from(3 + (i * 7) % 11)).collect();
    let values: Vec<f64> = items.iter().map(|&i| f64::from(5 + (i * 5) % 13)).collect();
    let expected = knapsack(&BranchAndBoundSolver::new(), &items, &weights, &values, 30.0)
        .unwrap()
        .objective;

    let encoder =
        KnapsackEncoder::new().with_config(SolverConfig::default().with_gap_tolerance(0.5));
    let solver = combilp::CoinCbcSolver::new();
    match encoder.solve(&solver, &items, &weights, &values, 30.0) {
        Ok(solution) => assert_abs_diff_eq!(solution.objective, expected, epsilon = 1e-6),
        Err(SolverError::SolverFailure { status, .. }) => {
            assert_eq!(status, SolutionStatus::Feasible)
        }
        Err(e) => panic!("{}", e),
    }
}

#[test]
fn time_limited_solve_is_optimal_or_reported() {
    let items: Vec<u32> = (0..10).collect();
    let weights = vec![1.0; 10];
    let values = vec![3.5; 10];

    let encoder =
        KnapsackEncoder::new().with_config(SolverConfig::default().with_time_limit(0.0));
    for solver in native_solvers() {
        match encoder.solve(solver.as_ref(), &items, &weights, &values, 10.0) {
            Ok(solution) => assert_abs_diff_eq!(solution.objective, 35.0, epsilon = 1e-6),
            Err(SolverError::SolverFailure { status, .. }) => {
                assert_eq!(status, SolutionStatus::TimeLimit, "{}", solver.name())
            }
            Err(e) => panic!("{}: {}", solver.name(), e),
        }
    }
}

#[cfg(feature = "cbc")]
#[test]
fn cbc_reports_time_limit_with_its_incumbent() {
    use combilp::{ObjectiveFunction, OptimizationProblem, OptimizationType};

    let problem = OptimizationProblem::new(ObjectiveFunction::new(
        OptimizationType::Maximize,
        vec![3.5; 10],
    ))
    .with_config(SolverConfig::default().with_time_limit(0.0));

    let solution = combilp::CoinCbcSolver::new().solve(&problem).unwrap();
    assert_eq!(solution.status, SolutionStatus::TimeLimit);
    assert!(!solution.is_optimal());
    assert_eq!(solution.variable_values, vec![1.0; 10]);
    assert_eq!(solution.optimal_value, Some(35.0));
}
