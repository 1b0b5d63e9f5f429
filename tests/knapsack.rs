use approx::assert_abs_diff_eq;
use combilp::{knapsack, BranchAndBoundSolver, SolverConfig, SolverError};
use combilp::{KnapsackEncoder, KnapsackSolution, SolutionStatus};
use proptest::prelude::*;

/// Best value over every subset that fits, by enumeration.
/// `NEG_INFINITY` when not even the empty subset fits.
fn best_value(weights: &[f64], values: &[f64], capacity: f64) -> f64 {
    let n = weights.len();
    (0u32..(1 << n))
        .filter_map(|mask| {
            let picked = (0..n).filter(|i| mask & (1 << i) != 0);
            let weight: f64 = picked.clone().map(|i| weights[i]).sum();
            let value: f64 = picked.map(|i| values[i]).sum();
            (weight <= capacity).then_some(value)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

// Multiples of 0.25 keep every subset sum exact, so the oracle and the
// solver never disagree on a tie at the capacity.
fn quarters(range: std::ops::Range<i32>) -> impl Strategy<Value = f64> {
    range.prop_map(|q| f64::from(q) * 0.25)
}

/// Signed, fractional weights, values and capacity
fn instance() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, f64)> {
    (0usize..9).prop_flat_map(|n| {
        (
            prop::collection::vec(quarters(-20..80), n),
            prop::collection::vec(quarters(-20..80), n),
            quarters(-16..120),
        )
    })
}

/// Solve with branch and bound; `None` when the solver reports infeasibility
fn solve(weights: &[f64], values: &[f64], capacity: f64) -> Option<KnapsackSolution<usize>> {
    let items: Vec<usize> = (0..weights.len()).collect();
    match knapsack(&BranchAndBoundSolver::new(), &items, weights, values, capacity) {
        Ok(solution) => Some(solution),
        Err(SolverError::SolverFailure {
            status: SolutionStatus::Infeasible,
            ..
        }) => None,
        Err(e) => panic!("unexpected error: {}", e),
    }
}

#[test]
fn hiker_instance() {
    let items = ["Tent", "Stove", "Food", "Water", "Camera"];
    let solution = knapsack(
        &BranchAndBoundSolver::new(),
        &items,
        &[7.0, 3.0, 4.0, 5.0, 2.0],
        &[150.0, 90.0, 120.0, 100.0, 80.0],
        15.0,
    )
    .unwrap();

    assert_abs_diff_eq!(solution.objective, 390.0);
    assert_eq!(
        solution.selected_items(),
        vec![&"Stove", &"Food", &"Water", &"Camera"]
    );
    assert!(!solution.selection["Tent"]);
}

#[test]
fn empty_item_list() {
    let items: [u32; 0] = [];
    let solution = knapsack(&BranchAndBoundSolver::new(), &items, &[], &[], 10.0).unwrap();
    assert_eq!(solution.objective, 0.0);
    assert!(solution.selection.is_empty());
}

#[test]
fn weights_shape_is_checked_first() {
    let err = knapsack(&BranchAndBoundSolver::new(), &[1, 2], &[1.0], &[1.0], 3.0).unwrap_err();
    assert!(matches!(err, SolverError::InputShapeMismatch { ref what, .. } if what == "weights"));
}

#[test]
fn negative_value_item_stays_out() {
    let solution = knapsack(
        &BranchAndBoundSolver::new(),
        &["gift", "junk"],
        &[1.5, 0.5],
        &[2.5, -1.0],
        10.0,
    )
    .unwrap();
    assert_abs_diff_eq!(solution.objective, 2.5);
    assert_eq!(solution.selected_items(), vec![&"gift"]);
}

#[test]
fn negative_weight_item_frees_capacity() {
    // "balloon" lifts 2.5 units, making room for both heavy items
    let solution = knapsack(
        &BranchAndBoundSolver::new(),
        &["anvil", "brick", "balloon"],
        &[3.0, 2.25, -2.5],
        &[4.0, 3.0, 0.5],
        3.0,
    )
    .unwrap();
    assert_abs_diff_eq!(solution.objective, 7.5);
    assert_eq!(solution.selected_items(), vec![&"anvil", &"brick", &"balloon"]);
}

#[test]
fn negative_capacity_reachable_through_negative_weights() {
    let solution = knapsack(
        &BranchAndBoundSolver::new(),
        &[0, 1],
        &[-1.75, 4.0],
        &[-0.5, 9.0],
        -1.0,
    )
    .unwrap();
    assert_abs_diff_eq!(solution.objective, -0.5);
    assert_eq!(solution.selected_items(), vec![&0]);
}

#[test]
fn node_limit_is_reported_as_failure() {
    let items: Vec<u32> = (0..16).collect();
    let weights = vec![1.0; 16];
    let values: Vec<f64> = (0..16).map(f64::from).collect();

    let err = KnapsackEncoder::new()
        .with_config(SolverConfig::default().with_node_limit(5))
        .solve(&BranchAndBoundSolver::new(), &items, &weights, &values, 8.0)
        .unwrap_err();
    assert!(matches!(
        err,
        SolverError::SolverFailure {
            status: SolutionStatus::NodeLimit,
            ..
        }
    ));
}

proptest! {
    #[test]
    fn packed_weight_fits_and_value_matches_objective((weights, values, capacity) in instance()) {
        if let Some(solution) = solve(&weights, &values, capacity) {
            let picked: Vec<usize> = (0..weights.len()).filter(|i| solution.is_selected(i)).collect();
            let packed_weight: f64 = picked.iter().map(|&i| weights[i]).sum();
            let packed_value: f64 = picked.iter().map(|&i| values[i]).sum();

            prop_assert!(packed_weight <= capacity + 1e-9);
            prop_assert!((solution.objective - packed_value).abs() < 1e-9);
            prop_assert_eq!(solution.selection.len(), weights.len());
        }
    }

    #[test]
    fn objective_is_optimal((weights, values, capacity) in instance()) {
        let best = best_value(&weights, &values, capacity);
        match solve(&weights, &values, capacity) {
            Some(solution) => {
                prop_assert!((solution.objective - best).abs() < 1e-9);
            }
            None => {
                prop_assert_eq!(best, f64::NEG_INFINITY);
            }
        }
    }

    #[test]
    fn repeated_solves_agree((weights, values, capacity) in instance()) {
        let first = solve(&weights, &values, capacity).map(|s| s.objective);
        let second = solve(&weights, &values, capacity).map(|s| s.objective);
        prop_assert_eq!(first, second);
    }
}
