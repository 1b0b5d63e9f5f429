use combilp::{knapsack, max_weight_spanning_tree, Edge, SolverFactory, SolverService};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let solver = SolverFactory::default_solver();
    println!("Using solver: {}\n", solver.name());

    // Hiker's knapsack, 15 kg capacity
    let items = ["Tent", "Stove", "Food", "Water", "Camera"];
    let weights = [7.0, 3.0, 4.0, 5.0, 2.0];
    let values = [150.0, 90.0, 120.0, 100.0, 80.0];
    let packed = knapsack(solver.as_ref(), &items, &weights, &values, 15.0)?;

    println!("=== Knapsack ===");
    println!("Total value: {}", packed.objective);
    for item in &items {
        let mark = if packed.is_selected(item) { "x" } else { " " };
        println!("  [{}] {}", mark, item);
    }

    let edges = vec![
        Edge::new(1, 2),
        Edge::new(2, 3),
        Edge::new(3, 4),
        Edge::new(4, 1),
        Edge::new(1, 3),
    ];
    let weights = [4.0, 2.0, 5.0, 1.0, 3.0];
    let tree = max_weight_spanning_tree(solver.as_ref(), &edges, &weights)?;

    println!("\n=== Maximum weight edge selection ===");
    println!("Total weight: {}", tree.objective);
    for edge in &tree.selected {
        let (a, b) = edge.endpoints();
        println!("  {} - {}", a, b);
    }

    Ok(())
}
