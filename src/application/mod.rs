// Application layer: problem encoders built on the binary model builder

pub mod knapsack;
pub mod model_builder;
pub mod spanning_tree;

pub use knapsack::{knapsack, KnapsackEncoder, KnapsackSolution};
pub use model_builder::{BinaryModel, ModelSolution, SELECTION_THRESHOLD};
pub use spanning_tree::{
    max_weight_spanning_tree, Edge, SpanningTreeEncoder, SpanningTreeSolution,
};
