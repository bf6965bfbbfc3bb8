mod graph;
mod health;

pub use graph::graph_routes;
pub use health::health_routes;
