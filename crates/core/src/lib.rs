pub mod loader;
pub mod solver;
pub mod traits;
pub mod verify;

pub use loader::{EdgeMode, GraphLoader};
pub use solver::BellmanFordSolver;
pub use traits::ShortestPathSolver;
