pub mod args;
pub mod dump;
pub mod loader;

pub use args::{Cli, SimulationConfig};
