mod agent;
mod simulation;
mod stats;

pub use agent::Agent;
pub use simulation::Simulation;
pub use stats::{Metric, SimulationStats, StrategyRecord, Transform};
