pub mod arms;
pub mod bandit;
pub mod config;
pub mod errors;
pub mod policies;
pub mod simulation;

pub use arms::{Arm, ArmType, BernoulliArm, GaussianArm};
pub use bandit::Bandit;
pub use errors::{BanditError, SimulationError};
pub use policies::{SemiUniform, Strategy, StrategyType, ThompsonSampling, Ucb};
pub use simulation::{Metric, Simulation, SimulationStats};
