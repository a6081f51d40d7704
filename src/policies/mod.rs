pub mod epsilon_greedy;
pub mod errors;
mod policy;
mod rng;
pub mod thompson_sampling;
pub mod ucb;

pub use epsilon_greedy::SemiUniform;
pub use policy::{
    argmax, ArmStats, CloneBoxedStrategy, Strategy, StrategyStats, StrategyType, ValueEstimates,
    DEFAULT_UCB_ALPHA,
};
pub use rng::MaybeSeededRng;
pub use thompson_sampling::ThompsonSampling;
pub use ucb::Ucb;
