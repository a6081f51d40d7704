use crate::policies::errors::StrategyError;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BanditError {
    #[error("Invalid arm parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("Bandit must have at least one arm")]
    EmptyBandit,
    #[error("Arm {0} not found")]
    ArmNotFound(usize),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid simulation parameter {name} = {value}: must be at least 1")]
    InvalidParameter { name: &'static str, value: usize },
    #[error("No strategies were supplied")]
    NoStrategies,
    #[error("Strategy {0} supplied more than once")]
    DuplicateStrategy(String),
    #[error("Strategy {0} not found")]
    UnknownStrategy(String),
    #[error(transparent)]
    Bandit(#[from] BanditError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot read config: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error("Failed to serialize results to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BanditError> for AppError {
    fn from(err: BanditError) -> Self {
        AppError::Simulation(err.into())
    }
}

impl From<StrategyError> for AppError {
    fn from(err: StrategyError) -> Self {
        AppError::Simulation(err.into())
    }
}
