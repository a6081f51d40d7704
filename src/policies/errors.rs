use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("Arm {0} not found")]
    ArmNotFound(usize),
    #[error("Strategy state unknown: {0}")]
    UnknownStrategyState(&'static str),
    #[error("Sampling error: {0}")]
    Sampling(String),
}
