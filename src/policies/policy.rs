use super::epsilon_greedy::SemiUniform;
use super::errors::StrategyError;
use super::thompson_sampling::ThompsonSampling;
use super::ucb::Ucb;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Debug;

pub const DEFAULT_UCB_ALPHA: f64 = 1.0;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ArmStats {
    pub pulls: u64,
    pub mean_reward: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StrategyStats {
    pub arms: Vec<ArmStats>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum StrategyType {
    EpsilonGreedy { epsilon: f64 },
    EpsilonFirst { epsilon: f64 },
    Random,
    Ucb1 { alpha: Option<f64> },
    ThompsonSampling { general: Option<bool> },
}

impl StrategyType {
    pub fn into_inner(self) -> Result<Box<dyn Strategy>, StrategyError> {
        match self {
            StrategyType::EpsilonGreedy { epsilon } => {
                Ok(Box::new(SemiUniform::epsilon_greedy(epsilon)?))
            }
            StrategyType::EpsilonFirst { epsilon } => {
                Ok(Box::new(SemiUniform::epsilon_first(epsilon)?))
            }
            StrategyType::Random => Ok(Box::new(SemiUniform::random())),
            StrategyType::Ucb1 { alpha } => Ok(Box::new(Ucb::new(
                alpha.unwrap_or(DEFAULT_UCB_ALPHA),
            )?)),
            StrategyType::ThompsonSampling { general } => Ok(Box::new(ThompsonSampling::new(
                general.unwrap_or_default(),
            ))),
        }
    }
}

impl Clone for Box<dyn Strategy> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

pub trait CloneBoxedStrategy {
    fn clone_box(&self) -> Box<dyn Strategy>;
}

/// A decision policy over the arms of a bandit.
///
/// Belief state only lives between two calls to [`Strategy::prime`]: priming
/// discards whatever was learned before and sizes the state for a new trial.
pub trait Strategy: Debug + Send + Sync + CloneBoxedStrategy {
    fn name(&self) -> String;
    /// Reset per-arm beliefs for a trial over `arms` arms lasting `steps` steps.
    fn prime(&mut self, arms: usize, steps: usize);
    /// Index of the next arm to play, in `[0, arms)`.
    fn choose(&mut self, rng: &mut dyn RngCore) -> Result<usize, StrategyError>;
    fn update(
        &mut self,
        arm_id: usize,
        reward: f64,
        rng: &mut dyn RngCore,
    ) -> Result<(), StrategyError>;
    fn stats(&self) -> StrategyStats;
}

/// Pull counts and running mean rewards shared by the value based strategies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueEstimates {
    pub values: Vec<f64>,
    pub counts: Vec<u64>,
}

impl ValueEstimates {
    pub fn new(arms: usize) -> Self {
        Self {
            values: vec![0.0; arms],
            counts: vec![0; arms],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn update(&mut self, arm_id: usize, reward: f64) -> Result<(), StrategyError> {
        let (value, count) = self
            .values
            .get_mut(arm_id)
            .zip(self.counts.get_mut(arm_id))
            .ok_or(StrategyError::ArmNotFound(arm_id))?;

        *count += 1;
        *value += (reward - *value) / (*count as f64);

        Ok(())
    }

    pub fn stats(&self) -> StrategyStats {
        StrategyStats {
            arms: self
                .values
                .iter()
                .zip(&self.counts)
                .map(|(&mean_reward, &pulls)| ArmStats { pulls, mean_reward })
                .collect(),
        }
    }
}

/// Index of the largest value, the lowest index wins ties.
pub fn argmax(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    values
        .into_iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, b)) if v.partial_cmp(&b) != Some(Ordering::Greater) => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
