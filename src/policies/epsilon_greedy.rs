use super::errors::StrategyError;
use super::policy::{argmax, CloneBoxedStrategy, Strategy, StrategyStats, ValueEstimates};

use rand::{Rng, RngCore};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
enum Exploration {
    /// Explore with a fixed probability at every step.
    Greedy { epsilon: f64 },
    /// Explore during the first `epsilon * steps` steps, exploit afterwards.
    First { epsilon: f64, remaining: u64 },
    Random,
}

/// Strategies that either explore a uniformly random arm or exploit the arm with
/// the highest estimated value.
#[derive(Clone, Debug)]
pub struct SemiUniform {
    exploration: Exploration,
    estimates: ValueEstimates,
}

fn check_epsilon(epsilon: f64) -> Result<f64, StrategyError> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(epsilon)
    } else {
        Err(StrategyError::InvalidParameter {
            name: "epsilon",
            value: epsilon,
            reason: "must be between 0 and 1",
        })
    }
}

impl SemiUniform {
    pub fn epsilon_greedy(epsilon: f64) -> Result<Self, StrategyError> {
        let epsilon = check_epsilon(epsilon)?;
        debug!(epsilon = %epsilon, "Creating epsilon-greedy strategy");
        Ok(Self::with_exploration(Exploration::Greedy { epsilon }))
    }

    pub fn epsilon_first(epsilon: f64) -> Result<Self, StrategyError> {
        let epsilon = check_epsilon(epsilon)?;
        debug!(epsilon = %epsilon, "Creating epsilon-first strategy");
        Ok(Self::with_exploration(Exploration::First {
            epsilon,
            remaining: 0,
        }))
    }

    pub fn random() -> Self {
        Self::with_exploration(Exploration::Random)
    }

    fn with_exploration(exploration: Exploration) -> Self {
        Self {
            exploration,
            estimates: ValueEstimates::default(),
        }
    }

    fn explore_probability(&self) -> f64 {
        match self.exploration {
            Exploration::Greedy { epsilon } => epsilon,
            Exploration::First { remaining, .. } => {
                if remaining > 0 {
                    1.0
                } else {
                    0.0
                }
            }
            Exploration::Random => 1.0,
        }
    }
}

impl CloneBoxedStrategy for SemiUniform {
    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

impl Strategy for SemiUniform {
    fn name(&self) -> String {
        match self.exploration {
            Exploration::Greedy { epsilon } => format!("eps-greedy (eps={epsilon})"),
            Exploration::First { epsilon, .. } => format!("eps-first (eps={epsilon})"),
            Exploration::Random => "random".to_string(),
        }
    }

    fn prime(&mut self, arms: usize, steps: usize) {
        self.estimates = ValueEstimates::new(arms);
        if let Exploration::First { epsilon, remaining } = &mut self.exploration {
            *remaining = (*epsilon * steps as f64).floor() as u64;
        }
    }

    fn choose(&mut self, rng: &mut dyn RngCore) -> Result<usize, StrategyError> {
        if self.estimates.is_empty() {
            return Err(StrategyError::UnknownStrategyState(
                "choose() called before prime()",
            ));
        }

        if rng.random::<f64>() < self.explore_probability() {
            Ok(rng.random_range(0..self.estimates.len()))
        } else {
            argmax(self.estimates.values.iter().copied()).ok_or(
                StrategyError::UnknownStrategyState("choose() called before prime()"),
            )
        }
    }

    fn update(
        &mut self,
        arm_id: usize,
        reward: f64,
        _: &mut dyn RngCore,
    ) -> Result<(), StrategyError> {
        self.estimates.update(arm_id, reward)?;
        if let Exploration::First { remaining, .. } = &mut self.exploration {
            *remaining = remaining.saturating_sub(1);
        }

        Ok(())
    }

    fn stats(&self) -> StrategyStats {
        self.estimates.stats()
    }
}
