use crate::policies::errors::StrategyError;
use crate::policies::{Strategy, StrategyStats};

use rand::RngCore;

/// A named strategy that remembers its pending choice, so every update is paired
/// with the arm that produced the reward.
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    strategy: Box<dyn Strategy>,
    primed: bool,
    choice: Option<usize>,
}

impl Agent {
    pub fn new(name: impl Into<String>, strategy: Box<dyn Strategy>) -> Self {
        Self {
            name: name.into(),
            strategy,
            primed: false,
            choice: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prime(&mut self, arms: usize, steps: usize) {
        self.strategy.prime(arms, steps);
        self.primed = true;
        self.choice = None;
    }

    pub fn choose(&mut self, rng: &mut dyn RngCore) -> Result<usize, StrategyError> {
        if !self.primed {
            return Err(StrategyError::UnknownStrategyState(
                "choose() can only be called on a primed agent",
            ));
        }
        let arm_id = self.strategy.choose(rng)?;
        self.choice = Some(arm_id);

        Ok(arm_id)
    }

    pub fn update(&mut self, reward: f64, rng: &mut dyn RngCore) -> Result<usize, StrategyError> {
        let arm_id = self
            .choice
            .take()
            .ok_or(StrategyError::UnknownStrategyState(
                "update() can only be called after choose()",
            ))?;
        self.strategy.update(arm_id, reward, rng)?;

        Ok(arm_id)
    }

    pub fn stats(&self) -> Result<StrategyStats, StrategyError> {
        if !self.primed {
            return Err(StrategyError::UnknownStrategyState(
                "agent has no estimates before it is primed",
            ));
        }
        Ok(self.strategy.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::Ucb;
    use rand::{rngs::SmallRng, SeedableRng};

    const SEED: u64 = 1234;

    fn make_agent() -> Agent {
        Agent::new("ucb", Box::new(Ucb::new(1.0).unwrap()))
    }

    #[test]
    fn choose_requires_prime() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut agent = make_agent();
        assert!(matches!(
            agent.choose(&mut rng),
            Err(StrategyError::UnknownStrategyState(_))
        ));
        assert!(agent.stats().is_err());
    }

    #[test]
    fn update_requires_choose() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut agent = make_agent();
        agent.prime(2, 10);
        assert!(matches!(
            agent.update(1.0, &mut rng),
            Err(StrategyError::UnknownStrategyState(_))
        ));

        let arm_id = agent.choose(&mut rng).unwrap();
        assert_eq!(agent.update(1.0, &mut rng), Ok(arm_id));
        // the choice is consumed by the update
        assert!(agent.update(1.0, &mut rng).is_err());
    }

    #[test]
    fn prime_discards_pending_choice() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut agent = make_agent();
        agent.prime(2, 10);
        agent.choose(&mut rng).unwrap();

        agent.prime(2, 10);
        assert!(agent.update(1.0, &mut rng).is_err());
    }

    #[test]
    fn stats() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut agent = make_agent();
        agent.prime(2, 10);
        let arm_id = agent.choose(&mut rng).unwrap();
        agent.update(0.5, &mut rng).unwrap();

        let stats = agent.stats().unwrap();
        assert_eq!(stats.arms[arm_id].pulls, 1);
        assert_eq!(stats.arms[arm_id].mean_reward, 0.5);
        assert_eq!(agent.name(), "ucb");
    }
}
