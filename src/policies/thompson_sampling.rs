use super::errors::StrategyError;
use super::policy::{argmax, ArmStats, CloneBoxedStrategy, Strategy, StrategyStats};

use rand::RngCore;
use rand_distr::{Beta, Distribution};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
struct BetaArm {
    alpha: f64,
    beta: f64,
    count: u64,
}

impl Default for BetaArm {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            count: 0,
        }
    }
}

impl BetaArm {
    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64, StrategyError> {
        let s = Beta::new(self.alpha, self.beta)
            .map_err(|e| StrategyError::Sampling(e.to_string()))?
            .sample(rng);

        Ok(s)
    }

    fn update(&mut self, success: f64) {
        self.alpha += success;
        self.beta += 1.0 - success;
        self.count += 1;
    }

    fn stats(&self) -> ArmStats {
        ArmStats {
            pulls: self.count,
            mean_reward: self.alpha / (self.alpha + self.beta),
        }
    }
}

/// Thompson sampling with a Beta(1, 1) prior on every arm.
///
/// In the default mode a reward counts as one success when it is positive and
/// one failure otherwise. In `general` mode the reward is clipped into `[0, 1]`
/// and added as a fractional success.
#[derive(Clone, Debug)]
pub struct ThompsonSampling {
    general: bool,
    arms: Vec<BetaArm>,
}

impl ThompsonSampling {
    pub fn new(general: bool) -> Self {
        debug!(general = %general, "Creating Thompson sampling strategy");
        Self {
            general,
            arms: Vec::new(),
        }
    }

    fn success(&self, reward: f64) -> f64 {
        if self.general {
            reward.clamp(0.0, 1.0)
        } else if reward > 0.0 {
            1.0
        } else {
            0.0
        }
    }
}

impl CloneBoxedStrategy for ThompsonSampling {
    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

impl Strategy for ThompsonSampling {
    fn name(&self) -> String {
        if self.general {
            "generalized beta ts".to_string()
        } else {
            "beta ts".to_string()
        }
    }

    fn prime(&mut self, arms: usize, _: usize) {
        self.arms = vec![BetaArm::default(); arms];
    }

    fn choose(&mut self, rng: &mut dyn RngCore) -> Result<usize, StrategyError> {
        // one draw per posterior, the largest draw wins
        let samples = self
            .arms
            .iter()
            .map(|arm| arm.sample(rng))
            .collect::<Result<Vec<f64>, _>>()?;

        argmax(samples).ok_or(StrategyError::UnknownStrategyState(
            "choose() called before prime()",
        ))
    }

    fn update(
        &mut self,
        arm_id: usize,
        reward: f64,
        _: &mut dyn RngCore,
    ) -> Result<(), StrategyError> {
        // NaN rewards would poison the posterior for the rest of the trial
        let success = if reward.is_nan() {
            0.0
        } else {
            self.success(reward)
        };

        self.arms
            .get_mut(arm_id)
            .ok_or(StrategyError::ArmNotFound(arm_id))?
            .update(success);

        Ok(())
    }

    fn stats(&self) -> StrategyStats {
        StrategyStats {
            arms: self.arms.iter().map(BetaArm::stats).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    const SEED: u64 = 1234;

    fn make_policy(general: bool, arms: usize) -> ThompsonSampling {
        let mut policy = ThompsonSampling::new(general);
        policy.prime(arms, 100);
        policy
    }

    #[test]
    fn prime() {
        let policy = make_policy(false, 3);
        assert_eq!(policy.arms, vec![BetaArm::default(); 3]);
    }

    #[test]
    fn choose_before_prime() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = ThompsonSampling::new(false);
        assert!(policy.choose(&mut rng).is_err());
    }

    #[test]
    fn single_arm() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = make_policy(false, 1);
        for _ in 0..50 {
            let arm_id = policy.choose(&mut rng).unwrap();
            assert_eq!(arm_id, 0);
            policy.update(arm_id, 1.0, &mut rng).unwrap();
        }
    }

    #[test]
    fn draw_best() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = make_policy(false, 2);
        policy.arms[1].alpha += 100.0;
        assert_eq!(policy.choose(&mut rng), Ok(1));
    }

    #[test]
    fn update_bernoulli() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = make_policy(false, 2);

        assert!(policy.update(0, 1.0, &mut rng).is_ok());
        assert!(policy.update(1, 0.0, &mut rng).is_ok());
        assert_eq!((policy.arms[0].alpha, policy.arms[0].beta), (2.0, 1.0));
        assert_eq!((policy.arms[1].alpha, policy.arms[1].beta), (1.0, 2.0));
        assert_eq!(
            policy.update(2, 1.0, &mut rng),
            Err(StrategyError::ArmNotFound(2))
        );
    }

    #[test]
    fn update_general_clips() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = make_policy(true, 1);

        policy.update(0, 0.25, &mut rng).unwrap();
        assert_eq!((policy.arms[0].alpha, policy.arms[0].beta), (1.25, 1.75));

        policy.update(0, 3.0, &mut rng).unwrap();
        assert_eq!((policy.arms[0].alpha, policy.arms[0].beta), (2.25, 1.75));

        policy.update(0, -2.0, &mut rng).unwrap();
        assert_eq!((policy.arms[0].alpha, policy.arms[0].beta), (2.25, 2.75));
        assert_eq!(policy.stats().arms[0].pulls, 3);
    }

    #[test]
    fn update_non_binary_without_general() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = make_policy(false, 1);

        policy.update(0, 0.4, &mut rng).unwrap();
        policy.update(0, -1.0, &mut rng).unwrap();
        assert_eq!((policy.arms[0].alpha, policy.arms[0].beta), (2.0, 2.0));
    }

    #[test]
    fn failures_lead_to_uniform_choice() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = make_policy(false, 2);
        for arm_id in 0..2 {
            for _ in 0..100 {
                policy.update(arm_id, 0.0, &mut rng).unwrap();
            }
        }
        assert!(policy.arms.iter().all(|arm| arm.beta > 50.0 * arm.alpha));

        let n = 4000;
        let first = (0..n)
            .filter(|_| policy.choose(&mut rng) == Ok(0))
            .count() as f64
            / n as f64;
        assert!((first - 0.5).abs() < 0.05, "arm 0 chosen {first} of the time");
    }
}
