use super::errors::StrategyError;
use super::policy::{argmax, CloneBoxedStrategy, Strategy, StrategyStats, ValueEstimates};

use rand::RngCore;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct Ucb {
    alpha: f64,
    estimates: ValueEstimates,
}

impl Ucb {
    pub fn new(alpha: f64) -> Result<Self, StrategyError> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(StrategyError::InvalidParameter {
                name: "alpha",
                value: alpha,
                reason: "must be finite and non-negative",
            });
        }
        debug!(alpha = %alpha, "Creating UCB1 strategy");

        Ok(Self {
            alpha,
            estimates: ValueEstimates::default(),
        })
    }

    // Q + alpha * sqrt(2 ln(t) / n), only defined once every arm has been pulled
    fn bound(&self, value: f64, count: u64, total_count: u64) -> f64 {
        value + self.alpha * (2.0 * (total_count as f64).ln() / (count as f64)).sqrt()
    }
}

impl CloneBoxedStrategy for Ucb {
    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

impl Strategy for Ucb {
    fn name(&self) -> String {
        format!("ucb1 (alpha={})", self.alpha)
    }

    fn prime(&mut self, arms: usize, _: usize) {
        self.estimates = ValueEstimates::new(arms);
    }

    fn choose(&mut self, _: &mut dyn RngCore) -> Result<usize, StrategyError> {
        // arms that were never pulled go first, in index order
        if let Some(arm_id) = self.estimates.counts.iter().position(|&count| count == 0) {
            return Ok(arm_id);
        }

        let total_count = self.estimates.total_count();
        argmax(
            self.estimates
                .values
                .iter()
                .zip(&self.estimates.counts)
                .map(|(&value, &count)| self.bound(value, count, total_count)),
        )
        .ok_or(StrategyError::UnknownStrategyState(
            "choose() called before prime()",
        ))
    }

    fn update(
        &mut self,
        arm_id: usize,
        reward: f64,
        _: &mut dyn RngCore,
    ) -> Result<(), StrategyError> {
        self.estimates.update(arm_id, reward)
    }

    fn stats(&self) -> StrategyStats {
        self.estimates.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    const SEED: u64 = 1234;

    fn make_policy(alpha: f64, arms: usize) -> Ucb {
        let mut policy = Ucb::new(alpha).unwrap();
        policy.prime(arms, 100);
        policy
    }

    #[test]
    fn invalid_alpha() {
        assert!(Ucb::new(-0.5).is_err());
        assert!(Ucb::new(f64::INFINITY).is_err());
        assert!(Ucb::new(0.0).is_ok());
    }

    #[test]
    fn choose_before_prime() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = Ucb::new(1.0).unwrap();
        assert!(policy.choose(&mut rng).is_err());
    }

    #[test]
    fn unpulled_arms_first_in_order() {
        for alpha in [0.0, 1.0, 25.0] {
            let mut rng = SmallRng::seed_from_u64(SEED);
            let mut policy = make_policy(alpha, 3);

            let chosen: Vec<usize> = (0..3)
                .map(|reward| {
                    let arm_id = policy.choose(&mut rng).unwrap();
                    policy.update(arm_id, reward as f64, &mut rng).unwrap();
                    arm_id
                })
                .collect();
            assert_eq!(chosen, vec![0, 1, 2]);
        }
    }

    #[test]
    fn draw_best() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = make_policy(1.0, 2);
        policy.update(0, 1.0, &mut rng).unwrap();
        policy.update(1, 0.0, &mut rng).unwrap();

        // equal counts, so the exploration bonus is identical for both arms
        assert_eq!(policy.choose(&mut rng), Ok(0));
    }

    #[test]
    fn bonus_favours_rarely_pulled_arm() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = make_policy(1.0, 2);
        for _ in 0..50 {
            policy.update(0, 0.6, &mut rng).unwrap();
        }
        policy.update(1, 0.5, &mut rng).unwrap();

        assert_eq!(policy.choose(&mut rng), Ok(1));
    }

    #[test]
    fn bound() {
        let policy = make_policy(0.5, 2);
        let expected = 0.25 + 0.5 * (2.0 * (10.0f64).ln() / 4.0).sqrt();
        assert!((policy.bound(0.25, 4, 10) - expected).abs() < 1e-12);
    }

    #[test]
    fn update() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut policy = make_policy(1.0, 2);
        let arm_id = policy.choose(&mut rng).unwrap();

        assert!(policy.update(arm_id, 1.0, &mut rng).is_ok());
        assert_eq!(policy.stats().arms[arm_id].mean_reward, 1.0);
        assert_eq!(policy.stats().arms[arm_id].pulls, 1);
    }
}
