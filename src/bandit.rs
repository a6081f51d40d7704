use crate::arms::{Arm, ArmType, BernoulliArm, GaussianArm};
use crate::errors::BanditError;

use rand::RngCore;
use std::sync::Arc;

/// An ordered, non-empty collection of arms. Arm indices are positions in
/// insertion order and never change.
#[derive(Debug, Clone)]
pub struct Bandit {
    arms: Vec<Arc<dyn Arm>>,
}

impl Bandit {
    pub fn new(arms: Vec<Box<dyn Arm>>) -> Result<Self, BanditError> {
        if arms.is_empty() {
            return Err(BanditError::EmptyBandit);
        }

        Ok(Self {
            arms: arms.into_iter().map(Arc::from).collect(),
        })
    }

    /// Build every arm from the same family, one arm per parameter.
    pub fn from_params<P, A, F>(
        params: impl IntoIterator<Item = P>,
        make_arm: F,
    ) -> Result<Self, BanditError>
    where
        A: Arm + 'static,
        F: Fn(P) -> Result<A, BanditError>,
    {
        let arms = params
            .into_iter()
            .map(|p| make_arm(p).map(|arm| Box::new(arm) as Box<dyn Arm>))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(arms)
    }

    pub fn bernoulli(ps: &[f64]) -> Result<Self, BanditError> {
        Self::from_params(ps.iter().copied(), BernoulliArm::new)
    }

    /// Parameter lists are zipped, extra entries in the longer one are ignored.
    pub fn gaussian(locs: &[f64], scales: &[f64]) -> Result<Self, BanditError> {
        Self::from_params(
            locs.iter().copied().zip(scales.iter().copied()),
            |(loc, scale)| GaussianArm::new(loc, scale),
        )
    }

    pub fn from_types(arm_types: Vec<ArmType>) -> Result<Self, BanditError> {
        let arms = arm_types
            .into_iter()
            .map(ArmType::into_inner)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(arms)
    }

    pub fn size(&self) -> usize {
        self.arms.len()
    }

    pub fn mean(&self, arm_id: usize) -> Result<f64, BanditError> {
        self.arms
            .get(arm_id)
            .map(|arm| arm.mean())
            .ok_or(BanditError::ArmNotFound(arm_id))
    }

    pub fn means(&self) -> Vec<f64> {
        self.arms.iter().map(|arm| arm.mean()).collect()
    }

    pub fn best_mean(&self) -> f64 {
        self.arms
            .iter()
            .map(|arm| arm.mean())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Indices of every arm whose mean equals the best mean. Means are compared
    /// exactly, so near-ties are not merged.
    pub fn optimal_arms(&self) -> Vec<usize> {
        let best = self.best_mean();
        self.arms
            .iter()
            .enumerate()
            .filter(|(_, arm)| arm.mean() == best)
            .map(|(arm_id, _)| arm_id)
            .collect()
    }

    pub fn is_optimal(&self, arm_id: usize) -> Result<bool, BanditError> {
        Ok(self.mean(arm_id)? == self.best_mean())
    }

    pub fn regret(&self, arm_id: usize) -> Result<f64, BanditError> {
        Ok(self.best_mean() - self.mean(arm_id)?)
    }

    pub fn sample(&self, arm_id: usize, rng: &mut dyn RngCore) -> Result<f64, BanditError> {
        self.arms
            .get(arm_id)
            .map(|arm| arm.sample(rng))
            .ok_or(BanditError::ArmNotFound(arm_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    const SEED: u64 = 1234;

    #[test]
    fn empty_bandit() {
        assert_eq!(Bandit::new(vec![]).err(), Some(BanditError::EmptyBandit));
        assert_eq!(Bandit::bernoulli(&[]).err(), Some(BanditError::EmptyBandit));
        assert_eq!(
            Bandit::gaussian(&[1.0], &[]).err(),
            Some(BanditError::EmptyBandit)
        );
    }

    #[test]
    fn invalid_arm() {
        assert!(matches!(
            Bandit::bernoulli(&[0.5, 1.5]),
            Err(BanditError::InvalidParameter { name: "p", .. })
        ));
    }

    #[test]
    fn size_and_means() {
        let bandit = Bandit::bernoulli(&[0.2, 0.8, 0.5]).unwrap();
        assert_eq!(bandit.size(), 3);
        assert_eq!(bandit.means(), vec![0.2, 0.8, 0.5]);
        assert_eq!(bandit.mean(1), Ok(0.8));
        assert_eq!(bandit.mean(3), Err(BanditError::ArmNotFound(3)));
    }

    #[test]
    fn optimal_arms() {
        let bandit = Bandit::bernoulli(&[0.2, 0.8, 0.5]).unwrap();
        assert_eq!(bandit.optimal_arms(), vec![1]);
        assert_eq!(bandit.is_optimal(1), Ok(true));
        assert_eq!(bandit.is_optimal(0), Ok(false));
    }

    #[test]
    fn optimal_arms_keeps_ties() {
        let bandit = Bandit::bernoulli(&[0.7, 0.1, 0.7]).unwrap();
        assert_eq!(bandit.optimal_arms(), vec![0, 2]);
    }

    #[test]
    fn optimal_arms_are_maximal() {
        let bandit = Bandit::gaussian(&[-1.0, 3.0, 2.5, 3.0], &[1.0, 1.0, 0.5, 2.0]).unwrap();
        let best = bandit.means().into_iter().fold(f64::NEG_INFINITY, f64::max);
        let optimal = bandit.optimal_arms();
        assert!(!optimal.is_empty());
        assert!(optimal
            .iter()
            .all(|&arm_id| bandit.mean(arm_id) == Ok(best)));
    }

    #[test]
    fn regret() {
        let bandit = Bandit::bernoulli(&[0.25, 0.75]).unwrap();
        assert_eq!(bandit.regret(0), Ok(0.5));
        assert_eq!(bandit.regret(1), Ok(0.0));
    }

    #[test]
    fn from_types() {
        let bandit = Bandit::from_types(vec![
            ArmType::Bernoulli { p: 0.4 },
            ArmType::Gaussian {
                loc: 0.9,
                scale: 0.1,
            },
        ])
        .unwrap();
        assert_eq!(bandit.optimal_arms(), vec![1]);
    }

    #[test]
    fn sample() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let bandit = Bandit::bernoulli(&[1.0]).unwrap();
        assert_eq!(bandit.sample(0, &mut rng), Ok(1.0));
        assert_eq!(
            bandit.sample(1, &mut rng),
            Err(BanditError::ArmNotFound(1))
        );
    }
}
