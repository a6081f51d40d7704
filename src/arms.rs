use crate::errors::BanditError;

use rand::RngCore;
use rand_distr::{Bernoulli, Distribution, Normal};
use serde::Deserialize;
use std::fmt::Debug;

/// A reward source with a fixed distribution.
pub trait Arm: Debug + Send + Sync {
    /// Draw one reward.
    fn sample(&self, rng: &mut dyn RngCore) -> f64;
    /// True expectation of the reward distribution.
    fn mean(&self) -> f64;
}

#[derive(Debug, Clone)]
pub struct BernoulliArm {
    p: f64,
    dist: Bernoulli,
}

impl BernoulliArm {
    pub fn new(p: f64) -> Result<Self, BanditError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(BanditError::InvalidParameter {
                name: "p",
                value: p,
                reason: "must be between 0 and 1",
            });
        }
        let dist = Bernoulli::new(p).map_err(|_| BanditError::InvalidParameter {
            name: "p",
            value: p,
            reason: "must be between 0 and 1",
        })?;

        Ok(Self { p, dist })
    }
}

impl Arm for BernoulliArm {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        if self.dist.sample(rng) {
            1.0
        } else {
            0.0
        }
    }

    fn mean(&self) -> f64 {
        self.p
    }
}

#[derive(Debug, Clone)]
pub struct GaussianArm {
    loc: f64,
    dist: Normal<f64>,
}

impl GaussianArm {
    pub fn new(loc: f64, scale: f64) -> Result<Self, BanditError> {
        if !loc.is_finite() {
            return Err(BanditError::InvalidParameter {
                name: "loc",
                value: loc,
                reason: "must be finite",
            });
        }
        if !scale.is_finite() || scale < 0.0 {
            return Err(BanditError::InvalidParameter {
                name: "scale",
                value: scale,
                reason: "must be finite and non-negative",
            });
        }
        let dist = Normal::new(loc, scale).map_err(|_| BanditError::InvalidParameter {
            name: "scale",
            value: scale,
            reason: "must be finite and non-negative",
        })?;

        Ok(Self { loc, dist })
    }
}

impl Arm for GaussianArm {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.dist.sample(rng)
    }

    fn mean(&self) -> f64 {
        self.loc
    }
}

/// Arm description as it appears in configuration files.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ArmType {
    Bernoulli { p: f64 },
    Gaussian { loc: f64, scale: f64 },
}

impl ArmType {
    pub fn into_inner(self) -> Result<Box<dyn Arm>, BanditError> {
        match self {
            ArmType::Bernoulli { p } => Ok(Box::new(BernoulliArm::new(p)?)),
            ArmType::Gaussian { loc, scale } => Ok(Box::new(GaussianArm::new(loc, scale)?)),
        }
    }
}
