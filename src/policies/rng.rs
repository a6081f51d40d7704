use rand::{rngs::SmallRng, RngCore, SeedableRng};

/// Master random source of a simulation. Every (trial, strategy) pair gets its
/// own child stream seeded from this one, in a fixed order.
#[derive(Debug, Clone)]
pub struct MaybeSeededRng {
    pub seed: Option<u64>,
    rng: SmallRng,
}

impl MaybeSeededRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = if let Some(seed) = seed {
            SmallRng::seed_from_u64(seed)
        } else {
            SmallRng::from_os_rng()
        };

        Self { seed, rng }
    }

    pub fn fork(&mut self) -> SmallRng {
        SmallRng::seed_from_u64(self.rng.next_u64())
    }
}
