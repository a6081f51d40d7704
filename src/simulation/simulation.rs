use super::agent::Agent;
use super::stats::{SimulationStats, StrategyRecord};

use crate::bandit::Bandit;
use crate::errors::SimulationError;
use crate::policies::{MaybeSeededRng, Strategy};

use rand::rngs::SmallRng;
use std::collections::HashSet;
use tracing::{debug, info};

/// Runs a set of named strategies against one bandit.
#[derive(Debug)]
pub struct Simulation {
    bandit: Bandit,
    agents: Vec<Agent>,
    rng: MaybeSeededRng,
}

impl Simulation {
    pub fn new<S: Into<String>>(
        bandit: Bandit,
        strategies: impl IntoIterator<Item = (S, Box<dyn Strategy>)>,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        let agents = strategies
            .into_iter()
            .map(|(name, strategy)| Agent::new(name, strategy))
            .collect::<Vec<_>>();

        if agents.is_empty() {
            return Err(SimulationError::NoStrategies);
        }

        let mut names = HashSet::new();
        if let Some(agent) = agents.iter().find(|agent| !names.insert(agent.name())) {
            return Err(SimulationError::DuplicateStrategy(agent.name().to_string()));
        }

        Ok(Self {
            bandit,
            agents,
            rng: MaybeSeededRng::new(seed),
        })
    }

    /// Label every strategy with its own [`Strategy::name`].
    pub fn from_strategies(
        bandit: Bandit,
        strategies: Vec<Box<dyn Strategy>>,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        Self::new(
            bandit,
            strategies
                .into_iter()
                .map(|strategy| (strategy.name(), strategy)),
            seed,
        )
    }

    pub fn bandit(&self) -> &Bandit {
        &self.bandit
    }

    pub fn strategy_names(&self) -> impl Iterator<Item = &str> {
        self.agents.iter().map(Agent::name)
    }

    pub fn run(
        &mut self,
        trials: usize,
        steps: usize,
    ) -> Result<SimulationStats, SimulationError> {
        if trials == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "trials",
                value: trials,
            });
        }
        if steps == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "steps",
                value: steps,
            });
        }

        let Self {
            bandit,
            agents,
            rng,
        } = self;
        let arms = bandit.size();

        info!(
            trials = %trials,
            steps = %steps,
            arms = %arms,
            strategies = %agents.len(),
            seed = ?rng.seed,
            "Starting simulation"
        );

        let mut records = agents
            .iter()
            .map(|_| StrategyRecord::new(trials, steps))
            .collect::<Vec<_>>();

        for trial in 0..trials {
            // fresh belief state and an independent random stream per strategy
            let mut running = agents
                .iter()
                .map(|template| {
                    let mut agent = template.clone();
                    agent.prime(arms, steps);
                    (agent, rng.fork())
                })
                .collect::<Vec<(Agent, SmallRng)>>();

            for step in 0..steps {
                for ((agent, agent_rng), record) in running.iter_mut().zip(records.iter_mut())
                {
                    let arm_id = agent.choose(agent_rng)?;
                    let reward = bandit.sample(arm_id, agent_rng)?;
                    agent.update(reward, agent_rng)?;
                    record.record(trial, step, arm_id, reward);
                }
            }

            debug!(trial = %trial, "Finished trial");
        }

        info!(trials = %trials, steps = %steps, "Finished simulation");

        Ok(SimulationStats::new(
            bandit,
            trials,
            steps,
            agents
                .iter()
                .map(|agent| agent.name().to_string())
                .zip(records)
                .collect(),
        ))
    }
}
