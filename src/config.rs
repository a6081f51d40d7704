use crate::arms::ArmType;
use crate::bandit::Bandit;
use crate::errors::AppError;
use crate::policies::StrategyType;
use crate::simulation::{Metric, Simulation};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics() -> Vec<Metric> {
    Metric::ALL.to_vec()
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RunConfig {
    pub trials: usize,
    pub steps: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BanditConfig {
    pub arms: Vec<ArmType>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NamedStrategy {
    pub name: String,
    pub strategy: StrategyType,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub simulation: RunConfig,
    pub bandit: BanditConfig,
    pub strategies: Vec<NamedStrategy>,
    #[serde(default = "default_metrics")]
    pub metrics: Vec<Metric>,
}

impl AppConfig {
    fn environment() -> Environment {
        Environment::with_prefix("MAB")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config"))
            .add_source(Self::environment())
            .build()?;

        builder.try_deserialize()
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;

        builder.try_deserialize()
    }

    /// Validate every arm and strategy and assemble the simulation.
    pub fn build_simulation(&self) -> Result<Simulation, AppError> {
        let bandit = Bandit::from_types(self.bandit.arms.clone())?;
        let strategies = self
            .strategies
            .iter()
            .map(|named| {
                named
                    .strategy
                    .clone()
                    .into_inner()
                    .map(|strategy| (named.name.clone(), strategy))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Simulation::new(bandit, strategies, self.simulation.seed)?)
    }
}
