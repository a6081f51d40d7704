use crate::bandit::Bandit;
use crate::errors::SimulationError;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Raw outcomes of one strategy, as `[trial, step]` grids stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyRecord {
    steps: usize,
    arms: Vec<usize>,
    rewards: Vec<f64>,
}

impl StrategyRecord {
    pub(super) fn new(trials: usize, steps: usize) -> Self {
        Self {
            steps,
            arms: vec![0; trials * steps],
            rewards: vec![0.0; trials * steps],
        }
    }

    pub(super) fn record(&mut self, trial: usize, step: usize, arm_id: usize, reward: f64) {
        let i = trial * self.steps + step;
        self.arms[i] = arm_id;
        self.rewards[i] = reward;
    }

    pub fn trials(&self) -> usize {
        self.arms.len() / self.steps
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Arms chosen at every step of `trial`.
    pub fn arms(&self, trial: usize) -> &[usize] {
        &self.arms[trial * self.steps..(trial + 1) * self.steps]
    }

    /// Rewards observed at every step of `trial`.
    pub fn rewards(&self, trial: usize) -> &[f64] {
        &self.rewards[trial * self.steps..(trial + 1) * self.steps]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metric {
    Regret,
    Rewards,
    Optimality,
    CumRegret,
    CumRewards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Identity,
    CumulativeSum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepValue {
    Reward,
    Optimal,
    Regret,
}

#[derive(Debug, Clone, Copy)]
struct MetricMapping {
    base: Metric,
    value: StepValue,
    transform: Transform,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Regret,
        Metric::Rewards,
        Metric::Optimality,
        Metric::CumRegret,
        Metric::CumRewards,
    ];

    // Rewards come from the reward grid. Optimality and regret are both a
    // function of the chosen arm only, so they share the arm grid as base.
    fn mapping(self) -> MetricMapping {
        match self {
            Metric::Rewards => MetricMapping {
                base: Metric::Rewards,
                value: StepValue::Reward,
                transform: Transform::Identity,
            },
            Metric::Optimality => MetricMapping {
                base: Metric::Optimality,
                value: StepValue::Optimal,
                transform: Transform::Identity,
            },
            Metric::Regret => MetricMapping {
                base: Metric::Optimality,
                value: StepValue::Regret,
                transform: Transform::Identity,
            },
            Metric::CumRewards => MetricMapping {
                base: Metric::Rewards,
                value: StepValue::Reward,
                transform: Transform::CumulativeSum,
            },
            Metric::CumRegret => MetricMapping {
                base: Metric::Optimality,
                value: StepValue::Regret,
                transform: Transform::CumulativeSum,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Regret => "Regret",
            Metric::Rewards => "Rewards",
            Metric::Optimality => "Optimality",
            Metric::CumRegret => "Cumulative Regret",
            Metric::CumRewards => "Cumulative Rewards",
        }
    }

    pub fn is_base(self) -> bool {
        self.mapping().base == self
    }

    pub fn map_to_base(self) -> Metric {
        self.mapping().base
    }

    /// Bases needed to compute every metric in `metrics`.
    pub fn bases(metrics: impl IntoIterator<Item = Metric>) -> HashSet<Metric> {
        metrics.into_iter().map(Metric::map_to_base).collect()
    }

    pub fn transform_kind(self) -> Transform {
        self.mapping().transform
    }

    /// Apply the metric's transform along the step axis of one trial.
    pub fn transform(self, values: &[f64]) -> Vec<f64> {
        match self.transform_kind() {
            Transform::Identity => values.to_vec(),
            Transform::CumulativeSum => values
                .iter()
                .scan(0.0, |acc, &v| {
                    *acc += v;
                    Some(*acc)
                })
                .collect(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Recorded outcomes of a simulation run, from which metrics are computed on
/// demand.
#[derive(Debug, Clone)]
pub struct SimulationStats {
    trials: usize,
    steps: usize,
    optimal: Vec<f64>,
    regret: Vec<f64>,
    records: Vec<(String, StrategyRecord)>,
}

impl SimulationStats {
    pub(super) fn new(
        bandit: &Bandit,
        trials: usize,
        steps: usize,
        records: Vec<(String, StrategyRecord)>,
    ) -> Self {
        let best = bandit.best_mean();
        let means = bandit.means();

        Self {
            trials,
            steps,
            optimal: means
                .iter()
                .map(|&mean| if mean == best { 1.0 } else { 0.0 })
                .collect(),
            regret: means.iter().map(|&mean| best - mean).collect(),
            records,
        }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn strategy_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|(name, _)| name.as_str())
    }

    pub fn record(&self, name: &str) -> Option<&StrategyRecord> {
        self.records
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, record)| record)
    }

    fn step_values(&self, value: StepValue, record: &StrategyRecord, trial: usize) -> Vec<f64> {
        match value {
            StepValue::Reward => record.rewards(trial).to_vec(),
            StepValue::Optimal => record
                .arms(trial)
                .iter()
                .map(|&arm_id| self.optimal[arm_id])
                .collect(),
            StepValue::Regret => record
                .arms(trial)
                .iter()
                .map(|&arm_id| self.regret[arm_id])
                .collect(),
        }
    }

    // transform each trial on its own, then average across trials step by step
    fn average(&self, record: &StrategyRecord, metric: Metric) -> Vec<f64> {
        let value = metric.mapping().value;
        let mut totals = vec![0.0; self.steps];

        for trial in 0..self.trials {
            let values = metric.transform(&self.step_values(value, record, trial));
            totals
                .iter_mut()
                .zip(values)
                .for_each(|(total, v)| *total += v);
        }

        totals
            .into_iter()
            .map(|total| total / self.trials as f64)
            .collect()
    }

    /// Across-trial mean of `metric` at every step, for every strategy.
    pub fn compute(&self, metric: Metric) -> HashMap<String, Vec<f64>> {
        self.records
            .iter()
            .map(|(name, record)| (name.clone(), self.average(record, metric)))
            .collect()
    }

    pub fn compute_for(&self, name: &str, metric: Metric) -> Result<Vec<f64>, SimulationError> {
        self.record(name)
            .map(|record| self.average(record, metric))
            .ok_or_else(|| SimulationError::UnknownStrategy(name.to_string()))
    }

    pub fn compute_many(
        &self,
        metrics: impl IntoIterator<Item = Metric>,
    ) -> HashMap<Metric, HashMap<String, Vec<f64>>> {
        metrics
            .into_iter()
            .map(|metric| (metric, self.compute(metric)))
            .collect()
    }
}
