use autopark_engine::Scenario;
use autopark_training::{config::TrainingConfig, scheduler::GenerationSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics of a finished training run; network weights are not stored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub seed: u64,
    pub config: TrainingConfig,
    pub scenario: Scenario,
    pub generations: Vec<GenerationRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub ticks: u32,
    pub best_reward: f64,
    pub mean_reward: f64,
    pub median_reward: f64,
    pub min_reward: f64,
    pub reward_std_dev: f64,
    pub parked: usize,
    pub collided: usize,
    pub timed_out: usize,
}

impl From<&GenerationSummary> for GenerationRecord {
    fn from(summary: &GenerationSummary) -> Self {
        let stats = &summary.reward_stats;
        Self {
            generation: summary.generation,
            ticks: summary.ticks,
            best_reward: summary.best_reward,
            mean_reward: stats.mean,
            median_reward: stats.median,
            min_reward: stats.min,
            reward_std_dev: stats.std_dev,
            parked: summary.parked,
            collided: summary.collided,
            timed_out: summary.timed_out,
        }
    }
}
