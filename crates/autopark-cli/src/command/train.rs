use std::path::PathBuf;

use autopark_engine::Scenario;
use autopark_training::{
    config::TrainingConfig,
    scheduler::{GenerationSummary, Scheduler},
};
use chrono::Utc;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::{
    model::report::{GenerationRecord, TrainingReport},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training configuration TOML file (defaults are used for missing values)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scenario JSON file (the built-in scenario is used if omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Override the number of generations
    #[arg(long)]
    generations: Option<usize>,
    /// Override the population size
    #[arg(long)]
    population: Option<usize>,
    /// Write a JSON training report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        config,
        scenario,
        seed,
        generations,
        population,
        report,
    } = arg;

    let mut config = match config {
        Some(path) => util::read_config_file(path)?,
        None => TrainingConfig::default(),
    };
    if let Some(generations) = generations {
        config.schedule.generation_count = *generations;
    }
    if let Some(population) = population {
        config.genetic.population_size = *population;
    }
    let scenario = match scenario {
        Some(path) => {
            let scenario = util::read_scenario_file(path)?;
            util::warn_obstacles_on_spot(&scenario);
            scenario
        }
        None => Scenario::default(),
    };
    let seed = seed.unwrap_or_else(rand::random);
    log::info!("training with seed {seed}");

    let mut scheduler = Scheduler::new(config, scenario.clone(), Pcg32::seed_from_u64(seed))?;
    let config = *scheduler.config();
    eprintln!(
        "Training {} controllers for {} generations ({} ticks each)",
        config.genetic.population_size,
        config.schedule.generation_count,
        scheduler.tick_budget()
    );

    let mut records = vec![];
    let mut best: Option<GenerationSummary> = None;
    while let Some(summary) = scheduler.run_generation()? {
        print_summary(&summary);
        records.push(GenerationRecord::from(&summary));
        if best.as_ref().is_none_or(|b| summary.best_reward > b.best_reward) {
            best = Some(summary);
        }
    }

    eprintln!("Training completed.");
    if let Some(best) = &best {
        eprintln!(
            "  Best reward: {:.3} (generation #{})",
            best.best_reward, best.generation
        );
    }
    let total_parked = records.iter().map(|r| r.parked).sum::<usize>();
    eprintln!("  Parked agents over all generations: {total_parked}");

    if let Some(path) = report {
        let report = TrainingReport {
            trained_at: Utc::now(),
            seed,
            config,
            scenario,
            generations: records,
        };
        Output::save_json(&report, Some(path.clone()))?;
        eprintln!();
        eprintln!("Report saved successfully");
        eprintln!("  Path: {}", path.display());
        eprintln!("  Trained at: {}", report.trained_at);
        eprintln!("  Generations: {}", report.generations.len());
    }

    Ok(())
}

fn print_summary(summary: &GenerationSummary) {
    let stats = &summary.reward_stats;
    eprintln!(
        "Generation #{} ({} ticks):",
        summary.generation, summary.ticks
    );
    eprintln!("  Reward Stats:");
    eprintln!("    Min:    {:.3}", stats.min);
    eprintln!("    Max:    {:.3}", stats.max);
    eprintln!("    Mean:   {:.3}", stats.mean);
    eprintln!("    Median: {:.3}", stats.median);
    eprintln!("    StdDev: {:.3}", stats.std_dev);
    eprintln!("  Outcomes:");
    eprintln!("    Parked:    {}", summary.parked);
    eprintln!("    Collided:  {}", summary.collided);
    eprintln!("    Timed out: {}", summary.timed_out);
}
