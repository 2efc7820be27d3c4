//! The generation state machine.
//!
//! ```text
//! Setup(0) → Running(0, 0) → … → Running(0, budget) → Setup(1) → … → Done
//! ```
//!
//! - **Setup(gen)**: the current controllers are bound to fresh agents at the
//!   spawn pose; this is also the only state (besides `Done`) in which the
//!   scenario may be edited
//! - **Running(gen, tick)**: each call to [`Scheduler::advance`] simulates one
//!   tick for every active agent, in population order. When no agent is
//!   active the remaining ticks are skipped
//! - At the tick budget the agents are ranked by reward, summarized, and, unless
//!   this was the last generation, handed to the [`PopulationManager`]
//!
//! The random source is injected, so a seeded generator gives a fully
//! reproducible run.

use std::mem;

use autopark_engine::{Collidable as _, Scenario, Vec2};
use autopark_evaluator::{agent::Agent, network::NeuralNet};
use autopark_stats::descriptive::DescriptiveStats;
use rand::Rng;

use crate::{
    config::{ConfigError, TrainingConfig},
    genetic::{PopulationManager, RankedController},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SchedulerState {
    Setup { generation: usize },
    Running { generation: usize, tick: u32 },
    Done,
}

/// What a renderer needs to draw one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub position: Vec2,
    pub heading: f32,
    pub corners: [Vec2; 4],
    pub active: bool,
    pub collided: bool,
    pub parked: bool,
}

/// Aggregate counters for a status overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusCounters {
    pub generation: usize,
    pub tick: u32,
    pub tick_budget: u32,
    /// Highest running reward seen this generation, if any tick has run.
    pub best_reward: Option<f64>,
    pub parked: usize,
    pub collided: usize,
    pub active: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub agents: Vec<AgentView>,
    pub status: StatusCounters,
}

/// Outcome of one finished generation.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub generation: usize,
    /// Ticks actually simulated; less than the budget if every agent stopped early.
    pub ticks: u32,
    pub best_reward: f64,
    pub reward_stats: DescriptiveStats,
    pub parked: usize,
    pub collided: usize,
    /// Agents still active when the budget ran out.
    pub timed_out: usize,
}

#[derive(Debug)]
pub struct Scheduler<R> {
    config: TrainingConfig,
    scenario: Scenario,
    population: PopulationManager,
    rng: R,
    state: SchedulerState,
    agents: Vec<Agent<NeuralNet>>,
    best_reward: Option<f64>,
    evolutions: usize,
}

impl<R> Scheduler<R>
where
    R: Rng,
{
    /// Validates the configuration and scenario and seeds a random population.
    pub fn new(config: TrainingConfig, scenario: Scenario, mut rng: R) -> Result<Self, ConfigError> {
        let population = PopulationManager::random(config.genetic, config.network, &mut rng)?;
        Self::with_population(config, scenario, population, rng)
    }

    /// Starts from an existing population instead of a random one.
    ///
    /// The population's genetic parameters are replaced by the configured ones.
    pub fn with_population(
        config: TrainingConfig,
        scenario: Scenario,
        population: PopulationManager,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        scenario.validate()?;
        if population.shape() != config.network {
            return Err(ConfigError::NetworkShapeMismatch {
                expected: config.network,
                actual: population.shape(),
            });
        }
        let population =
            PopulationManager::from_controllers(config.genetic, population.into_controllers())?;
        Ok(Self {
            config,
            scenario,
            population,
            rng,
            state: SchedulerState::Setup { generation: 0 },
            agents: vec![],
            best_reward: None,
            evolutions: 0,
        })
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Editor access to the scenario; `None` while a generation is running.
    ///
    /// Edits are validated when the next generation starts.
    pub fn scenario_mut(&mut self) -> Option<&mut Scenario> {
        if self.state.is_running() {
            None
        } else {
            Some(&mut self.scenario)
        }
    }

    #[must_use]
    pub fn population(&self) -> &PopulationManager {
        &self.population
    }

    /// Agents of the running generation; empty outside `Running`.
    #[must_use]
    pub fn agents(&self) -> &[Agent<NeuralNet>] {
        &self.agents
    }

    /// Number of times the population manager has produced a new generation.
    #[must_use]
    pub fn evolution_count(&self) -> usize {
        self.evolutions
    }

    #[must_use]
    pub fn tick_budget(&self) -> u32 {
        self.config.schedule.tick_budget()
    }

    /// Advances the state machine by one step.
    ///
    /// In `Setup` this validates the scenario and binds the agents; in
    /// `Running` it simulates one tick. Returns the summary when this step
    /// finished a generation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Scenario`] if the scenario was edited into an
    /// invalid state. The scheduler then stays in `Setup`.
    pub fn advance(&mut self) -> Result<Option<GenerationSummary>, ConfigError> {
        match self.state {
            SchedulerState::Setup { generation } => {
                self.begin_generation(generation)?;
                Ok(None)
            }
            SchedulerState::Running { generation, tick } => {
                Ok(self.simulate_tick(generation, tick))
            }
            SchedulerState::Done => Ok(None),
        }
    }

    /// Runs until the current generation finishes, or returns `None` if training
    /// is already done.
    pub fn run_generation(&mut self) -> Result<Option<GenerationSummary>, ConfigError> {
        while !self.state.is_done() {
            if let Some(summary) = self.advance()? {
                return Ok(Some(summary));
            }
        }
        Ok(None)
    }

    /// Runs every remaining generation.
    pub fn run(&mut self) -> Result<Vec<GenerationSummary>, ConfigError> {
        let mut summaries = vec![];
        while let Some(summary) = self.run_generation()? {
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// Discards the running generation and returns to its `Setup` state.
    ///
    /// Partial rewards are dropped and the population is left unchanged.
    /// Returns `false` if no generation was running.
    pub fn abort_generation(&mut self) -> bool {
        let SchedulerState::Running { generation, tick } = self.state else {
            return false;
        };
        log::debug!("generation {generation} aborted at tick {tick}");
        self.agents.clear();
        self.best_reward = None;
        self.state = SchedulerState::Setup { generation };
        true
    }

    /// Snapshot of every agent plus the status counters.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let agents = self
            .agents
            .iter()
            .map(|agent| AgentView {
                position: agent.car().position(),
                heading: agent.car().heading(),
                corners: agent.car().corners(),
                active: agent.is_active(),
                collided: agent.collided(),
                parked: agent.parked(),
            })
            .collect::<Vec<_>>();
        let (generation, tick) = match self.state {
            SchedulerState::Setup { generation } => (generation, 0),
            SchedulerState::Running { generation, tick } => (generation, tick),
            SchedulerState::Done => (self.config.schedule.generation_count, 0),
        };
        let status = StatusCounters {
            generation,
            tick,
            tick_budget: self.tick_budget(),
            best_reward: self.best_reward,
            parked: agents.iter().filter(|a| a.parked).count(),
            collided: agents.iter().filter(|a| a.collided).count(),
            active: agents.iter().filter(|a| a.active).count(),
        };
        Frame { agents, status }
    }

    fn begin_generation(&mut self, generation: usize) -> Result<(), ConfigError> {
        self.scenario.validate()?;
        let params = self.config.agent_params();
        self.agents = self
            .population
            .controllers()
            .iter()
            .map(|controller| Agent::new(controller.clone(), &self.scenario, params))
            .collect();
        self.best_reward = None;
        self.state = SchedulerState::Running { generation, tick: 0 };
        log::debug!(
            "generation {generation}: {} agents, {} ticks",
            self.agents.len(),
            self.tick_budget()
        );
        Ok(())
    }

    fn simulate_tick(&mut self, generation: usize, tick: u32) -> Option<GenerationSummary> {
        for agent in &mut self.agents {
            if agent.is_active() {
                agent.tick(&self.scenario);
            }
            let reward = agent.reward();
            self.best_reward = Some(self.best_reward.map_or(reward, |best| best.max(reward)));
        }
        let ticks = tick + 1;
        let budget = self.tick_budget();
        let exhausted = !self.agents.iter().any(Agent::is_active);
        if ticks >= budget || exhausted {
            if exhausted && ticks < budget {
                log::debug!("generation {generation}: no active agents left at tick {ticks}");
            }
            return Some(self.finish_generation(generation, ticks));
        }
        self.state = SchedulerState::Running {
            generation,
            tick: ticks,
        };
        None
    }

    fn finish_generation(&mut self, generation: usize, ticks: u32) -> GenerationSummary {
        let agents = mem::take(&mut self.agents);
        let parked = agents.iter().filter(|a| a.parked()).count();
        let collided = agents.iter().filter(|a| a.collided()).count();
        let timed_out = agents.iter().filter(|a| a.is_active()).count();

        let mut ranked = agents
            .into_iter()
            .map(|agent| {
                let (controller, reward) = agent.into_parts();
                RankedController::new(controller, reward)
            })
            .collect::<Vec<_>>();
        RankedController::sort_descending(&mut ranked);

        let reward_stats = DescriptiveStats::new(ranked.iter().map(|r| r.reward))
            .expect("population is never empty");
        let summary = GenerationSummary {
            generation,
            ticks,
            best_reward: ranked[0].reward,
            reward_stats,
            parked,
            collided,
            timed_out,
        };
        log::info!(
            "generation {generation} finished after {ticks} ticks: best {:.2}, parked {parked}, collided {collided}",
            summary.best_reward
        );

        let next = generation + 1;
        if next < self.config.schedule.generation_count {
            self.population.next_generation(&ranked, &mut self.rng);
            self.evolutions += 1;
            self.state = SchedulerState::Setup { generation: next };
        } else {
            self.state = SchedulerState::Done;
        }
        self.best_reward = None;
        summary
    }
}
