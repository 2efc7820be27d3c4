use autopark_engine::{Action, Pose, Scenario, Vec2};
use autopark_evaluator::{
    network::{NetworkShape, NeuralNet},
    policy::ACTION_COUNT,
};
use autopark_training::{
    config::{ConfigError, TrainingConfig},
    genetic::{GeneticParams, PopulationManager},
    scheduler::{Scheduler, SchedulerState},
};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

fn config(population_size: usize, generation_count: usize) -> TrainingConfig {
    let mut config = TrainingConfig::default();
    config.genetic = GeneticParams {
        population_size,
        ..GeneticParams::default()
    };
    config.network = NetworkShape::new(8);
    config.schedule.generation_count = generation_count;
    config.schedule.seconds_per_generation = 1;
    config
}

/// A controller whose only non-zero parameter is the output bias of `action`.
fn constant_controller(shape: NetworkShape, action: Action) -> NeuralNet {
    let mut params = vec![0.0; shape.param_count()];
    let output_bias = params.len() - ACTION_COUNT;
    params[output_bias + action.index()] = 1.0;
    NeuralNet::from_params(shape, params)
}

#[test]
fn reaches_done_after_configured_generations() {
    let mut scheduler =
        Scheduler::new(config(10, 4), Scenario::default(), Pcg32::seed_from_u64(3)).unwrap();
    let summaries = scheduler.run().unwrap();

    assert_eq!(summaries.len(), 4);
    let generations: Vec<_> = summaries.iter().map(|s| s.generation).collect();
    assert_eq!(generations, vec![0, 1, 2, 3]);
    assert_eq!(scheduler.evolution_count(), 3);
    assert_eq!(scheduler.state(), SchedulerState::Done);
    assert_eq!(scheduler.population().controllers().len(), 10);
}

#[test]
fn same_seed_gives_same_run() {
    let run = |seed| {
        let mut scheduler =
            Scheduler::new(config(6, 3), Scenario::default(), Pcg32::seed_from_u64(seed)).unwrap();
        scheduler
            .run()
            .unwrap()
            .iter()
            .map(|s| s.best_reward)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(9), run(9));
}

#[test]
fn generation_ends_early_when_every_agent_parks() {
    let config = config(4, 1);
    let shape = config.network;
    let mut scenario = Scenario::default();
    scenario.spawn = Pose::new(scenario.spot.center, scenario.spot.angle);

    let controllers = vec![constant_controller(shape, Action::Brake); 4];
    let population = PopulationManager::from_controllers(config.genetic, controllers).unwrap();
    let mut scheduler =
        Scheduler::with_population(config, scenario, population, Pcg32::seed_from_u64(0)).unwrap();

    let summary = scheduler.run_generation().unwrap().unwrap();
    assert_eq!(summary.ticks, 1);
    assert_eq!(summary.parked, 4);
    assert_eq!(summary.collided, 0);
    assert_eq!(summary.timed_out, 0);
    assert!(scheduler.state().is_done());
}

#[test]
fn elite_survives_into_next_generation() {
    let mut config = config(5, 2);
    // a car that has started rolling no longer counts as parked
    config.parking.min_velocity = 0.05;
    let shape = config.network;
    let mut scenario = Scenario::default();
    scenario.spawn = Pose::new(scenario.spot.center, scenario.spot.angle);

    // only the braking controller parks; the others roll into an obstacle
    let mut controllers = vec![constant_controller(shape, Action::AccelerateForward); 5];
    controllers[3] = constant_controller(shape, Action::Brake);
    let elite = controllers[3].clone();
    let population = PopulationManager::from_controllers(config.genetic, controllers).unwrap();
    let mut scheduler =
        Scheduler::with_population(config, scenario, population, Pcg32::seed_from_u64(0)).unwrap();

    let summary = scheduler.run_generation().unwrap().unwrap();
    assert_eq!(summary.parked, 1);
    assert_eq!(scheduler.state(), SchedulerState::Setup { generation: 1 });
    assert_eq!(scheduler.population().controllers()[0], elite);
}

#[test]
fn timed_out_agents_stop_where_they_are() {
    let config = config(3, 1);
    let shape = config.network;
    let mut scenario = Scenario::default();
    scenario.obstacles.clear();
    scenario.spawn = Pose::new(Vec2::new(300.0, 300.0), 90.0);

    let controllers = vec![constant_controller(shape, Action::Brake); 3];
    let population = PopulationManager::from_controllers(config.genetic, controllers).unwrap();
    let mut scheduler =
        Scheduler::with_population(config, scenario, population, Pcg32::seed_from_u64(0)).unwrap();

    let summary = scheduler.run_generation().unwrap().unwrap();
    assert_eq!(summary.ticks, scheduler.tick_budget());
    assert_eq!(summary.timed_out, 3);
    assert_eq!(summary.parked + summary.collided, 0);
}

#[test]
fn invalid_population_is_rejected_at_construction() {
    let config = config(4, 1);
    let mut rng = Pcg32::seed_from_u64(0);
    let wrong_shape =
        PopulationManager::random(config.genetic, NetworkShape::new(3), &mut rng).unwrap();
    assert_eq!(
        Scheduler::with_population(config, Scenario::default(), wrong_shape, rng).err(),
        Some(ConfigError::NetworkShapeMismatch {
            expected: NetworkShape::new(8),
            actual: NetworkShape::new(3),
        })
    );
}
