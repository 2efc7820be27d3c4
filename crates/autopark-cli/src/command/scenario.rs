use std::path::PathBuf;

use autopark_engine::Scenario;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ScenarioArg {
    /// Scenario JSON file to validate instead of printing the default
    #[arg(long)]
    check: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ScenarioArg) -> anyhow::Result<()> {
    let ScenarioArg { check, output } = arg;
    let Some(path) = check else {
        Output::save_json(&Scenario::default(), output.clone())?;
        return Ok(());
    };

    let scenario = util::read_scenario_file(path)?;
    eprintln!("Scenario {} is valid", path.display());
    eprintln!(
        "  Bounds: {} x {}",
        scenario.bounds.width, scenario.bounds.height
    );
    eprintln!(
        "  Spot: ({:.1}, {:.1}) at {:.1} deg, {} x {}",
        scenario.spot.center.x,
        scenario.spot.center.y,
        scenario.spot.angle,
        scenario.spot.width,
        scenario.spot.height
    );
    eprintln!("  Obstacles: {}", scenario.obstacles.len());
    util::warn_obstacles_on_spot(&scenario);
    Ok(())
}
