use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use autopark_training::config::TrainingConfig;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ConfigArg) -> anyhow::Result<()> {
    let ConfigArg { output } = arg;
    let text = toml::to_string_pretty(&TrainingConfig::default())
        .context("Failed to serialize default configuration")?;
    let mut output = Output::from_output_path(output.clone())?;
    output
        .write_all(text.as_bytes())
        .and_then(|()| output.flush())
        .with_context(|| format!("Failed to write configuration to {}", output.display_path()))?;
    Ok(())
}
