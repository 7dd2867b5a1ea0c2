use anyhow::Context;
use wirebox_core::ContainerConfig;

use crate::notifications::ConsoleSink;
use crate::scenarios::{self, Scenario};

pub fn execute(scenario: Scenario, message: &str, config: ContainerConfig) -> anyhow::Result<()> {
    scenarios::run(scenario, message, ConsoleSink, config)
        .with_context(|| format!("{} scenario failed", scenario.as_str()))
}
