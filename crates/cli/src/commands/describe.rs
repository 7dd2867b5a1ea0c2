use anyhow::Context;
use serde_json::json;
use wirebox_core::{ContainerConfig, IocContainer};

use crate::notifications::ConsoleSink;
use crate::scenarios::{self, Scenario};

/// Print the scenario's container report as JSON without resolving anything
pub fn execute(scenario: Scenario, config: ContainerConfig) -> anyhow::Result<()> {
    let container = IocContainer::build(scenarios::compose(scenario, ConsoleSink), config)
        .with_context(|| format!("failed to build {} scenario", scenario.as_str()))?;

    let output = json!({
        "scenario": scenario,
        "container": container.report(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
