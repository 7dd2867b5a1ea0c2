use serde_json::json;
use wirebox_core::ContainerConfig;

/// Print the effective configuration and where each value came from
pub fn execute(config: &ContainerConfig) -> anyhow::Result<()> {
    let output = json!({
        "config": config,
        "sources": config.config_sources(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
