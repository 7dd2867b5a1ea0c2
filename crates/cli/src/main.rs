mod commands;
mod logging;
mod notifications;
mod scenarios;

use anyhow::Context;
use clap::{Parser, Subcommand};
use wirebox_core::ContainerConfig;

use scenarios::{Scenario, DEFAULT_MESSAGE};

#[derive(Parser)]
#[command(name = "wirebox")]
#[command(about = "Dependency injection container demos", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message through a single notifier
    Single {
        /// Message to deliver
        #[arg(long, default_value = DEFAULT_MESSAGE)]
        message: String,
    },

    /// Send a message through every registered notifier
    Multi {
        /// Message to deliver
        #[arg(long, default_value = DEFAULT_MESSAGE)]
        message: String,
    },

    /// Print the container report for a scenario as JSON
    Describe {
        #[arg(long, value_enum, default_value_t = Scenario::Single)]
        scenario: Scenario,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ContainerConfig::from_env().context("invalid WIREBOX_* environment")?;
    logging::init_logging(&config)?;

    match cli.command {
        Commands::Single { message } => commands::run::execute(Scenario::Single, &message, config),
        Commands::Multi { message } => commands::run::execute(Scenario::Multi, &message, config),
        Commands::Describe { scenario } => commands::describe::execute(scenario, config),
        Commands::Config => commands::config::execute(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_message_defaults() {
        let cli = Cli::try_parse_from(["wirebox", "single"]).unwrap();
        match cli.command {
            Commands::Single { message } => assert_eq!(message, "Hello via DI!"),
            _ => panic!("expected single"),
        }

        let cli = Cli::try_parse_from(["wirebox", "multi", "--message", "hey"]).unwrap();
        match cli.command {
            Commands::Multi { message } => assert_eq!(message, "hey"),
            _ => panic!("expected multi"),
        }
    }

    #[test]
    fn test_describe_scenario_flag() {
        let cli = Cli::try_parse_from(["wirebox", "describe", "--scenario", "multi"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Describe {
                scenario: Scenario::Multi
            }
        ));

        assert!(Cli::try_parse_from(["wirebox", "describe", "--scenario", "other"]).is_err());
    }
}
