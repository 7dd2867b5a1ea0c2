//! Registry composition for the two demo scenarios

use clap::ValueEnum;
use serde::Serialize;
use wirebox_core::{
    ContainerConfig, CoreError, IocContainer, Multiplicity, ServiceBinder, ServiceRegistry,
};

use crate::notifications::{
    BroadcastManager, EmailService, NotificationManager, Notifier, OutputSink, SmsService,
};

pub const DEFAULT_MESSAGE: &str = "Hello via DI!";
pub const HEADER: &str = "===DI Example ===";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// One notifier behind a single binding
    Single,
    /// A collection of notifiers, each receiving every message
    Multi,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Single => "single",
            Scenario::Multi => "multi",
        }
    }
}

/// Register everything the scenario needs, writing through `sink`
pub fn compose<S>(scenario: Scenario, sink: S) -> ServiceRegistry
where
    S: OutputSink + Clone + 'static,
{
    let mut registry = ServiceRegistry::new();
    registry.bind::<dyn OutputSink, _>(move |_| Ok(Box::new(sink.clone()) as Box<dyn OutputSink>));

    match scenario {
        Scenario::Single => {
            registry
                .bind_injectable_as::<dyn Notifier, EmailService, _>(Multiplicity::Single, |email| {
                    email as Box<dyn Notifier>
                })
                .bind_injectable::<NotificationManager>();
        }
        Scenario::Multi => {
            registry
                .bind_injectable_as::<dyn Notifier, SmsService, _>(Multiplicity::Multi, |sms| {
                    sms as Box<dyn Notifier>
                })
                .bind_injectable_as::<dyn Notifier, EmailService, _>(Multiplicity::Multi, |email| {
                    email as Box<dyn Notifier>
                })
                .bind_injectable::<BroadcastManager>();
        }
    }

    registry
}

/// Build the scenario's container and deliver `message` once
pub fn run<S>(
    scenario: Scenario,
    message: &str,
    sink: S,
    config: ContainerConfig,
) -> Result<(), CoreError>
where
    S: OutputSink + Clone + 'static,
{
    let container = IocContainer::build(compose(scenario, sink), config)?;
    tracing::debug!(scenario = scenario.as_str(), "running scenario");

    container.resolve::<dyn OutputSink>()?.write_line(HEADER);

    match scenario {
        Scenario::Single => container.resolve::<NotificationManager>()?.notify(message),
        Scenario::Multi => container.resolve::<BroadcastManager>()?.notify(message),
    }

    Ok(())
}
