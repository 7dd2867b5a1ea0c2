//! Notifier services used by the demo scenarios.
//!
//! Notifiers never print directly. They write through an [`OutputSink`]
//! resolved from the same container, so tests can swap the console for a
//! [`MemorySink`].

#[cfg(test)]
use std::sync::{Arc, Mutex};

use uuid::Uuid;
use wirebox_core::{CoreError, Dependency, Injectable, Resolver};

/// Write-only line output
pub trait OutputSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Collects lines in memory; clones share the same buffer
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl OutputSink for MemorySink {
    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

pub trait Notifier {
    fn send(&self, message: &str);
}

/// Email notifier; each instance carries its own id so separate
/// resolutions are visibly separate objects
pub struct EmailService {
    instance_id: Uuid,
    sink: Box<dyn OutputSink>,
}

impl Injectable for EmailService {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::one::<dyn OutputSink>()]
    }

    fn create(resolver: &Resolver<'_>) -> Result<Self, CoreError> {
        Ok(Self {
            instance_id: Uuid::new_v4(),
            sink: resolver.resolve::<dyn OutputSink>()?,
        })
    }
}

impl Notifier for EmailService {
    fn send(&self, message: &str) {
        self.sink.write_line(&format!("Email sent: {}", message));
        self.sink.write_line(&self.instance_id.to_string());
    }
}

pub struct SmsService {
    sink: Box<dyn OutputSink>,
}

impl Injectable for SmsService {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::one::<dyn OutputSink>()]
    }

    fn create(resolver: &Resolver<'_>) -> Result<Self, CoreError> {
        Ok(Self {
            sink: resolver.resolve::<dyn OutputSink>()?,
        })
    }
}

impl Notifier for SmsService {
    fn send(&self, message: &str) {
        self.sink.write_line(&format!("SMS sent: {}", message));
    }
}

/// Sends through the one notifier the container picks
pub struct NotificationManager {
    notifier: Box<dyn Notifier>,
}

impl NotificationManager {
    pub fn notify(&self, message: &str) {
        self.notifier.send(message);
    }
}

impl Injectable for NotificationManager {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::one::<dyn Notifier>()]
    }

    fn create(resolver: &Resolver<'_>) -> Result<Self, CoreError> {
        Ok(Self {
            notifier: resolver.resolve::<dyn Notifier>()?,
        })
    }
}

/// Sends through every registered notifier, in registration order
pub struct BroadcastManager {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl BroadcastManager {
    pub fn notify(&self, message: &str) {
        for notifier in &self.notifiers {
            notifier.send(message);
        }
    }
}

impl Injectable for BroadcastManager {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::all::<dyn Notifier>()]
    }

    fn create(resolver: &Resolver<'_>) -> Result<Self, CoreError> {
        Ok(Self {
            notifiers: resolver.resolve_all::<dyn Notifier>()?,
        })
    }
}
