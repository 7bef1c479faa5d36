//! Runtime configuration, loaded the way the teacher's `lib.rs::load_config`
//! did: a `config`-crate hierarchical source with built-in defaults,
//! an optional `actorium.toml` / `actorium.yaml`, then `ACTORIUM_*`
//! environment overrides. The core only owns the handful of keys spec.md
//! §6 allows it; everything else is a collaborator's concern and isn't
//! represented here.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub pool_size: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            pool_size: num_cpus::get() * 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailboxConfig {
    pub msg_process_limit: usize,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        MailboxConfig { msg_process_limit: 1 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub frequency_millis: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig { frequency_millis: 50 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisionDefaults {
    pub max_restarts: u32,
    pub within_millis: u64,
    pub backoff_min_millis: u64,
    pub backoff_max_millis: u64,
    pub backoff_factor: f64,
    pub jitter: f64,
}

impl Default for SupervisionDefaults {
    fn default() -> Self {
        SupervisionDefaults {
            max_restarts: 10,
            within_millis: 60_000,
            backoff_min_millis: 20,
            backoff_max_millis: 2_000,
            backoff_factor: 2.0,
            jitter: 0.1,
        }
    }
}

impl SupervisionDefaults {
    pub fn to_config(&self) -> crate::supervision::SupervisionConfig {
        crate::supervision::SupervisionConfig {
            strategy: crate::supervision::Strategy::Restart,
            scope: crate::supervision::Scope::OneForOne,
            max_restarts: self.max_restarts,
            within: Duration::from_millis(self.within_millis),
            backoff_min: Duration::from_millis(self.backoff_min_millis),
            backoff_max: Duration::from_millis(self.backoff_max_millis),
            backoff_factor: self.backoff_factor,
            jitter: self.jitter,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    pub debug: bool,
    pub dispatcher: DispatcherConfig,
    pub mailbox: MailboxConfig,
    pub scheduler: SchedulerConfig,
    pub supervision: SupervisionDefaults,
}

impl RuntimeConfig {
    /// Loads defaults, then `actorium.toml`/`actorium.yaml` if present, then
    /// `ACTORIUM_*` environment overrides (e.g. `ACTORIUM_DISPATCHER_POOL_SIZE`).
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("ACTORIUM_CONF").unwrap_or_else(|_| "actorium".to_string());
        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("ACTORIUM").separator("_"));
        builder.build()?.try_deserialize()
    }

    pub fn default_config() -> Self {
        RuntimeConfig::default()
    }
}
