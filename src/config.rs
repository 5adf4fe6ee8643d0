use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};

use crate::store::{CorruptPolicy, JsonFileStore, MemoryStore, TaskStore, Tracker};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_FILE: &str = "tasks.json";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// JSON document on disk
    #[default]
    File,
    /// Process memory, lost on exit
    Memory,
}

/// Settings for `tasktrack serve`.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "TASKTRACK_HOST", default_value = DEFAULT_HOST)]
    pub host: String,
    /// Port to listen on
    #[arg(long, short, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Path of the JSON task document
    #[arg(long, env = "TASKS_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,
    /// Storage backend
    #[arg(long, value_enum, default_value = "file")]
    pub store: StoreBackend,
    /// Behavior when the task document cannot be parsed
    #[arg(long, value_enum, default_value = "reset")]
    pub on_corrupt: CorruptPolicy,
    /// Disable permissive CORS headers
    #[arg(long = "no-cors", action = clap::ArgAction::SetFalse)]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            store: StoreBackend::default(),
            on_corrupt: CorruptPolicy::default(),
            cors: true,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn open_store(&self) -> Arc<dyn TaskStore> {
        match self.store {
            StoreBackend::File => Arc::new(JsonFileStore::new(&self.data_file)),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        }
    }

    pub fn tracker(&self) -> Tracker {
        Tracker::new(self.open_store()).with_policy(self.on_corrupt)
    }
}
