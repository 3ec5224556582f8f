use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Root directory of the backing store.
    pub storage_dir: String,
    /// Container (filesystem) name beneath the storage root that holds
    /// the dataset directories.
    pub filesystem: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Dataset ingress gateway")]
pub struct Args {
    /// Host to bind to (overrides INGRESS_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides INGRESS_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Backing store root directory (overrides INGRESS_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Container name holding the dataset directories (overrides INGRESS_FILESYSTEM)
    #[arg(long)]
    pub filesystem: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();

        let env_host = env::var("INGRESS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("INGRESS_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing INGRESS_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading INGRESS_PORT"),
        };
        let env_storage = env::var("INGRESS_STORAGE_DIR").unwrap_or_else(|_| "./data".into());
        let env_filesystem = env::var("INGRESS_FILESYSTEM").unwrap_or_else(|_| "datasets".into());

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            filesystem: args.filesystem.unwrap_or(env_filesystem),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
