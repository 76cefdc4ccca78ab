use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// Default request body cap, sized for an embedded profile photo.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "profilemaker", about = "Publish a self-introduction page")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend to use for this deployment
    #[arg(long, value_enum)]
    pub storage: Option<StorageBackend>,
}

#[derive(Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per profile in the storage directory
    #[default]
    File,
    /// In-process key-value store laid out like browser local storage
    Local,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin used when composing shareable URLs, e.g. `https://me.example`.
    /// Falls back to the request's Host header.
    pub public_url: Option<String>,
    pub max_upload_bytes: usize,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            public_url: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(backend) = cli.storage {
            config.storage.backend = backend;
        }

        // Resolve paths relative to data dir
        match config.storage.path {
            None => config.storage.path = Some(data_dir.join("profiles")),
            Some(ref path) if path.is_relative() => {
                config.storage.path = Some(data_dir.join(path));
            }
            Some(_) => {}
        }

        if let Some(ref url) = config.server.public_url {
            config.server.public_url = Some(url.trim_end_matches('/').to_string());
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".profilemaker")
        })
    }

    /// Directory holding `<id>.json` files for the file backend.
    pub fn profiles_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("profiles"))
    }
}
