mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the database and the profile register.
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub register_path: PathBuf,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("data_dir must be specified via --data-dir or in config file")
            })?;

        if data_dir.exists() && !data_dir.is_dir() {
            bail!("data_dir is not a directory: {:?}", data_dir);
        }
        std::fs::create_dir_all(&data_dir)?;

        let db_file = file.db_file.unwrap_or_else(|| "ratings.db".to_string());
        let register_file = file
            .register_file
            .unwrap_or_else(|| "active_profile.json".to_string());

        Ok(Self {
            db_path: data_dir.join(db_file),
            register_path: data_dir.join(register_file),
            data_dir,
        })
    }
}
