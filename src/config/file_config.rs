use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub data_dir: Option<String>,
    pub db_file: Option<String>,
    pub register_file: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_dir = \"/tmp/ratings\"").unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.data_dir.as_deref(), Some("/tmp/ratings"));
        assert!(config.db_file.is_none());
    }

    #[test]
    fn rejects_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_dir = [not toml").unwrap();
        assert!(FileConfig::load(file.path()).is_err());
    }
}
