//! The active-profile register.
//!
//! A single key persisted as a small JSON file next to the database. Every
//! user action resolves the active profile here once, then passes it down
//! explicitly; the stores themselves never consult the register.

use crate::error::CoreError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegisterFile {
    active_profile: Option<String>,
}

pub struct ActiveProfileRegister {
    path: PathBuf,
}

impl ActiveProfileRegister {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<RegisterFile> {
        if !self.path.exists() {
            return Ok(RegisterFile::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read profile register at {:?}", self.path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed profile register at {:?}", self.path))
    }

    fn save(&self, register: &RegisterFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(register)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write profile register at {:?}", self.path))
    }

    /// The currently selected profile, if any.
    pub fn get_active(&self) -> Result<Option<String>> {
        Ok(self.load()?.active_profile)
    }

    /// The currently selected profile, or the scoping error every
    /// profile-bound action reports when none is set.
    pub fn require_active(&self) -> Result<String> {
        self.get_active()?
            .ok_or_else(|| CoreError::NoActiveProfile.into())
    }

    pub fn set_active(&self, profile: &str) -> Result<()> {
        self.save(&RegisterFile {
            active_profile: Some(profile.to_string()),
        })?;
        info!("Active profile set to {}", profile);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.save(&RegisterFile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn register_round_trip() {
        let tmp = TempDir::new().unwrap();
        let register = ActiveProfileRegister::new(tmp.path().join("profile.json"));

        assert!(register.get_active().unwrap().is_none());
        assert!(register.require_active().is_err());

        register.set_active("alice").unwrap();
        assert_eq!(register.require_active().unwrap(), "alice");

        register.set_active("bob").unwrap();
        assert_eq!(register.get_active().unwrap().as_deref(), Some("bob"));

        register.clear().unwrap();
        assert!(register.get_active().unwrap().is_none());
    }

    #[test]
    fn register_survives_reopening() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("profile.json");
        ActiveProfileRegister::new(&path).set_active("alice").unwrap();

        let reopened = ActiveProfileRegister::new(&path);
        assert_eq!(reopened.require_active().unwrap(), "alice");
    }

    #[test]
    fn missing_profile_is_a_scoping_error() {
        let tmp = TempDir::new().unwrap();
        let register = ActiveProfileRegister::new(tmp.path().join("profile.json"));
        let err = register.require_active().unwrap_err();
        assert!(err.downcast_ref::<CoreError>().is_some());
    }
}
