//! Configuration slot kept between dialog requests
//!
//! A caller either resumes the stored configuration or starts fresh.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::types::ImportConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSession {
    config: Option<ImportConfig>,
}

impl ImportSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration to edit: the stored one when `resume` is set and one
    /// exists, otherwise a fresh default that replaces whatever was stored.
    pub fn config_for(&mut self, resume: bool) -> &mut ImportConfig {
        if !resume {
            self.config = None;
        }
        self.config.get_or_insert_with(ImportConfig::default)
    }

    pub fn store(&mut self, config: ImportConfig) {
        self.config = Some(config);
    }

    #[must_use]
    pub fn config(&self) -> Option<&ImportConfig> {
        self.config.as_ref()
    }

    pub fn clear(&mut self) {
        self.config = None;
    }

    /// Persist the session as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize import session")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write import session to {}", path.display()))?;
        Ok(())
    }

    /// Load a session saved by [`ImportSession::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read import session from {}", path.display()))?;
        serde_json::from_str(&json).context("Failed to parse import session")
    }
}
