//! Model archives.
//!
//! An archive is a directory holding `config.json` (extracted model
//! archive), or the `config.json` file itself.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::{Result, SrlError};

pub const CONFIG_NAME: &str = "config.json";

/// Model type an archive must declare.
pub const SRL_MODEL_TYPE: &str = "srl";

/// Task name handed to the predictor.
pub const SRL_TASK: &str = "semantic-role-labeling";

#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    config: Value,
}

impl Archive {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_path = if path.is_dir() {
            path.join(CONFIG_NAME)
        } else {
            path.to_path_buf()
        };
        if !config_path.is_file() {
            return Err(SrlError::MissingConfig(path.display().to_string()));
        }

        let config: Value = serde_json::from_str(&fs::read_to_string(&config_path)?)?;
        info!(archive = %path.display(), "loaded archive");
        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `model.type` from the archive configuration.
    pub fn model_type(&self) -> Option<&str> {
        self.config.get("model")?.get("type")?.as_str()
    }

    /// Fails unless the archive holds an SRL model.
    pub fn ensure_srl(&self) -> Result<()> {
        match self.model_type() {
            Some(SRL_MODEL_TYPE) => Ok(()),
            other => Err(SrlError::WrongModelType(
                other.unwrap_or("<missing>").to_string(),
            )),
        }
    }
}
