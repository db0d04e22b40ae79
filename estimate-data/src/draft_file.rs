//! TOML draft files.
//!
//! A draft file holds an optional `[config]` table and the `[estimate]`
//! being edited:
//!
//! ```toml
//! [config]
//! tax_rate = 0.10
//!
//! [estimate]
//! project_id = 12
//! title = "Street lights"
//!
//! [[estimate.sections]]
//! section_order = 1
//! section_type = "MATERIAL"
//!
//! [[estimate.sections.lines]]
//! line_order = 1
//! name = "Cable"
//! unit = "EA"
//! qty = 10
//! unit_price = 100
//! ```

use std::fs;
use std::path::Path;

use estimate_core::{EstimateCalculator, EstimateConfig, EstimateConfigError, EstimateDraft};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftFileError {
    #[error("cannot read draft file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid draft file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] EstimateConfigError),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DraftFile {
    #[serde(default)]
    pub config: EstimateConfig,
    #[serde(default)]
    pub estimate: EstimateDraft,
}

impl DraftFile {
    pub fn parse(contents: &str) -> Result<Self, DraftFileError> {
        let file: DraftFile = toml::from_str(contents)?;
        file.config.validate()?;
        Ok(file)
    }

    pub fn read(path: &Path) -> Result<Self, DraftFileError> {
        let contents = fs::read_to_string(path).map_err(|source| DraftFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Calculator for this file's configuration.
    pub fn calculator(&self) -> Result<EstimateCalculator, DraftFileError> {
        Ok(EstimateCalculator::new(self.config.clone())?)
    }
}
