//! Model bundle - classifier, encoder and scaler shipped as one JSON artifact

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::features::layout::{self, FEATURE_COUNT};
use crate::models::Choice;
use super::classifier::Model;
use super::encoder::Encoder;
use super::scaler::Scaler;

/// Highest bundle format this build understands
pub const BUNDLE_FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    1
}

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("model file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bundle: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported bundle format version {found} (max {})", BUNDLE_FORMAT_VERSION)]
    UnsupportedVersion { found: u32 },

    #[error("incompatible bundle: {0}")]
    Incompatible(String),
}

impl BundleError {
    pub fn is_missing(&self) -> bool {
        matches!(self, BundleError::NotFound { .. })
    }
}

/// On-disk layout of the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleFile {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    /// Column order the objects were fitted on, when the producer recorded it
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub model: Model,
    pub encoder: Encoder,
    pub scaler: Scaler,
}

/// Facts about the loaded artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub path: String,
    pub sha256: String,
    pub size_bytes: usize,
    pub format_version: u32,
    pub model_kind: String,
    pub scaler_kind: String,
    pub encoder_kind: String,
    pub encoder_classes: Vec<String>,
    /// Whether the encoder maps YES/NO to the same 1/0 the form uses
    pub encoder_matches_binarization: bool,
    pub layout_declared: bool,
    pub loaded_at: DateTime<Utc>,
}

/// Loaded, validated, immutable bundle
#[derive(Debug)]
pub struct ModelBundle {
    pub model: Model,
    pub encoder: Encoder,
    pub scaler: Scaler,
    pub metadata: BundleMetadata,
}

impl ModelBundle {
    /// Parse and validate raw artifact bytes
    pub fn from_bytes(bytes: &[u8], source: &Path) -> Result<Self, BundleError> {
        let file: BundleFile = serde_json::from_slice(bytes)?;

        if file.format_version > BUNDLE_FORMAT_VERSION {
            return Err(BundleError::UnsupportedVersion { found: file.format_version });
        }

        if let Some(names) = &file.feature_names {
            layout::validate_feature_names(names)
                .map_err(|e| BundleError::Incompatible(e.to_string()))?;
        }

        file.scaler
            .check_dimensions(FEATURE_COUNT)
            .map_err(BundleError::Incompatible)?;
        file.model
            .check_dimensions(FEATURE_COUNT)
            .map_err(BundleError::Incompatible)?;
        file.encoder.check().map_err(BundleError::Incompatible)?;

        let encoder_matches_binarization = Choice::ALL
            .iter()
            .all(|c| file.encoder.encode(c.as_str()) == Some(c.as_flag() as usize));

        let metadata = BundleMetadata {
            path: source.display().to_string(),
            sha256: hex::encode(Sha256::digest(bytes)),
            size_bytes: bytes.len(),
            format_version: file.format_version,
            model_kind: file.model.kind().to_string(),
            scaler_kind: file.scaler.kind().to_string(),
            encoder_kind: file.encoder.kind().to_string(),
            encoder_classes: file.encoder.classes().to_vec(),
            encoder_matches_binarization,
            layout_declared: file.feature_names.is_some(),
            loaded_at: Utc::now(),
        };

        Ok(Self {
            model: file.model,
            encoder: file.encoder,
            scaler: file.scaler,
            metadata,
        })
    }
}
