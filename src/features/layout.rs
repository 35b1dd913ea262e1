//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the order of the model input vector.**
//!
//! The scaler and classifier inside the bundle were fitted on columns in a
//! specific order. Nothing in the bundle enforces it unless the producer
//! records `feature_names`, so the order below is the contract.
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Academics & experience (0-4) ===
    "cgpa",                  // 0: Cumulative GPA, 0.0 - 10.0
    "internships",           // 1: Internships completed, 0 - 10
    "projects",              // 2: Projects completed, 0 - 10
    "certifications",        // 3: Certifications earned, 0 - 10
    "aptitude_score",        // 4: Aptitude test score, 0 - 100

    // === Skills & activities (5-7) ===
    "skill_rating",          // 5: Soft skill rating, 0.0 - 10.0
    "extra_curricular",      // 6: YES → 1, NO → 0
    "placement_training",    // 7: YES → 1, NO → 0

    // === School marks (8-9) ===
    "ssc_marks",             // 8: Secondary school certificate, 0 - 100
    "hsc_marks",             // 9: Higher secondary certificate, 0 - 100
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 10;

// ============================================================================
// LAYOUT HASH
// ============================================================================

fn hash_names<'a>(names: impl IntoIterator<Item = &'a str>) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// CRC32 of the version byte and all feature names in order
pub fn layout_hash() -> u32 {
    hash_names(FEATURE_LAYOUT.iter().copied())
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout information for the model info endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Bundle was fitted on a different column order
#[derive(Debug, Clone, Error)]
#[error(
    "feature layout mismatch: expected {expected:?} (hash: {expected_hash:08x}), \
     bundle declares {actual:?} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected: Vec<String>,
    pub expected_hash: u32,
    pub actual: Vec<String>,
    pub actual_hash: u32,
}

/// Validate the column names a bundle declares it was fitted on
pub fn validate_feature_names(declared: &[String]) -> Result<(), LayoutMismatchError> {
    let actual_hash = hash_names(declared.iter().map(String::as_str));
    let expected_hash = layout_hash();

    if actual_hash != expected_hash || declared.len() != FEATURE_COUNT {
        return Err(LayoutMismatchError {
            expected: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            expected_hash,
            actual: declared.to_vec(),
            actual_hash,
        });
    }

    Ok(())
}
