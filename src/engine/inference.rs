//! Inference - form values in, verdict out
//!
//! Pipeline: profile → fixed-order vector → scaler.transform → classifier.predict
//! → verdict. No randomness, no retry, no fallback model.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::features::FeatureVector;
use crate::models::{StudentProfile, Verdict};
use super::bundle::ModelBundle;
use super::classifier::Classifier;
use super::scaler::FeatureScaler;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("{stage} expected {expected} features, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{stage} produced a non-finite value at index {index}")]
    NonFinite { stage: &'static str, index: usize },

    #[error("model error: {0}")]
    Model(String),
}

/// Raw result of one pass through scaler and classifier
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub scaled: Vec<f64>,
    pub class: i64,
    pub verdict: Verdict,
}

/// Scale then classify; generic so any scaler/classifier pair can be driven
pub fn run_pipeline<S, C>(
    scaler: &S,
    classifier: &C,
    features: &FeatureVector,
) -> Result<PipelineOutput, InferenceError>
where
    S: FeatureScaler + ?Sized,
    C: Classifier + ?Sized,
{
    let input = features.as_slice();
    let scaled = scaler.transform(input)?;

    if scaled.len() != input.len() {
        return Err(InferenceError::DimensionMismatch {
            stage: "scaler output",
            expected: input.len(),
            actual: scaled.len(),
        });
    }
    if let Some(index) = scaled.iter().position(|v| !v.is_finite()) {
        return Err(InferenceError::NonFinite { stage: "scaler", index });
    }

    let class = classifier.predict(&scaled)?;

    Ok(PipelineOutput {
        scaled,
        class,
        verdict: Verdict::from_class(class),
    })
}

/// Prediction as returned by the JSON API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: Uuid,
    pub eligible: bool,
    /// Raw classifier output
    pub prediction: i64,
    pub label: String,
    pub verdict: Verdict,
    pub features: FeatureVector,
    pub scaled_features: Vec<f64>,
    pub inference_time_us: u64,
    pub predicted_at: DateTime<Utc>,
}

/// Run a profile through a loaded bundle and record latency
pub fn predict(
    bundle: &ModelBundle,
    profile: &StudentProfile,
    stats: &InferenceStats,
) -> Result<Prediction, InferenceError> {
    let start_time = Instant::now();

    let features = profile.to_features();
    let output = run_pipeline(&bundle.scaler, &bundle.model, &features)?;

    let inference_time_us = start_time.elapsed().as_micros() as u64;
    stats.record(inference_time_us);

    tracing::info!(
        prediction = output.class,
        verdict = ?output.verdict,
        model = bundle.metadata.model_kind.as_str(),
        inference_time_us,
        "Prediction served"
    );
    tracing::debug!(features = %features.to_log_entry(), "Prediction input");

    Ok(Prediction {
        id: Uuid::new_v4(),
        eligible: output.verdict.is_eligible(),
        prediction: output.class,
        label: output.verdict.label().to_string(),
        verdict: output.verdict,
        features,
        scaled_features: output.scaled,
        inference_time_us,
        predicted_at: Utc::now(),
    })
}

// ============================================================================
// STATS
// ============================================================================

/// Latency stats shared across requests
#[derive(Debug, Default)]
pub struct InferenceStats {
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

/// Engine status for the model info endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

impl InferenceStats {
    pub fn record(&self, latency_us: u64) {
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            inference_count: count,
            avg_latency_ms: avg,
        }
    }
}
