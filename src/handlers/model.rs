//! Model info handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppResult, AppState};
use crate::engine::encoder::Encoder;
use crate::engine::{BundleMetadata, EngineStatus};
use crate::features::LayoutInfo;

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub bundle: BundleMetadata,
    /// Loaded for completeness; the form binarizes YES/NO without it
    pub encoder: Encoder,
    pub layout: LayoutInfo,
    pub engine: EngineStatus,
}

/// GET /api/v1/model
pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    let bundle = state.bundles.get_async().await?;

    Ok(Json(ModelInfo {
        bundle: bundle.metadata.clone(),
        encoder: bundle.encoder.clone(),
        layout: LayoutInfo::current(),
        engine: state.stats.status(),
    }))
}
