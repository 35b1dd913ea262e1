//! JSON prediction handler

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::{AppResult, AppState};
use crate::engine::{inference, Prediction};
use crate::models::StudentProfile;

/// POST /api/v1/predict
///
/// The bundle is loaded before the body is looked at, so an artifact failure
/// wins over a malformed request.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<StudentProfile>, JsonRejection>,
) -> AppResult<Json<Prediction>> {
    let bundle = state.bundles.get_async().await?;

    let Json(profile) = payload.map_err(|rejection| {
        tracing::warn!("Rejected prediction request: {}", rejection.body_text());
        rejection
    })?;
    profile.check()?;

    let prediction = inference::predict(&bundle, &profile, &state.stats)?;
    Ok(Json(prediction))
}
