//! Page handlers - the form and its verdict

use std::collections::HashMap;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};

use crate::{AppError, AppState};
use crate::engine::inference;
use crate::models::StudentProfile;
use crate::views::{self, Banner};

/// Halted page for an artifact failure
fn fatal(state: &AppState, err: AppError) -> Response {
    tracing::error!("Page halted: {}", err);
    let html = views::render_fatal_page(state.background.as_deref(), &err.to_string());
    (err.status(), Html(html)).into_response()
}

fn form(state: &AppState, status: StatusCode, profile: &StudentProfile, banner: Option<Banner>) -> Response {
    let html = views::render_form_page(state.background.as_deref(), profile, banner.as_ref());
    (status, Html(html)).into_response()
}

/// GET / - form at its defaults
pub async fn show(State(state): State<AppState>) -> Response {
    if let Err(e) = state.bundles.get_async().await {
        return fatal(&state, e.into());
    }

    form(&state, StatusCode::OK, &StudentProfile::default(), None)
}

/// POST / - predict from the submitted form
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    let bundle = match state.bundles.get_async().await {
        Ok(bundle) => bundle,
        Err(e) => return fatal(&state, e.into()),
    };

    let fields = match payload {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            tracing::warn!("Rejected form submission: {}", rejection.body_text());
            let banner = Banner::Error(format!(
                "Invalid input: {}. The form was reset to its defaults.",
                rejection.body_text()
            ));
            return form(&state, StatusCode::BAD_REQUEST, &StudentProfile::default(), Some(banner));
        }
    };

    let (profile, errors) = StudentProfile::from_form_fields(&fields);
    if !errors.is_empty() {
        let err = AppError::from(errors);
        tracing::warn!("Rejected form submission: {}", err);
        return form(&state, err.status(), &profile, Some(Banner::Error(err.to_string())));
    }

    if let Err(errors) = profile.check() {
        let err = AppError::from(errors);
        tracing::warn!("Rejected form submission: {}", err);
        return form(&state, err.status(), &profile, Some(Banner::Error(err.to_string())));
    }

    match inference::predict(&bundle, &profile, &state.stats) {
        Ok(prediction) => form(&state, StatusCode::OK, &profile, Some(Banner::Verdict(prediction.verdict))),
        Err(e) => {
            let err = AppError::from(e);
            tracing::error!("{}", err);
            form(&state, err.status(), &profile, Some(Banner::Error(err.to_string())))
        }
    }
}
