use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use reelfetch_core::{LookupError, LookupInput};
use reelfetch_models::{MediaReference, MergedRecord};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

const GREETING: &str = "Hello, world.";

#[derive(Debug, Default, Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub input: Option<String>,
}

pub async fn greeting() -> &'static str {
    GREETING
}

/// `POST /imdb/` with a form field `input` holding a title URL or the legacy
/// multi-line payload. A post without `input` gets the greeting.
pub async fn lookup_form(State(state): State<AppState>, Form(form): Form<LookupForm>) -> Result<Response, ApiError> {
    let Some(raw) = form.input else {
        return Ok(GREETING.into_response());
    };
    info!(input = %raw, "Received lookup");

    let input = LookupInput::parse(&raw)?;
    let reference = input.reference()?;
    let record = state.lookup.process_reference(&reference, input.url()).await?;

    Ok(finish(&state, record, &reference).await?.into_response())
}

/// `GET /imdb/{id}` with the identifier embedded in the path.
pub async fn lookup_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<MergedRecord>, ApiError> {
    let reference =
        MediaReference::new(&id).ok_or_else(|| LookupError::malformed(format!("invalid identifier: {id:?}")))?;
    let record = state
        .lookup
        .process_reference(&reference, &reference.canonical_url())
        .await?;

    finish(&state, record, &reference).await
}

async fn finish(state: &AppState, record: MergedRecord, reference: &MediaReference) -> Result<Json<MergedRecord>, ApiError> {
    let outcome = state.recorder.record(&record, reference, state.record_options).await;
    info!(
        imdb_id = %reference,
        sheet = ?outcome.sheet,
        history = ?outcome.history,
        "Returning lookup result"
    );
    Ok(Json(record))
}
