use axum::{
    extract::{Path, State},
    Json,
};
use collecte_core::model::Holiday;

use crate::{
    error::ApiError,
    route::{parse_year, AppState},
};

/// Handle requests for the holidays of a year.
pub async fn handler(
    State(state): State<AppState>,
    Path(annee): Path<String>,
) -> Result<Json<Vec<Holiday>>, ApiError> {
    let year = parse_year(&annee)?;
    let holidays = state
        .service
        .holidays_for_year(year)
        .await
        .map_err(|err| state.lookup_error(err))?;
    Ok(Json(holidays))
}
