use axum::{
    extract::{Path, Query, State},
    Json,
};
use collecte_core::{
    chrono::{Datelike, Month},
    model::{CollectionEvent, Holiday},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    route::{parse_year, AppState},
};

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    annee: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthResponse {
    pub annee: i32,
    pub mois: u32,
    pub collectes: Vec<CollectionEvent>,
    pub jours_feries: Vec<Holiday>,
}

pub fn parse_month(input: &str) -> Result<Month, ApiError> {
    input
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .ok_or_else(ApiError::invalid_month)
}

/// The requested year, else the configured default, else the current year.
pub fn resolve_year(annee: Option<&str>, state: &AppState) -> Result<i32, ApiError> {
    let year = match annee {
        Some(annee) => parse_year(annee)?,
        None => state.default_year.unwrap_or_else(|| state.now().year()),
    };
    if !state.supported_years.is_empty() && !state.supported_years.contains(&year) {
        return Err(ApiError::unsupported_year(&state.supported_years));
    }
    Ok(year)
}

/// Handle requests for the collections of one month.
///
/// The holidays of the whole year come along with the month's collections.
pub async fn handler(
    State(state): State<AppState>,
    Path(mois): Path<String>,
    Query(query_params): Query<QueryParams>,
) -> Result<Json<MonthResponse>, ApiError> {
    let month = parse_month(&mois)?;
    let year = resolve_year(query_params.annee.as_deref(), &state)?;
    let summary = state
        .service
        .month_summary(year, month)
        .await
        .map_err(|err| state.lookup_error(err))?;
    Ok(Json(MonthResponse {
        annee: summary.year,
        mois: summary.month.number_from_month(),
        collectes: summary.events,
        jours_feries: summary.holidays,
    }))
}
