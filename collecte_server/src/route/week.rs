use axum::{extract::State, Json};
use collecte_core::{
    chrono::SecondsFormat,
    model::CollectionEvent,
    service::WeekSummary,
};
use serde::Serialize;

use crate::{error::ApiError, route::AppState};

#[derive(Debug, Serialize)]
pub struct WeekBounds {
    pub debut: String,
    pub fin: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekResponse {
    pub semaine: WeekBounds,
    pub collectes: Vec<CollectionEvent>,
    pub a_collecte_jaune: bool,
    pub a_collecte_grise: bool,
}

impl WeekResponse {
    fn new(summary: WeekSummary, state: &AppState) -> Self {
        let (start, end) = summary.period.localized(&state.timezone);
        WeekResponse {
            semaine: WeekBounds {
                debut: start.to_rfc3339_opts(SecondsFormat::Millis, false),
                fin: end.to_rfc3339_opts(SecondsFormat::Millis, false),
            },
            collectes: summary.events,
            a_collecte_jaune: summary.has_yellow,
            a_collecte_grise: summary.has_grey,
        }
    }
}

/// Handle requests for the collections of the current week.
pub async fn handler(State(state): State<AppState>) -> Result<Json<WeekResponse>, ApiError> {
    let summary = state
        .service
        .current_week_summary(state.now())
        .await
        .map_err(|err| state.lookup_error(err))?;
    Ok(Json(WeekResponse::new(summary, &state)))
}
