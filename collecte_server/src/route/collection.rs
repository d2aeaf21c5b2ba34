use axum::{
    extract::{Path, Query, State},
    Json,
};
use collecte_core::model::{parse_date, CollectionEvent, CollectionType};
use serde::Deserialize;

use crate::{error::ApiError, route::AppState};

#[derive(Debug, Clone, Deserialize)]
pub struct NextQueryParams {
    #[serde(rename = "type")]
    bin: Option<String>,
}

/// Only single bins can be asked for.
pub fn parse_bin(input: &str) -> Result<CollectionType, ApiError> {
    match input {
        "jaune" => Ok(CollectionType::Yellow),
        "gris" => Ok(CollectionType::Grey),
        _ => Err(ApiError::invalid_type()),
    }
}

/// Handle requests for the collection on one date.
pub async fn by_date_handler(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<CollectionEvent>, ApiError> {
    let date = parse_date(&date).ok_or_else(ApiError::invalid_date)?;
    state
        .service
        .event_on_date(date)
        .await
        .map_err(|err| state.lookup_error(err))?
        .map(Json)
        .ok_or(ApiError::NotFound("Aucune collecte prévue à cette date"))
}

/// Handle requests for the next collection, optionally of one bin only.
pub async fn next_handler(
    State(state): State<AppState>,
    Query(query_params): Query<NextQueryParams>,
) -> Result<Json<CollectionEvent>, ApiError> {
    let filter = query_params
        .bin
        .as_deref()
        .filter(|bin| !bin.is_empty())
        .map(parse_bin)
        .transpose()?;
    state
        .service
        .next_collection(state.now(), filter)
        .await
        .map_err(|err| state.lookup_error(err))?
        .map(Json)
        .ok_or(ApiError::NotFound("Aucune collecte à venir"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use collecte_core::chrono::{TimeZone, Utc};

    use crate::route::{
        router,
        tests::{get_json, test_state},
    };

    #[tokio::test]
    async fn test_collection_by_date() {
        let (status, body) = get_json(router(test_state().await), "/collecte/2026-01-07").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["typeCollecte"], "jaune");
        assert_eq!(body["jour"], 7);

        let (status, body) =
            get_json(router(test_state().await), "/collecte/2026-08-15T06:00:00.000Z").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["typeCollecte"], "gris");
        assert_eq!(body["estFerie"], true);
    }

    #[tokio::test]
    async fn test_collection_by_date_not_found_or_invalid() {
        let (status, body) = get_json(router(test_state().await), "/collecte/2026-01-08").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Aucune collecte prévue à cette date");

        let (status, body) = get_json(router(test_state().await), "/collecte/demain").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Date invalide");
    }

    #[tokio::test]
    async fn test_next_collection() {
        // Friday 2026-10-16: grey on Saturday 17, yellow on Wednesday 21.
        let (status, body) = get_json(router(test_state().await), "/prochaine-collecte").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2026-10-17T12:00:00.000Z");

        let (status, body) =
            get_json(router(test_state().await), "/prochaine-collecte?type=jaune").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2026-10-21T12:00:00.000Z");
        assert_eq!(body["typeCollecte"], "jaune");

        let (status, body) =
            get_json(router(test_state().await), "/prochaine-collecte?type=gris").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["typeCollecte"], "gris");

        let (status, body) =
            get_json(router(test_state().await), "/prochaine-collecte?type=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2026-10-17T12:00:00.000Z");
    }

    #[tokio::test]
    async fn test_next_collection_invalid_type_or_none_left() {
        let (status, body) =
            get_json(router(test_state().await), "/prochaine-collecte?type=vert").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Type invalide");

        let mut state = test_state().await;
        state.clock = Arc::new(|| Utc.with_ymd_and_hms(2027, 1, 2, 8, 0, 0).unwrap());
        let (status, body) = get_json(router(state), "/prochaine-collecte").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Aucune collecte à venir");
    }
}
