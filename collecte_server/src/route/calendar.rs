use axum::{
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use collecte_core::{ical::generator::Emitter, ical_export, model::CollectionType, period};
use serde::Deserialize;

use crate::{
    error::ApiError,
    route::{month::resolve_year, AppState},
};

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    annee: Option<String>,
    exclure_jaune: Option<String>,
    exclure_gris: Option<String>,
}

impl QueryParams {
    /// The bins left out of the calendar.
    pub fn excluded(&self) -> Result<CollectionType, ApiError> {
        let mut excluded = CollectionType::none();
        if parse_flag(self.exclure_jaune.as_deref())? {
            excluded |= CollectionType::Yellow;
        }
        if parse_flag(self.exclure_gris.as_deref())? {
            excluded |= CollectionType::Grey;
        }
        Ok(excluded)
    }
}

/// A missing or empty flag is off.
fn parse_flag(input: Option<&str>) -> Result<bool, ApiError> {
    match input.map(str::trim) {
        None | Some("") | Some("false") | Some("0") | Some("non") => Ok(false),
        Some("true") | Some("1") | Some("oui") => Ok(true),
        Some(_) => Err(ApiError::validation(
            "Paramètre invalide",
            "Les options d'exclusion valent \"true\" ou \"false\"",
        )),
    }
}

/// Handle iCalendar requests.
///
/// One recurring event per bin covers the whole year; `exclure_jaune` and
/// `exclure_gris` leave a bin out.
pub async fn handler(
    State(state): State<AppState>,
    Query(query_params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let excluded = query_params.excluded()?;
    let year = resolve_year(query_params.annee.as_deref(), &state)?;
    let year_period = period::year_period(year).ok_or_else(ApiError::invalid_year)?;
    let events = state
        .service
        .collections_in_range(&year_period)
        .await
        .map_err(|err| state.lookup_error(err))?;
    let changed = (state.clock)().format("%Y%m%dT%H%M%SZ").to_string();
    let ical_calendar = ical_export::calendar(&events, excluded, &changed);
    let response = ([(CONTENT_TYPE, "text/calendar")], ical_calendar.generate()).into_response();
    Ok(response)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::route::{
        router,
        tests::{get_json, test_state},
    };

    fn query_params(exclure_jaune: Option<&str>, exclure_gris: Option<&str>) -> QueryParams {
        QueryParams {
            annee: None,
            exclure_jaune: exclure_jaune.map(String::from),
            exclure_gris: exclure_gris.map(String::from),
        }
    }

    #[test]
    fn test_excluded_bins() {
        assert_eq!(
            query_params(None, None).excluded().unwrap(),
            CollectionType::none()
        );
        assert_eq!(
            query_params(Some("true"), Some("false")).excluded().unwrap(),
            CollectionType::Yellow
        );
        assert_eq!(
            query_params(Some("1"), Some("oui")).excluded().unwrap(),
            CollectionType::Yellow | CollectionType::Grey
        );
        assert!(query_params(Some("peut-être"), None).excluded().is_err());
    }

    #[tokio::test]
    async fn test_invalid_exclusion_flag() {
        let (status, body) = get_json(
            router(test_state().await),
            "/calendrier.ics?annee=2026&exclure_jaune=peut-etre",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Paramètre invalide");
    }

    #[tokio::test]
    async fn test_ical_export() {
        let app = router(test_state().await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/calendrier.ics?annee=2026&exclure_gris=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/calendar");
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let ics = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(ics.contains("SUMMARY:Bac jaune"));
        assert!(!ics.contains("SUMMARY:Bac gris"));
        assert!(ics.contains("20260107"));
    }
}
