pub mod calendar;
pub mod collection;
pub mod health;
pub mod holiday;
pub mod month;
pub mod week;

use std::sync::Arc;

use axum::{
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono_tz::Tz;
use collecte_core::{
    chrono::{DateTime, NaiveDateTime, Utc},
    service::{CollecteService, LookupError},
};

use crate::{config::Environment, error::ApiError, error::ErrorBody};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// What every handler shares.
#[derive(Clone)]
pub struct AppState {
    pub service: CollecteService,
    pub timezone: Tz,
    pub environment: Environment,
    pub default_year: Option<i32>,
    pub supported_years: Vec<i32>,
    pub clock: Clock,
}

impl AppState {
    /// The current wall-clock time in the configured time zone.
    pub fn now(&self) -> NaiveDateTime {
        (self.clock)().with_timezone(&self.timezone).naive_local()
    }

    pub fn lookup_error(&self, source: LookupError) -> ApiError {
        ApiError::Lookup {
            source,
            environment: self.environment,
        }
    }
}

/// Build the router; every route answers both at the root and under `/api`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/semaine", get(week::handler))
        .route("/calendrier/:mois", get(month::handler))
        .route("/calendrier.ics", get(calendar::handler))
        .route("/jours-feries/:annee", get(holiday::handler))
        .route("/collecte/:date", get(collection::by_date_handler))
        .route("/prochaine-collecte", get(collection::next_handler));
    Router::new()
        .route("/health", get(health::handler))
        .merge(api.clone())
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
}

/// Years accepted anywhere a request names one.
pub const YEARS: std::ops::RangeInclusive<i32> = 2000..=2100;

pub fn parse_year(input: &str) -> Result<i32, ApiError> {
    input
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|year| YEARS.contains(year))
        .ok_or_else(ApiError::invalid_year)
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: String::from("Not Found"),
            message: format!("Route {method} {uri} not found"),
            detail: None,
        }),
    )
}
