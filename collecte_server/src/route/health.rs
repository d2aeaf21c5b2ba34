use axum::{extract::State, Json};
use collecte_core::chrono::SecondsFormat;
use serde::Serialize;

use crate::route::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    pub environment: String,
}

pub async fn handler(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        timestamp: (state.clock)().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: state.environment.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::route::{
        router,
        tests::{get_json, test_state},
    };

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(router(test_state().await), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["timestamp"], "2026-10-16T08:00:00.000Z");
        assert_eq!(body["environment"], "development");
    }
}
