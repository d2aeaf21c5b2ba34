use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use collecte_core::service::LookupError;
use serde::Serialize;
use tracing::error;

use crate::config::Environment;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Everything a handler can answer besides success.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{error}: {message}")]
    Validation { error: &'static str, message: String },
    #[error("{0}")]
    NotFound(&'static str),
    #[error("lookup failed: {source}")]
    Lookup {
        source: LookupError,
        environment: Environment,
    },
}

impl ApiError {
    pub fn validation(error: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            error,
            message: message.into(),
        }
    }

    pub fn invalid_month() -> Self {
        Self::validation("Mois invalide", "Le mois doit être un nombre entre 1 et 12")
    }

    pub fn invalid_year() -> Self {
        Self::validation(
            "Année invalide",
            "L'année doit être un nombre entre 2000 et 2100",
        )
    }

    pub fn unsupported_year(supported: &[i32]) -> Self {
        let years = supported
            .iter()
            .map(i32::to_string)
            .collect::<Vec<String>>()
            .join(", ");
        Self::validation(
            "Année non supportée",
            format!(
                "Seules les données de {years} sont disponibles. Pour d'autres années, veuillez contacter la mairie."
            ),
        )
    }

    pub fn invalid_date() -> Self {
        Self::validation("Date invalide", "La date doit être au format ISO (AAAA-MM-JJ)")
    }

    pub fn invalid_type() -> Self {
        Self::validation("Type invalide", "Le type doit être \"jaune\" ou \"gris\"")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation { error, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: error.to_string(),
                    message,
                    detail: None,
                },
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: String::from("Introuvable"),
                    message: message.to_string(),
                    detail: None,
                },
            ),
            ApiError::Lookup {
                source,
                environment,
            } => {
                error!(error = %source, "calendar lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: String::from("Erreur serveur"),
                        message: String::from(
                            "Impossible de charger les informations. Veuillez réessayer plus tard.",
                        ),
                        detail: (environment == Environment::Development)
                            .then(|| source.to_string()),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
