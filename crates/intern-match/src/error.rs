use crate::config::ConfigError;
use crate::matching::{ClientError, JobRequestError, RosterError, ViewError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Upstream(ClientError),
    View(ViewError),
    Job(JobRequestError),
    Roster(RosterError),
    UnknownJob(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Upstream(err) => write!(f, "{}", err),
            AppError::View(err) => write!(f, "{}", err),
            AppError::Job(err) => write!(f, "invalid job: {}", err),
            AppError::Roster(err) => write!(f, "{}", err),
            AppError::UnknownJob(key) => write!(f, "no preset job with key '{}'", key),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Upstream(err) => Some(err),
            AppError::View(err) => Some(err),
            AppError::Job(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::UnknownJob(_) => None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream(_) | AppError::View(ViewError::Malformed(_)) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::View(ViewError::NotLoaded | ViewError::StaleResponse { .. }) => {
                StatusCode::CONFLICT
            }
            AppError::View(ViewError::UnknownCandidate { .. }) | AppError::UnknownJob(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::View(ViewError::EmptySelection | ViewError::OverLimit { .. })
            | AppError::Job(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Roster(RosterError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Roster(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ClientError> for AppError {
    fn from(value: ClientError) -> Self {
        Self::Upstream(value)
    }
}

impl From<ViewError> for AppError {
    fn from(value: ViewError) -> Self {
        Self::View(value)
    }
}

impl From<crate::matching::RecordError> for AppError {
    fn from(value: crate::matching::RecordError) -> Self {
        Self::View(ViewError::Malformed(value))
    }
}

impl From<JobRequestError> for AppError {
    fn from(value: JobRequestError) -> Self {
        Self::Job(value)
    }
}

impl From<RosterError> for AppError {
    fn from(value: RosterError) -> Self {
        Self::Roster(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_are_unprocessable() {
        let err = AppError::from(ViewError::OverLimit {
            selected: 3,
            offers: 2,
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.to_string(),
            "only 2 candidates may be selected, 3 are selected"
        );
    }

    #[test]
    fn upstream_detail_is_kept_verbatim() {
        let err = AppError::from(ClientError::Api {
            status: 400,
            detail: "No candidate data loaded. Please upload a CSV first.".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err
            .to_string()
            .ends_with("No candidate data loaded. Please upload a CSV first."));
    }

    #[test]
    fn stale_response_conflicts() {
        let err = AppError::from(ViewError::StaleResponse {
            ticket: 1,
            latest: 2,
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
