use axum::http::StatusCode;
use thiserror::Error;

/// Failure kinds surfaced by the service layer.
///
/// `NotFound` covers both "no such row" and "row owned by someone else";
/// a request against a foreign assembly is indistinguishable from one
/// against a missing id.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Translates a service error into the `(status, message)` tuple the
/// handlers return. Storage failures are logged here and reported as an
/// opaque 500; the transaction behind them has already rolled back.
pub fn http(err: ServiceError) -> (StatusCode, String) {
    match err {
        ServiceError::NotFound => (StatusCode::NOT_FOUND, "Not found".into()),
        ServiceError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        ServiceError::Storage(e) => {
            tracing::error!(error = %e, "storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let (status, _) = http(ServiceError::NotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_422_with_message() {
        let (status, msg) = http(ServiceError::validation("unknown component 7"));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(msg, "unknown component 7");
    }

    #[test]
    fn storage_maps_to_opaque_500() {
        let (status, msg) = http(ServiceError::Storage(sqlx::Error::PoolClosed));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Internal error");
    }
}
