use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("Failed to run the transaction.")]
    TransactionError(#[source] sqlx::Error),
    #[error("An error occurred while processing the database query.")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    PasswordHashError(String),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error("Login failed.")]
    UnauthenticatedError,
    #[error("Authorization information is invalid.")]
    UnauthorizedError,
    #[error("This operation is not permitted.")]
    ForbiddenOperation,
    #[error("Too many requests, try again later.")]
    TooManyRequests,
    #[error("{0}")]
    ExternalServiceError(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    /// 本文・クエリ・パスを読み取れなかったリクエスト
    #[error("{1}")]
    MalformedRequest(StatusCode, String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnprocessableEntity(_) | AppError::ValidationError(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ConvertToUuidError(_) => StatusCode::BAD_REQUEST,
            AppError::UnauthenticatedError | AppError::UnauthorizedError => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::MalformedRequest(status, _) => *status,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::PasswordHashError(_)
            | AppError::ConversionEntityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// PostgreSQL のシリアライゼーション失敗 (SQLSTATE 40001) かどうか
    pub fn is_serialization_failure(&self) -> bool {
        match self {
            AppError::TransactionError(e) | AppError::SpecificOperationError(e) => e
                .as_database_error()
                .and_then(|db| db.code())
                .is_some_and(|code| code == "40001"),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // 内部エラーの詳細はログにのみ出し、レスポンスには含めない
        let message = if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
            match status_code {
                StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
                _ => self.to_string(),
            }
        } else {
            self.to_string()
        };

        (status_code, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// axum の抽出失敗も他のエラーと同じ JSON で返す
macro_rules! from_rejection {
    ($($rejection: ty),*) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    AppError::MalformedRequest(rejection.status(), rejection.body_text())
                }
            }
        )*
    };
}

from_rejection!(JsonRejection, QueryRejection, PathRejection);

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_client_statuses() {
        assert_eq!(
            AppError::Conflict("taken".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::EntityNotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::UnprocessableEntity("bad".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::ForbiddenOperation.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::TooManyRequests.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::UnauthorizedError.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn hides_internal_details_from_response() {
        let res = AppError::NoRowsAffectedError("secret table".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res = AppError::ServiceUnavailable("assistant is not configured".into()).into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn malformed_request_keeps_the_rejection_status() {
        let err = AppError::MalformedRequest(StatusCode::BAD_REQUEST, "Invalid URL".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid URL");

        let res = err.into_response();
        assert_eq!(
            res.headers().get(axum::http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn non_database_errors_are_not_serialization_failures() {
        assert!(!AppError::Conflict("x".into()).is_serialization_failure());
        assert!(!AppError::TransactionError(sqlx::Error::RowNotFound).is_serialization_failure());
    }
}
