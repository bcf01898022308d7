use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ferrobank_ledger::LedgerError;

/// Map a domain error to a machine-distinguishable JSON response.
///
/// Consumers branch on the `error` code, not the message.
pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::InvalidAmount => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_amount",
            "Amount must be greater than 0",
        ),
        LedgerError::InsufficientFunds => json_error(
            StatusCode::BAD_REQUEST,
            "insufficient_funds",
            "Insufficient funds",
        ),
        LedgerError::ReceiverNotFound => json_error(
            StatusCode::NOT_FOUND,
            "receiver_not_found",
            "Receiver not found",
        ),
        LedgerError::SelfTransfer => json_error(
            StatusCode::BAD_REQUEST,
            "self_transfer",
            "Cannot transfer to your own account",
        ),
        LedgerError::DuplicateEmail => json_error(
            StatusCode::BAD_REQUEST,
            "duplicate_email",
            "Email already registered",
        ),
        LedgerError::InvalidCredentials => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_credentials",
            "Invalid credentials",
        ),
        // A stale token subject: treated like any other failed authentication.
        LedgerError::AccountNotFound => {
            json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized")
        }
        LedgerError::Storage(msg) => {
            tracing::error!(error = %msg, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "internal storage error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
