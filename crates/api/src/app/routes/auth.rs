//! Signup and login (public routes).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use ferrobank_ledger::{LedgerError, NewAccount, Role};

use crate::app::{AppServices, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SignupRequest>,
) -> axum::response::Response {
    let password_hash = match ferrobank_auth::hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "auth_error",
                "could not process credentials",
            );
        }
    };

    // Admin is granted only through the configured allow-list; everyone else
    // signs up as a regular user.
    let role = if services.config.is_admin_email(&body.email) {
        Role::Admin
    } else {
        Role::User
    };

    let account = match services
        .store
        .create_account(NewAccount {
            name: body.name,
            email: body.email,
            password_hash,
            role,
        })
        .await
    {
        Ok(a) => a,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let token = match services.signer.issue(account.id, account.role) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "token issuing failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "auth_error",
                "could not issue token",
            );
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "accountNumber": account.account_number,
            "email": account.email,
            "role": account.role,
        })),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let account = match services.store.find_by_email(&body.email).await {
        Ok(Some(a)) => a,
        // Unknown email and wrong password are indistinguishable on purpose.
        Ok(None) => return errors::ledger_error_to_response(LedgerError::InvalidCredentials),
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match ferrobank_auth::verify_password(&body.password, &account.password_hash) {
        Ok(true) => {}
        Ok(false) => return errors::ledger_error_to_response(LedgerError::InvalidCredentials),
        Err(e) => {
            tracing::error!(error = %e, "password verification failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "auth_error",
                "could not verify credentials",
            );
        }
    }

    let token = match services.signer.issue(account.id, account.role) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "token issuing failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "auth_error",
                "could not issue token",
            );
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "accountNumber": account.account_number,
            "email": account.email,
            "role": account.role,
            "message": "Login successful",
        })),
    )
        .into_response()
}
