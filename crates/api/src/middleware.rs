use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use ferrobank_auth::TokenSigner;
use ferrobank_infra::LedgerStore;

use crate::context::CurrentAccount;

#[derive(Clone)]
pub struct AuthState {
    pub signer: Arc<TokenSigner>,
    pub store: Arc<dyn LedgerStore>,
}

/// Bearer-token guard for all protected routes.
///
/// Verifies signature and expiry, then resolves the token's subject to a
/// live account; a token whose account no longer resolves is just as
/// unauthorized as a bad signature.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .signer
        .verify(token)
        .map_err(|_e| StatusCode::UNAUTHORIZED)?;

    let account = state
        .store
        .find_by_id(claims.account_id())
        .await
        .map_err(|_e| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(CurrentAccount::new(account));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
