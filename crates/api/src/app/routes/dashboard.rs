//! Balance, deposit, and transfer (authenticated routes).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use ferrobank_ledger::Money;

use crate::app::{AppServices, dto, errors};
use crate::context::CurrentAccount;

pub fn router() -> Router {
    Router::new()
        .route("/balance", get(balance))
        .route("/deposit", post(deposit))
        .route("/transfer", post(transfer))
}

pub async fn balance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
) -> axum::response::Response {
    let balance = match services.store.balance_of(current.id()).await {
        Ok(b) => b,
        Err(e) => return errors::ledger_error_to_response(e),
    };
    let entries = match services.store.entries_for(current.id()).await {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "account_number": current.account().account_number,
            "balance": balance.to_major(),
            "transactions": entries.iter().map(dto::entry_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

pub async fn deposit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<dto::DepositRequest>,
) -> axum::response::Response {
    let amount = match Money::try_from_major(body.amount) {
        Ok(a) => a,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let new_balance = match services.store.deposit(current.id(), amount).await {
        Ok(b) => b,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "message": format!("Deposit of {amount} successful"),
            "new_balance": new_balance.to_major(),
        })),
    )
        .into_response()
}

pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Json(body): Json<dto::TransferRequest>,
) -> axum::response::Response {
    let amount = match Money::try_from_major(body.amount) {
        Ok(a) => a,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    // The raw destination goes through as-is; the store and `ops` decide
    // how a bad destination ranks among the possible failures.
    let new_balance = match services
        .store
        .transfer(current.id(), &body.to_account, amount)
        .await
    {
        Ok(b) => b,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "message": format!("Transferred {amount} to {}", body.to_account),
            "new_balance": new_balance.to_major(),
        })),
    )
        .into_response()
}
