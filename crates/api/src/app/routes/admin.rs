//! Admin table dumps.
//!
//! Guarded by the `admin` role from the verified JWT; there is no
//! header-based role shortcut.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::{AppServices, dto, errors};
use crate::context::CurrentAccount;

pub fn router() -> Router {
    Router::new()
        .route("/tables", get(list_tables))
        .route("/tables/:table_name", get(table_data))
}

fn require_admin(current: &CurrentAccount) -> Result<(), axum::response::Response> {
    if current.role().is_admin() {
        Ok(())
    } else {
        Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Admins only",
        ))
    }
}

pub async fn list_tables(
    Extension(current): Extension<CurrentAccount>,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&current) {
        return resp;
    }

    // Only the two domain tables are exposed.
    (
        StatusCode::OK,
        Json(serde_json::json!({ "tables": ["accounts", "transactions"] })),
    )
        .into_response()
}

pub async fn table_data(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentAccount>,
    Path(table_name): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&current) {
        return resp;
    }

    match table_name.as_str() {
        "accounts" => {
            let accounts = match services.store.list_accounts().await {
                Ok(v) => v,
                Err(e) => return errors::ledger_error_to_response(e),
            };
            let data: Vec<_> = accounts.iter().map(dto::account_to_admin_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "data": data }))).into_response()
        }
        "transactions" => {
            let entries = match services.store.list_entries().await {
                Ok(v) => v,
                Err(e) => return errors::ledger_error_to_response(e),
            };
            let data: Vec<_> = entries.iter().map(dto::entry_to_admin_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "data": data }))).into_response()
        }
        _ => errors::json_error(StatusCode::NOT_FOUND, "not_found", "Table not found"),
    }
}
