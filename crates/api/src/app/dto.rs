use serde::Deserialize;

use ferrobank_ledger::{Account, Entry};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub to_account: String,
    pub amount: f64,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn entry_to_json(e: &Entry) -> serde_json::Value {
    serde_json::json!({
        "id": e.id,
        "type": e.kind.as_str(),
        "amount": e.amount.to_major(),
        "description": e.description,
        "created_at": e.created_at,
    })
}

/// Admin dump row for an account. Never includes the credential hash.
pub fn account_to_admin_json(a: &Account) -> serde_json::Value {
    serde_json::json!({
        "id": a.id,
        "name": a.name,
        "email": a.email,
        "accountNumber": a.account_number,
        "role": a.role,
    })
}

pub fn entry_to_admin_json(e: &Entry) -> serde_json::Value {
    serde_json::json!({
        "id": e.id,
        "type": e.kind.as_str(),
        "amount": e.amount.to_major(),
        "description": e.description,
        "created_at": e.created_at,
        "account_id": e.account_id,
    })
}
