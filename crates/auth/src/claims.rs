use serde::{Deserialize, Serialize};

use ferrobank_ledger::{AccountId, Role};

/// JWT claims carried by every authenticated request.
///
/// `sub` is the internal account id; the account number is deliberately not
/// part of the token (it is looked up fresh per request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: internal account id.
    pub sub: i64,

    /// Role granted at signup.
    pub role: Role,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiration (unix seconds).
    pub exp: i64,
}

impl Claims {
    pub fn account_id(&self) -> AccountId {
        AccountId(self.sub)
    }
}
