use std::sync::Arc;

use ferrobank_ledger::{Account, AccountId, Role};

/// Authenticated caller for a request (verified identity + role).
///
/// Inserted by the auth middleware after the token's subject has been
/// resolved to a live account; immutable and present on all protected
/// routes.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    account: Arc<Account>,
}

impl CurrentAccount {
    pub fn new(account: Account) -> Self {
        Self {
            account: Arc::new(account),
        }
    }

    pub fn id(&self) -> AccountId {
        self.account.id
    }

    pub fn role(&self) -> Role {
        self.account.role
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}
