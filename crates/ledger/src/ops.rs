//! Deposit and transfer planning.
//!
//! These functions perform the ordered validation of a ledger operation and
//! produce the entry drafts the store then commits atomically. Keeping the
//! rules here means every store implementation rejects the same inputs with
//! the same error, before any durable write.

use crate::{Account, AccountId, EntryDraft, EntryKind, LedgerError, Money};

/// Validate a deposit and produce its single entry draft.
pub fn deposit_draft(account_id: AccountId, amount: Money) -> Result<EntryDraft, LedgerError> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(EntryDraft {
        account_id,
        kind: EntryKind::Deposit,
        amount,
        description: format!("Deposited {amount}"),
    })
}

/// The linked debit/credit pair of a transfer. Committed all-or-nothing;
/// the two amounts always have equal magnitude and opposite sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDrafts {
    pub debit: EntryDraft,
    pub credit: EntryDraft,
}

/// Validate a transfer and produce its entry pair.
///
/// Checks run in a fixed order so callers can rely on which error they
/// observe when several conditions fail at once: amount validity, then
/// self-transfer, then balance sufficiency, then receiver existence. The
/// store resolves `receiver` up front and passes `None` when the raw
/// destination matched no account (including when it is not a well-formed
/// account number at all); the order of observed errors is decided here, not
/// by when the lookup ran.
///
/// `sender_balance` must be read under the same serialization boundary that
/// commits the drafts (row lock or equivalent), otherwise two concurrent
/// transfers can both pass the check against a stale balance.
pub fn transfer_drafts(
    sender: &Account,
    sender_balance: Money,
    receiver: Option<&Account>,
    to_account: &str,
    amount: Money,
) -> Result<TransferDrafts, LedgerError> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidAmount);
    }
    if to_account == sender.account_number.as_str() {
        return Err(LedgerError::SelfTransfer);
    }
    if sender_balance < amount {
        return Err(LedgerError::InsufficientFunds);
    }
    let receiver = receiver.ok_or(LedgerError::ReceiverNotFound)?;

    Ok(TransferDrafts {
        debit: EntryDraft {
            account_id: sender.id,
            kind: EntryKind::TransferOut,
            amount: -amount,
            description: format!("Transferred {amount} to {}", receiver.account_number),
        },
        credit: EntryDraft {
            account_id: receiver.id,
            kind: EntryKind::TransferIn,
            amount,
            description: format!("Received {amount} from {}", sender.account_number),
        },
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;

    use super::*;
    use crate::{AccountNumber, Role};

    fn test_account(id: i64, number: &str) -> Account {
        Account {
            id: AccountId(id),
            name: format!("account-{id}"),
            email: format!("account-{id}@example.com"),
            password_hash: "$2b$12$hash".to_string(),
            account_number: AccountNumber::parse(number).unwrap(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn deposit_rejects_non_positive_amounts() {
        let err = deposit_draft(AccountId(1), Money::ZERO).unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount);

        let err = deposit_draft(AccountId(1), Money::from_minor(-100)).unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount);
    }

    #[test]
    fn deposit_draft_credits_full_amount() {
        let draft = deposit_draft(AccountId(1), Money::from_minor(10_000)).unwrap();
        assert_eq!(draft.kind, EntryKind::Deposit);
        assert_eq!(draft.amount, Money::from_minor(10_000));
        assert_eq!(draft.description, "Deposited 100");
    }

    #[test]
    fn transfer_checks_amount_before_anything_else() {
        let sender = test_account(1, "1111111111");
        // Balance is zero and the receiver is unknown, but the non-positive
        // amount must be the error the caller observes.
        let err = transfer_drafts(
            &sender,
            Money::ZERO,
            None,
            "2222222222",
            Money::from_minor(-500),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount);
    }

    #[test]
    fn transfer_rejects_own_account_number() {
        let sender = test_account(1, "1111111111");
        let err = transfer_drafts(
            &sender,
            Money::from_minor(10_000),
            Some(&sender.clone()),
            sender.account_number.as_str(),
            Money::from_minor(100),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::SelfTransfer);
    }

    #[test]
    fn transfer_checks_balance_before_receiver_existence() {
        let sender = test_account(1, "1111111111");
        let err = transfer_drafts(
            &sender,
            Money::from_minor(50),
            None,
            "2222222222",
            Money::from_minor(100),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::InsufficientFunds);
    }

    #[test]
    fn malformed_destination_is_still_checked_after_balance() {
        let sender = test_account(1, "1111111111");
        // A destination that cannot be an account number resolves to no
        // receiver, but balance sufficiency is still reported first.
        let err = transfer_drafts(
            &sender,
            Money::from_minor(50),
            None,
            "not-a-number",
            Money::from_minor(100),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::InsufficientFunds);

        let err = transfer_drafts(
            &sender,
            Money::from_minor(10_000),
            None,
            "not-a-number",
            Money::from_minor(100),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::ReceiverNotFound);
    }

    #[test]
    fn transfer_reports_unknown_receiver_last() {
        let sender = test_account(1, "1111111111");
        let err = transfer_drafts(
            &sender,
            Money::from_minor(10_000),
            None,
            "2222222222",
            Money::from_minor(100),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::ReceiverNotFound);
    }

    #[test]
    fn transfer_drafts_debit_sender_and_credit_receiver() {
        let sender = test_account(1, "1111111111");
        let receiver = test_account(2, "2222222222");

        let drafts = transfer_drafts(
            &sender,
            Money::from_minor(10_000),
            Some(&receiver),
            receiver.account_number.as_str(),
            Money::from_minor(4_000),
        )
        .unwrap();

        assert_eq!(drafts.debit.account_id, sender.id);
        assert_eq!(drafts.debit.kind, EntryKind::TransferOut);
        assert_eq!(drafts.debit.amount, Money::from_minor(-4_000));
        assert_eq!(drafts.debit.description, "Transferred 40 to 2222222222");

        assert_eq!(drafts.credit.account_id, receiver.id);
        assert_eq!(drafts.credit.kind, EntryKind::TransferIn);
        assert_eq!(drafts.credit.amount, Money::from_minor(4_000));
        assert_eq!(drafts.credit.description, "Received 40 from 1111111111");
    }

    proptest! {
        /// Property: for any valid transfer, the debit/credit pair sums to
        /// zero and the exact amount moves from sender to receiver.
        #[test]
        fn transfer_pair_always_sums_to_zero(
            amount_minor in 1i64..1_000_000_000i64,
            headroom_minor in 0i64..1_000_000_000i64,
        ) {
            let sender = test_account(1, "1111111111");
            let receiver = test_account(2, "2222222222");
            let amount = Money::from_minor(amount_minor);
            let balance = Money::from_minor(amount_minor + headroom_minor);

            let drafts = transfer_drafts(
                &sender,
                balance,
                Some(&receiver),
                receiver.account_number.as_str(),
                amount,
            )
            .unwrap();

            prop_assert_eq!(
                Money::sum([drafts.debit.amount, drafts.credit.amount]),
                Money::ZERO
            );
            prop_assert_eq!(drafts.credit.amount, amount);
            prop_assert_eq!(drafts.debit.amount, -amount);
        }
    }
}
