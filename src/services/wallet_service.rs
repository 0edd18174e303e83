use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{Database, Repository},
    dto::wallet::{WalletAdjustRequest, WalletTransactionList, WalletUpdate},
    error::{AppError, AppResult},
    models::{TransactionKind, Wallet, WalletTransaction},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Largest single credit or debit, in minor units.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

fn out_of_range() -> AppError {
    AppError::bad_request("Amount out of range")
}

fn empty_wallet(customer_id: Uuid) -> Wallet {
    let now = Utc::now();
    Wallet {
        id: Uuid::new_v4(),
        customer_id,
        balance: 0,
        total_spent: 0,
        total_earned: 0,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn wallet_for(db: &Database, customer_id: Uuid) -> AppResult<Wallet> {
    db.wallets
        .get_or_insert_with(customer_id, || empty_wallet(customer_id))
}

/// Move `amount` in (positive) or out (negative) of a customer's wallet.
///
/// A debit larger than the balance fails and leaves the wallet untouched.
pub(crate) fn apply_amount(
    db: &Database,
    customer_id: Uuid,
    amount: i64,
    description: &str,
    related_order_id: Option<Uuid>,
) -> AppResult<(Wallet, WalletTransaction)> {
    if amount == 0 {
        return Err(AppError::bad_request("Amount must not be zero"));
    }
    if amount.unsigned_abs() > MAX_AMOUNT.unsigned_abs() {
        return Err(out_of_range());
    }
    wallet_for(db, customer_id)?;

    let wallet = db
        .wallets
        .update(&customer_id, |w| {
            if amount < 0 && w.balance < -amount {
                return Err(AppError::InsufficientBalance {
                    available: w.balance,
                    required: -amount,
                });
            }
            // Nothing is written until every sum fits.
            let balance = w.balance.checked_add(amount).ok_or_else(out_of_range)?;
            let (earned, spent) = if amount > 0 {
                (w.total_earned.checked_add(amount).ok_or_else(out_of_range)?, w.total_spent)
            } else {
                (w.total_earned, w.total_spent.checked_sub(amount).ok_or_else(out_of_range)?)
            };
            w.balance = balance;
            w.total_earned = earned;
            w.total_spent = spent;
            w.updated_at = Utc::now();
            Ok(w.clone())
        })?
        .ok_or_else(|| AppError::not_found("Wallet"))?;

    let transaction = db.wallet_transactions.insert(WalletTransaction {
        id: Uuid::new_v4(),
        wallet_id: wallet.id,
        kind: if amount > 0 {
            TransactionKind::Credit
        } else {
            TransactionKind::Debit
        },
        amount: amount.abs(),
        description: description.to_string(),
        related_order_id,
        created_at: wallet.updated_at,
    })?;

    tracing::info!(customer_id = %customer_id, amount, balance = wallet.balance, "wallet updated");
    Ok((wallet, transaction))
}

pub async fn get_wallet(state: &AppState, customer_id: Uuid) -> AppResult<ApiResponse<Wallet>> {
    let wallet = wallet_for(&state.db, customer_id)?;
    Ok(ApiResponse::success("Wallet", wallet, Some(Meta::empty())))
}

pub async fn adjust_wallet(
    state: &AppState,
    payload: WalletAdjustRequest,
) -> AppResult<ApiResponse<WalletUpdate>> {
    let description = payload
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "Wallet transaction".to_string());
    let (wallet, transaction) = apply_amount(
        &state.db,
        payload.customer_id,
        payload.amount,
        &description,
        payload.related_order_id,
    )?;
    Ok(ApiResponse::success(
        "Wallet updated",
        WalletUpdate { wallet, transaction },
        Some(Meta::empty()),
    ))
}

pub async fn list_transactions(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ApiResponse<WalletTransactionList>> {
    let items = match state.db.wallets.get(&customer_id)? {
        Some(wallet) => state
            .db
            .wallet_transactions
            .filter(|t| t.wallet_id == wallet.id)?,
        None => Vec::new(),
    };
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Transactions",
        WalletTransactionList { items },
        Some(meta),
    ))
}
