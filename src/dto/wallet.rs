use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Wallet, WalletTransaction};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerQuery {
    pub customer_id: Uuid,
}

/// Positive amounts credit the wallet, negative amounts debit it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WalletAdjustRequest {
    pub customer_id: Uuid,
    pub amount: i64,
    pub description: Option<String>,
    pub related_order_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WalletUpdate {
    pub wallet: Wallet,
    pub transaction: WalletTransaction,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WalletTransactionList {
    pub items: Vec<WalletTransaction>,
}
