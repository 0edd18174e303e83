use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{LoyaltyAccount, LoyaltyReward, LoyaltyTransaction, Redemption};

/// Positive points are earned, negative points are redeemed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PointsAdjustRequest {
    pub customer_id: Uuid,
    pub points: i64,
    pub description: Option<String>,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PointsUpdate {
    pub account: LoyaltyAccount,
    pub transaction: LoyaltyTransaction,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RedeemRequest {
    pub customer_id: Uuid,
    pub reward_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RedeemResponse {
    pub redemption: Redemption,
    pub account: LoyaltyAccount,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RewardList {
    pub items: Vec<LoyaltyReward>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoyaltyTransactionList {
    pub items: Vec<LoyaltyTransaction>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RedemptionList {
    pub items: Vec<Redemption>,
}
