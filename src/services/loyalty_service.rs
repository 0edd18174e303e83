use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    db::{Database, Repository},
    dto::loyalty::{
        LoyaltyTransactionList, PointsAdjustRequest, PointsUpdate, RedeemRequest, RedeemResponse,
        RedemptionList, RewardList,
    },
    error::{AppError, AppResult},
    models::{
        LoyaltyAccount, LoyaltyTier, LoyaltyTransaction, PointsKind, Redemption, RedemptionStatus,
    },
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const REDEMPTION_VALIDITY_DAYS: i64 = 30;
pub const MAX_POINTS: i64 = 1_000_000_000_000;

fn out_of_range() -> AppError {
    AppError::bad_request("Points out of range")
}

fn referral_code(customer_id: Uuid) -> String {
    let owner = customer_id.simple().to_string();
    let nonce = Uuid::new_v4().simple().to_string();
    format!("ALBAZ{}{}", &owner[owner.len() - 4..], &nonce[..5]).to_uppercase()
}

pub(crate) fn account_for(db: &Database, customer_id: Uuid) -> AppResult<LoyaltyAccount> {
    db.loyalty_accounts.get_or_insert_with(customer_id, || {
        let now = Utc::now();
        LoyaltyAccount {
            id: Uuid::new_v4(),
            customer_id,
            points: 0,
            total_points_earned: 0,
            total_points_redeemed: 0,
            tier: LoyaltyTier::Bronze,
            referral_code: referral_code(customer_id),
            referral_count: 0,
            created_at: now,
            updated_at: now,
        }
    })
}

/// Earn (positive) or spend (negative) points on an existing account.
///
/// Spending more than the balance fails and leaves the account untouched.
/// Tier follows lifetime earned points.
fn apply_points(
    db: &Database,
    customer_id: Uuid,
    points: i64,
    description: Option<String>,
    related_order_id: Option<Uuid>,
) -> AppResult<(LoyaltyAccount, LoyaltyTransaction)> {
    if points == 0 {
        return Err(AppError::bad_request("Points must not be zero"));
    }
    if points.unsigned_abs() > MAX_POINTS.unsigned_abs() {
        return Err(out_of_range());
    }

    let account = db
        .loyalty_accounts
        .update(&customer_id, |a| {
            if points < 0 && a.points < -points {
                return Err(AppError::InsufficientPoints {
                    available: a.points,
                    required: -points,
                });
            }
            let balance = a.points.checked_add(points).ok_or_else(out_of_range)?;
            let (earned, redeemed) = if points > 0 {
                (a.total_points_earned.checked_add(points).ok_or_else(out_of_range)?, a.total_points_redeemed)
            } else {
                (a.total_points_earned, a.total_points_redeemed.checked_sub(points).ok_or_else(out_of_range)?)
            };
            a.points = balance;
            a.total_points_earned = earned;
            a.total_points_redeemed = redeemed;
            a.tier = LoyaltyTier::for_points(earned);
            a.updated_at = Utc::now();
            Ok(a.clone())
        })?
        .ok_or_else(|| AppError::not_found("Loyalty account"))?;

    let transaction = db.loyalty_transactions.insert(LoyaltyTransaction {
        id: Uuid::new_v4(),
        loyalty_account_id: account.id,
        kind: if points > 0 {
            PointsKind::Earn
        } else {
            PointsKind::Redeem
        },
        points: points.abs(),
        description,
        related_order_id,
        created_at: account.updated_at,
    })?;

    tracing::info!(customer_id = %customer_id, points, balance = account.points, "loyalty points updated");
    Ok((account, transaction))
}

pub async fn get_account(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ApiResponse<LoyaltyAccount>> {
    let account = account_for(&state.db, customer_id)?;
    Ok(ApiResponse::success("Loyalty account", account, Some(Meta::empty())))
}

pub async fn adjust_points(
    state: &AppState,
    payload: PointsAdjustRequest,
) -> AppResult<ApiResponse<PointsUpdate>> {
    let (account, transaction) = apply_points(
        &state.db,
        payload.customer_id,
        payload.points,
        payload.description,
        payload.order_id,
    )?;
    Ok(ApiResponse::success(
        "Points updated",
        PointsUpdate { account, transaction },
        Some(Meta::empty()),
    ))
}

pub async fn list_rewards(state: &AppState) -> AppResult<ApiResponse<RewardList>> {
    let items = state.db.loyalty_rewards.filter(|r| r.active)?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Rewards", RewardList { items }, Some(meta)))
}

pub async fn redeem_reward(
    state: &AppState,
    payload: RedeemRequest,
) -> AppResult<ApiResponse<RedeemResponse>> {
    let reward = state
        .db
        .loyalty_rewards
        .get(&payload.reward_id)?
        .filter(|r| r.active)
        .ok_or_else(|| AppError::not_found("Reward"))?;
    if state.db.loyalty_accounts.get(&payload.customer_id)?.is_none() {
        return Err(AppError::not_found("Loyalty account"));
    }

    let (account, transaction) = apply_points(
        &state.db,
        payload.customer_id,
        -reward.points_cost,
        Some(format!("Redeemed {}", reward.name)),
        None,
    )?;

    let created_at = transaction.created_at;
    let redemption = state.db.redemptions.insert(Redemption {
        id: Uuid::new_v4(),
        customer_id: payload.customer_id,
        reward_id: reward.id,
        status: RedemptionStatus::Active,
        expires_at: created_at + Duration::days(REDEMPTION_VALIDITY_DAYS),
        created_at,
    })?;

    tracing::info!(customer_id = %payload.customer_id, reward_id = %reward.id, "reward redeemed");
    Ok(ApiResponse::success(
        "Reward redeemed",
        RedeemResponse { redemption, account },
        Some(Meta::empty()),
    ))
}

pub async fn list_transactions(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ApiResponse<LoyaltyTransactionList>> {
    let account = state
        .db
        .loyalty_accounts
        .get(&customer_id)?
        .ok_or_else(|| AppError::not_found("Loyalty account"))?;
    let items = state
        .db
        .loyalty_transactions
        .filter(|t| t.loyalty_account_id == account.id)?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Transactions",
        LoyaltyTransactionList { items },
        Some(meta),
    ))
}

/// Active redemptions past their expiry are reported as expired.
pub async fn list_redemptions(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ApiResponse<RedemptionList>> {
    let now = Utc::now();
    let items: Vec<Redemption> = state
        .db
        .redemptions
        .filter(|r| r.customer_id == customer_id)?
        .into_iter()
        .map(|mut r| {
            if r.status == RedemptionStatus::Active && r.expires_at <= now {
                r.status = RedemptionStatus::Expired;
            }
            r
        })
        .collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Redemptions", RedemptionList { items }, Some(meta)))
}
