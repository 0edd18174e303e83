mod common;

use chrono::Duration;
use common::{add_shop, add_user, place_order, test_state};
use delivery_marketplace_api::{
    db::Repository,
    dto::{
        loyalty::{PointsAdjustRequest, RedeemRequest},
        payments::{CreatePaymentRequest, CreateRefundRequest},
        wallet::WalletAdjustRequest,
    },
    error::AppError,
    models::{
        LoyaltyReward, LoyaltyTier, PaymentMethod, PaymentStatus, RedemptionStatus, RewardType,
        TransactionKind, UserRole,
    },
    services::{loyalty_service, payment_service, wallet_service},
    state::AppState,
};
use uuid::Uuid;

async fn top_up(state: &AppState, customer_id: Uuid, amount: i64) -> anyhow::Result<()> {
    wallet_service::adjust_wallet(
        state,
        WalletAdjustRequest {
            customer_id,
            amount,
            description: None,
            related_order_id: None,
        },
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn overdraft_fails_and_keeps_the_balance() -> anyhow::Result<()> {
    let state = test_state();
    let customer = Uuid::new_v4();
    top_up(&state, customer, 500).await?;

    let err = wallet_service::adjust_wallet(
        &state,
        WalletAdjustRequest {
            customer_id: customer,
            amount: -800,
            description: Some("too much".into()),
            related_order_id: None,
        },
    )
    .await
    .expect_err("insufficient balance");
    assert!(matches!(
        err,
        AppError::InsufficientBalance {
            available: 500,
            required: 800
        }
    ));

    let wallet = wallet_service::get_wallet(&state, customer).await?.data.expect("wallet");
    assert_eq!(wallet.balance, 500);
    assert_eq!(wallet.total_spent, 0);

    let history = wallet_service::list_transactions(&state, customer)
        .await?
        .data
        .expect("history");
    assert_eq!(history.items.len(), 1);
    assert_eq!(history.items[0].kind, TransactionKind::Credit);
    Ok(())
}

#[tokio::test]
async fn wallet_payment_debits_and_refunds_are_capped() -> anyhow::Result<()> {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "meriem@example.com");
    let shop = add_shop(&state, "bakery@example.com");
    let order = place_order(&state, &customer, &shop, 1).await;
    top_up(&state, customer.id, 5000).await?;

    let payment = payment_service::create_payment(
        &state,
        CreatePaymentRequest {
            order_id: order.id,
            customer_id: customer.id,
            amount: None,
            method: PaymentMethod::Wallet,
            transaction_id: None,
        },
    )
    .await?
    .data
    .expect("payment");
    assert_eq!(payment.amount, order.total);
    assert_eq!(payment.status, PaymentStatus::Completed);

    let wallet = state.db.wallets.get(&customer.id)?.expect("wallet");
    assert_eq!(wallet.balance, 5000 - order.total);
    assert_eq!(wallet.total_spent, order.total);

    payment_service::create_refund(
        &state,
        CreateRefundRequest {
            payment_id: payment.id,
            amount: order.total - 100,
            reason: "cold food".into(),
        },
    )
    .await?;
    let err = payment_service::create_refund(
        &state,
        CreateRefundRequest {
            payment_id: payment.id,
            amount: 200,
            reason: "still cold".into(),
        },
    )
    .await
    .expect_err("over-refund");
    assert_eq!(err.status().as_u16(), 400);
    Ok(())
}

#[tokio::test]
async fn short_wallet_records_no_payment() -> anyhow::Result<()> {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "ilyes@example.com");
    let shop = add_shop(&state, "cafe@example.com");
    let order = place_order(&state, &customer, &shop, 3).await;
    top_up(&state, customer.id, 100).await?;

    let result = payment_service::create_payment(
        &state,
        CreatePaymentRequest {
            order_id: order.id,
            customer_id: customer.id,
            amount: None,
            method: PaymentMethod::Wallet,
            transaction_id: None,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::InsufficientBalance { .. })));
    assert_eq!(state.db.payments.count()?, 0);
    assert_eq!(state.db.wallets.get(&customer.id)?.expect("wallet").balance, 100);
    Ok(())
}

fn add_reward(state: &AppState, points_cost: i64) -> LoyaltyReward {
    state
        .db
        .loyalty_rewards
        .insert(LoyaltyReward {
            id: Uuid::new_v4(),
            name: "Free delivery".into(),
            description: "Next delivery is on us".into(),
            points_cost,
            reward_type: RewardType::FreeDelivery,
            value: 200,
            active: true,
        })
        .expect("insert reward")
}

#[tokio::test]
async fn redeeming_spends_points_and_expires_in_thirty_days() -> anyhow::Result<()> {
    let state = test_state();
    let customer = Uuid::new_v4();
    let reward = add_reward(&state, 300);

    loyalty_service::get_account(&state, customer).await?;
    let earned = loyalty_service::adjust_points(
        &state,
        PointsAdjustRequest {
            customer_id: customer,
            points: 600,
            description: Some("welcome".into()),
            order_id: None,
        },
    )
    .await?
    .data
    .expect("update");
    assert_eq!(earned.account.tier, LoyaltyTier::Silver);

    let redeemed = loyalty_service::redeem_reward(
        &state,
        RedeemRequest {
            customer_id: customer,
            reward_id: reward.id,
        },
    )
    .await?
    .data
    .expect("redemption");
    assert_eq!(redeemed.account.points, 300);
    assert_eq!(redeemed.account.total_points_redeemed, 300);
    // tier follows lifetime earnings, not the balance
    assert_eq!(redeemed.account.tier, LoyaltyTier::Silver);
    assert_eq!(redeemed.redemption.status, RedemptionStatus::Active);
    assert_eq!(
        redeemed.redemption.expires_at,
        redeemed.redemption.created_at + Duration::days(30)
    );
    Ok(())
}

#[tokio::test]
async fn redeeming_beyond_the_balance_fails() -> anyhow::Result<()> {
    let state = test_state();
    let customer = Uuid::new_v4();
    let reward = add_reward(&state, 1000);
    loyalty_service::get_account(&state, customer).await?;
    loyalty_service::adjust_points(
        &state,
        PointsAdjustRequest {
            customer_id: customer,
            points: 400,
            description: None,
            order_id: None,
        },
    )
    .await?;

    let err = loyalty_service::redeem_reward(
        &state,
        RedeemRequest {
            customer_id: customer,
            reward_id: reward.id,
        },
    )
    .await
    .expect_err("not enough points");
    assert!(matches!(err, AppError::InsufficientPoints { available: 400, .. }));

    let account = state.db.loyalty_accounts.get(&customer)?.expect("account");
    assert_eq!(account.points, 400);
    assert_eq!(state.db.redemptions.count()?, 0);
    Ok(())
}

#[tokio::test]
async fn oversized_wallet_amounts_are_rejected_without_touching_the_table() -> anyhow::Result<()> {
    let state = test_state();
    let rich = Uuid::new_v4();
    top_up(&state, rich, wallet_service::MAX_AMOUNT).await?;

    for amount in [i64::MAX, i64::MIN, wallet_service::MAX_AMOUNT + 1] {
        let err = top_up(&state, rich, amount).await.expect_err("out of range");
        let err = err.downcast::<AppError>()?;
        assert_eq!(err.status().as_u16(), 400);
    }

    // a balance near the ceiling cannot be pushed past it
    state.db.wallets.update(&rich, |w| {
        w.balance = i64::MAX - 10;
        w.total_earned = i64::MAX - 10;
        Ok(())
    })?;
    let err = top_up(&state, rich, 11).await.expect_err("balance overflow");
    assert_eq!(err.downcast::<AppError>()?.status().as_u16(), 400);

    // the wallets table still serves reads and writes
    let wallet = state.db.wallets.get(&rich)?.expect("wallet");
    assert_eq!(wallet.balance, i64::MAX - 10);
    let other = Uuid::new_v4();
    top_up(&state, other, 250).await?;
    assert_eq!(state.db.wallets.get(&other)?.expect("wallet").balance, 250);
    Ok(())
}

#[tokio::test]
async fn oversized_point_grants_leave_the_account_usable() -> anyhow::Result<()> {
    let state = test_state();
    let customer = Uuid::new_v4();
    loyalty_service::get_account(&state, customer).await?;

    for points in [i64::MAX, i64::MIN] {
        let err = loyalty_service::adjust_points(
            &state,
            PointsAdjustRequest {
                customer_id: customer,
                points,
                description: None,
                order_id: None,
            },
        )
        .await
        .expect_err("out of range");
        assert_eq!(err.status().as_u16(), 400);
    }

    let account = loyalty_service::get_account(&state, customer)
        .await?
        .data
        .expect("account");
    assert_eq!(account.points, 0);
    assert_eq!(account.tier, LoyaltyTier::Bronze);
    assert_eq!(state.db.loyalty_transactions.count()?, 0);
    Ok(())
}
