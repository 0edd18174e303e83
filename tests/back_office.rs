mod common;

use common::{add_shop, add_user, place_order, test_state};
use delivery_marketplace_api::{
    db::Repository,
    dto::{
        chat::{MessagesQuery, OpenConversationRequest, SendMessageRequest},
        erp::{
            CreateCustomerRequest, CreateInventoryRequest, CreateSaleRequest, SaleItemInput,
            StockAdjustRequest,
        },
        ratings::CreateReviewRequest,
        support::{CreateTicketRequest, TicketReplyRequest, TicketStatusRequest},
    },
    error::AppError,
    models::{
        ConversationKind, InventoryProduct, PaymentMethod, TicketPriority, TicketStatus, UserRole,
    },
    services::{chat_service, erp_service, rating_service, support_service},
    state::AppState,
};

async fn stock_item(state: &AppState, sku: &str, stock: i64) -> InventoryProduct {
    erp_service::create_inventory_product(
        state,
        CreateInventoryRequest {
            sku: sku.into(),
            name: format!("Item {sku}"),
            category: "grocery".into(),
            supplier_id: None,
            cost_price: 60,
            selling_price: 100,
            stock,
            low_stock_threshold: 3,
            barcode: None,
        },
    )
    .await
    .expect("create product")
    .data
    .expect("product")
}

#[tokio::test]
async fn sale_takes_stock_and_credits_the_customer() -> anyhow::Result<()> {
    let state = test_state();
    let milk = stock_item(&state, "MILK-1", 10).await;
    let bread = stock_item(&state, "BREAD-1", 5).await;
    let customer = erp_service::create_customer(
        &state,
        CreateCustomerRequest {
            name: "Walk-in Rachid".into(),
            email: None,
            phone: Some("0555333333".into()),
        },
    )
    .await?
    .data
    .expect("customer");

    let sale = erp_service::create_sale(
        &state,
        CreateSaleRequest {
            customer_id: Some(customer.id),
            items: vec![
                SaleItemInput {
                    product_id: milk.id,
                    quantity: 4,
                    unit_price: None,
                },
                SaleItemInput {
                    product_id: bread.id,
                    quantity: 2,
                    unit_price: Some(90),
                },
            ],
            discount: 30,
            payment_method: PaymentMethod::Cash,
        },
    )
    .await?
    .data
    .expect("sale");

    assert_eq!(sale.subtotal, 4 * 100 + 2 * 90);
    assert_eq!(sale.total, sale.subtotal - 30);
    assert_eq!(state.db.inventory.get(&milk.id)?.expect("milk").stock, 6);
    assert_eq!(state.db.inventory.get(&bread.id)?.expect("bread").stock, 3);

    let customer = state.db.customers.get(&customer.id)?.expect("customer");
    assert_eq!(customer.total_purchases, sale.total);
    assert_eq!(customer.last_purchase_date, Some(sale.created_at));

    let low = erp_service::low_stock(&state).await?.data.expect("low stock");
    assert_eq!(low.items.len(), 1);
    assert_eq!(low.items[0].id, bread.id);
    Ok(())
}

#[tokio::test]
async fn oversold_sale_writes_nothing() -> anyhow::Result<()> {
    let state = test_state();
    let oil = stock_item(&state, "OIL-1", 4).await;

    // two lines that only overflow together
    let err = erp_service::create_sale(
        &state,
        CreateSaleRequest {
            customer_id: None,
            items: vec![
                SaleItemInput {
                    product_id: oil.id,
                    quantity: 3,
                    unit_price: None,
                },
                SaleItemInput {
                    product_id: oil.id,
                    quantity: 2,
                    unit_price: None,
                },
            ],
            discount: 0,
            payment_method: PaymentMethod::Card,
        },
    )
    .await
    .expect_err("not enough oil");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(state.db.inventory.get(&oil.id)?.expect("oil").stock, 4);
    assert_eq!(state.db.sales.count()?, 0);
    Ok(())
}

#[tokio::test]
async fn duplicate_sku_is_rejected() {
    let state = test_state();
    stock_item(&state, "SKU-9", 1).await;
    let result = erp_service::create_inventory_product(
        &state,
        CreateInventoryRequest {
            sku: "SKU-9".into(),
            name: "Copy".into(),
            category: "grocery".into(),
            supplier_id: None,
            cost_price: 1,
            selling_price: 2,
            stock: 0,
            low_stock_threshold: 0,
            barcode: None,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn one_review_per_order_feeds_vendor_performance() -> anyhow::Result<()> {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "hana@example.com");
    let shop = add_shop(&state, "shawarma@example.com");
    let order = place_order(&state, &customer, &shop, 1).await;

    let review = |rating| CreateReviewRequest {
        vendor_id: shop.vendor.id,
        customer_id: customer.id,
        order_id: order.id,
        rating,
        food_quality: Some(5),
        delivery_time: None,
        customer_service: None,
        comment: Some("great".into()),
        photos: vec![],
    };

    let created = rating_service::create_review(&state, review(4))
        .await?
        .data
        .expect("review");
    assert_eq!(created.delivery_time, 4);
    assert_eq!(created.food_quality, 5);

    let again = rating_service::create_review(&state, review(2)).await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));
    let out_of_range = rating_service::create_review(&state, review(6)).await;
    assert!(matches!(out_of_range, Err(AppError::BadRequest(_))));

    let performance = rating_service::vendor_performance(&state, shop.vendor.id)
        .await?
        .data
        .expect("performance");
    assert_eq!(performance.total_reviews, 1);
    assert!((performance.average_rating - 4.0).abs() < f64::EPSILON);
    assert_eq!(performance.rating_distribution, vec![0, 0, 0, 1, 0]);

    let unknown = rating_service::vendor_performance(&state, customer.id).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn conversations_are_reused_and_reading_marks_messages() -> anyhow::Result<()> {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "reda@example.com");
    let driver = add_user(&state, UserRole::Driver, "bilal@example.com");
    let open = || OpenConversationRequest {
        participant_ids: vec![customer.id, driver.id],
        participant_roles: vec![UserRole::Customer, UserRole::Driver],
        kind: ConversationKind::CustomerDriver,
        order_id: None,
    };

    let first = chat_service::open_conversation(&state, open()).await?.data.expect("conversation");
    let second = chat_service::open_conversation(&state, open()).await?.data.expect("conversation");
    assert_eq!(first.id, second.id);

    chat_service::send_message(
        &state,
        SendMessageRequest {
            conversation_id: first.id,
            sender_id: driver.id,
            sender_role: UserRole::Driver,
            sender_name: None,
            message: "I am downstairs".into(),
            attachments: vec![],
        },
    )
    .await?;

    let outsider = add_user(&state, UserRole::Customer, "stranger@example.com");
    let err = chat_service::send_message(
        &state,
        SendMessageRequest {
            conversation_id: first.id,
            sender_id: outsider.id,
            sender_role: UserRole::Customer,
            sender_name: None,
            message: "hello?".into(),
            attachments: vec![],
        },
    )
    .await
    .expect_err("not a participant");
    assert!(matches!(err, AppError::Forbidden(_)));

    let messages = chat_service::list_messages(
        &state,
        MessagesQuery {
            conversation_id: first.id,
            user_id: Some(customer.id),
            limit: None,
        },
    )
    .await?
    .data
    .expect("messages");
    assert_eq!(messages.items.len(), 1);
    assert!(messages.items[0].is_read);

    let conversation = state.db.conversations.get(&first.id)?.expect("conversation");
    assert_eq!(conversation.last_message.as_deref(), Some("I am downstairs"));
    Ok(())
}

#[tokio::test]
async fn closed_tickets_take_no_replies() -> anyhow::Result<()> {
    let state = test_state();
    let customer = add_user(&state, UserRole::Customer, "amel@example.com");
    let agent = add_user(&state, UserRole::Admin, "agent@example.com");

    let ticket = support_service::create_ticket(
        &state,
        CreateTicketRequest {
            customer_id: customer.id,
            subject: "Missing item".into(),
            description: "The drink was not in the bag".into(),
            category: None,
            priority: None,
        },
    )
    .await?
    .data
    .expect("ticket");
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.priority, TicketPriority::Medium);

    support_service::reply_to_ticket(
        &state,
        ticket.id,
        TicketReplyRequest {
            author_id: agent.id,
            author_role: UserRole::Admin,
            message: "Refund on the way".into(),
        },
    )
    .await?;
    let closed = support_service::update_ticket_status(
        &state,
        ticket.id,
        TicketStatusRequest {
            status: TicketStatus::Closed,
        },
    )
    .await?
    .data
    .expect("ticket");
    assert!(closed.resolved_at.is_some());
    assert_eq!(closed.messages.len(), 1);

    let err = support_service::reply_to_ticket(
        &state,
        ticket.id,
        TicketReplyRequest {
            author_id: customer.id,
            author_role: UserRole::Customer,
            message: "thanks".into(),
        },
    )
    .await
    .expect_err("closed");
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn stock_changes_out_of_range_keep_inventory_readable() -> anyhow::Result<()> {
    let state = test_state();
    let rice = stock_item(&state, "RICE-1", 7).await;

    for delta in [i64::MAX, i64::MIN, erp_service::MAX_QUANTITY + 1] {
        let err = erp_service::adjust_stock(&state, rice.id, StockAdjustRequest { delta })
            .await
            .expect_err("out of range");
        assert_eq!(err.status().as_u16(), 400);
    }

    let listed = erp_service::list_inventory(&state).await?.data.expect("inventory");
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].stock, 7);

    let restocked = erp_service::adjust_stock(&state, rice.id, StockAdjustRequest { delta: 3 })
        .await?
        .data
        .expect("product");
    assert_eq!(restocked.stock, 10);
    Ok(())
}

#[tokio::test]
async fn sale_prices_must_be_non_negative_and_fit() -> anyhow::Result<()> {
    let state = test_state();
    let tea = stock_item(&state, "TEA-1", 5).await;

    for unit_price in [-1, i64::MAX] {
        let err = erp_service::create_sale(
            &state,
            CreateSaleRequest {
                customer_id: None,
                items: vec![SaleItemInput {
                    product_id: tea.id,
                    quantity: 2,
                    unit_price: Some(unit_price),
                }],
                discount: 0,
                payment_method: PaymentMethod::Cash,
            },
        )
        .await
        .expect_err("bad price");
        assert_eq!(err.status().as_u16(), 400);
    }
    assert_eq!(state.db.sales.count()?, 0);
    assert_eq!(state.db.inventory.get(&tea.id)?.expect("tea").stock, 5);
    Ok(())
}
