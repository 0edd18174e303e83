use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    analytics::{
        CustomerInsights, CustomerSummary, ErpForecast, ForecastPeriod, ProductRevenue,
        RestockRecommendation, SalesForecast, SalesTotals, TopSellingProduct, Trend,
        VendorMetrics, VendorPerformance,
    },
    dispatch::DriverCandidate,
    dto::{
        admin::{
            AdminOrderStatusRequest, AuditLogList, RegistrationAction, RegistrationDecision,
            RegistrationDecisionResponse, RegistrationRequestList, UserList,
        },
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        catalog::{ProductList, StoreList, UpdateAvailabilityRequest},
        chat::{
            ConversationList, MessageList, OpenConversationRequest, SendMessageRequest,
        },
        delivery::{
            AssignNearestRequest, AssignNearestResponse, BatchOptimizeRequest,
            BatchOptimizeResponse, CreateZoneRequest, DeliveryList, DeliveryPrediction,
            OptimizeRouteRequest, PredictionRequest, RecordPerformanceRequest, RouteList,
        },
        drivers::{AcceptDeliveryRequest, DriverStatusRequest, LocationUpdateRequest, NearbyDriver},
        erp::{
            CreateCustomerRequest, CreateInventoryRequest, CreateSaleRequest,
            CreateSupplierRequest, CustomerList, ErpDashboard, ErpInsights, InventoryList,
            SaleItemInput, SaleList, StockAdjustRequest, SupplierList, UpdateCustomerRequest,
            UpdateInventoryRequest, UpdateSupplierRequest,
        },
        loyalty::{
            LoyaltyTransactionList, PointsAdjustRequest, PointsUpdate, RedeemRequest,
            RedeemResponse, RedemptionList, RewardList,
        },
        notifications::NotificationList,
        orders::{CreateOrderRequest, OrderItemInput, OrderList},
        payments::{CreatePaymentRequest, CreateRefundRequest, PaymentList, RefundList},
        ratings::{CreateReviewRequest, ReviewList},
        support::{CreateTicketRequest, TicketList, TicketReplyRequest, TicketStatusRequest},
        vendors::VendorStatusRequest,
        wallet::{WalletAdjustRequest, WalletTransactionList, WalletUpdate},
    },
    events::{OrderEvent, OrderEventKind},
    models::{
        ApprovalStatus, AuditLog, ChatMessage, Conversation, ConversationKind, Coordinate,
        Customer, Delivery, DeliveryRoute, DeliveryStatus, DeliveryZone, DriverLocation,
        DriverPerformance, InventoryProduct, LoyaltyAccount, LoyaltyReward, LoyaltyTier,
        LoyaltyTransaction, Notification, Order, OrderItem, OrderStatus, Payment, PaymentMethod,
        PaymentStatus, PointsKind, Product, Redemption, RedemptionStatus, Refund, RefundStatus,
        RegistrationRequest, RewardType, RouteStatus, Sale, SaleItem, Store, Supplier,
        SupportTicket, TicketCategory, TicketMessage, TicketPriority, TicketStatus,
        TransactionKind, User, UserRole, VendorReview, Wallet, WalletTransaction,
    },
    response::{ApiError, Meta},
    routes::{
        admin, analytics, auth, catalog, chat, delivery, drivers, erp, events, health, loyalty,
        notifications, orders, payments, ratings, support, vendors, wallet,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        catalog::list_stores,
        catalog::list_products,
        catalog::update_availability,
        vendors::list_vendor_orders,
        vendors::update_order_status,
        drivers::list_deliveries,
        drivers::accept_delivery,
        drivers::update_delivery_status,
        drivers::update_location,
        drivers::nearby_drivers,
        delivery::assign_nearest_driver,
        delivery::batch_optimize,
        delivery::optimize_route,
        delivery::list_routes,
        delivery::list_records,
        delivery::list_zones,
        delivery::create_zone,
        delivery::predict_delivery,
        delivery::driver_performance,
        delivery::record_performance,
        wallet::get_wallet,
        wallet::adjust_wallet,
        wallet::list_transactions,
        payments::create_payment,
        payments::payment_history,
        payments::list_refunds,
        payments::create_refund,
        loyalty::get_account,
        loyalty::adjust_points,
        loyalty::list_rewards,
        loyalty::redeem_reward,
        loyalty::list_transactions,
        loyalty::list_redemptions,
        chat::list_conversations,
        chat::open_conversation,
        chat::list_messages,
        chat::send_message,
        support::list_tickets,
        support::create_ticket,
        support::update_ticket_status,
        support::reply_to_ticket,
        ratings::list_reviews,
        ratings::create_review,
        ratings::vendor_performance,
        ratings::vendor_leaderboard,
        analytics::dashboard,
        analytics::customer_insights,
        analytics::sales_forecast,
        erp::list_inventory,
        erp::create_inventory_product,
        erp::update_inventory_product,
        erp::delete_inventory_product,
        erp::adjust_stock,
        erp::low_stock,
        erp::list_customers,
        erp::create_customer,
        erp::update_customer,
        erp::top_customers,
        erp::list_suppliers,
        erp::create_supplier,
        erp::update_supplier,
        erp::delete_supplier,
        erp::list_sales,
        erp::create_sale,
        erp::dashboard,
        erp::insights,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::list_users,
        admin::list_registration_requests,
        admin::decide_registration,
        admin::list_audit_logs,
        notifications::list_notifications,
        notifications::mark_read,
        events::stream_events
    ),
    components(
        schemas(
            User,
            UserRole,
            ApprovalStatus,
            RegistrationRequest,
            Store,
            Product,
            Order,
            OrderItem,
            OrderStatus,
            PaymentMethod,
            Delivery,
            DeliveryStatus,
            Coordinate,
            DriverLocation,
            DriverPerformance,
            DeliveryRoute,
            RouteStatus,
            DeliveryZone,
            Wallet,
            WalletTransaction,
            TransactionKind,
            Payment,
            PaymentStatus,
            Refund,
            RefundStatus,
            LoyaltyAccount,
            LoyaltyTier,
            LoyaltyTransaction,
            PointsKind,
            LoyaltyReward,
            RewardType,
            Redemption,
            RedemptionStatus,
            Conversation,
            ConversationKind,
            ChatMessage,
            SupportTicket,
            TicketMessage,
            TicketCategory,
            TicketPriority,
            TicketStatus,
            VendorReview,
            Notification,
            InventoryProduct,
            Customer,
            Supplier,
            Sale,
            SaleItem,
            AuditLog,
            OrderEvent,
            OrderEventKind,
            DriverCandidate,
            Trend,
            ProductRevenue,
            VendorMetrics,
            CustomerSummary,
            CustomerInsights,
            ForecastPeriod,
            SalesForecast,
            SalesTotals,
            TopSellingProduct,
            ErpForecast,
            RestockRecommendation,
            VendorPerformance,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            CreateOrderRequest,
            OrderItemInput,
            OrderList,
            StoreList,
            ProductList,
            UpdateAvailabilityRequest,
            VendorStatusRequest,
            AcceptDeliveryRequest,
            DriverStatusRequest,
            LocationUpdateRequest,
            NearbyDriver,
            AssignNearestRequest,
            AssignNearestResponse,
            BatchOptimizeRequest,
            BatchOptimizeResponse,
            OptimizeRouteRequest,
            RouteList,
            DeliveryList,
            CreateZoneRequest,
            PredictionRequest,
            DeliveryPrediction,
            RecordPerformanceRequest,
            WalletAdjustRequest,
            WalletUpdate,
            WalletTransactionList,
            CreatePaymentRequest,
            CreateRefundRequest,
            PaymentList,
            RefundList,
            PointsAdjustRequest,
            PointsUpdate,
            RedeemRequest,
            RedeemResponse,
            RewardList,
            LoyaltyTransactionList,
            RedemptionList,
            OpenConversationRequest,
            SendMessageRequest,
            ConversationList,
            MessageList,
            CreateTicketRequest,
            TicketStatusRequest,
            TicketReplyRequest,
            TicketList,
            CreateReviewRequest,
            ReviewList,
            CreateInventoryRequest,
            UpdateInventoryRequest,
            StockAdjustRequest,
            InventoryList,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CustomerList,
            CreateSupplierRequest,
            UpdateSupplierRequest,
            SupplierList,
            SaleItemInput,
            CreateSaleRequest,
            SaleList,
            ErpDashboard,
            ErpInsights,
            AdminOrderStatusRequest,
            UserList,
            RegistrationAction,
            RegistrationDecision,
            RegistrationDecisionResponse,
            RegistrationRequestList,
            AuditLogList,
            NotificationList,
            Meta,
            ApiError
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Orders", description = "Order placement and lookup"),
        (name = "Catalog", description = "Stores and products"),
        (name = "Vendors", description = "Vendor order handling"),
        (name = "Drivers", description = "Driver deliveries and location"),
        (name = "Delivery", description = "Dispatch, route planning, zones and predictions"),
        (name = "Wallet", description = "Customer wallet"),
        (name = "Payments", description = "Payments and refunds"),
        (name = "Loyalty", description = "Points, tiers and rewards"),
        (name = "Chat", description = "Conversations and messages"),
        (name = "Support", description = "Support tickets"),
        (name = "Ratings", description = "Vendor reviews"),
        (name = "Analytics", description = "Vendor analytics"),
        (name = "ERP", description = "Inventory, customers, suppliers and sales"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Notifications", description = "User inbox"),
        (name = "Events", description = "Live order events"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
