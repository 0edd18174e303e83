//! In-memory entity store.
//!
//! `Database` owns one repository per entity type. It is built once at
//! startup and shared through `AppState`; nothing here survives a restart.

mod queries;
pub mod repository;
pub mod seed;

pub use repository::{InMemoryRepository, Record, Repository};

use uuid::Uuid;

use crate::models::{
    AuditLog, ChatMessage, Conversation, Customer, Delivery, DeliveryRoute, DeliveryZone,
    DriverLocation, DriverPerformance, InventoryProduct, LoyaltyAccount, LoyaltyReward,
    LoyaltyTransaction, Notification, Order, Payment, Product, Redemption, Refund,
    RegistrationRequest, Sale, Store, Supplier, SupportTicket, User, VendorReview, Wallet,
    WalletTransaction,
};

macro_rules! impl_record {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl Record for $ty {
                fn key(&self) -> Uuid {
                    self.$field
                }
            }
        )*
    };
}

impl_record!(
    User => id,
    RegistrationRequest => id,
    Store => id,
    Product => id,
    Order => id,
    Delivery => id,
    DriverLocation => driver_id,
    DriverPerformance => driver_id,
    DeliveryRoute => id,
    DeliveryZone => id,
    Wallet => customer_id,
    WalletTransaction => id,
    Payment => id,
    Refund => id,
    LoyaltyAccount => customer_id,
    LoyaltyTransaction => id,
    LoyaltyReward => id,
    Redemption => id,
    Conversation => id,
    ChatMessage => id,
    SupportTicket => id,
    VendorReview => id,
    Notification => id,
    InventoryProduct => id,
    Customer => id,
    Supplier => id,
    Sale => id,
    AuditLog => id,
);

pub type UserRepository = InMemoryRepository<User>;
pub type StoreRepository = InMemoryRepository<Store>;
pub type OrderRepository = InMemoryRepository<Order>;

pub struct Database {
    pub users: UserRepository,
    pub registration_requests: InMemoryRepository<RegistrationRequest>,
    pub stores: StoreRepository,
    pub products: InMemoryRepository<Product>,
    pub orders: OrderRepository,
    pub deliveries: InMemoryRepository<Delivery>,
    pub driver_locations: InMemoryRepository<DriverLocation>,
    pub driver_performance: InMemoryRepository<DriverPerformance>,
    pub delivery_routes: InMemoryRepository<DeliveryRoute>,
    pub delivery_zones: InMemoryRepository<DeliveryZone>,
    pub wallets: InMemoryRepository<Wallet>,
    pub wallet_transactions: InMemoryRepository<WalletTransaction>,
    pub payments: InMemoryRepository<Payment>,
    pub refunds: InMemoryRepository<Refund>,
    pub loyalty_accounts: InMemoryRepository<LoyaltyAccount>,
    pub loyalty_transactions: InMemoryRepository<LoyaltyTransaction>,
    pub loyalty_rewards: InMemoryRepository<LoyaltyReward>,
    pub redemptions: InMemoryRepository<Redemption>,
    pub conversations: InMemoryRepository<Conversation>,
    pub chat_messages: InMemoryRepository<ChatMessage>,
    pub support_tickets: InMemoryRepository<SupportTicket>,
    pub reviews: InMemoryRepository<VendorReview>,
    pub notifications: InMemoryRepository<Notification>,
    pub inventory: InMemoryRepository<InventoryProduct>,
    pub customers: InMemoryRepository<Customer>,
    pub suppliers: InMemoryRepository<Supplier>,
    pub sales: InMemoryRepository<Sale>,
    pub audit_logs: InMemoryRepository<AuditLog>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            users: InMemoryRepository::new("users"),
            registration_requests: InMemoryRepository::new("registration_requests"),
            stores: InMemoryRepository::new("stores"),
            products: InMemoryRepository::new("products"),
            orders: InMemoryRepository::new("orders"),
            deliveries: InMemoryRepository::new("deliveries"),
            driver_locations: InMemoryRepository::new("driver_locations"),
            driver_performance: InMemoryRepository::new("driver_performance"),
            delivery_routes: InMemoryRepository::new("delivery_routes"),
            delivery_zones: InMemoryRepository::new("delivery_zones"),
            wallets: InMemoryRepository::new("wallets"),
            wallet_transactions: InMemoryRepository::new("wallet_transactions"),
            payments: InMemoryRepository::new("payments"),
            refunds: InMemoryRepository::new("refunds"),
            loyalty_accounts: InMemoryRepository::new("loyalty_accounts"),
            loyalty_transactions: InMemoryRepository::new("loyalty_transactions"),
            loyalty_rewards: InMemoryRepository::new("loyalty_rewards"),
            redemptions: InMemoryRepository::new("redemptions"),
            conversations: InMemoryRepository::new("conversations"),
            chat_messages: InMemoryRepository::new("chat_messages"),
            support_tickets: InMemoryRepository::new("support_tickets"),
            reviews: InMemoryRepository::new("reviews"),
            notifications: InMemoryRepository::new("notifications"),
            inventory: InMemoryRepository::new("inventory"),
            customers: InMemoryRepository::new("customers"),
            suppliers: InMemoryRepository::new("suppliers"),
            sales: InMemoryRepository::new("sales"),
            audit_logs: InMemoryRepository::new("audit_logs"),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
