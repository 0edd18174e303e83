pub mod admin_service;
pub mod analytics_service;
pub mod auth_service;
pub mod catalog_service;
pub mod chat_service;
pub mod delivery_service;
pub mod driver_service;
pub mod erp_service;
pub mod loyalty_service;
pub mod notification_service;
pub mod order_service;
pub mod payment_service;
pub mod rating_service;
pub mod support_service;
pub mod vendor_service;
pub mod wallet_service;
