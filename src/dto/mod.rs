pub mod admin;
pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod chat;
pub mod delivery;
pub mod drivers;
pub mod erp;
pub mod loyalty;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod ratings;
pub mod support;
pub mod vendors;
pub mod wallet;
