pub mod analytics;
pub mod audit;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod dto;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod models;
pub mod response;
pub mod routes;
pub mod routing;
pub mod services;
pub mod state;
