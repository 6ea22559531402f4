pub mod admin;
pub mod assistant;
pub mod auth;
pub mod booking;
pub mod chat;
pub mod health;
pub mod notification;
pub mod user;
pub mod v1;
pub mod vendor;
pub mod venue;
