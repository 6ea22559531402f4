pub mod assistant;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod chat;
pub mod id;
pub mod list;
pub mod notification;
pub mod role;
pub mod user;
pub mod vendor;
pub mod venue;
