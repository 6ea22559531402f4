pub mod application;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod chat;
pub mod health;
pub mod notification;
pub mod user;
pub mod vendor;
pub mod venue;

#[cfg(test)]
pub(crate) mod fixture;
