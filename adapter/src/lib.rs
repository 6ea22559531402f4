pub mod database;
pub mod gateway;
pub mod rate_limit;
pub mod repository;
