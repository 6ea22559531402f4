pub mod admin;
pub mod assistant;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod chat;
pub mod notification;
pub mod user;
pub mod vendor;
pub mod venue;

use kernel::model::list::PaginatedList;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<T>,
}

impl<S, T: From<S>> From<PaginatedList<S>> for PaginatedResponse<T> {
    fn from(value: PaginatedList<S>) -> Self {
        let PaginatedList {
            total,
            limit,
            offset,
            items,
        } = value;
        Self {
            total,
            limit,
            offset,
            items: items.into_iter().map(T::from).collect(),
        }
    }
}

fn default_limit() -> i64 {
    20
}
