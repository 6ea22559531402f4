pub mod availability;
pub mod booking;
pub mod chat;
pub mod notification;
pub mod user;
pub mod vendor;
pub mod venue;

use shared::error::AppError;
use std::str::FromStr;

// VARCHAR で保存している列挙値を読み戻す
pub(crate) fn parse_stored<T: FromStr>(column: &str, value: &str) -> Result<T, AppError> {
    value.parse::<T>().map_err(|_| {
        AppError::ConversionEntityError(format!("unexpected value in {column}: {value}"))
    })
}
