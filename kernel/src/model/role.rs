use serde::{Deserialize, Serialize};
use shared::error::AppError;
use strum::{AsRefStr, EnumIter, EnumString};

/// credentials.role に SMALLINT で保存される (0=client, 1=vendor, 2=admin)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Vendor,
    Admin,
}

impl Role {
    pub fn code(self) -> i16 {
        match self {
            Role::Client => 0,
            Role::Vendor => 1,
            Role::Admin => 2,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl TryFrom<i16> for Role {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Client),
            1 => Ok(Role::Vendor),
            2 => Ok(Role::Admin),
            other => Err(AppError::ConversionEntityError(format!(
                "unknown role code: {other}"
            ))),
        }
    }
}
