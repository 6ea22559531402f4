use chrono::{DateTime, Utc};
use kernel::model::{id::UserId, role::Role, user::User};
use shared::error::AppError;

pub struct UserRow {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub role: i16,
    pub firebase_uid: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            first_name,
            last_name,
            email,
            username,
            role,
            firebase_uid,
            avatar,
            phone,
            created_at,
        } = value;
        Ok(User {
            user_id,
            first_name,
            last_name,
            email,
            username,
            role: Role::try_from(role)?,
            firebase_uid,
            avatar,
            phone,
            created_at,
        })
    }
}

// ログイン時のパスワード照合用
pub struct UserCredentialRow {
    pub user_id: UserId,
    pub password_hash: String,
}
