use crate::model::{id::UserId, role::Role};

pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct UpdateProfile {
    pub user_id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub firebase_uid: Option<String>,
}

pub struct UpdateUserRole {
    pub user_id: UserId,
    pub role: Role,
}
