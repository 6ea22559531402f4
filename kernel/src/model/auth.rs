use crate::model::{id::UserId, role::Role};

#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

#[derive(Debug)]
pub struct LoginSession {
    pub access_token: AccessToken,
    pub user_id: UserId,
    pub role: Role,
}
