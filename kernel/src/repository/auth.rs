use crate::model::{auth::AccessToken, id::UserId};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// アクセストークンを検証し、ユーザー ID を返す
    fn verify_access_token(&self, access_token: &AccessToken) -> AppResult<UserId>;
    /// メールアドレスとパスワードの組を検証する
    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId>;
    async fn create_token(&self, user_id: UserId) -> AppResult<AccessToken>;
}
