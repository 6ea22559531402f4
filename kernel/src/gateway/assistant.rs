use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// 関連性フィルタを通過したメッセージにだけ呼ばれる
    async fn complete(&self, message: &str) -> AppResult<String>;
}
