//! 操作ごとの固定ウィンドウ制限。上限値は起動時の設定から受け取る。

use shared::error::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use strum::AsRefStr;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// 制限の対象になる操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum LimitedAction {
    /// 送信元 IP ごとのログイン試行
    Login,
    /// ユーザーごとのアシスタント呼び出し
    Assistant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimit {
    pub fn per_window(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RateLimitPolicy {
    pub login: RateLimit,
    pub assistant: RateLimit,
}

impl RateLimitPolicy {
    pub fn limit_for(&self, action: LimitedAction) -> RateLimit {
        match action {
            LimitedAction::Login => self.login,
            LimitedAction::Assistant => self.assistant,
        }
    }
}

struct Window {
    started: Instant,
    used: u32,
}

#[derive(Clone)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    windows: Arc<Mutex<HashMap<(LimitedAction, String), Window>>>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Arc::default(),
        }
    }

    /// 1 回分の枠を消費する。枠が残っていなければ `TooManyRequests`。
    /// 拒否された呼び出しは数えない。
    pub async fn acquire(&self, action: LimitedAction, caller: &str) -> AppResult<()> {
        let limit = self.policy.limit_for(action);
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        let window = windows
            .entry((action, caller.to_owned()))
            .or_insert(Window {
                started: now,
                used: 0,
            });
        if now.duration_since(window.started) >= limit.window {
            window.started = now;
            window.used = 0;
        }
        if window.used >= limit.max_requests {
            tracing::warn!(action = action.as_ref(), caller, "rate limit exceeded");
            return Err(AppError::TooManyRequests);
        }
        window.used += 1;
        Ok(())
    }

    /// ウィンドウが終わった呼び出し元を捨て、捨てた件数を返す
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|(action, _), window| {
            now.duration_since(window.started) < self.policy.limit_for(*action).window
        });
        before - windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(login: u32, assistant: u32) -> RateLimiter {
        RateLimiter::new(RateLimitPolicy {
            login: RateLimit::per_window(login, 60),
            assistant: RateLimit::per_window(assistant, 3600),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn blocks_after_limit_until_window_resets() {
        let limiter = limiter(2, 2);

        assert!(limiter.acquire(LimitedAction::Login, "10.0.0.1").await.is_ok());
        assert!(limiter.acquire(LimitedAction::Login, "10.0.0.1").await.is_ok());
        let err = limiter.acquire(LimitedAction::Login, "10.0.0.1").await;
        assert!(matches!(err, Err(AppError::TooManyRequests)));

        // 呼び出し元・操作が違えば独立して数える
        assert!(limiter.acquire(LimitedAction::Login, "10.0.0.2").await.is_ok());
        assert!(limiter.acquire(LimitedAction::Assistant, "10.0.0.1").await.is_ok());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.acquire(LimitedAction::Login, "10.0.0.1").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn each_action_uses_its_own_window() {
        let limiter = limiter(1, 1);
        limiter.acquire(LimitedAction::Login, "u").await.unwrap();
        limiter.acquire(LimitedAction::Assistant, "u").await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.acquire(LimitedAction::Login, "u").await.is_ok());
        assert!(limiter.acquire(LimitedAction::Assistant, "u").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_drops_only_finished_windows() {
        let limiter = limiter(5, 5);
        limiter.acquire(LimitedAction::Login, "10.0.0.1").await.unwrap();
        limiter.acquire(LimitedAction::Assistant, "user-1").await.unwrap();
        tokio::time::advance(Duration::from_secs(120)).await;
        limiter.acquire(LimitedAction::Login, "10.0.0.2").await.unwrap();

        // ログインの 60 秒枠は終わっているが、アシスタントの 1 時間枠はまだ続いている
        assert_eq!(limiter.sweep().await, 1);
        assert_eq!(limiter.sweep().await, 0);
    }
}
