use anyhow::{Context, Result};
use std::{env, str::FromStr};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub assistant: AssistantConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST").context("DATABASE_HOST is not set")?,
            port: parse_var("DATABASE_PORT")?.context("DATABASE_PORT is not set")?,
            username: env::var("DATABASE_USERNAME").context("DATABASE_USERNAME is not set")?,
            password: env::var("DATABASE_PASSWORD").context("DATABASE_PASSWORD is not set")?,
            database: env::var("DATABASE_NAME").context("DATABASE_NAME is not set")?,
        };
        let server = ServerConfig {
            port: parse_var("PORT")?.unwrap_or(8080),
        };
        let auth = AuthConfig {
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            ttl: parse_var("AUTH_TOKEN_TTL")?.unwrap_or(86_400),
            login_rate_limit: parse_var("LOGIN_RATE_LIMIT")?.unwrap_or(10),
            login_rate_window_secs: parse_var("LOGIN_RATE_WINDOW_SECS")?.unwrap_or(60),
        };
        let assistant = AssistantConfig {
            api_url: env::var("ASSISTANT_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".into()),
            api_key: env::var("ASSISTANT_API_KEY").ok().filter(|k| !k.is_empty()),
            model: env::var("ASSISTANT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            rate_limit: parse_var("ASSISTANT_RATE_LIMIT")?.unwrap_or(10),
            rate_window_secs: parse_var("ASSISTANT_RATE_WINDOW_SECS")?.unwrap_or(60),
            max_message_chars: parse_var("ASSISTANT_MAX_MESSAGE_CHARS")?.unwrap_or(1000),
        };

        Ok(Self {
            database,
            server,
            auth,
            assistant,
        })
    }
}

// 未設定なら None、設定されていて解釈できない場合はエラー
fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: {v}")),
        Err(_) => Ok(None),
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct ServerConfig {
    pub port: u16,
}

pub struct AuthConfig {
    pub jwt_secret: String,
    /// アクセストークンの有効期間（秒）
    pub ttl: u64,
    /// 送信元 IP ごとに許すログイン試行回数
    pub login_rate_limit: u32,
    pub login_rate_window_secs: u64,
}

#[derive(Clone)]
pub struct AssistantConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub rate_limit: u32,
    pub rate_window_secs: u64,
    pub max_message_chars: usize,
}
