use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use kernel::model::{auth::AccessToken, id::UserId};
use kernel::repository::auth::AuthRepository;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserCredentialRow, ConnectionPool};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: usize,
    exp: usize,
}

pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: u64,
}

impl AuthRepositoryImpl {
    pub fn new(db: ConnectionPool, jwt_secret: &str, ttl: u64) -> Self {
        Self {
            db,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            ttl,
        }
    }

    fn issue(&self, user_id: UserId) -> AppResult<AccessToken> {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl as usize,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map(AccessToken)
            .map_err(|e| AppError::ConversionEntityError(format!("failed to sign token: {e}")))
    }
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    fn verify_access_token(&self, access_token: &AccessToken) -> AppResult<UserId> {
        let data = jsonwebtoken::decode::<Claims>(
            &access_token.0,
            &self.decoding_key,
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("JWT validation failed: {e}");
            AppError::UnauthenticatedError
        })?;

        data.claims
            .sub
            .parse()
            .map_err(|_| AppError::UnauthenticatedError)
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let row = sqlx::query_as!(
            UserCredentialRow,
            "SELECT user_id, password_hash FROM credentials WHERE email = $1",
            email
        )
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or(AppError::UnauthenticatedError)?;

        if !verify_password(password, &row.password_hash)? {
            return Err(AppError::UnauthenticatedError);
        }
        Ok(row.user_id)
    }

    async fn create_token(&self, user_id: UserId) -> AppResult<AccessToken> {
        self.issue(user_id)
    }
}

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::PasswordHashError(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| AppError::PasswordHashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::config::DatabaseConfig;

    fn repo(secret: &str, ttl: u64) -> AuthRepositoryImpl {
        let pool = crate::database::connect_database_with(&DatabaseConfig {
            host: "localhost".into(),
            port: 5432,
            username: "app".into(),
            password: "passwd".into(),
            database: "app".into(),
        });
        AuthRepositoryImpl::new(pool, secret, ttl)
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[tokio::test]
    async fn issued_token_resolves_to_user() {
        let repo = repo("test-secret", 3600);
        let user_id = UserId::new();
        let token = repo.create_token(user_id).await.unwrap();
        assert_eq!(repo.verify_access_token(&token).unwrap(), user_id);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let token = repo("one-secret", 3600).create_token(UserId::new()).await.unwrap();
        let err = repo("another-secret", 3600).verify_access_token(&token).unwrap_err();
        assert!(matches!(err, AppError::UnauthenticatedError));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let err = repo("test-secret", 3600)
            .verify_access_token(&AccessToken("not.a.jwt".into()))
            .unwrap_err();
        assert!(matches!(err, AppError::UnauthenticatedError));
    }
}
