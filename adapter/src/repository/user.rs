use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{CreateUser, UpdateProfile, UpdateUserRole},
        User,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserRow, ConnectionPool};
use crate::repository::auth::hash_password;

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as!(
            UserRow,
            r#"
                SELECT user_id, first_name, last_name, email, username, role,
                       firebase_uid, avatar, phone, created_at
                FROM credentials
                WHERE user_id = $1
            "#,
            current_user_id as _
        )
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_firebase_uid(&self, firebase_uid: &str) -> AppResult<Option<User>> {
        sqlx::query_as!(
            UserRow,
            r#"
                SELECT user_id, first_name, last_name, email, username, role,
                       firebase_uid, avatar, phone, created_at
                FROM credentials
                WHERE firebase_uid = $1
            "#,
            firebase_uid
        )
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as!(
            UserRow,
            r#"
                SELECT user_id, first_name, last_name, email, username, role,
                       firebase_uid, avatar, phone, created_at
                FROM credentials
                ORDER BY created_at DESC
            "#
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let CreateUser {
            first_name,
            last_name,
            email,
            username,
            password,
        } = event;

        let user_id = UserId::new();
        let password_hash = hash_password(&password)?;

        let row = sqlx::query_as!(
            UserRow,
            r#"
                INSERT INTO credentials
                (user_id, first_name, last_name, email, username, password_hash, role)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT DO NOTHING
                RETURNING user_id, first_name, last_name, email, username, role,
                          firebase_uid, avatar, phone, created_at
            "#,
            user_id as _,
            first_name,
            last_name,
            email,
            username,
            password_hash,
            Role::Client.code()
        )
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 一意制約に引っかかった場合は行が返らない
        let row = row.ok_or_else(|| {
            AppError::Conflict("email or username is already registered".into())
        })?;
        User::try_from(row)
    }

    async fn update_profile(&self, event: UpdateProfile) -> AppResult<()> {
        let UpdateProfile {
            user_id,
            first_name,
            last_name,
            phone,
            avatar,
            firebase_uid,
        } = event;

        let res = sqlx::query!(
            r#"
                UPDATE credentials
                SET
                    first_name = COALESCE($2, first_name),
                    last_name = COALESCE($3, last_name),
                    phone = COALESCE($4, phone),
                    avatar = COALESCE($5, avatar),
                    firebase_uid = COALESCE($6, firebase_uid),
                    updated_at = CURRENT_TIMESTAMP
                WHERE user_id = $1
            "#,
            user_id as _,
            first_name,
            last_name,
            phone,
            avatar,
            firebase_uid
        )
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e.as_database_error().and_then(|d| d.code()) {
            Some(code) if code == "23505" => {
                AppError::Conflict("firebase uid is already linked to another user".into())
            }
            _ => AppError::SpecificOperationError(e),
        })?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }
        Ok(())
    }

    async fn update_role(&self, event: UpdateUserRole) -> AppResult<()> {
        let res = sqlx::query!(
            "UPDATE credentials SET role = $2, updated_at = CURRENT_TIMESTAMP WHERE user_id = $1",
            event.user_id as _,
            event.role.code()
        )
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, username: &str) -> CreateUser {
        CreateUser {
            first_name: "Mara".into(),
            last_name: "Santos".into(),
            email: email.into(),
            username: username.into(),
            password: "s3cret-pass".into(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server"]
    async fn registers_client_and_rejects_duplicates(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        let user = repo.create(new_user("mara@example.com", "mara")).await?;
        assert_eq!(user.role, Role::Client);

        let found = repo.find_current_user(user.user_id).await?;
        assert_eq!(found.as_ref().map(|u| u.email.as_str()), Some("mara@example.com"));

        let dup = repo.create(new_user("mara@example.com", "other")).await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));

        repo.update_role(UpdateUserRole {
            user_id: user.user_id,
            role: Role::Admin,
        })
        .await?;
        let promoted = repo.find_current_user(user.user_id).await?.unwrap();
        assert_eq!(promoted.role, Role::Admin);
        Ok(())
    }
}
