use super::{
    admin::build_admin_routers, assistant::build_assistant_routers, auth::build_auth_routers,
    booking::build_booking_routers, chat::build_chat_routers,
    health::build_health_check_routers, notification::build_notification_routers,
    user::build_user_router, vendor::build_vendor_routers, venue::build_venue_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes(registry: AppRegistry) -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers(registry))
        .merge(build_user_router())
        .merge(build_vendor_routers())
        .merge(build_venue_routers())
        .merge(build_booking_routers())
        .merge(build_notification_routers())
        .merge(build_admin_routers())
        .merge(build_chat_routers())
        .merge(build_assistant_routers());
    Router::new().nest("/api/v1", router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter::database::{connect_database_with, ConnectionPool};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::{Days, Utc};
    use kernel::model::{
        id::{UserId, VenueId},
        user::event::CreateUser,
        vendor::event::CreateVendor,
    };
    use shared::config::{AppConfig, AssistantConfig, AuthConfig, DatabaseConfig, ServerConfig};
    use tower::ServiceExt;

    fn database() -> DatabaseConfig {
        DatabaseConfig {
            host: "localhost".into(),
            port: 5432,
            username: "app".into(),
            password: "passwd".into(),
            database: "app".into(),
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            database: database(),
            server: ServerConfig { port: 8080 },
            auth: AuthConfig {
                jwt_secret: "test-secret".into(),
                ttl: 3600,
                login_rate_limit: 10,
                login_rate_window_secs: 60,
            },
            assistant: AssistantConfig {
                api_url: "http://localhost:9/v1/chat/completions".into(),
                api_key: None,
                model: "test-model".into(),
                rate_limit: 10,
                rate_window_secs: 60,
                max_message_chars: 1000,
            },
        }
    }

    fn router(registry: AppRegistry) -> Router {
        Router::new()
            .merge(routes(registry.clone()))
            .with_state(registry)
    }

    // 接続は遅延されるので DB が無くても組み立てられる
    fn app() -> Router {
        let pool = connect_database_with(&database());
        router(AppRegistry::new(pool, config()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_check_is_public() {
        let res = app().oneshot(get("/api/v1/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let res = app().oneshot(get("/api/v1/users/me")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app().oneshot(get("/api/v1/bookings")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let req = Request::builder()
            .uri("/api/v1/notifications")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_is_rate_limited_per_ip() {
        let app = app();
        let login = || {
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "198.51.100.4")
                .body(Body::from("{}"))
                .unwrap()
        };

        // 本文が不正なので DB に触れる前に 422 で返る
        for _ in 0..10 {
            let res = app.clone().oneshot(login()).await.unwrap();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
        let res = app.clone().oneshot(login()).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn malformed_json_is_answered_with_a_json_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "198.51.100.9")
            .body(Body::from("{\"email\": "))
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn missing_content_type_is_a_json_error_too() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header("x-forwarded-for", "198.51.100.10")
            .body(Body::from("{}"))
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].is_string());
    }

    async fn register(registry: &AppRegistry, name: &str) -> anyhow::Result<(UserId, String)> {
        let user = registry
            .user_repository()
            .create(CreateUser {
                first_name: name.into(),
                last_name: "Test".into(),
                email: format!("{name}@example.com"),
                username: name.into(),
                password: "password123".into(),
            })
            .await?;
        let token = registry.auth_repository().create_token(user.user_id).await?;
        Ok((user.user_id, format!("Bearer {}", token.0)))
    }

    fn authorized(
        method: &str,
        uri: &str,
        bearer: &str,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, bearer);
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[sqlx::test(migrations = "../adapter/migrations")]
    #[ignore = "requires a PostgreSQL server"]
    async fn calendar_of_an_unapproved_vendor_is_hidden(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let registry = AppRegistry::new(ConnectionPool::new(pool), config())?;
        let (owner, owner_bearer) = register(&registry, "owner").await?;
        let (_, client_bearer) = register(&registry, "client").await?;
        let vendor_id = registry
            .vendor_repository()
            .create(CreateVendor {
                user_id: owner,
                business_name: "Lumen Studio".into(),
                category: "Photography".into(),
                description: String::new(),
                pricing: String::new(),
            })
            .await?;
        let app = router(registry);
        let uri = format!("/api/v1/vendors/{vendor_id}/availability?from=2030-01-01&to=2030-01-07");

        // 審査待ちのベンダーは本人以外には存在しないものとして扱う
        let res = app.clone().oneshot(authorized("GET", &uri, &client_bearer, None)).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = app.clone().oneshot(authorized("GET", &uri, &owner_bearer, None)).await?;
        assert_eq!(res.status(), StatusCode::OK);

        let unknown = format!(
            "/api/v1/venues/{}/availability?from=2030-01-01&to=2030-01-07",
            VenueId::new()
        );
        let res = app.clone().oneshot(authorized("GET", &unknown, &client_bearer, None)).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = app
            .oneshot(authorized(
                "GET",
                "/api/v1/vendors/not-a-uuid/availability?from=2030-01-01&to=2030-01-07",
                &client_bearer,
                None,
            ))
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&body)?;
        assert!(body["error"].is_string());
        Ok(())
    }

    #[sqlx::test(migrations = "../adapter/migrations")]
    #[ignore = "requires a PostgreSQL server"]
    async fn bookings_in_the_past_are_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let registry = AppRegistry::new(ConnectionPool::new(pool.clone()), config())?;
        let (owner, _) = register(&registry, "owner").await?;
        let (_, client_bearer) = register(&registry, "client").await?;
        let vendor_id = registry
            .vendor_repository()
            .create(CreateVendor {
                user_id: owner,
                business_name: "Lumen Studio".into(),
                category: "Photography".into(),
                description: String::new(),
                pricing: String::new(),
            })
            .await?;
        sqlx::query("UPDATE event_service_providers SET status = 'Approved' WHERE vendor_id = $1")
            .bind(vendor_id)
            .execute(&pool)
            .await?;
        let app = router(registry);

        let today = Utc::now().date_naive();
        let book = |date: chrono::NaiveDate| {
            authorized(
                "POST",
                "/api/v1/bookings/vendor",
                &client_bearer,
                Some(serde_json::json!({ "vendorId": vendor_id, "eventDate": date })),
            )
        };

        let yesterday = today.checked_sub_days(Days::new(1)).unwrap();
        let res = app.clone().oneshot(book(yesterday)).await?;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let next_week = today.checked_add_days(Days::new(7)).unwrap();
        let res = app.oneshot(book(next_week)).await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        Ok(())
    }
}
