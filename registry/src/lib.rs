use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::gateway::assistant::{DisabledAssistantGateway, HttpAssistantGateway};
use adapter::rate_limit::{RateLimit, RateLimitPolicy, RateLimiter};
use adapter::repository::{
    application::ApplicationRepositoryImpl, auth::AuthRepositoryImpl,
    availability::AvailabilityRepositoryImpl, booking::BookingRepositoryImpl,
    chat::ChatRepositoryImpl, health::HealthCheckRepositoryImpl,
    notification::NotificationRepositoryImpl, user::UserRepositoryImpl,
    vendor::VendorRepositoryImpl, venue::VenueRepositoryImpl,
};
use kernel::gateway::assistant::AssistantGateway;
use kernel::repository::{
    application::ApplicationRepository, auth::AuthRepository,
    availability::AvailabilityRepository, booking::BookingRepository, chat::ChatRepository,
    health::HealthCheckRepository, notification::NotificationRepository, user::UserRepository,
    vendor::VendorRepository, venue::VenueRepository,
};
use shared::config::{AppConfig, AssistantConfig};
use shared::error::AppResult;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    user_repository: Arc<dyn UserRepository>,
    vendor_repository: Arc<dyn VendorRepository>,
    venue_repository: Arc<dyn VenueRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    availability_repository: Arc<dyn AvailabilityRepository>,
    notification_repository: Arc<dyn NotificationRepository>,
    application_repository: Arc<dyn ApplicationRepository>,
    chat_repository: Arc<dyn ChatRepository>,
    assistant_gateway: Arc<dyn AssistantGateway>,
    rate_limiter: RateLimiter,
    assistant_config: AssistantConfig,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> AppResult<Self> {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            &app_config.auth.jwt_secret,
            app_config.auth.ttl,
        ));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let vendor_repository = Arc::new(VendorRepositoryImpl::new(pool.clone()));
        let venue_repository = Arc::new(VenueRepositoryImpl::new(pool.clone()));
        let booking_repository = Arc::new(BookingRepositoryImpl::new(pool.clone()));
        let availability_repository = Arc::new(AvailabilityRepositoryImpl::new(pool.clone()));
        let notification_repository = Arc::new(NotificationRepositoryImpl::new(pool.clone()));
        let application_repository = Arc::new(ApplicationRepositoryImpl::new(pool.clone()));
        let chat_repository = Arc::new(ChatRepositoryImpl::new(pool.clone()));

        let rate_limiter = RateLimiter::new(RateLimitPolicy {
            login: RateLimit::per_window(
                app_config.auth.login_rate_limit,
                app_config.auth.login_rate_window_secs,
            ),
            assistant: RateLimit::per_window(
                app_config.assistant.rate_limit,
                app_config.assistant.rate_window_secs,
            ),
        });

        // API キーが無ければアシスタントは 503 を返す
        let assistant_config = app_config.assistant;
        let assistant_gateway: Arc<dyn AssistantGateway> = match assistant_config.api_key.clone() {
            Some(key) => Arc::new(HttpAssistantGateway::new(&assistant_config, key)?),
            None => {
                tracing::warn!("ASSISTANT_API_KEY is not set; the assistant endpoint is disabled");
                Arc::new(DisabledAssistantGateway)
            }
        };

        Ok(Self {
            health_check_repository,
            auth_repository,
            user_repository,
            vendor_repository,
            venue_repository,
            booking_repository,
            availability_repository,
            notification_repository,
            application_repository,
            chat_repository,
            assistant_gateway,
            rate_limiter,
            assistant_config,
        })
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn vendor_repository(&self) -> Arc<dyn VendorRepository> {
        self.vendor_repository.clone()
    }

    pub fn venue_repository(&self) -> Arc<dyn VenueRepository> {
        self.venue_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn availability_repository(&self) -> Arc<dyn AvailabilityRepository> {
        self.availability_repository.clone()
    }

    pub fn notification_repository(&self) -> Arc<dyn NotificationRepository> {
        self.notification_repository.clone()
    }

    pub fn application_repository(&self) -> Arc<dyn ApplicationRepository> {
        self.application_repository.clone()
    }

    pub fn chat_repository(&self) -> Arc<dyn ChatRepository> {
        self.chat_repository.clone()
    }

    pub fn assistant_gateway(&self) -> Arc<dyn AssistantGateway> {
        self.assistant_gateway.clone()
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn assistant_config(&self) -> &AssistantConfig {
        &self.assistant_config
    }
}
