//! データベースを使うテストの下ごしらえ

use kernel::model::{
    id::{UserId, VendorId, VenueId},
    user::event::CreateUser,
    vendor::event::CreateVendor,
    venue::event::CreateVenue,
};
use kernel::repository::{user::UserRepository, vendor::VendorRepository, venue::VenueRepository};

use crate::database::ConnectionPool;
use crate::repository::{
    user::UserRepositoryImpl, vendor::VendorRepositoryImpl, venue::VenueRepositoryImpl,
};

pub(crate) async fn user(db: &ConnectionPool, name: &str) -> anyhow::Result<UserId> {
    let user = UserRepositoryImpl::new(db.clone())
        .create(CreateUser {
            first_name: name.into(),
            last_name: "Test".into(),
            email: format!("{name}@example.com"),
            username: name.into(),
            password: "password123".into(),
        })
        .await?;
    Ok(user.user_id)
}

pub(crate) async fn admin(db: &ConnectionPool, name: &str) -> anyhow::Result<UserId> {
    let user_id = user(db, name).await?;
    sqlx::query("UPDATE credentials SET role = 2 WHERE user_id = $1")
        .bind(user_id)
        .execute(db.inner_ref())
        .await?;
    Ok(user_id)
}

pub(crate) async fn role_code(db: &ConnectionPool, user_id: UserId) -> anyhow::Result<i16> {
    let code = sqlx::query_scalar("SELECT role FROM credentials WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db.inner_ref())
        .await?;
    Ok(code)
}

pub(crate) async fn pending_vendor(db: &ConnectionPool, owner: UserId) -> anyhow::Result<VendorId> {
    let vendor_id = VendorRepositoryImpl::new(db.clone())
        .create(CreateVendor {
            user_id: owner,
            business_name: "Lumen Studio".into(),
            category: "Photography".into(),
            description: String::new(),
            pricing: "from 15,000".into(),
        })
        .await?;
    Ok(vendor_id)
}

pub(crate) async fn approved_vendor(db: &ConnectionPool, owner: UserId) -> anyhow::Result<VendorId> {
    let vendor_id = pending_vendor(db, owner).await?;
    sqlx::query("UPDATE event_service_providers SET status = 'Approved' WHERE vendor_id = $1")
        .bind(vendor_id)
        .execute(db.inner_ref())
        .await?;
    Ok(vendor_id)
}

pub(crate) async fn active_venue(db: &ConnectionPool, owner: UserId) -> anyhow::Result<VenueId> {
    let venue_id = VenueRepositoryImpl::new(db.clone())
        .create(CreateVenue {
            user_id: owner,
            venue_name: "Harbor Hall".into(),
            address: "1-2-3 Minato".into(),
            capacity: 120,
            amenities: "stage, parking".into(),
            pricing: "from 200,000".into(),
        })
        .await?;
    sqlx::query("UPDATE venue_listings SET status = 'Active' WHERE venue_id = $1")
        .bind(venue_id)
        .execute(db.inner_ref())
        .await?;
    Ok(venue_id)
}

/// 受け取った通知の種別（古い順）
pub(crate) async fn notification_kinds(
    db: &ConnectionPool,
    user_id: UserId,
) -> anyhow::Result<Vec<String>> {
    let kinds = sqlx::query_scalar(
        "SELECT kind FROM notifications WHERE user_id = $1 ORDER BY created_at, kind",
    )
    .bind(user_id)
    .fetch_all(db.inner_ref())
    .await?;
    Ok(kinds)
}
