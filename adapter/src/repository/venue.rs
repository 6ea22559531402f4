use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{UserId, VenueId},
    list::PaginatedList,
    venue::{
        event::{CreateVenue, UpdateVenue},
        Venue, VenueListOptions, VenueStatus,
    },
};
use kernel::repository::venue::VenueRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::venue::VenueRow, ConnectionPool};

#[derive(new)]
pub struct VenueRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl VenueRepository for VenueRepositoryImpl {
    async fn create(&self, event: CreateVenue) -> AppResult<VenueId> {
        let venue_id = VenueId::new();
        sqlx::query!(
            r#"
                INSERT INTO venue_listings
                (venue_id, user_id, venue_name, address, capacity, amenities, pricing, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
            venue_id as _,
            event.user_id as _,
            event.venue_name,
            event.address,
            event.capacity,
            event.amenities,
            event.pricing,
            VenueStatus::Pending.as_ref()
        )
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(venue_id)
    }

    async fn find_active(&self, options: VenueListOptions) -> AppResult<PaginatedList<Venue>> {
        let VenueListOptions {
            min_capacity,
            limit,
            offset,
        } = options;

        let total = sqlx::query_scalar!(
            r#"
                SELECT COUNT(*) AS "count!" FROM venue_listings
                WHERE status = $1 AND ($2::INTEGER IS NULL OR capacity >= $2)
            "#,
            VenueStatus::Active.as_ref(),
            min_capacity
        )
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let items = sqlx::query_as!(
            VenueRow,
            r#"
                SELECT
                    l.venue_id,
                    l.venue_name,
                    l.address,
                    l.capacity,
                    l.amenities,
                    l.pricing,
                    l.status,
                    l.user_id AS owned_by,
                    (c.first_name || ' ' || c.last_name) AS "owner_name!",
                    l.created_at
                FROM venue_listings AS l
                INNER JOIN credentials AS c ON c.user_id = l.user_id
                WHERE l.status = $1 AND ($2::INTEGER IS NULL OR l.capacity >= $2)
                ORDER BY l.venue_name ASC
                LIMIT $3 OFFSET $4
            "#,
            VenueStatus::Active.as_ref(),
            min_capacity,
            limit,
            offset
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Venue::try_from)
        .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items,
        })
    }

    async fn find_by_id(&self, venue_id: VenueId) -> AppResult<Option<Venue>> {
        sqlx::query_as!(
            VenueRow,
            r#"
                SELECT
                    l.venue_id,
                    l.venue_name,
                    l.address,
                    l.capacity,
                    l.amenities,
                    l.pricing,
                    l.status,
                    l.user_id AS owned_by,
                    (c.first_name || ' ' || c.last_name) AS "owner_name!",
                    l.created_at
                FROM venue_listings AS l
                INNER JOIN credentials AS c ON c.user_id = l.user_id
                WHERE l.venue_id = $1
            "#,
            venue_id as _
        )
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Venue::try_from)
        .transpose()
    }

    async fn find_by_owner(&self, user_id: UserId) -> AppResult<Vec<Venue>> {
        sqlx::query_as!(
            VenueRow,
            r#"
                SELECT
                    l.venue_id,
                    l.venue_name,
                    l.address,
                    l.capacity,
                    l.amenities,
                    l.pricing,
                    l.status,
                    l.user_id AS owned_by,
                    (c.first_name || ' ' || c.last_name) AS "owner_name!",
                    l.created_at
                FROM venue_listings AS l
                INNER JOIN credentials AS c ON c.user_id = l.user_id
                WHERE l.user_id = $1
                ORDER BY l.created_at DESC
            "#,
            user_id as _
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Venue::try_from)
        .collect()
    }

    async fn update(&self, event: UpdateVenue) -> AppResult<()> {
        let UpdateVenue {
            venue_id,
            requested_user,
            venue_name,
            address,
            capacity,
            amenities,
            pricing,
            status,
        } = event;

        let res = sqlx::query!(
            r#"
                UPDATE venue_listings
                SET
                    venue_name = COALESCE($3, venue_name),
                    address = COALESCE($4, address),
                    capacity = COALESCE($5, capacity),
                    amenities = COALESCE($6, amenities),
                    pricing = COALESCE($7, pricing),
                    status = COALESCE($8, status),
                    updated_at = CURRENT_TIMESTAMP
                WHERE venue_id = $1 AND user_id = $2
            "#,
            venue_id as _,
            requested_user as _,
            venue_name,
            address,
            capacity,
            amenities,
            pricing,
            status.map(|s| s.as_ref().to_string())
        )
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified venue not found".into()));
        }
        Ok(())
    }
}
