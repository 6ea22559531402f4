use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{UserId, VendorId},
    list::PaginatedList,
    vendor::{
        event::{CreateVendor, UpdateVendor},
        ApprovalStatus, Vendor, VendorListOptions,
    },
};
use kernel::repository::vendor::VendorRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::vendor::VendorRow, ConnectionPool};

#[derive(new)]
pub struct VendorRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl VendorRepository for VendorRepositoryImpl {
    async fn create(&self, event: CreateVendor) -> AppResult<VendorId> {
        let vendor_id = VendorId::new();
        let res = sqlx::query!(
            r#"
                INSERT INTO event_service_providers
                (vendor_id, user_id, business_name, category, description, pricing, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (user_id) DO NOTHING
            "#,
            vendor_id as _,
            event.user_id as _,
            event.business_name,
            event.category,
            event.description,
            event.pricing,
            ApprovalStatus::Pending.as_ref()
        )
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::Conflict(
                "this user already has a vendor profile".into(),
            ));
        }
        Ok(vendor_id)
    }

    async fn find_approved(&self, options: VendorListOptions) -> AppResult<PaginatedList<Vendor>> {
        let VendorListOptions {
            category,
            limit,
            offset,
        } = options;

        let total = sqlx::query_scalar!(
            r#"
                SELECT COUNT(*) AS "count!" FROM event_service_providers
                WHERE status = $1 AND ($2::TEXT IS NULL OR LOWER(category) = LOWER($2))
            "#,
            ApprovalStatus::Approved.as_ref(),
            category.as_deref()
        )
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let items = sqlx::query_as!(
            VendorRow,
            r#"
                SELECT
                    v.vendor_id,
                    v.business_name,
                    v.category,
                    v.description,
                    v.pricing,
                    v.status,
                    v.user_id AS owned_by,
                    (c.first_name || ' ' || c.last_name) AS "owner_name!",
                    v.created_at
                FROM event_service_providers AS v
                INNER JOIN credentials AS c ON c.user_id = v.user_id
                WHERE v.status = $1 AND ($2::TEXT IS NULL OR LOWER(v.category) = LOWER($2))
                ORDER BY v.business_name ASC
                LIMIT $3 OFFSET $4
            "#,
            ApprovalStatus::Approved.as_ref(),
            category.as_deref(),
            limit,
            offset
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Vendor::try_from)
        .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items,
        })
    }

    async fn find_by_id(&self, vendor_id: VendorId) -> AppResult<Option<Vendor>> {
        sqlx::query_as!(
            VendorRow,
            r#"
                SELECT
                    v.vendor_id,
                    v.business_name,
                    v.category,
                    v.description,
                    v.pricing,
                    v.status,
                    v.user_id AS owned_by,
                    (c.first_name || ' ' || c.last_name) AS "owner_name!",
                    v.created_at
                FROM event_service_providers AS v
                INNER JOIN credentials AS c ON c.user_id = v.user_id
                WHERE v.vendor_id = $1
            "#,
            vendor_id as _
        )
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Vendor::try_from)
        .transpose()
    }

    async fn find_by_owner(&self, user_id: UserId) -> AppResult<Option<Vendor>> {
        sqlx::query_as!(
            VendorRow,
            r#"
                SELECT
                    v.vendor_id,
                    v.business_name,
                    v.category,
                    v.description,
                    v.pricing,
                    v.status,
                    v.user_id AS owned_by,
                    (c.first_name || ' ' || c.last_name) AS "owner_name!",
                    v.created_at
                FROM event_service_providers AS v
                INNER JOIN credentials AS c ON c.user_id = v.user_id
                WHERE v.user_id = $1
            "#,
            user_id as _
        )
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Vendor::try_from)
        .transpose()
    }

    async fn update(&self, event: UpdateVendor) -> AppResult<()> {
        let UpdateVendor {
            vendor_id,
            requested_user,
            business_name,
            category,
            description,
            pricing,
        } = event;

        // オーナー以外の更新は WHERE 句で弾かれる
        let res = sqlx::query!(
            r#"
                UPDATE event_service_providers
                SET
                    business_name = COALESCE($3, business_name),
                    category = COALESCE($4, category),
                    description = COALESCE($5, description),
                    pricing = COALESCE($6, pricing),
                    updated_at = CURRENT_TIMESTAMP
                WHERE vendor_id = $1 AND user_id = $2
            "#,
            vendor_id as _,
            requested_user as _,
            business_name,
            category,
            description,
            pricing
        )
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified vendor not found".into()));
        }
        Ok(())
    }
}
