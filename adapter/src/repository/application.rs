use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{UserId, VendorId, VenueId},
    notification::{NewNotification, NotificationKind},
    role::Role,
    vendor::{ApprovalStatus, Vendor},
    venue::{Venue, VenueStatus},
};
use kernel::repository::application::{ApplicationRepository, Decision};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{parse_stored, vendor::VendorRow, venue::VenueRow},
    ConnectionPool,
};
use crate::repository::notification::insert_notification;

#[derive(new)]
pub struct ApplicationRepositoryImpl {
    db: ConnectionPool,
}

fn decision_notice(decision: Decision, subject: &str) -> (NotificationKind, String, String) {
    match decision {
        Decision::Approve => (
            NotificationKind::ApplicationApproved,
            "Application approved".to_string(),
            format!("{subject} has been approved and is now visible to clients."),
        ),
        Decision::Reject => (
            NotificationKind::ApplicationRejected,
            "Application rejected".to_string(),
            format!("{subject} was not approved."),
        ),
    }
}

#[async_trait]
impl ApplicationRepository for ApplicationRepositoryImpl {
    async fn pending_vendors(&self) -> AppResult<Vec<Vendor>> {
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
                WHERE v.status = $1
                ORDER BY v.created_at ASC
            "#,
            ApprovalStatus::Pending.as_ref()
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Vendor::try_from)
        .collect()
    }

    async fn pending_venues(&self) -> AppResult<Vec<Venue>> {
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
                WHERE l.status = $1
                ORDER BY l.created_at ASC
            "#,
            VenueStatus::Pending.as_ref()
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Venue::try_from)
        .collect()
    }

    async fn decide_vendor(
        &self,
        vendor_id: VendorId,
        decided_by: UserId,
        decision: Decision,
    ) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query!(
            r#"
                SELECT user_id, business_name, status
                FROM event_service_providers
                WHERE vendor_id = $1
                FOR UPDATE
            "#,
            vendor_id as _
        )
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound(format!("vendor {vendor_id} not found")))?;

        let owner_id = UserId::from(row.user_id);
        let business_name = row.business_name;
        let status: ApprovalStatus = parse_stored("event_service_providers.status", &row.status)?;
        if status != ApprovalStatus::Pending {
            return Err(AppError::UnprocessableEntity(format!(
                "vendor application is already {}",
                status.as_ref()
            )));
        }

        let next = match decision {
            Decision::Approve => ApprovalStatus::Approved,
            Decision::Reject => ApprovalStatus::Rejected,
        };
        sqlx::query!(
            r#"
                UPDATE event_service_providers
                SET status = $2, reviewed_by = $3, updated_at = CURRENT_TIMESTAMP
                WHERE vendor_id = $1
            "#,
            vendor_id as _,
            next.as_ref(),
            decided_by as _
        )
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if decision == Decision::Approve {
            // admin のロールはそのまま残す
            sqlx::query!(
                r#"
                    UPDATE credentials
                    SET role = $2, updated_at = CURRENT_TIMESTAMP
                    WHERE user_id = $1 AND role = $3
                "#,
                owner_id as _,
                Role::Vendor.code(),
                Role::Client.code()
            )
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        let (kind, title, message) =
            decision_notice(decision, &format!("Your vendor profile \"{business_name}\""));
        insert_notification(&mut *tx, NewNotification::new(owner_id, kind, title, message)).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        tracing::info!(%vendor_id, status = next.as_ref(), %decided_by, "vendor application decided");
        Ok(())
    }

    async fn decide_venue(
        &self,
        venue_id: VenueId,
        decided_by: UserId,
        decision: Decision,
    ) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query!(
            r#"
                SELECT user_id, venue_name, status
                FROM venue_listings
                WHERE venue_id = $1
                FOR UPDATE
            "#,
            venue_id as _
        )
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound(format!("venue {venue_id} not found")))?;

        let owner_id = UserId::from(row.user_id);
        let venue_name = row.venue_name;
        let status: VenueStatus = parse_stored("venue_listings.status", &row.status)?;
        if status != VenueStatus::Pending {
            return Err(AppError::UnprocessableEntity(format!(
                "venue application is already {}",
                status.as_ref()
            )));
        }

        let next = match decision {
            Decision::Approve => VenueStatus::Active,
            Decision::Reject => VenueStatus::Rejected,
        };
        sqlx::query!(
            r#"
                UPDATE venue_listings
                SET status = $2, reviewed_by = $3, updated_at = CURRENT_TIMESTAMP
                WHERE venue_id = $1
            "#,
            venue_id as _,
            next.as_ref(),
            decided_by as _
        )
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let (kind, title, message) =
            decision_notice(decision, &format!("Your venue listing \"{venue_name}\""));
        insert_notification(&mut *tx, NewNotification::new(owner_id, kind, title, message)).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        tracing::info!(%venue_id, status = next.as_ref(), %decided_by, "venue application decided");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_and_rejection_produce_distinct_notices() {
        let (kind, _, message) = decision_notice(Decision::Approve, "Lumen Studio");
        assert_eq!(kind, NotificationKind::ApplicationApproved);
        assert!(message.starts_with("Lumen Studio"));

        let (kind, title, _) = decision_notice(Decision::Reject, "Lumen Studio");
        assert_eq!(kind, NotificationKind::ApplicationRejected);
        assert_eq!(title, "Application rejected");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server"]
    async fn approving_a_vendor_promotes_a_client(pool: sqlx::PgPool) -> anyhow::Result<()> {
        use crate::repository::fixture::{admin, notification_kinds, pending_vendor, role_code, user};

        let db = ConnectionPool::new(pool);
        let reviewer = admin(&db, "reviewer").await?;
        let owner = user(&db, "owner").await?;
        let vendor_id = pending_vendor(&db, owner).await?;

        let repo = ApplicationRepositoryImpl::new(db.clone());
        assert_eq!(repo.pending_vendors().await?.len(), 1);

        repo.decide_vendor(vendor_id, reviewer, Decision::Approve).await?;
        assert_eq!(role_code(&db, owner).await?, Role::Vendor.code());
        assert_eq!(notification_kinds(&db, owner).await?, ["application_approved"]);
        assert!(repo.pending_vendors().await?.is_empty());

        // 決定済みの申請はやり直せない
        let again = repo.decide_vendor(vendor_id, reviewer, Decision::Reject).await;
        assert!(matches!(again, Err(AppError::UnprocessableEntity(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server"]
    async fn approving_an_admin_vendor_keeps_the_admin_role(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        use crate::repository::fixture::{admin, pending_vendor, role_code};

        let db = ConnectionPool::new(pool);
        let reviewer = admin(&db, "reviewer").await?;
        let owner = admin(&db, "owner").await?;
        let vendor_id = pending_vendor(&db, owner).await?;

        ApplicationRepositoryImpl::new(db.clone())
            .decide_vendor(vendor_id, reviewer, Decision::Approve)
            .await?;
        assert_eq!(role_code(&db, owner).await?, Role::Admin.code());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server"]
    async fn venue_decisions_only_apply_to_pending_listings(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        use crate::repository::fixture::{active_venue, admin, role_code, user};

        let db = ConnectionPool::new(pool);
        let reviewer = admin(&db, "reviewer").await?;
        let owner = user(&db, "owner").await?;
        let venue_id = active_venue(&db, owner).await?;

        let repo = ApplicationRepositoryImpl::new(db.clone());
        let res = repo.decide_venue(venue_id, reviewer, Decision::Approve).await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        let missing = repo
            .decide_venue(VenueId::new(), reviewer, Decision::Reject)
            .await;
        assert!(matches!(missing, Err(AppError::EntityNotFound(_))));

        // 会場の承認ではロールは変わらない
        assert_eq!(role_code(&db, owner).await?, Role::Client.code());
        Ok(())
    }
}
