use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    availability::{
        build_calendar, ensure_calendar_range,
        event::{DeleteAvailability, SetAvailability},
        AvailabilityOverride, BookedSpan, CalendarDay,
    },
    booking::{BookingTarget, DateRange, TargetKind},
    id::UserId,
};
use kernel::repository::availability::AvailabilityRepository;
use shared::error::{AppError, AppResult};
use sqlx::PgConnection;

use crate::database::{
    conflict_on_serialization_failure,
    model::{availability::AvailabilityRow, booking::BookedSpanRow},
    ConnectionPool,
};

/// (上書き設定のテーブル, 対象 ID の列, 対象のテーブル)
pub(crate) fn availability_table(kind: TargetKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        TargetKind::Vendor => ("vendor_availability", "vendor_id", "event_service_providers"),
        TargetKind::Venue => ("venue_availability", "venue_id", "venue_listings"),
    }
}

/// bookings 上で予約対象を指す列
fn booking_column(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Vendor => "vendor_id",
        TargetKind::Venue => "venue_id",
    }
}

/// 範囲内で受付停止になっている最初の日
pub(crate) async fn first_closed_day(
    conn: &mut PgConnection,
    target: BookingTarget,
    range: DateRange,
) -> AppResult<Option<chrono::NaiveDate>> {
    let (table, column, _) = availability_table(target.kind());
    sqlx::query_scalar::<_, chrono::NaiveDate>(&format!(
        r#"
            SELECT date FROM {table}
            WHERE {column} = $1
              AND date BETWEEN $2 AND $3
              AND is_available = FALSE
            ORDER BY date ASC
            LIMIT 1
        "#
    ))
    .bind(target.raw_id())
    .bind(range.start())
    .bind(range.end())
    .fetch_optional(conn)
    .await
    .map_err(AppError::SpecificOperationError)
}

#[derive(new)]
pub struct AvailabilityRepositoryImpl {
    db: ConnectionPool,
}

/// 対象が存在し、かつ `user_id` がそのオーナーであること
async fn ensure_owner(conn: &mut PgConnection, target: BookingTarget, user_id: UserId) -> AppResult<()> {
    let (_, column, owner_table) = availability_table(target.kind());
    let owner = sqlx::query_scalar::<_, UserId>(&format!(
        "SELECT user_id FROM {owner_table} WHERE {column} = $1"
    ))
    .bind(target.raw_id())
    .fetch_optional(conn)
    .await
    .map_err(AppError::SpecificOperationError)?;

    match owner {
        None => Err(AppError::EntityNotFound(format!(
            "{} not found",
            target.kind().as_ref()
        ))),
        Some(owner) if owner != user_id => Err(AppError::ForbiddenOperation),
        Some(_) => Ok(()),
    }
}

async fn upsert_within(conn: &mut PgConnection, event: SetAvailability) -> AppResult<()> {
    let SetAvailability {
        target,
        requested_user,
        date,
        is_available,
        note,
    } = event;
    ensure_owner(&mut *conn, target, requested_user).await?;

    let (table, column, _) = availability_table(target.kind());
    sqlx::query(&format!(
        r#"
            INSERT INTO {table} ({column}, date, is_available, note)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ({column}, date)
            DO UPDATE SET is_available = EXCLUDED.is_available, note = EXCLUDED.note
        "#
    ))
    .bind(target.raw_id())
    .bind(date)
    .bind(is_available)
    .bind(note)
    .execute(conn)
    .await
    .map_err(AppError::SpecificOperationError)?;

    Ok(())
}

async fn delete_within(conn: &mut PgConnection, event: DeleteAvailability) -> AppResult<()> {
    ensure_owner(&mut *conn, event.target, event.requested_user).await?;

    let (table, column, _) = availability_table(event.target.kind());
    let res = sqlx::query(&format!("DELETE FROM {table} WHERE {column} = $1 AND date = $2"))
        .bind(event.target.raw_id())
        .bind(event.date)
        .execute(conn)
        .await
        .map_err(AppError::SpecificOperationError)?;

    if res.rows_affected() < 1 {
        return Err(AppError::EntityNotFound(format!(
            "no availability override on {}",
            event.date
        )));
    }
    Ok(())
}

#[async_trait]
impl AvailabilityRepository for AvailabilityRepositoryImpl {
    async fn calendar(&self, target: BookingTarget, range: DateRange) -> AppResult<Vec<CalendarDay>> {
        ensure_calendar_range(&range)?;
        let kind = target.kind();
        let (table, column, _) = availability_table(kind);

        let overrides: Vec<AvailabilityOverride> = sqlx::query_as::<_, AvailabilityRow>(&format!(
            r#"
                SELECT date, is_available, note FROM {table}
                WHERE {column} = $1 AND date BETWEEN $2 AND $3
            "#
        ))
        .bind(target.raw_id())
        .bind(range.start())
        .bind(range.end())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(AvailabilityOverride::from)
        .collect();

        let bookings = sqlx::query_as::<_, BookedSpanRow>(&format!(
            r#"
                SELECT start_date, end_date, status FROM bookings
                WHERE {} = $1
                  AND status NOT IN ('Cancelled', 'Rejected')
                  AND start_date <= $3 AND $2 <= end_date
            "#,
            booking_column(kind)
        ))
        .bind(target.raw_id())
        .bind(range.start())
        .bind(range.end())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(BookedSpan::try_from)
        .collect::<AppResult<Vec<_>>>()?;

        build_calendar(&range, &overrides, &bookings)
    }

    // 予約作成と同じく SERIALIZABLE で、受付停止日の設定と予約の競合を検出する
    async fn upsert(&self, event: SetAvailability) -> AppResult<()> {
        let mut tx = self.db.begin_serializable().await?;

        upsert_within(&mut *tx, event)
            .await
            .map_err(conflict_on_serialization_failure)?;

        tx.commit()
            .await
            .map_err(AppError::TransactionError)
            .map_err(conflict_on_serialization_failure)
    }

    async fn delete(&self, event: DeleteAvailability) -> AppResult<()> {
        let mut tx = self.db.begin_serializable().await?;

        delete_within(&mut *tx, event)
            .await
            .map_err(conflict_on_serialization_failure)?;

        tx.commit()
            .await
            .map_err(AppError::TransactionError)
            .map_err(conflict_on_serialization_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixture::{approved_vendor, user};
    use chrono::NaiveDate;
    use kernel::model::availability::DayStatus;

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server"]
    async fn only_the_owner_manages_overrides(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let owner = user(&db, "owner").await?;
        let stranger = user(&db, "stranger").await?;
        let target = BookingTarget::Vendor(approved_vendor(&db, owner).await?);
        let day = NaiveDate::from_ymd_opt(2030, 3, 15).unwrap();

        let repo = AvailabilityRepositoryImpl::new(db);
        let set = |requested_user| SetAvailability {
            target,
            requested_user,
            date: day,
            is_available: false,
            note: "holiday".into(),
        };
        let res = repo.upsert(set(stranger)).await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation)));

        repo.upsert(set(owner)).await?;
        // 同じ日への再設定は上書きになる
        repo.upsert(set(owner)).await?;

        let range = DateRange::new(day.pred_opt().unwrap(), day).unwrap();
        let calendar = repo.calendar(target, range).await?;
        assert_eq!(calendar.len(), 2);
        assert_eq!(calendar[0].status, DayStatus::Available);
        assert_eq!(calendar[1].status, DayStatus::Unavailable);
        assert_eq!(calendar[1].note.as_deref(), Some("holiday"));

        let delete = |requested_user| DeleteAvailability {
            target,
            requested_user,
            date: day,
        };
        let res = repo.delete(delete(stranger)).await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation)));
        repo.delete(delete(owner)).await?;
        let res = repo.delete(delete(owner)).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }
}
