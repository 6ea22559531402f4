use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    booking::{
        capacity_warning,
        event::{CreateBooking, IncomingBookingQuery, UpdateBookingStatus},
        Booking, BookingActor, BookingCreated, BookingStatus, BookingTarget, DateRange,
    },
    id::{BookingId, UserId, VendorId, VenueId},
    notification::{NewNotification, NotificationKind},
    vendor::ApprovalStatus,
    venue::VenueStatus,
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};
use sqlx::PgConnection;

use crate::database::{
    conflict_on_serialization_failure,
    model::{
        booking::{BookingRow, BookingStateRow, BookingTargetRow},
        parse_stored,
    },
    ConnectionPool,
};
use crate::repository::{
    availability::{availability_table, first_closed_day},
    notification::insert_notification,
};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<BookingCreated> {
        let mut tx = self.db.begin_serializable().await?;

        let created = create_within(&mut *tx, event)
            .await
            .map_err(conflict_on_serialization_failure)?;

        tx.commit()
            .await
            .map_err(AppError::TransactionError)
            .map_err(conflict_on_serialization_failure)?;

        Ok(created)
    }

    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<()> {
        let mut tx = self.db.begin_serializable().await?;

        update_status_within(&mut *tx, event)
            .await
            .map_err(conflict_on_serialization_failure)?;

        tx.commit()
            .await
            .map_err(AppError::TransactionError)
            .map_err(conflict_on_serialization_failure)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as!(
            BookingRow,
            r#"
                SELECT
                    b.booking_id,
                    b.user_id,
                    (c.first_name || ' ' || c.last_name) AS "client_name!",
                    c.email AS client_email,
                    b.vendor_id AS "vendor_id: _",
                    b.venue_id AS "venue_id: _",
                    COALESCE(v.business_name, l.venue_name) AS "target_name!",
                    COALESCE(v.user_id, l.user_id) AS "owner_id!",
                    b.start_date,
                    b.end_date,
                    b.guest_count,
                    b.status,
                    b.notes,
                    b.amount,
                    b.created_at,
                    b.updated_at
                FROM bookings AS b
                INNER JOIN credentials AS c ON c.user_id = b.user_id
                LEFT JOIN event_service_providers AS v ON v.vendor_id = b.vendor_id
                LEFT JOIN venue_listings AS l ON l.venue_id = b.venue_id
                WHERE b.booking_id = $1
            "#,
            booking_id as _
        )
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Booking::try_from)
        .transpose()
    }

    async fn find_by_client(&self, user_id: UserId) -> AppResult<Vec<Booking>> {
        sqlx::query_as!(
            BookingRow,
            r#"
                SELECT
                    b.booking_id,
                    b.user_id,
                    (c.first_name || ' ' || c.last_name) AS "client_name!",
                    c.email AS client_email,
                    b.vendor_id AS "vendor_id: _",
                    b.venue_id AS "venue_id: _",
                    COALESCE(v.business_name, l.venue_name) AS "target_name!",
                    COALESCE(v.user_id, l.user_id) AS "owner_id!",
                    b.start_date,
                    b.end_date,
                    b.guest_count,
                    b.status,
                    b.notes,
                    b.amount,
                    b.created_at,
                    b.updated_at
                FROM bookings AS b
                INNER JOIN credentials AS c ON c.user_id = b.user_id
                LEFT JOIN event_service_providers AS v ON v.vendor_id = b.vendor_id
                LEFT JOIN venue_listings AS l ON l.venue_id = b.venue_id
                WHERE b.user_id = $1
                ORDER BY b.start_date DESC, b.created_at DESC
            "#,
            user_id as _
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Booking::try_from)
        .collect()
    }

    async fn find_incoming(&self, query: IncomingBookingQuery) -> AppResult<Vec<Booking>> {
        sqlx::query_as!(
            BookingRow,
            r#"
                SELECT
                    b.booking_id,
                    b.user_id,
                    (c.first_name || ' ' || c.last_name) AS "client_name!",
                    c.email AS client_email,
                    b.vendor_id AS "vendor_id: _",
                    b.venue_id AS "venue_id: _",
                    COALESCE(v.business_name, l.venue_name) AS "target_name!",
                    COALESCE(v.user_id, l.user_id) AS "owner_id!",
                    b.start_date,
                    b.end_date,
                    b.guest_count,
                    b.status,
                    b.notes,
                    b.amount,
                    b.created_at,
                    b.updated_at
                FROM bookings AS b
                INNER JOIN credentials AS c ON c.user_id = b.user_id
                LEFT JOIN event_service_providers AS v ON v.vendor_id = b.vendor_id
                LEFT JOIN venue_listings AS l ON l.venue_id = b.venue_id
                WHERE COALESCE(v.user_id, l.user_id) = $1
                  AND ($2::TEXT IS NULL OR b.status = $2)
                ORDER BY b.start_date ASC, b.created_at ASC
            "#,
            query.owner_id as _,
            query.status.map(|s| s.as_ref().to_string())
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Booking::try_from)
        .collect()
    }
}

// 予約対象の存在確認 → 受付停止日の確認 → 重複確認 → 登録 → オーナーへの通知
async fn create_within(conn: &mut PgConnection, event: CreateBooking) -> AppResult<BookingCreated> {
    let CreateBooking {
        client_id,
        target,
        range,
        guest_count,
        notes,
        amount,
    } = event;

    let target_row = find_target(&mut *conn, target).await?;
    let bookable = match target {
        BookingTarget::Vendor(_) => {
            parse_stored::<ApprovalStatus>("event_service_providers.status", &target_row.status)?
                == ApprovalStatus::Approved
        }
        BookingTarget::Venue(_) => {
            parse_stored::<VenueStatus>("venue_listings.status", &target_row.status)?
                == VenueStatus::Active
        }
    };
    if !bookable {
        return Err(AppError::UnprocessableEntity(format!(
            "{} is not accepting bookings",
            target_row.name
        )));
    }
    if target_row.owner_id == client_id {
        return Err(AppError::UnprocessableEntity(
            "you cannot book your own listing".into(),
        ));
    }

    if let Some(closed) = first_closed_day(&mut *conn, target, range).await? {
        return Err(AppError::Conflict(format!(
            "{} is not available on {closed}",
            target_row.name
        )));
    }

    if has_overlap(&mut *conn, target, range, None, false).await? {
        return Err(AppError::Conflict(format!(
            "{} is already booked for {range}",
            target_row.name
        )));
    }

    let (vendor_id, venue_id) = target_columns(target);
    let booking_id = BookingId::new();
    let res = sqlx::query!(
        r#"
            INSERT INTO bookings
            (booking_id, user_id, vendor_id, venue_id, start_date, end_date,
             guest_count, status, notes, amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
        booking_id as _,
        client_id as _,
        vendor_id as _,
        venue_id as _,
        range.start(),
        range.end(),
        guest_count,
        BookingStatus::Pending.as_ref(),
        notes,
        amount
    )
    .execute(&mut *conn)
    .await
    .map_err(AppError::SpecificOperationError)?;

    if res.rows_affected() < 1 {
        return Err(AppError::NoRowsAffectedError(
            "No booking record has been created".into(),
        ));
    }

    insert_notification(
        &mut *conn,
        NewNotification::new(
            target_row.owner_id,
            NotificationKind::BookingRequested,
            "New booking request",
            format!("{} received a booking request for {range}.", target_row.name),
        )
        .with_booking(booking_id),
    )
    .await?;

    let warnings = target_row
        .capacity
        .and_then(|capacity| capacity_warning(capacity, guest_count))
        .into_iter()
        .collect();

    tracing::info!(%booking_id, kind = target.kind().as_ref(), %range, "booking created");

    Ok(BookingCreated {
        booking_id,
        warnings,
    })
}

async fn update_status_within(conn: &mut PgConnection, event: UpdateBookingStatus) -> AppResult<()> {
    let UpdateBookingStatus {
        booking_id,
        requested_user,
        requested_by_admin,
        status: next,
    } = event;

    let row = sqlx::query_as!(
        BookingStateRow,
        r#"
            SELECT
                b.booking_id,
                b.user_id,
                b.vendor_id AS "vendor_id: _",
                b.venue_id AS "venue_id: _",
                COALESCE(v.user_id, l.user_id) AS "owner_id!",
                COALESCE(v.business_name, l.venue_name) AS "target_name!",
                b.start_date,
                b.end_date,
                b.status
            FROM bookings AS b
            LEFT JOIN event_service_providers AS v ON v.vendor_id = b.vendor_id
            LEFT JOIN venue_listings AS l ON l.venue_id = b.venue_id
            WHERE b.booking_id = $1
            FOR UPDATE OF b
        "#,
        booking_id as _
    )
    .fetch_optional(&mut *conn)
    .await
    .map_err(AppError::SpecificOperationError)?
    .ok_or_else(|| AppError::EntityNotFound(format!("booking {booking_id} not found")))?;

    let actor = if row.user_id == requested_user {
        BookingActor::Client
    } else if row.owner_id == requested_user {
        BookingActor::Owner
    } else if requested_by_admin {
        BookingActor::Admin
    } else {
        return Err(AppError::ForbiddenOperation);
    };

    let current: BookingStatus = parse_stored("bookings.status", &row.status)?;
    current.transition(next, actor)?;

    let target = match (row.vendor_id, row.venue_id) {
        (Some(id), None) => BookingTarget::Vendor(id),
        (None, Some(id)) => BookingTarget::Venue(id),
        _ => {
            return Err(AppError::ConversionEntityError(format!(
                "booking {booking_id} must reference exactly one vendor or venue"
            )))
        }
    };
    let range = DateRange::new(row.start_date, row.end_date)?;

    // 確定時は他の確定済み予約と重ならないことを再確認する
    if next == BookingStatus::Confirmed
        && has_overlap(&mut *conn, target, range, Some(row.booking_id), true).await?
    {
        return Err(AppError::Conflict(format!(
            "{} already has a confirmed booking for {range}",
            row.target_name
        )));
    }

    let res = sqlx::query!(
        "UPDATE bookings SET status = $2, updated_at = CURRENT_TIMESTAMP WHERE booking_id = $1",
        booking_id as _,
        next.as_ref()
    )
    .execute(&mut *conn)
    .await
    .map_err(AppError::SpecificOperationError)?;

    if res.rows_affected() < 1 {
        return Err(AppError::NoRowsAffectedError(
            "No booking record has been updated".into(),
        ));
    }

    if let Some(kind) = NotificationKind::for_booking_status(next) {
        let recipients = match actor {
            BookingActor::Client => vec![row.owner_id],
            BookingActor::Owner => vec![row.user_id],
            BookingActor::Admin => vec![row.user_id, row.owner_id],
        };
        for recipient in recipients {
            insert_notification(
                &mut *conn,
                NewNotification::new(
                    recipient,
                    kind,
                    format!("Booking {}", next.as_ref().to_lowercase()),
                    format!(
                        "The booking for {} on {range} is now {}.",
                        row.target_name,
                        next.as_ref()
                    ),
                )
                .with_booking(booking_id),
            )
            .await?;
        }
    }

    tracing::info!(%booking_id, from = current.as_ref(), to = next.as_ref(), "booking status changed");
    Ok(())
}

async fn find_target(conn: &mut PgConnection, target: BookingTarget) -> AppResult<BookingTargetRow> {
    let (_, column, table) = availability_table(target.kind());
    let (name_column, capacity_column) = match target {
        BookingTarget::Vendor(_) => ("business_name", "NULL::INTEGER"),
        BookingTarget::Venue(_) => ("venue_name", "capacity"),
    };

    sqlx::query_as::<_, BookingTargetRow>(&format!(
        r#"
            SELECT user_id AS owner_id, {name_column} AS name, status, {capacity_column} AS capacity
            FROM {table}
            WHERE {column} = $1
        "#
    ))
    .bind(target.raw_id())
    .fetch_optional(conn)
    .await
    .map_err(AppError::SpecificOperationError)?
    .ok_or_else(|| AppError::EntityNotFound(format!("{} not found", target.kind().as_ref())))
}

/// bookings 上の (vendor_id, venue_id)
fn target_columns(target: BookingTarget) -> (Option<VendorId>, Option<VenueId>) {
    match target {
        BookingTarget::Vendor(id) => (Some(id), None),
        BookingTarget::Venue(id) => (None, Some(id)),
    }
}

/// 同じ対象で日付範囲が重なる予約があるか。
/// `settled_only` が true なら Confirmed / Completed のみ、false なら有効な予約すべてを対象にする。
async fn has_overlap(
    conn: &mut PgConnection,
    target: BookingTarget,
    range: DateRange,
    exclude: Option<BookingId>,
    settled_only: bool,
) -> AppResult<bool> {
    let (vendor_id, venue_id) = target_columns(target);
    let found = sqlx::query_scalar!(
        r#"
            SELECT booking_id
            FROM bookings
            WHERE (vendor_id = $1 OR venue_id = $2)
              AND CASE
                    WHEN $6 THEN status IN ('Confirmed', 'Completed')
                    ELSE status NOT IN ('Cancelled', 'Rejected')
                  END
              AND start_date <= $4
              AND $3 <= end_date
              AND ($5::UUID IS NULL OR booking_id <> $5)
            LIMIT 1
        "#,
        vendor_id as _,
        venue_id as _,
        range.start(),
        range.end(),
        exclude as _,
        settled_only
    )
    .fetch_optional(conn)
    .await
    .map_err(AppError::SpecificOperationError)?;

    Ok(found.is_some())
}
