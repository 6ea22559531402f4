use crate::model::id::{BookingId, UserId, VendorId, VenueId};
use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, EnumString};

pub mod event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
    Completed,
}

/// 予約に対して操作を行う立場
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingActor {
    Client,
    Owner,
    Admin,
}

impl BookingStatus {
    /// Cancelled / Rejected 以外はカレンダー上の枠を押さえる
    pub fn is_active(self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::Rejected)
    }

    /// 確定済みの予約（Confirmed / Completed）
    pub fn is_settled(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Completed)
    }

    /// 遷移が許可されていれば Ok。存在しない遷移は 422、立場が足りない場合は 403。
    pub fn transition(self, next: BookingStatus, actor: BookingActor) -> AppResult<()> {
        use BookingActor::*;
        use BookingStatus::*;

        let allowed: &[BookingActor] = match (self, next) {
            (Pending, Confirmed) | (Pending, Rejected) => &[Owner, Admin],
            (Pending, Cancelled) | (Confirmed, Cancelled) => &[Client, Owner, Admin],
            (Confirmed, Completed) => &[Owner, Admin],
            _ => {
                return Err(AppError::UnprocessableEntity(format!(
                    "booking cannot move from {} to {}",
                    self.as_ref(),
                    next.as_ref()
                )))
            }
        };

        if allowed.contains(&actor) {
            Ok(())
        } else {
            Err(AppError::ForbiddenOperation)
        }
    }
}

/// 両端を含む日付の範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::UnprocessableEntity(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    // existing.start <= new.end AND new.start <= existing.end
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.checked_add_days(Days::new(1)))
            .take_while(move |d| *d <= end)
    }

    pub fn ensure_not_before(&self, today: NaiveDate) -> AppResult<()> {
        if self.start < today {
            return Err(AppError::UnprocessableEntity(format!(
                "cannot book dates in the past ({})",
                self.start
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum TargetKind {
    Vendor,
    Venue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingTarget {
    Vendor(VendorId),
    Venue(VenueId),
}

impl BookingTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            BookingTarget::Vendor(_) => TargetKind::Vendor,
            BookingTarget::Venue(_) => TargetKind::Venue,
        }
    }

    pub fn raw_id(&self) -> uuid::Uuid {
        match self {
            BookingTarget::Vendor(id) => id.raw(),
            BookingTarget::Venue(id) => id.raw(),
        }
    }
}

#[derive(Debug)]
pub struct BookingClient {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug)]
pub struct Booking {
    pub booking_id: BookingId,
    pub client: BookingClient,
    pub target: BookingTarget,
    pub target_name: String,
    pub owner_id: UserId,
    pub range: DateRange,
    pub guest_count: Option<i32>,
    pub status: BookingStatus,
    pub notes: String,
    pub amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// 予約の当事者でなければ None（管理者は常に Admin）
    pub fn actor_for(&self, user_id: UserId, is_admin: bool) -> Option<BookingActor> {
        if self.client.user_id == user_id {
            Some(BookingActor::Client)
        } else if self.owner_id == user_id {
            Some(BookingActor::Owner)
        } else if is_admin {
            Some(BookingActor::Admin)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct BookingCreated {
    pub booking_id: BookingId,
    pub warnings: Vec<String>,
}

/// 定員超過は予約を止めずに警告として返す
pub fn capacity_warning(capacity: i32, guest_count: Option<i32>) -> Option<String> {
    match guest_count {
        Some(guests) if guests > capacity => Some(format!(
            "guest count {guests} exceeds the venue capacity of {capacity}"
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ranges_overlap_inclusively() {
        let a = DateRange::new(date(2026, 6, 1), date(2026, 6, 3)).unwrap();
        let touching = DateRange::new(date(2026, 6, 3), date(2026, 6, 5)).unwrap();
        let after = DateRange::new(date(2026, 6, 4), date(2026, 6, 5)).unwrap();
        let inside = DateRange::single(date(2026, 6, 2));

        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&after));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn rejects_reversed_range() {
        let err = DateRange::new(date(2026, 6, 3), date(2026, 6, 1)).unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn iterates_every_day_of_range() {
        let range = DateRange::new(date(2026, 2, 27), date(2026, 3, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(range.num_days(), 4);
        assert_eq!(
            days,
            vec![
                date(2026, 2, 27),
                date(2026, 2, 28),
                date(2026, 3, 1),
                date(2026, 3, 2)
            ]
        );
    }

    #[test]
    fn formats_single_day_and_span() {
        assert_eq!(DateRange::single(date(2026, 6, 1)).to_string(), "2026-06-01");
        let span = DateRange::new(date(2026, 6, 1), date(2026, 6, 3)).unwrap();
        assert_eq!(span.to_string(), "2026-06-01 to 2026-06-03");
    }

    #[test]
    fn past_dates_are_rejected() {
        let range = DateRange::single(date(2026, 1, 1));
        assert!(range.ensure_not_before(date(2026, 1, 2)).is_err());
        assert!(range.ensure_not_before(date(2026, 1, 1)).is_ok());
    }

    #[test]
    fn status_transitions_follow_the_table() {
        use BookingActor::*;
        use BookingStatus::*;

        assert!(Pending.transition(Confirmed, Owner).is_ok());
        assert!(Pending.transition(Confirmed, Admin).is_ok());
        assert!(matches!(
            Pending.transition(Confirmed, Client),
            Err(AppError::ForbiddenOperation)
        ));
        assert!(Pending.transition(Cancelled, Client).is_ok());
        assert!(Confirmed.transition(Cancelled, Client).is_ok());
        assert!(Confirmed.transition(Completed, Owner).is_ok());
        assert!(matches!(
            Confirmed.transition(Completed, Client),
            Err(AppError::ForbiddenOperation)
        ));
        assert!(matches!(
            Cancelled.transition(Confirmed, Owner),
            Err(AppError::UnprocessableEntity(_))
        ));
        assert!(matches!(
            Pending.transition(Completed, Owner),
            Err(AppError::UnprocessableEntity(_))
        ));
        assert!(matches!(
            Completed.transition(Cancelled, Admin),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn cancelled_and_rejected_free_the_calendar() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Completed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(!BookingStatus::Rejected.is_active());
        assert!(!BookingStatus::Pending.is_settled());
    }

    #[test]
    fn warns_only_when_guests_exceed_capacity() {
        assert!(capacity_warning(100, Some(120)).is_some());
        assert!(capacity_warning(100, Some(100)).is_none());
        assert!(capacity_warning(100, None).is_none());
    }

    #[test]
    fn status_parses_from_stored_text() {
        assert_eq!("Confirmed".parse::<BookingStatus>().ok(), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::Cancelled.as_ref(), "Cancelled");
    }
}
