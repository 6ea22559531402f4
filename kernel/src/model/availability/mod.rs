use crate::model::booking::{BookingStatus, DateRange};
use chrono::NaiveDate;
use shared::error::{AppError, AppResult};
use std::collections::HashMap;

pub mod event;

pub const MAX_CALENDAR_DAYS: i64 = 366;

/// vendor_availability / venue_availability の 1 行
#[derive(Debug, Clone)]
pub struct AvailabilityOverride {
    pub date: NaiveDate,
    pub is_available: bool,
    pub note: String,
}

/// カレンダー計算に必要な予約の情報だけを持つ
#[derive(Debug, Clone)]
pub struct BookedSpan {
    pub range: DateRange,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Available,
    Unavailable,
    Pending,
    Booked,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub note: Option<String>,
}

pub fn ensure_calendar_range(range: &DateRange) -> AppResult<()> {
    if range.num_days() > MAX_CALENDAR_DAYS {
        return Err(AppError::UnprocessableEntity(format!(
            "calendar range must not exceed {MAX_CALENDAR_DAYS} days"
        )));
    }
    Ok(())
}

/// 上書き設定と予約をマージして日ごとの状態を求める。
/// 予約は上書き設定より優先し、Cancelled / Rejected の予約は無視する。
pub fn build_calendar(
    range: &DateRange,
    overrides: &[AvailabilityOverride],
    bookings: &[BookedSpan],
) -> AppResult<Vec<CalendarDay>> {
    ensure_calendar_range(range)?;

    let overrides: HashMap<NaiveDate, &AvailabilityOverride> =
        overrides.iter().map(|o| (o.date, o)).collect();

    let days = range
        .days()
        .map(|date| {
            let mut booked = false;
            let mut pending = false;
            for span in bookings.iter().filter(|b| b.range.contains(date)) {
                if span.status.is_settled() {
                    booked = true;
                } else if span.status.is_active() {
                    pending = true;
                }
            }

            let ov = overrides.get(&date);
            let status = if booked {
                DayStatus::Booked
            } else if pending {
                DayStatus::Pending
            } else if ov.is_some_and(|o| !o.is_available) {
                DayStatus::Unavailable
            } else {
                DayStatus::Available
            };

            CalendarDay {
                date,
                status,
                note: ov.map(|o| o.note.clone()).filter(|n| !n.is_empty()),
            }
        })
        .collect();

    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn span(from: u32, to: u32, status: BookingStatus) -> BookedSpan {
        BookedSpan {
            range: DateRange::new(date(from), date(to)).unwrap(),
            status,
        }
    }

    #[test]
    fn merges_bookings_and_overrides() {
        let range = DateRange::new(date(1), date(6)).unwrap();
        let overrides = vec![
            AvailabilityOverride {
                date: date(2),
                is_available: false,
                note: "maintenance".into(),
            },
            AvailabilityOverride {
                date: date(4),
                is_available: false,
                note: String::new(),
            },
            AvailabilityOverride {
                date: date(6),
                is_available: true,
                note: "extra opening".into(),
            },
        ];
        let bookings = vec![
            span(3, 4, BookingStatus::Confirmed),
            span(5, 5, BookingStatus::Pending),
            span(1, 1, BookingStatus::Cancelled),
        ];

        let days = build_calendar(&range, &overrides, &bookings).unwrap();
        let statuses: Vec<_> = days.iter().map(|d| d.status).collect();
        assert_eq!(
            statuses,
            vec![
                DayStatus::Available,
                DayStatus::Unavailable,
                DayStatus::Booked,
                DayStatus::Booked,
                DayStatus::Pending,
                DayStatus::Available,
            ]
        );
        assert_eq!(days[1].note.as_deref(), Some("maintenance"));
        assert_eq!(days[3].note, None);
        assert_eq!(days[5].note.as_deref(), Some("extra opening"));
    }

    #[test]
    fn confirmed_wins_over_pending_on_same_day() {
        let range = DateRange::single(date(10));
        let bookings = vec![
            span(10, 10, BookingStatus::Pending),
            span(9, 11, BookingStatus::Completed),
        ];
        let days = build_calendar(&range, &[], &bookings).unwrap();
        assert_eq!(days[0].status, DayStatus::Booked);
    }

    #[test]
    fn rejects_oversized_range() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2027, 1, 3).unwrap(),
        )
        .unwrap();
        assert!(build_calendar(&range, &[], &[]).is_err());
    }
}
