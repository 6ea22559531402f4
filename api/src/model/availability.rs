use chrono::NaiveDate;
use garde::Validate;
use kernel::model::availability::{CalendarDay, DayStatus};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetAvailabilityRequest {
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub is_available: bool,
    #[garde(length(max = 500))]
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub enum DayStatusName {
    Available,
    Unavailable,
    Pending,
    Booked,
}

impl From<DayStatus> for DayStatusName {
    fn from(value: DayStatus) -> Self {
        match value {
            DayStatus::Available => Self::Available,
            DayStatus::Unavailable => Self::Unavailable,
            DayStatus::Pending => Self::Pending,
            DayStatus::Booked => Self::Booked,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDayResponse {
    pub date: NaiveDate,
    pub status: DayStatusName,
    pub note: Option<String>,
}

impl From<CalendarDay> for CalendarDayResponse {
    fn from(value: CalendarDay) -> Self {
        let CalendarDay { date, status, note } = value;
        Self {
            date,
            status: status.into(),
            note,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: Vec<CalendarDayResponse>,
}
