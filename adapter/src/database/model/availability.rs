use chrono::NaiveDate;
use kernel::model::availability::AvailabilityOverride;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct AvailabilityRow {
    pub date: NaiveDate,
    pub is_available: bool,
    pub note: String,
}

impl From<AvailabilityRow> for AvailabilityOverride {
    fn from(value: AvailabilityRow) -> Self {
        let AvailabilityRow {
            date,
            is_available,
            note,
        } = value;
        AvailabilityOverride {
            date,
            is_available,
            note,
        }
    }
}
