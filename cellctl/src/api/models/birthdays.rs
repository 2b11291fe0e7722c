//! API models for the monthly birthday report.

use crate::birthdays::MonthlyBirthday;
use crate::types::ContactId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for the monthly birthday report
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct MonthlyBirthdaysQuery {
    /// Month number, 1 (January) to 12 (December). Defaults to the current month.
    #[param(minimum = 1, maximum = 12)]
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyBirthdayResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ContactId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub whatsapp: Option<String>,
    /// Age reached this year
    pub age: i32,
    /// Day of the month
    pub day: u32,
}

impl From<MonthlyBirthday> for MonthlyBirthdayResponse {
    fn from(entry: MonthlyBirthday) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            birth_date: entry.birth_date,
            whatsapp: entry.whatsapp,
            age: entry.age,
            day: entry.day,
        }
    }
}
