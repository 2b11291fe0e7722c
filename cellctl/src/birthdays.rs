//! Monthly birthday report.
//!
//! Lists members born in a given month so leaders can reach out on the day. Only contacts with
//! status `member` and a known birth date are considered.

use chrono::{Datelike, NaiveDate};
use tracing::instrument;

use crate::api::models::contacts::ContactStatus;
use crate::db::{backend::Backend, handlers::ContactFilter, models::contacts::ContactDBResponse};
use crate::errors::{Error, Result};
use crate::types::ContactId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBirthday {
    pub id: ContactId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub whatsapp: Option<String>,
    /// Age reached in the reference year
    pub age: i32,
    pub day: u32,
}

/// Members born in `month`, ordered by day of month. `year` is the year ages are computed for.
pub fn monthly_birthdays(contacts: impl IntoIterator<Item = ContactDBResponse>, month: u32, year: i32) -> Vec<MonthlyBirthday> {
    let mut entries: Vec<MonthlyBirthday> = contacts
        .into_iter()
        .filter(|c| c.status == ContactStatus::Member)
        .filter_map(|c| {
            let birth_date = c.birth_date?;
            (birth_date.month() == month).then(|| MonthlyBirthday {
                id: c.id,
                name: c.name,
                birth_date,
                whatsapp: c.whatsapp,
                age: year - birth_date.year(),
                day: birth_date.day(),
            })
        })
        .collect();

    // Stable: same-day entries keep the backend's name order
    entries.sort_by_key(|entry| entry.day);
    entries
}

/// Load the report for `month`, or for the month of `today` when none is given.
#[instrument(skip(backend), err)]
pub async fn load_monthly_birthdays(backend: &dyn Backend, today: NaiveDate, month: Option<u32>) -> Result<Vec<MonthlyBirthday>> {
    let month = month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(Error::BadRequest {
            message: format!("Invalid month {month}: expected a value between 1 and 12"),
        });
    }

    let contacts = backend.list_contacts(&ContactFilter::members_with_birth_date()).await?;
    Ok(monthly_birthdays(contacts, month, today.year()))
}
