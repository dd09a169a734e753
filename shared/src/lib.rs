//! Wire-format types for the BudgetBuddy expense API.
//!
//! The deployed server speaks Spanish field names (`nombre`, `cantidad`,
//! `fecha`, ...), serializes amounts as 32-bit floats and dates as an
//! integer day-epoch. These DTOs pin that contract in one place; the
//! backend crate converts them to and from its domain models.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One expense record as the remote API sends and receives it.
///
/// `GET /gastos/{email}/` returns an array of these; `POST /gastos/{email}/`
/// takes one and echoes it back. Note the payload carries no coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteExpense {
    /// Free-text label of the expense.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Monetary amount. The server stores 32-bit floats, so large amounts
    /// lose precision on a round trip.
    #[serde(rename = "cantidad")]
    pub amount: f32,
    /// Calendar date as days since 1970-01-01 (see [`date_to_epoch_day`]).
    #[serde(rename = "fecha")]
    pub date: i64,
    /// Display string of the expense category, e.g. `"Food"`.
    #[serde(rename = "tipo")]
    pub category: String,
    /// Owning user's email.
    #[serde(rename = "user_id")]
    pub user_id: String,
    /// Stable record id, assigned by the client at creation.
    #[serde(rename = "id")]
    pub id: String,
}

/// Account payload for `POST /users/` and `GET /users/{email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteUser {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "email")]
    pub email: String,
    /// Password hash, never the plain password.
    #[serde(rename = "password")]
    pub password_hash: String,
}

/// Convert a calendar date to the wire representation: days since
/// 1970-01-01. Dates before the epoch map to negative values.
pub fn date_to_epoch_day(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    date.signed_duration_since(epoch).num_days()
}

/// Convert a wire day-epoch back to a calendar date. Returns `None` when
/// the value falls outside chrono's representable range.
pub fn epoch_day_to_date(days: i64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    epoch.checked_add_signed(Duration::try_days(days)?)
}
