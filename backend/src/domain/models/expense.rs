//! Domain model for an expense record.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use shared::{date_to_epoch_day, epoch_day_to_date, RemoteExpense};

/// Fixed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Home,
    Clothes,
    Activity,
    Transport,
    Other,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Home,
        Category::Clothes,
        Category::Activity,
        Category::Transport,
        Category::Other,
    ];

    /// Display string, also the wire representation in [`RemoteExpense`].
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Home => "Home",
            Category::Clothes => "Clothes",
            Category::Activity => "Activity",
            Category::Transport => "Transport",
            Category::Other => "Other",
        }
    }

    /// Parse a wire/display string. Unknown strings map to `Other` so a
    /// single bad record cannot fail a whole download.
    pub fn from_display_name(name: &str) -> Category {
        match name {
            "Food" => Category::Food,
            "Home" => Category::Home,
            "Clothes" => Category::Clothes,
            "Activity" => Category::Activity,
            "Transport" => Category::Transport,
            "Other" => Category::Other,
            other => {
                warn!("Unknown expense category '{}', falling back to Other", other);
                Category::Other
            }
        }
    }
}

/// A single tracked spending entry.
///
/// `id` is unique within a user's record set and assigned at creation;
/// `user_id` never changes afterwards. Coordinates use 0.0 as "unset"
/// because the remote payload cannot carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Category,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: String,
}

impl Expense {
    /// Generate a fresh record id.
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Whether the record carries a real location (0.0/0.0 means unset).
    pub fn has_location(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }

    /// Translate to the wire payload. The amount narrows to f32 and the
    /// coordinates are dropped, both dictated by the server's schema.
    pub fn to_remote(&self) -> RemoteExpense {
        RemoteExpense {
            name: self.name.clone(),
            amount: self.amount as f32,
            date: date_to_epoch_day(self.date),
            category: self.category.display_name().to_string(),
            user_id: self.user_id.clone(),
            id: self.id.clone(),
        }
    }

    /// Translate a downloaded payload into a local record. Fails only when
    /// the day-epoch is outside the representable date range.
    pub fn from_remote(remote: &RemoteExpense) -> anyhow::Result<Expense> {
        let date = epoch_day_to_date(remote.date)
            .ok_or_else(|| anyhow::anyhow!("day-epoch {} out of range", remote.date))?;
        Ok(Expense {
            id: remote.id.clone(),
            name: remote.name.clone(),
            amount: remote.amount as f64,
            date,
            category: Category::from_display_name(&remote.category),
            latitude: 0.0,
            longitude: 0.0,
            user_id: remote.user_id.clone(),
        })
    }
}
