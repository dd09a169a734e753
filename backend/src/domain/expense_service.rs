//! Local expense operations: create, update, delete, and the aggregate
//! queries behind the summary views.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use log::{error, info};
use std::sync::Arc;

use crate::domain::commands::expenses::{
    AddExpenseCommand, CategoryTotal, DailyTotal, UpdateExpenseCommand,
};
use crate::domain::models::{Category, Expense};
use crate::domain::reminders;
use crate::scheduler::ReminderScheduler;
use crate::storage::csv::ExpenseRepository;
use crate::storage::traits::ExpenseStorage;

pub struct ExpenseService {
    repository: ExpenseRepository,
    scheduler: Arc<dyn ReminderScheduler>,
}

impl ExpenseService {
    pub fn new(repository: ExpenseRepository, scheduler: Arc<dyn ReminderScheduler>) -> Self {
        Self {
            repository,
            scheduler,
        }
    }

    /// Record a new expense. A storage failure is returned to the caller;
    /// the reminder (future-dated expenses only) is scheduled after the
    /// record is safely stored, and a scheduling failure does not undo the
    /// insert.
    pub fn add_expense(&self, command: AddExpenseCommand) -> Result<Expense> {
        let expense = Expense {
            id: Expense::generate_id(),
            name: command.name,
            amount: command.amount,
            date: command.date,
            category: command.category,
            latitude: command.latitude,
            longitude: command.longitude,
            user_id: command.user_id,
        };

        self.repository
            .insert(&expense)
            .with_context(|| format!("storing expense {}", expense.id))?;
        info!("Stored expense {} for {}", expense.id, expense.user_id);

        if let Some(reminder) = reminders::for_new_expense(&expense, Local::now().date_naive()) {
            if let Err(e) = self.scheduler.schedule(reminder) {
                error!(
                    "Failed to schedule reminder for expense {}: {}",
                    expense.id, e
                );
            }
        }

        Ok(expense)
    }

    /// Delete an expense, cancelling its pending reminder first. Returns
    /// the number of records removed (0 when the id was unknown).
    pub fn delete_expense(&self, expense: &Expense) -> Result<usize> {
        self.scheduler.cancel(&expense.id)?;
        let removed = self.repository.delete(expense)?;
        info!(
            "Deleted expense {} for {} ({} records removed)",
            expense.id, expense.user_id, removed
        );
        Ok(removed)
    }

    /// Replace an expense's fields, keeping its id and owner.
    pub fn update_expense(&self, command: UpdateExpenseCommand) -> Result<usize> {
        let expense = Expense {
            id: command.id,
            name: command.name,
            amount: command.amount,
            date: command.date,
            category: command.category,
            latitude: command.latitude,
            longitude: command.longitude,
            user_id: command.user_id,
        };
        self.repository.update(&expense)
    }

    pub fn expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        self.repository.all_for_user(user_id)
    }

    pub fn expenses_for_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<Expense>> {
        self.repository.for_user_and_date(user_id, date)
    }

    pub fn total(&self, user_id: &str) -> Result<f64> {
        self.repository.total_for_user(user_id)
    }

    pub fn total_for_date(&self, user_id: &str, date: NaiveDate) -> Result<f64> {
        self.repository.total_for_user_and_date(user_id, date)
    }

    pub fn has_expenses(&self, user_id: &str) -> Result<bool> {
        Ok(self.repository.count_for_user(user_id)? > 0)
    }

    pub fn has_expenses_for_category(&self, user_id: &str, category: Category) -> Result<bool> {
        Ok(self
            .repository
            .count_for_user_and_category(user_id, category)?
            > 0)
    }

    /// Spend per day within one month, sorted by date. Days without
    /// records are omitted.
    pub fn daily_totals_for_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<DailyTotal>> {
        let mut totals: Vec<DailyTotal> = Vec::new();
        for expense in self.month_expenses(user_id, year, month)? {
            match totals.iter_mut().find(|t| t.date == expense.date) {
                Some(total) => total.amount += expense.amount,
                None => totals.push(DailyTotal {
                    date: expense.date,
                    amount: expense.amount,
                }),
            }
        }
        totals.sort_by_key(|t| t.date);
        Ok(totals)
    }

    /// Spend per category within one month, in category display order.
    /// Categories without records are omitted.
    pub fn category_totals_for_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CategoryTotal>> {
        let expenses = self.month_expenses(user_id, year, month)?;
        let mut totals = Vec::new();
        for category in Category::ALL {
            let amount: f64 = expenses
                .iter()
                .filter(|e| e.category == category)
                .map(|e| e.amount)
                .sum();
            if amount != 0.0 {
                totals.push(CategoryTotal { category, amount });
            }
        }
        Ok(totals)
    }

    fn month_expenses(&self, user_id: &str, year: i32, month: u32) -> Result<Vec<Expense>> {
        Ok(self
            .repository
            .all_for_user(user_id)?
            .into_iter()
            .filter(|e| e.date.year() == year && e.date.month() == month)
            .collect())
    }
}
