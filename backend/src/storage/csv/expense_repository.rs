//! CSV-backed expense repository.
//!
//! One `expenses.csv` per user. Mutations read the whole file, apply the
//! change in memory and rewrite the file, which keeps insertion order and
//! makes upsert-by-id a simple in-place replacement.

use anyhow::Result;
use chrono::NaiveDate;
use csv::{Reader, Writer};
use log::warn;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::{Category, Expense};
use crate::storage::traits::ExpenseStorage;

#[derive(Clone)]
pub struct ExpenseRepository {
    connection: CsvConnection,
}

impl ExpenseRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all records for a user from their CSV file, in file order.
    fn read_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        self.connection.ensure_expenses_file_exists(user_id)?;

        let file = File::open(self.connection.expenses_file_path(user_id))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut expenses = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let date_str = record.get(3).unwrap_or("");
            let date = match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
                Ok(date) => date,
                Err(e) => {
                    warn!("Skipping expense row with bad date '{}': {}", date_str, e);
                    continue;
                }
            };

            expenses.push(Expense {
                id: record.get(0).unwrap_or("").to_string(),
                name: record.get(1).unwrap_or("").to_string(),
                amount: record.get(2).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                date,
                category: Category::from_display_name(record.get(4).unwrap_or("Other")),
                latitude: record.get(5).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                longitude: record.get(6).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                user_id: record.get(7).unwrap_or("").to_string(),
            });
        }

        Ok(expenses)
    }

    /// Rewrite a user's CSV file with the given records.
    fn write_expenses(&self, user_id: &str, expenses: &[Expense]) -> Result<()> {
        self.connection.ensure_expenses_file_exists(user_id)?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.connection.expenses_file_path(user_id))?;
        let mut csv_writer = Writer::from_writer(BufWriter::new(file));

        csv_writer.write_record([
            "id",
            "name",
            "amount",
            "date",
            "category",
            "latitude",
            "longitude",
            "user_id",
        ])?;

        for expense in expenses {
            csv_writer.write_record([
                expense.id.as_str(),
                expense.name.as_str(),
                &expense.amount.to_string(),
                &expense.date.format("%Y-%m-%d").to_string(),
                expense.category.display_name(),
                &expense.latitude.to_string(),
                &expense.longitude.to_string(),
                expense.user_id.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Upsert one record into an already-read batch.
    fn apply_upsert(expenses: &mut Vec<Expense>, expense: &Expense) {
        match expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => *existing = expense.clone(),
            None => expenses.push(expense.clone()),
        }
    }
}

impl ExpenseStorage for ExpenseRepository {
    fn insert(&self, expense: &Expense) -> Result<()> {
        let mut expenses = self.read_expenses(&expense.user_id)?;
        Self::apply_upsert(&mut expenses, expense);
        self.write_expenses(&expense.user_id, &expenses)
    }

    fn insert_many(&self, expenses: &[Expense]) -> Result<()> {
        // Applied record by record, grouped per user file. Not a
        // transaction: a failure leaves the earlier users' files updated.
        let mut by_user: Vec<(&str, Vec<&Expense>)> = Vec::new();
        for expense in expenses {
            match by_user.iter_mut().find(|(user, _)| *user == expense.user_id) {
                Some((_, batch)) => batch.push(expense),
                None => by_user.push((expense.user_id.as_str(), vec![expense])),
            }
        }

        for (user_id, batch) in by_user {
            let mut current = self.read_expenses(user_id)?;
            for expense in batch {
                Self::apply_upsert(&mut current, expense);
            }
            self.write_expenses(user_id, &current)?;
        }
        Ok(())
    }

    fn update(&self, expense: &Expense) -> Result<usize> {
        let mut expenses = self.read_expenses(&expense.user_id)?;
        match expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => {
                *existing = expense.clone();
                self.write_expenses(&expense.user_id, &expenses)?;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete(&self, expense: &Expense) -> Result<usize> {
        let mut expenses = self.read_expenses(&expense.user_id)?;
        let before = expenses.len();
        expenses.retain(|e| e.id != expense.id);
        let removed = before - expenses.len();
        if removed > 0 {
            self.write_expenses(&expense.user_id, &expenses)?;
        }
        Ok(removed)
    }

    fn all_for_user(&self, user_id: &str) -> Result<Vec<Expense>> {
        self.read_expenses(user_id)
    }

    fn for_user_and_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<Expense>> {
        Ok(self
            .read_expenses(user_id)?
            .into_iter()
            .filter(|e| e.date == date)
            .collect())
    }

    fn total_for_user(&self, user_id: &str) -> Result<f64> {
        Ok(self.read_expenses(user_id)?.iter().map(|e| e.amount).sum())
    }

    fn total_for_user_and_date(&self, user_id: &str, date: NaiveDate) -> Result<f64> {
        Ok(self
            .read_expenses(user_id)?
            .iter()
            .filter(|e| e.date == date)
            .map(|e| e.amount)
            .sum())
    }

    fn count_for_user(&self, user_id: &str) -> Result<usize> {
        Ok(self.read_expenses(user_id)?.len())
    }

    fn count_for_user_and_date(&self, user_id: &str, date: NaiveDate) -> Result<usize> {
        Ok(self
            .read_expenses(user_id)?
            .iter()
            .filter(|e| e.date == date)
            .count())
    }

    fn count_for_user_and_category(&self, user_id: &str, category: Category) -> Result<usize> {
        Ok(self
            .read_expenses(user_id)?
            .iter()
            .filter(|e| e.category == category)
            .count())
    }
}
