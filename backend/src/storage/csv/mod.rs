//! # CSV Storage Module
//!
//! File-based implementation of the storage traits. One directory per user
//! (derived from the email) holding `expenses.csv`, plus a device-wide
//! `users.csv` at the base directory.
//!
//! ## File format
//!
//! ```csv
//! id,name,amount,date,category,latitude,longitude,user_id
//! 3f2a...,Groceries,12.5,2024-03-15,Food,0,0,u1@example.com
//! ```

pub mod connection;
pub mod expense_repository;
pub mod user_repository;

pub use connection::CsvConnection;
pub use expense_repository::ExpenseRepository;
pub use user_repository::UserRepository;
