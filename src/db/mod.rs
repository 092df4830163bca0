// src/db/mod.rs

//! Data access layer. Handlers stay thin; everything that touches SQL
//! lives here so the persistence logic can be tested in isolation.

pub mod progress;
pub mod questions;
pub mod users;
