//! `todolist`: a persisted to-do list store with a terminal front end.

pub mod app;
pub mod config;
pub mod persistence;
pub mod tasks;
pub mod ui;
