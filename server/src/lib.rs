//! Tracekeep server: span ingestion and trace queries over SQLite

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
