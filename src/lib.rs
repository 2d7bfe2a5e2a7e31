//! movienews - a small movie news blog core
//!
//! This library provides the domain model, the in-memory repository that
//! keeps articles ordered by publish date, the service layer that turns
//! domain objects into serializable views, and the CSV dataset loader.

pub mod config;
pub mod ingest;
pub mod models;
pub mod repository;
pub mod services;
