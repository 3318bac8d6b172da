//! Metrics, personal records, and achievements for a GPS running log.
//!
//! Runs enter through [`ingest`] (raw points or GPX bytes), get partitioned
//! into mile [`splits`], and feed the [`best_efforts`] search. [`records`]
//! keeps the persisted PR snapshot current and [`achievements`] evaluates the
//! static [`catalog`] of unlock rules. [`history::RunHistory`] wires it all
//! together behind injected [`storage`] and [`repository`] ports.

pub mod achievements;
pub mod best_efforts;
pub mod catalog;
pub mod errors;
pub mod gpx_import;
pub mod history;
pub mod ingest;
pub mod models;
pub mod records;
pub mod repository;
pub mod splits;
pub mod storage;

pub use errors::AppError;
