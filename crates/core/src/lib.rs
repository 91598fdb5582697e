#![warn(clippy::all, missing_docs)]

//! Core domain logic for the player game-day tracker.
//!
//! This crate hosts the roster and schedule models, the reconciliation of
//! team schedules against configuration, the persisted store, and the
//! spreadsheet/document exports used by the terminal UI and any future
//! frontends.

pub mod config;
pub mod export;
#[allow(missing_docs)]
pub mod models;
pub mod participation;
pub mod persistence;
pub mod reconcile;
pub mod roster;
#[allow(missing_docs)]
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use export::Exporter;
pub use models::{GameDay, GameDayEdit, Location, Player, PlayerField, PlayerId, TeamConfig, TeamsState};
pub use participation::calculate_participation;
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use reconcile::reconcile;
pub use state::{Mutation, StorageKey, TrackerState};
pub use store::Store;
