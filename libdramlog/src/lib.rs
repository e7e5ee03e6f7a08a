//! Dramlog - tasting-event inventory tracking for whisky ambassadors
//!
//! This library holds the bottle catalog, the event records, the JSON event
//! store and the services that move an event through its lifecycle. The
//! `dram-event` and `dram-report` binaries are thin shells around it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{DramlogError, Result};
pub use store::EventStore;
pub use types::{EventLog, EventStatus, InventoryItem, Whisky};
