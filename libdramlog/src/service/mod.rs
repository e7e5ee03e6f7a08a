//! Service layer for Dramlog
//!
//! Business logic shared by every front end. `DramlogService` is the entry
//! point and hands out the specialized sub-services:
//!
//! - `EventService`: event lifecycle and inventory entry
//! - `ReportService`: consumption reports and history queries
//! - `ValidationService`: checks on new-event requests
//!
//! # Example
//!
//! ```no_run
//! use libdramlog::service::DramlogService;
//! use libdramlog::service::validation::EventRequest;
//!
//! # fn example() -> libdramlog::Result<()> {
//! let service = DramlogService::new()?;
//!
//! let event = service.events().create(EventRequest {
//!     title: "Islay Tasting Night".to_string(),
//!     location: "Amsterdam".to_string(),
//!     ambassador: "Sanne".to_string(),
//!     whiskies: vec!["lag-16".to_string(), "ci-12".to_string()],
//!     ..Default::default()
//! })?;
//!
//! service.events().set_end(&event.id, "lag-16", 20)?;
//! let closed = service.events().complete(&event.id)?;
//! println!("Poured {} cl", closed.total_consumed_cl());
//! # Ok(())
//! # }
//! ```

pub mod lifecycle;
pub mod report;
pub mod validation;

use std::sync::Arc;

use self::lifecycle::EventService;
use self::report::ReportService;
use self::validation::ValidationService;
use crate::{Config, EventStore, Result};

/// Main service facade
///
/// Sub-services share one `Arc<EventStore>`, so a mutation made through
/// `events()` is visible to `reports()` immediately.
pub struct DramlogService {
    store: Arc<EventStore>,
    config: Arc<Config>,
    events: EventService,
    reports: ReportService,
    validation: ValidationService,
}

impl DramlogService {
    /// Create a service from the configuration at the default location
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed or the store
    /// file cannot be read.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    /// Create a service with a pre-built configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let store = Arc::new(EventStore::open(config.store_path())?);
        let config = Arc::new(config);

        Ok(Self {
            events: EventService::new(Arc::clone(&store), Arc::clone(&config)),
            reports: ReportService::new(Arc::clone(&store)),
            validation: ValidationService::new(),
            store,
            config,
        })
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn events(&self) -> &EventService {
        &self.events
    }

    pub fn reports(&self) -> &ReportService {
        &self.reports
    }

    pub fn validation(&self) -> &ValidationService {
        &self.validation
    }
}
