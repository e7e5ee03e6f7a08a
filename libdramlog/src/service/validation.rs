//! Event request validation
//!
//! Checks a new-event request before anything is written: required header
//! fields, a non-empty whisky selection, and catalog membership.

use chrono::NaiveDate;

use crate::catalog;
use crate::error::{DramlogError, Result};

/// Date format used for event dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Request to open a new event
#[derive(Debug, Clone, Default)]
pub struct EventRequest {
    pub title: String,
    /// `YYYY-MM-DD`; today when `None`
    pub date: Option<String>,
    pub location: String,
    pub organizer: String,
    pub ambassador: String,
    /// Selected catalog ids, in selection order
    pub whiskies: Vec<String>,
    /// Starting volumes that differ from the default bottle
    pub start_overrides: Vec<(String, u32)>,
}

/// Outcome of validating an [`EventRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Stateless validator for event requests
#[derive(Debug, Clone, Default)]
pub struct ValidationService;

impl ValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Collect every problem with the request
    pub fn validate(&self, request: &EventRequest) -> ValidationResponse {
        let mut errors = Vec::new();

        for (field, value) in [
            ("title", &request.title),
            ("location", &request.location),
            ("ambassador", &request.ambassador),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{} is required", field));
            }
        }

        if let Some(date) = &request.date {
            if NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).is_err() {
                errors.push(format!("Invalid date '{}'. Use YYYY-MM-DD", date));
            }
        }

        if request.whiskies.is_empty() {
            errors.push("Select at least one whisky for the event".to_string());
        }

        for id in &request.whiskies {
            if !catalog::contains(id) {
                errors.push(format!("Unknown whisky '{}'", id));
            }
        }

        for (id, _) in &request.start_overrides {
            if !request.whiskies.iter().any(|w| w == id) {
                errors.push(format!("Start volume given for unselected whisky '{}'", id));
            }
        }

        ValidationResponse {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Validate and turn any problems into a single blocking error
    pub fn check(&self, request: &EventRequest) -> Result<()> {
        let response = self.validate(request);
        if response.valid {
            Ok(())
        } else {
            Err(DramlogError::InvalidInput(response.errors.join("; ")))
        }
    }
}
