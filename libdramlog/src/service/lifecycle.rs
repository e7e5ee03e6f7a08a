//! Event lifecycle service
//!
//! Moves an event through `active → completed` and records the inventory
//! volumes on the way. Every mutation is persisted before returning.

use std::sync::Arc;

use chrono::NaiveDate;

use super::validation::{EventRequest, ValidationService, DATE_FORMAT};
use crate::error::{DramlogError, Result};
use crate::types::{EventLog, InventoryItem};
use crate::{Config, EventStore};

/// Lifecycle operations over the shared event store
#[derive(Clone)]
pub struct EventService {
    store: Arc<EventStore>,
    config: Arc<Config>,
    validation: ValidationService,
}

impl EventService {
    pub fn new(store: Arc<EventStore>, config: Arc<Config>) -> Self {
        Self {
            store,
            config,
            validation: ValidationService::new(),
        }
    }

    /// Open a new event and record its starting inventory
    ///
    /// Each selected whisky starts at the configured default (one bottle)
    /// unless the request overrides it. Repeated selections collapse into a
    /// single item.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if validation fails, or a store error if the
    /// event cannot be persisted.
    pub fn create(&self, request: EventRequest) -> Result<EventLog> {
        self.validation.check(&request)?;

        let mut inventory: Vec<InventoryItem> = Vec::with_capacity(request.whiskies.len());
        for id in &request.whiskies {
            if inventory.iter().any(|item| &item.whisky_id == id) {
                continue;
            }
            let start_cl = request
                .start_overrides
                .iter()
                .rev()
                .find(|(override_id, _)| override_id == id)
                .map(|(_, cl)| *cl)
                .unwrap_or(self.config.defaults.start_cl);
            inventory.push(InventoryItem::new(id.clone(), start_cl));
        }

        let date = match request.date.as_deref().map(str::trim) {
            Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|_| DramlogError::InvalidInput(format!("Invalid date '{}'", raw)))?,
            None => chrono::Local::now().date_naive(),
        };

        let event = EventLog::new(
            request.title.trim().to_string(),
            date.format(DATE_FORMAT).to_string(),
            request.location.trim().to_string(),
            request.organizer.trim().to_string(),
            request.ambassador.trim().to_string(),
            inventory,
        );

        self.store.insert_front(event.clone())?;
        tracing::info!(event_id = %event.id, "Started event '{}'", event.title);

        Ok(event)
    }

    pub fn get(&self, id: &str) -> Result<Option<EventLog>> {
        self.store.get(id)
    }

    /// All events, newest first
    pub fn list(&self) -> Result<Vec<EventLog>> {
        self.store.events()
    }

    /// Change the starting volume of one whisky on an open event
    pub fn set_start(&self, id: &str, whisky_id: &str, cl: u32) -> Result<EventLog> {
        self.set_starts(id, &[(whisky_id.to_string(), cl)])
    }

    /// Change several starting volumes in one write
    ///
    /// Nothing is saved unless every whisky is on the event.
    pub fn set_starts(&self, id: &str, volumes: &[(String, u32)]) -> Result<EventLog> {
        self.modify_open(id, |event| {
            check_items(event, volumes)?;
            for (whisky_id, cl) in volumes {
                if let Some(item) = event.item_mut(whisky_id) {
                    item.start_cl = *cl;
                }
            }
            Ok(())
        })
    }

    /// Start measuring the ending inventory
    ///
    /// Items without an end volume get one equal to their start volume;
    /// items already measured keep theirs.
    pub fn begin_close(&self, id: &str) -> Result<EventLog> {
        self.set_ends(id, &[])
    }

    /// Record the ending volume of one whisky on an open event
    pub fn set_end(&self, id: &str, whisky_id: &str, cl: u32) -> Result<EventLog> {
        self.set_ends(id, &[(whisky_id.to_string(), cl)])
    }

    /// Record several ending volumes in one write
    ///
    /// Implies [`begin_close`](Self::begin_close). Nothing is saved unless
    /// every whisky is on the event.
    pub fn set_ends(&self, id: &str, volumes: &[(String, u32)]) -> Result<EventLog> {
        self.modify_open(id, |event| {
            check_items(event, volumes)?;
            record_end_volumes(event, volumes);
            Ok(())
        })
    }

    /// Close the event
    ///
    /// Any item still unmeasured is recorded as untouched (end = start).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the event is already completed.
    pub fn complete(&self, id: &str) -> Result<EventLog> {
        self.complete_with(id, &[])
    }

    /// Record final ending volumes and close the event in one write
    pub fn complete_with(&self, id: &str, volumes: &[(String, u32)]) -> Result<EventLog> {
        let event = self.modify_open(id, |event| {
            check_items(event, volumes)?;
            record_end_volumes(event, volumes);
            event.status = crate::EventStatus::Completed;
            Ok(())
        })?;

        tracing::info!(
            event_id = %event.id,
            consumed_cl = event.total_consumed_cl(),
            "Completed event '{}'",
            event.title
        );
        Ok(event)
    }

    /// Delete an event regardless of its status
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no event has this id.
    pub fn delete(&self, id: &str) -> Result<()> {
        if !self.store.remove(id)? {
            return Err(event_not_found(id));
        }
        tracing::info!(event_id = %id, "Deleted event");
        Ok(())
    }

    fn modify_open<F>(&self, id: &str, apply: F) -> Result<EventLog>
    where
        F: FnOnce(&mut EventLog) -> Result<()>,
    {
        let mut event = self.store.get(id)?.ok_or_else(|| event_not_found(id))?;

        if !event.status.is_open() {
            return Err(DramlogError::InvalidTransition(format!(
                "Event {} is {} and can no longer be changed",
                id, event.status
            )));
        }

        apply(&mut event)?;

        if !self.store.update(event.clone())? {
            return Err(event_not_found(id));
        }
        Ok(event)
    }
}

fn event_not_found(id: &str) -> DramlogError {
    DramlogError::NotFound(format!("Event {}", id))
}

fn check_items(event: &EventLog, volumes: &[(String, u32)]) -> Result<()> {
    match volumes.iter().find(|(whisky_id, _)| event.item(whisky_id).is_none()) {
        Some((whisky_id, _)) => Err(DramlogError::NotFound(format!(
            "Whisky '{}' on event {}",
            whisky_id, event.id
        ))),
        None => Ok(()),
    }
}

fn record_end_volumes(event: &mut EventLog, volumes: &[(String, u32)]) {
    for item in &mut event.inventory {
        item.end_cl.get_or_insert(item.start_cl);
    }
    for (whisky_id, cl) in volumes {
        if let Some(item) = event.item_mut(whisky_id) {
            item.end_cl = Some(*cl);
        }
    }
}
