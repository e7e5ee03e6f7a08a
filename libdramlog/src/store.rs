//! File-backed event store
//!
//! All events live in one JSON array in a single file. The file is read once
//! when the store is opened and rewritten in full after every mutation.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, StoreError};
use crate::types::EventLog;

/// Ordered list of events mirrored to a JSON file
///
/// Order is significant: new events are inserted at the front, so the list
/// reads newest first.
pub struct EventStore {
    path: PathBuf,
    events: RwLock<Vec<EventLog>>,
}

impl EventStore {
    /// Open the store at `path`
    ///
    /// A missing file yields an empty store. A file that cannot be parsed is
    /// discarded with a warning and the store starts empty; it is overwritten
    /// on the next mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let events = Self::read_events(&path)?;
        tracing::debug!("Loaded {} events from {}", events.len(), path.display());

        Ok(Self {
            path,
            events: RwLock::new(events),
        })
    }

    fn read_events(path: &Path) -> Result<Vec<EventLog>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        // invalid UTF-8 is corruption, not an I/O failure
        let content = std::fs::read(path).map_err(StoreError::Io)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Vec<EventLog>>(&content) {
            Ok(events) => Ok(events),
            Err(e) => {
                tracing::warn!(
                    "Corrupted event store at {}, starting empty: {}",
                    path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<EventLog>>> {
        self.events.read().map_err(|_| StoreError::Poisoned.into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<EventLog>>> {
        self.events.write().map_err(|_| StoreError::Poisoned.into())
    }

    /// Snapshot of all events in store order
    pub fn events(&self) -> Result<Vec<EventLog>> {
        Ok(self.read()?.clone())
    }

    pub fn get(&self, id: &str) -> Result<Option<EventLog>> {
        Ok(self.read()?.iter().find(|e| e.id == id).cloned())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Insert an event as the newest entry and persist
    pub fn insert_front(&self, event: EventLog) -> Result<()> {
        let mut events = self.write()?;
        events.insert(0, event);
        self.persist(&events)
    }

    /// Replace the event with the same id and persist
    ///
    /// Returns false (and writes nothing) when no event has that id.
    pub fn update(&self, event: EventLog) -> Result<bool> {
        let mut events = self.write()?;
        let Some(slot) = events.iter_mut().find(|e| e.id == event.id) else {
            return Ok(false);
        };
        *slot = event;
        self.persist(&events)?;
        Ok(true)
    }

    /// Remove the event with `id` and persist
    ///
    /// Returns false when no event has that id.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut events = self.write()?;
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Ok(false);
        }
        self.persist(&events)?;
        Ok(true)
    }

    fn persist(&self, events: &[EventLog]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::Io)?;
            }
        }

        let content = serde_json::to_string_pretty(events).map_err(StoreError::Serialize)?;
        std::fs::write(&self.path, content).map_err(StoreError::Io)?;

        tracing::debug!("Saved {} events to {}", events.len(), self.path.display());
        Ok(())
    }
}
