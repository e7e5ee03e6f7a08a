//! Core types for Dramlog
//!
//! Field names serialize in camelCase so the on-disk store matches the
//! layout the browser edition of the tracker keeps in local storage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bottling from the static catalog
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Whisky {
    pub id: &'static str,
    pub name: &'static str,
    pub distillery: &'static str,
    pub region: &'static str,
    pub bottle_size_cl: u32,
}

/// Volume of one whisky taken to an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub whisky_id: String,
    pub start_cl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_cl: Option<u32>,
}

impl InventoryItem {
    pub fn new(whisky_id: impl Into<String>, start_cl: u32) -> Self {
        Self {
            whisky_id: whisky_id.into(),
            start_cl,
            end_cl: None,
        }
    }

    /// Centiliters poured, clamped at zero when the end volume exceeds the start.
    ///
    /// Items without an end volume have not been reported and count as zero.
    pub fn consumed_cl(&self) -> u32 {
        match self.end_cl {
            Some(end) => self.start_cl.saturating_sub(end),
            None => 0,
        }
    }

    pub fn is_reported(&self) -> bool {
        self.end_cl.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    #[serde(alias = "actief")]
    Active,
    #[serde(alias = "voltooid")]
    Completed,
}

impl EventStatus {
    /// Open events still accept inventory edits
    pub fn is_open(&self) -> bool {
        matches!(self, EventStatus::Draft | EventStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Active => "active",
            EventStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(EventStatus::Draft),
            "active" | "actief" => Ok(EventStatus::Active),
            "completed" | "voltooid" => Ok(EventStatus::Completed),
            _ => Err(format!(
                "Invalid status: '{}'. Valid options: draft, active, completed",
                s
            )),
        }
    }
}

/// A tasting event and the inventory taken to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    pub id: String,
    pub title: String,
    /// Calendar date of the event, `YYYY-MM-DD`
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub organizer: String,
    pub ambassador: String,
    pub inventory: Vec<InventoryItem>,
    pub status: EventStatus,
    /// Unix epoch milliseconds
    pub created_at: i64,
}

impl EventLog {
    /// Create an active event with a fresh id and creation timestamp
    pub fn new(
        title: String,
        date: String,
        location: String,
        organizer: String,
        ambassador: String,
        inventory: Vec<InventoryItem>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            date,
            location,
            organizer,
            ambassador,
            inventory,
            status: EventStatus::Active,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn item(&self, whisky_id: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|i| i.whisky_id == whisky_id)
    }

    pub fn item_mut(&mut self, whisky_id: &str) -> Option<&mut InventoryItem> {
        self.inventory.iter_mut().find(|i| i.whisky_id == whisky_id)
    }

    /// Sum of per-item consumption, widened to `u64`
    pub fn total_consumed_cl(&self) -> u64 {
        self.inventory.iter().map(|i| u64::from(i.consumed_cl())).sum()
    }

    pub fn total_start_cl(&self) -> u64 {
        self.inventory.iter().map(|i| u64::from(i.start_cl)).sum()
    }
}
