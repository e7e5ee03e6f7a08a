//! Consumption reports and event history queries

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::validation::DATE_FORMAT;
use crate::catalog;
use crate::types::{EventLog, EventStatus, InventoryItem};
use crate::{EventStore, Result};

/// Per-item line of a consumption report
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportLine {
    pub whisky_id: String,
    pub name: String,
    pub distillery: Option<String>,
    pub start_cl: u32,
    pub end_cl: Option<u32>,
    pub consumed_cl: u32,
    pub consumed_bottles: f64,
}

impl ReportLine {
    fn from_item(item: &InventoryItem) -> Self {
        let whisky = catalog::find(&item.whisky_id);
        let consumed_cl = item.consumed_cl();
        Self {
            whisky_id: item.whisky_id.clone(),
            name: catalog::display_name(&item.whisky_id).to_string(),
            distillery: whisky.map(|w| w.distillery.to_string()),
            start_cl: item.start_cl,
            end_cl: item.end_cl,
            consumed_cl,
            consumed_bottles: catalog::bottles(u64::from(consumed_cl)),
        }
    }
}

/// Consumption report for a single event
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConsumptionReport {
    pub event_id: String,
    pub title: String,
    pub date: String,
    pub location: String,
    pub organizer: String,
    pub ambassador: String,
    pub status: EventStatus,
    pub lines: Vec<ReportLine>,
    pub reported_items: usize,
    pub total_consumed_cl: u64,
    pub total_consumed_bottles: f64,
}

impl ConsumptionReport {
    pub fn for_event(event: &EventLog) -> Self {
        let lines: Vec<ReportLine> = event.inventory.iter().map(ReportLine::from_item).collect();
        let total_consumed_cl = event.total_consumed_cl();

        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            date: event.date.clone(),
            location: event.location.clone(),
            organizer: event.organizer.clone(),
            ambassador: event.ambassador.clone(),
            status: event.status,
            reported_items: event.inventory.iter().filter(|i| i.is_reported()).count(),
            lines,
            total_consumed_cl,
            total_consumed_bottles: catalog::bottles(total_consumed_cl),
        }
    }
}

/// Filters for querying event history
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub status: Option<EventStatus>,
    /// Inclusive lower bound on the event date
    pub since: Option<NaiveDate>,
    /// Inclusive upper bound on the event date
    pub until: Option<NaiveDate>,
    /// Case-insensitive substring of title, location, organizer or ambassador
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub fn matches(&self, event: &EventLog) -> bool {
        if let Some(status) = self.status {
            if event.status != status {
                return false;
            }
        }

        if self.since.is_some() || self.until.is_some() {
            // events with an unparseable date never match a date range
            let Ok(date) = NaiveDate::parse_from_str(&event.date, DATE_FORMAT) else {
                return false;
            };
            if self.since.is_some_and(|since| date < since) {
                return false;
            }
            if self.until.is_some_and(|until| date > until) {
                return false;
            }
        }

        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = [
                &event.title,
                &event.location,
                &event.organizer,
                &event.ambassador,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Aggregate figures over a set of events
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct HistoryStats {
    pub total_events: usize,
    pub active_events: usize,
    pub completed_events: usize,
    pub draft_events: usize,
    pub total_consumed_cl: u64,
    /// Consumed cl per whisky id, only whiskies with consumption
    pub by_whisky: BTreeMap<String, u64>,
}

impl HistoryStats {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a EventLog>) -> Self {
        let mut stats = Self::default();
        for event in events {
            stats.total_events += 1;
            match event.status {
                EventStatus::Draft => stats.draft_events += 1,
                EventStatus::Active => stats.active_events += 1,
                EventStatus::Completed => stats.completed_events += 1,
            }
            for item in &event.inventory {
                let consumed = u64::from(item.consumed_cl());
                if consumed > 0 {
                    *stats.by_whisky.entry(item.whisky_id.clone()).or_insert(0) += consumed;
                }
                stats.total_consumed_cl += consumed;
            }
        }
        stats
    }
}

/// Read-only queries over the event store
#[derive(Clone)]
pub struct ReportService {
    store: Arc<EventStore>,
}

impl ReportService {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }

    /// Events matching the query, in store order (newest first)
    pub fn query(&self, query: &HistoryQuery) -> Result<Vec<EventLog>> {
        let events = self.store.events()?;
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(events
            .into_iter()
            .filter(|e| query.matches(e))
            .take(limit)
            .collect())
    }

    /// Consumption report for one event, if it exists
    pub fn report(&self, event_id: &str) -> Result<Option<ConsumptionReport>> {
        Ok(self
            .store
            .get(event_id)?
            .map(|event| ConsumptionReport::for_event(&event)))
    }

    pub fn summary(&self, query: &HistoryQuery) -> Result<HistoryStats> {
        let events = self.query(query)?;
        Ok(HistoryStats::from_events(&events))
    }
}
