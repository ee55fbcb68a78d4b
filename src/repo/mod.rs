/// Event store interface and the operation shapes committed to it
pub mod memory;

use crate::domain::{Alert, EventValue};
use crate::errors::IngestionResult;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use memory::InMemoryStore;

/// How an event replaces what the store already holds on its gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertionType {
    #[serde(rename = "SIMPLE")]
    Simple,
    /// Replace events with the same gauge and exactly the same window
    #[serde(rename = "INSERT_and_ERASE")]
    InsertAndErase,
    #[serde(rename = "INSERT_and_ERASE_with_PRIORITY")]
    InsertAndEraseWithPriority,
    /// Replace every intersecting event of the gauge; the highest priority survives
    #[serde(rename = "INSERT_and_ERASE_INTERSECTED_EVENTS_with_PRIORITY")]
    InsertAndEraseIntersectedWithPriority,
    /// Cut the intersected period out of lower priority events
    #[serde(rename = "INSERT_and_ERASE_per_EVENT_with_PRIORITY")]
    InsertAndErasePerEventWithPriority,
    /// Replace the event of the gauge attached to the same explicit reference
    #[serde(rename = "SIMPLE_UPDATE")]
    SimpleUpdate,
}

/// Gauge: (name, system) pair identifying an event category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub name: String,
    pub system: String,
    pub insertion_type: InsertionType,
}

impl Gauge {
    pub fn new(name: impl Into<String>, system: &str, insertion_type: InsertionType) -> Self {
        Self {
            name: name.into(),
            system: system.to_string(),
            insertion_type,
        }
    }

    pub fn same_gauge(&self, other: &Gauge) -> bool {
        self.name == other.name && self.system == other.system
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    /// Symbolic reference to a `link_ref` declared in the same commit
    ByRef,
    /// Identifier of an event already in the store
    ById,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLink {
    pub link: String,
    pub link_mode: LinkMode,
    /// Name of the link from the target to this event
    pub name: String,
    /// Name of the link from this event to the target
    pub back_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_ref: Option<String>,
    pub gauge: Gauge,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub values: Vec<EventValue>,
    #[serde(default)]
    pub links: Vec<EventLink>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl EventRecord {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }

    pub fn intersects(&self, start: NaiveDateTime, stop: NaiveDateTime) -> bool {
        self.start < stop && self.stop > start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub explicit_reference: String,
    pub name: String,
    pub insertion_type: InsertionType,
    pub values: Vec<EventValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplicitReference {
    pub group: String,
    pub name: String,
}

/// Identity of the ingestion module producing an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimSignature {
    pub name: String,
    pub exec: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionCompleteness {
    pub check: bool,
    pub message: String,
}

/// Input file registration attached to an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub reception_time: NaiveDateTime,
    pub generation_time: NaiveDateTime,
    pub reported_generation_time: NaiveDateTime,
    pub validity_start: NaiveDateTime,
    pub reported_validity_start: NaiveDateTime,
    pub validity_stop: NaiveDateTime,
    pub reported_validity_stop: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingestion_completeness: Option<IngestionCompleteness>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    Insert,
    /// Also erase older events of the same signature inside the source validity
    InsertAndErase,
}

/// One batch of entries committed together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub mode: OperationMode,
    pub dim_signature: DimSignature,
    pub source: Source,
    #[serde(default)]
    pub explicit_references: Vec<ExplicitReference>,
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEvent {
    pub id: EventId,
    pub source: String,
    pub dim_signature: String,
    pub generation_time: NaiveDateTime,
    pub priority: i32,
    pub event: EventRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredLink {
    pub from: EventId,
    pub to: EventId,
    pub name: String,
}

/// Selection of stored events; time bounds are exclusive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub gauge_name: Option<String>,
    pub system: Option<String>,
    /// Keep events starting before this instant
    pub start_before: Option<NaiveDateTime>,
    /// Keep events stopping after this instant
    pub stop_after: Option<NaiveDateTime>,
}

impl EventFilter {
    pub fn gauge(name: &str, system: &str) -> Self {
        Self {
            gauge_name: Some(name.to_string()),
            system: Some(system.to_string()),
            ..Self::default()
        }
    }

    /// Restrict to events overlapping `[start, stop]`
    pub fn overlapping(mut self, start: NaiveDateTime, stop: NaiveDateTime) -> Self {
        self.start_before = Some(stop);
        self.stop_after = Some(start);
        self
    }

    pub fn matches(&self, event: &EventRecord) -> bool {
        self.gauge_name
            .as_deref()
            .map_or(true, |name| event.gauge.name == name)
            && self
                .system
                .as_deref()
                .map_or(true, |system| event.gauge.system == system)
            && self.start_before.map_or(true, |t| event.start < t)
            && self.stop_after.map_or(true, |t| event.stop > t)
    }
}

/// Counters of one commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub events_inserted: usize,
    pub events_erased: usize,
    pub annotations_inserted: usize,
    pub links_created: usize,
    pub alerts: usize,
}

/// Append-only event store the reconcilers read from and commit to.
///
/// `commit` is atomic: either every operation of the run becomes visible or
/// none does.
pub trait EventStore {
    fn lookup_events(&self, filter: &EventFilter) -> IngestionResult<Vec<StoredEvent>>;

    fn commit(&mut self, operations: &[Operation]) -> IngestionResult<CommitReport>;
}
