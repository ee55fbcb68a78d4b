/// In-memory event store honouring the insertion types of the operations
use super::{
    Annotation, CommitReport, EventFilter, EventId, EventLink, EventRecord, EventStore,
    InsertionType, LinkMode, Operation, OperationMode, StoredEvent, StoredLink,
};
use crate::errors::{IngestionError, IngestionResult};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredAnnotation {
    annotation: Annotation,
    priority: i32,
}

/// Source attributes shared by every entry of one operation
struct OperationContext {
    source: String,
    dim_signature: String,
    generation_time: NaiveDateTime,
    priority: i32,
}

impl OperationContext {
    fn of(operation: &Operation) -> Self {
        Self {
            source: operation.source.name.clone(),
            dim_signature: operation.dim_signature.name.clone(),
            generation_time: operation.source.generation_time,
            priority: operation.source.priority.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct State {
    next_id: u64,
    events: BTreeMap<EventId, StoredEvent>,
    links: Vec<StoredLink>,
    /// Link references declared by the commit in progress
    link_refs: HashMap<String, EventId>,
    annotations: Vec<StoredAnnotation>,
    explicit_references: BTreeMap<String, String>,
}

/// Store kept entirely in memory; commits are applied to a staged copy and
/// swapped in only when every operation succeeded
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: State,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> impl Iterator<Item = &StoredEvent> {
        self.state.events.values()
    }

    /// Links leaving `id`
    pub fn links_from(&self, id: EventId) -> Vec<&StoredLink> {
        self.state.links.iter().filter(|l| l.from == id).collect()
    }

    pub fn annotations(&self, explicit_reference: &str) -> Vec<&Annotation> {
        self.state
            .annotations
            .iter()
            .map(|a| &a.annotation)
            .filter(|a| a.explicit_reference == explicit_reference)
            .collect()
    }

    pub fn explicit_reference_group(&self, name: &str) -> Option<&str> {
        self.state.explicit_references.get(name).map(String::as_str)
    }
}

impl EventStore for InMemoryStore {
    fn lookup_events(&self, filter: &EventFilter) -> IngestionResult<Vec<StoredEvent>> {
        let mut events: Vec<StoredEvent> = self
            .state
            .events
            .values()
            .filter(|e| filter.matches(&e.event))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.event.start, e.id));
        Ok(events)
    }

    fn commit(&mut self, operations: &[Operation]) -> IngestionResult<CommitReport> {
        check_link_refs(operations)?;
        let mut staged = self.state.clone();
        let mut report = CommitReport::default();
        let mut pending = Vec::new();

        for operation in operations {
            staged.apply(operation, &mut report, &mut pending)?;
        }
        staged.resolve_links(pending, &mut report)?;
        staged.link_refs.clear();

        self.state = staged;
        debug!(
            "Committed {} operations: {} events inserted, {} erased",
            operations.len(),
            report.events_inserted,
            report.events_erased
        );
        Ok(report)
    }
}

/// Every link reference must be declared once within a commit
fn check_link_refs(operations: &[Operation]) -> IngestionResult<()> {
    let mut declared = HashSet::new();
    let link_refs = operations
        .iter()
        .flat_map(|op| op.events.iter())
        .filter_map(|e| e.link_ref.as_deref());
    for link_ref in link_refs {
        if !declared.insert(link_ref) {
            return Err(IngestionError::Store(format!(
                "duplicate link reference {}",
                link_ref
            )));
        }
    }
    Ok(())
}

/// Parts of `window` not covered by `cut`
fn subtract(
    window: (NaiveDateTime, NaiveDateTime),
    cut: (NaiveDateTime, NaiveDateTime),
) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    if !(window.0 < cut.1 && window.1 > cut.0) {
        return vec![window];
    }
    let mut pieces = Vec::new();
    if window.0 < cut.0 {
        pieces.push((window.0, cut.0));
    }
    if cut.1 < window.1 {
        pieces.push((cut.1, window.1));
    }
    pieces
}

impl State {
    fn apply(
        &mut self,
        operation: &Operation,
        report: &mut CommitReport,
        pending: &mut Vec<(EventId, EventLink)>,
    ) -> IngestionResult<()> {
        let context = OperationContext::of(operation);

        for reference in &operation.explicit_references {
            self.explicit_references
                .entry(reference.name.clone())
                .or_insert_with(|| reference.group.clone());
        }

        if operation.mode == OperationMode::InsertAndErase {
            self.erase_superseded(operation, &context, report);
        }

        for record in &operation.events {
            if record.stop < record.start {
                return Err(IngestionError::Store(format!(
                    "event on gauge {} stops before it starts",
                    record.gauge.name
                )));
            }
            let inserted = self.insert_with_policy(&context, record.clone(), report);
            for id in inserted {
                pending.extend(record.links.iter().cloned().map(|link| (id, link)));
            }
        }

        for annotation in &operation.annotations {
            self.insert_annotation(&context, annotation.clone(), report);
        }
        Ok(())
    }

    /// Older events of the same signature and gauges lying inside the new
    /// source validity are replaced by the operation's events
    fn erase_superseded(
        &mut self,
        operation: &Operation,
        context: &OperationContext,
        report: &mut CommitReport,
    ) {
        let gauges: BTreeSet<(&str, &str)> = operation
            .events
            .iter()
            .map(|e| (e.gauge.name.as_str(), e.gauge.system.as_str()))
            .collect();
        let validity = (
            operation.source.validity_start,
            operation.source.validity_stop,
        );

        let superseded: Vec<EventId> = self
            .events
            .values()
            .filter(|e| {
                e.dim_signature == context.dim_signature
                    && e.generation_time <= context.generation_time
                    && gauges.contains(&(e.event.gauge.name.as_str(), e.event.gauge.system.as_str()))
                    && e.event.start >= validity.0
                    && e.event.stop <= validity.1
            })
            .map(|e| e.id)
            .collect();

        for id in superseded {
            self.remove_event(id);
            report.events_erased += 1;
        }
    }

    fn insert_with_policy(
        &mut self,
        context: &OperationContext,
        record: EventRecord,
        report: &mut CommitReport,
    ) -> Vec<EventId> {
        match record.gauge.insertion_type {
            InsertionType::Simple => vec![self.insert_event(context, record, report)],
            InsertionType::InsertAndErase => {
                for id in self.same_window(&record) {
                    self.remove_event(id);
                    report.events_erased += 1;
                }
                vec![self.insert_event(context, record, report)]
            }
            InsertionType::InsertAndEraseWithPriority => {
                let existing = self.same_window(&record);
                self.replace_unless_outranked(context, record, existing, report)
            }
            InsertionType::InsertAndEraseIntersectedWithPriority => {
                let existing = self.intersecting(&record);
                self.replace_unless_outranked(context, record, existing, report)
            }
            InsertionType::InsertAndErasePerEventWithPriority => {
                self.insert_clipped(context, record, report)
            }
            InsertionType::SimpleUpdate => {
                let existing: Vec<EventId> = self
                    .events
                    .values()
                    .filter(|e| {
                        e.event.gauge.same_gauge(&record.gauge)
                            && e.event.explicit_reference == record.explicit_reference
                    })
                    .map(|e| e.id)
                    .collect();
                for id in existing {
                    self.remove_event(id);
                    report.events_erased += 1;
                }
                vec![self.insert_event(context, record, report)]
            }
        }
    }

    fn replace_unless_outranked(
        &mut self,
        context: &OperationContext,
        record: EventRecord,
        existing: Vec<EventId>,
        report: &mut CommitReport,
    ) -> Vec<EventId> {
        let outranked = existing
            .iter()
            .any(|id| self.events[id].priority > context.priority);
        if outranked {
            return Vec::new();
        }
        for id in existing {
            self.remove_event(id);
            report.events_erased += 1;
        }
        vec![self.insert_event(context, record, report)]
    }

    fn insert_clipped(
        &mut self,
        context: &OperationContext,
        record: EventRecord,
        report: &mut CommitReport,
    ) -> Vec<EventId> {
        let mut fragments = vec![(record.start, record.stop)];
        for id in self.intersecting(&record) {
            let existing = &self.events[&id];
            let window = (existing.event.start, existing.event.stop);
            if existing.priority > context.priority {
                fragments = fragments
                    .into_iter()
                    .flat_map(|fragment| subtract(fragment, window))
                    .collect();
            } else {
                self.clip_event(id, (record.start, record.stop), report);
            }
        }

        let mut inserted = Vec::new();
        for (i, (start, stop)) in fragments.into_iter().enumerate() {
            let mut piece = record.clone();
            piece.start = start;
            piece.stop = stop;
            if i > 0 {
                piece.link_ref = None;
                piece.alerts.clear();
            }
            inserted.push(self.insert_event(context, piece, report));
        }
        inserted
    }

    /// Cut `window` out of a stored event, keeping its links on every piece
    fn clip_event(
        &mut self,
        id: EventId,
        window: (NaiveDateTime, NaiveDateTime),
        report: &mut CommitReport,
    ) {
        let stored = self.events[&id].clone();
        let pieces = subtract((stored.event.start, stored.event.stop), window);
        let Some((first, rest)) = pieces.split_first() else {
            self.remove_event(id);
            report.events_erased += 1;
            return;
        };

        if let Some(event) = self.events.get_mut(&id) {
            event.event.start = first.0;
            event.event.stop = first.1;
        }
        for &(start, stop) in rest {
            self.next_id += 1;
            let piece_id = EventId(self.next_id);
            let mut piece = stored.clone();
            piece.id = piece_id;
            piece.event.start = start;
            piece.event.stop = stop;
            piece.event.link_ref = None;
            self.events.insert(piece_id, piece);

            let copied: Vec<StoredLink> = self
                .links
                .iter()
                .filter(|l| l.from == id || l.to == id)
                .map(|l| StoredLink {
                    from: if l.from == id { piece_id } else { l.from },
                    to: if l.to == id { piece_id } else { l.to },
                    name: l.name.clone(),
                })
                .collect();
            self.links.extend(copied);
        }
    }

    fn same_window(&self, record: &EventRecord) -> Vec<EventId> {
        self.events
            .values()
            .filter(|e| {
                e.event.gauge.same_gauge(&record.gauge)
                    && e.event.start == record.start
                    && e.event.stop == record.stop
            })
            .map(|e| e.id)
            .collect()
    }

    fn intersecting(&self, record: &EventRecord) -> Vec<EventId> {
        self.events
            .values()
            .filter(|e| {
                e.event.gauge.same_gauge(&record.gauge)
                    && (e.event.intersects(record.start, record.stop)
                        || (e.event.start == record.start && e.event.stop == record.stop))
            })
            .map(|e| e.id)
            .collect()
    }

    fn insert_event(
        &mut self,
        context: &OperationContext,
        record: EventRecord,
        report: &mut CommitReport,
    ) -> EventId {
        self.next_id += 1;
        let id = EventId(self.next_id);
        if let Some(link_ref) = &record.link_ref {
            self.link_refs.insert(link_ref.clone(), id);
        }
        report.events_inserted += 1;
        report.alerts += record.alerts.len();
        self.events.insert(
            id,
            StoredEvent {
                id,
                source: context.source.clone(),
                dim_signature: context.dim_signature.clone(),
                generation_time: context.generation_time,
                priority: context.priority,
                event: record,
            },
        );
        id
    }

    fn remove_event(&mut self, id: EventId) {
        self.events.remove(&id);
        self.links.retain(|l| l.from != id && l.to != id);
        self.link_refs.retain(|_, target| *target != id);
    }

    fn insert_annotation(
        &mut self,
        context: &OperationContext,
        annotation: Annotation,
        report: &mut CommitReport,
    ) {
        let same_key = |stored: &StoredAnnotation| {
            stored.annotation.explicit_reference == annotation.explicit_reference
                && stored.annotation.name == annotation.name
        };
        match annotation.insertion_type {
            InsertionType::SimpleUpdate | InsertionType::InsertAndErase => {
                self.annotations.retain(|a| !same_key(a));
            }
            InsertionType::InsertAndEraseWithPriority
            | InsertionType::InsertAndEraseIntersectedWithPriority
            | InsertionType::InsertAndErasePerEventWithPriority => {
                if self
                    .annotations
                    .iter()
                    .any(|a| same_key(a) && a.priority > context.priority)
                {
                    return;
                }
                self.annotations.retain(|a| !same_key(a));
            }
            InsertionType::Simple => {}
        }
        report.annotations_inserted += 1;
        self.annotations.push(StoredAnnotation {
            annotation,
            priority: context.priority,
        });
    }

    /// Second phase of a commit: symbolic and identifier links become
    /// concrete links in both directions
    fn resolve_links(
        &mut self,
        pending: Vec<(EventId, EventLink)>,
        report: &mut CommitReport,
    ) -> IngestionResult<()> {
        for (from, link) in pending {
            if !self.events.contains_key(&from) {
                continue;
            }
            let target = match link.link_mode {
                LinkMode::ByRef => self.link_refs.get(&link.link).copied().ok_or_else(|| {
                    IngestionError::Store(format!("unresolved link reference {}", link.link))
                })?,
                LinkMode::ById => link
                    .link
                    .parse::<u64>()
                    .ok()
                    .map(EventId)
                    .filter(|id| self.events.contains_key(id))
                    .ok_or_else(|| {
                        IngestionError::Store(format!("unknown event identifier {}", link.link))
                    })?,
            };

            self.links.push(StoredLink {
                from: target,
                to: from,
                name: link.name,
            });
            report.links_created += 1;
            if let Some(back_ref) = link.back_ref {
                self.links.push(StoredLink {
                    from,
                    to: target,
                    name: back_ref,
                });
                report.links_created += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventValue;
    use crate::repo::{DimSignature, Gauge, Source};
    use crate::timing::parse_timestamp;

    fn ts(value: &str) -> NaiveDateTime {
        parse_timestamp(value).unwrap()
    }

    fn source(name: &str, priority: Option<i32>) -> Source {
        Source {
            name: name.to_string(),
            reception_time: ts("2021-03-16T16:00:00"),
            generation_time: ts("2021-03-16T16:00:00"),
            reported_generation_time: ts("2021-03-16T16:00:00"),
            validity_start: ts("2021-03-16T16:00:00"),
            reported_validity_start: ts("2021-03-16T16:00:00"),
            validity_stop: ts("2021-03-17T16:00:00"),
            reported_validity_stop: ts("2021-03-17T16:00:00"),
            priority,
            ingestion_completeness: None,
        }
    }

    fn event(gauge: &str, kind: InsertionType, start: &str, stop: &str) -> EventRecord {
        EventRecord {
            explicit_reference: None,
            link_ref: None,
            gauge: Gauge::new(gauge, "S1A", kind),
            start: ts(start),
            stop: ts(stop),
            values: vec![EventValue::text("status", "MISSING")],
            links: Vec::new(),
            alerts: Vec::new(),
        }
    }

    fn operation(
        mode: OperationMode,
        source_name: &str,
        priority: Option<i32>,
        events: Vec<EventRecord>,
    ) -> Operation {
        Operation {
            mode,
            dim_signature: DimSignature {
                name: "TEST".to_string(),
                exec: "tests".to_string(),
                version: "1.0".to_string(),
            },
            source: source(source_name, priority),
            explicit_references: Vec::new(),
            events,
            annotations: Vec::new(),
        }
    }

    fn count(store: &InMemoryStore, gauge: &str) -> usize {
        store
            .lookup_events(&EventFilter::gauge(gauge, "S1A"))
            .unwrap()
            .len()
    }

    #[test]
    fn test_exact_window_replacement() {
        let mut store = InMemoryStore::new();
        let record = event(
            "PLANNED_IMAGING",
            InsertionType::InsertAndErase,
            "2021-03-16T18:10:00",
            "2021-03-16T18:15:00",
        );
        for _ in 0..2 {
            store
                .commit(&[operation(OperationMode::Insert, "a", None, vec![record.clone()])])
                .unwrap();
        }
        assert_eq!(count(&store, "PLANNED_IMAGING"), 1);
    }

    #[test]
    fn test_intersected_events_keep_highest_priority() {
        let mut store = InMemoryStore::new();
        let gauge = "COMPLETENESS";
        let kind = InsertionType::InsertAndEraseIntersectedWithPriority;

        store
            .commit(&[operation(
                OperationMode::Insert,
                "high",
                Some(30),
                vec![event(gauge, kind, "2021-03-16T18:10:00", "2021-03-16T18:15:00")],
            )])
            .unwrap();
        let report = store
            .commit(&[operation(
                OperationMode::Insert,
                "low",
                Some(10),
                vec![event(gauge, kind, "2021-03-16T18:10:02", "2021-03-16T18:15:02")],
            )])
            .unwrap();
        assert_eq!(report.events_inserted, 0);

        let report = store
            .commit(&[operation(
                OperationMode::Insert,
                "newer",
                Some(30),
                vec![event(gauge, kind, "2021-03-16T18:10:01", "2021-03-16T18:15:01")],
            )])
            .unwrap();
        assert_eq!(report.events_erased, 1);

        let events = store.lookup_events(&EventFilter::gauge(gauge, "S1A")).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, "newer");
    }

    #[test]
    fn test_per_event_priority_clips_lower_priority_events() {
        let mut store = InMemoryStore::new();
        let gauge = "COMPLETENESS";
        store
            .commit(&[operation(
                OperationMode::Insert,
                "planning",
                Some(10),
                vec![event(
                    gauge,
                    InsertionType::InsertAndEraseIntersectedWithPriority,
                    "2021-03-16T18:10:00",
                    "2021-03-16T18:20:00",
                )],
            )])
            .unwrap();
        store
            .commit(&[operation(
                OperationMode::Insert,
                "catalog",
                Some(30),
                vec![event(
                    gauge,
                    InsertionType::InsertAndErasePerEventWithPriority,
                    "2021-03-16T18:12:00",
                    "2021-03-16T18:14:00",
                )],
            )])
            .unwrap();

        let windows: Vec<(NaiveDateTime, NaiveDateTime, String)> = store
            .lookup_events(&EventFilter::gauge(gauge, "S1A"))
            .unwrap()
            .into_iter()
            .map(|e| (e.event.start, e.event.stop, e.source))
            .collect();
        assert_eq!(
            windows,
            vec![
                (ts("2021-03-16T18:10:00"), ts("2021-03-16T18:12:00"), "planning".to_string()),
                (ts("2021-03-16T18:12:00"), ts("2021-03-16T18:14:00"), "catalog".to_string()),
                (ts("2021-03-16T18:14:00"), ts("2021-03-16T18:20:00"), "planning".to_string()),
            ]
        );
    }

    #[test]
    fn test_by_ref_links_are_resolved_both_ways() {
        let mut store = InMemoryStore::new();
        let mut imaging = event(
            "PLANNED_IMAGING",
            InsertionType::InsertAndErase,
            "2021-03-16T18:10:00",
            "2021-03-16T18:15:00",
        );
        imaging.link_ref = Some("PLANNED_IMAGING_2021-03-16T18:10:00".to_string());
        let mut placeholder = event(
            "COMPLETENESS",
            InsertionType::InsertAndEraseIntersectedWithPriority,
            "2021-03-16T18:10:10",
            "2021-03-16T18:14:40",
        );
        placeholder.links.push(EventLink {
            link: "PLANNED_IMAGING_2021-03-16T18:10:00".to_string(),
            link_mode: LinkMode::ByRef,
            name: "DHUS_PRODUCT_COMPLETENESS".to_string(),
            back_ref: Some("PLANNED_IMAGING".to_string()),
        });

        let report = store
            .commit(&[
                operation(OperationMode::InsertAndErase, "a", None, vec![imaging]),
                operation(OperationMode::Insert, "a", Some(10), vec![placeholder]),
            ])
            .unwrap();
        assert_eq!(report.links_created, 2);

        let imaging_id = store
            .lookup_events(&EventFilter::gauge("PLANNED_IMAGING", "S1A"))
            .unwrap()[0]
            .id;
        let links = store.links_from(imaging_id);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "DHUS_PRODUCT_COMPLETENESS");
        let back = store.links_from(links[0].to);
        assert_eq!(back[0].to, imaging_id);
        assert_eq!(back[0].name, "PLANNED_IMAGING");
    }

    #[test]
    fn test_failed_commit_leaves_store_untouched() {
        let mut store = InMemoryStore::new();
        let mut orphan = event(
            "COMPLETENESS",
            InsertionType::Simple,
            "2021-03-16T18:10:10",
            "2021-03-16T18:14:40",
        );
        orphan.links.push(EventLink {
            link: "PLANNED_IMAGING_missing".to_string(),
            link_mode: LinkMode::ByRef,
            name: "DHUS_PRODUCT_COMPLETENESS".to_string(),
            back_ref: None,
        });
        let result = store.commit(&[operation(OperationMode::Insert, "a", None, vec![orphan])]);
        assert!(matches!(result, Err(IngestionError::Store(_))));
        assert_eq!(store.events().count(), 0);
    }

    #[test]
    fn test_duplicate_link_ref_fails_commit() {
        let mut store = InMemoryStore::new();
        let mut first = event(
            "PLANNED_IMAGING",
            InsertionType::Simple,
            "2021-03-16T18:10:00",
            "2021-03-16T18:15:00",
        );
        first.link_ref = Some("PLANNED_IMAGING_2021-03-16T18:10:00".to_string());
        let second = first.clone();

        let result = store.commit(&[operation(
            OperationMode::Insert,
            "a",
            None,
            vec![first, second],
        )]);
        assert!(matches!(result, Err(IngestionError::Store(msg)) if msg.contains("duplicate")));
        assert_eq!(store.events().count(), 0);
    }

    #[test]
    fn test_link_refs_do_not_outlive_their_commit() {
        let mut store = InMemoryStore::new();
        let mut imaging = event(
            "PLANNED_IMAGING",
            InsertionType::InsertAndErase,
            "2021-03-16T18:10:00",
            "2021-03-16T18:15:00",
        );
        imaging.link_ref = Some("PLANNED_IMAGING_2021-03-16T18:10:00".to_string());
        store
            .commit(&[operation(OperationMode::Insert, "a", None, vec![imaging])])
            .unwrap();

        let mut placeholder = event(
            "COMPLETENESS",
            InsertionType::Simple,
            "2021-03-16T18:10:10",
            "2021-03-16T18:14:40",
        );
        placeholder.links.push(EventLink {
            link: "PLANNED_IMAGING_2021-03-16T18:10:00".to_string(),
            link_mode: LinkMode::ByRef,
            name: "DHUS_PRODUCT_COMPLETENESS".to_string(),
            back_ref: None,
        });
        let result = store.commit(&[operation(OperationMode::Insert, "b", None, vec![placeholder])]);
        assert!(matches!(result, Err(IngestionError::Store(_))));
        assert_eq!(store.events().count(), 1);
    }

    #[test]
    fn test_insert_and_erase_mode_replaces_shifted_events() {
        let mut store = InMemoryStore::new();
        let kind = InsertionType::InsertAndErase;
        store
            .commit(&[operation(
                OperationMode::InsertAndErase,
                "plan_v1",
                None,
                vec![event("PLANNED_IMAGING", kind, "2021-03-16T18:10:00", "2021-03-16T18:15:00")],
            )])
            .unwrap();
        store
            .commit(&[operation(
                OperationMode::InsertAndErase,
                "plan_v2",
                None,
                vec![event("PLANNED_IMAGING", kind, "2021-03-16T18:10:03", "2021-03-16T18:15:03")],
            )])
            .unwrap();

        let events = store
            .lookup_events(&EventFilter::gauge("PLANNED_IMAGING", "S1A"))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, "plan_v2");
    }

    #[test]
    fn test_lookup_overlapping_window() {
        let mut store = InMemoryStore::new();
        store
            .commit(&[operation(
                OperationMode::Insert,
                "a",
                None,
                vec![
                    event("G", InsertionType::Simple, "2021-03-16T10:00:00", "2021-03-16T11:00:00"),
                    event("G", InsertionType::Simple, "2021-03-16T12:00:00", "2021-03-16T13:00:00"),
                ],
            )])
            .unwrap();
        let filter = EventFilter::gauge("G", "S1A")
            .overlapping(ts("2021-03-16T10:30:00"), ts("2021-03-16T11:30:00"));
        assert_eq!(store.lookup_events(&filter).unwrap().len(), 1);
        let filter = EventFilter::gauge("G", "S1B");
        assert!(store.lookup_events(&filter).unwrap().is_empty());
    }

    #[test]
    fn test_annotation_priority() {
        let mut store = InMemoryStore::new();
        let annotation = |value: &str| Annotation {
            explicit_reference: "PRODUCT".to_string(),
            name: "DHUS_PUBLICATION_TIME".to_string(),
            insertion_type: InsertionType::InsertAndEraseWithPriority,
            values: vec![EventValue::timestamp("dhus_publication_time", value)],
        };
        let mut first = operation(OperationMode::Insert, "a", Some(30), Vec::new());
        first.annotations.push(annotation("2021-03-16T20:00:00"));
        let mut second = operation(OperationMode::Insert, "b", Some(10), Vec::new());
        second.annotations.push(annotation("2021-03-16T21:00:00"));
        store.commit(&[first]).unwrap();
        store.commit(&[second]).unwrap();

        let stored = store.annotations("PRODUCT");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].values[0].value, "2021-03-16T20:00:00");
    }
}
