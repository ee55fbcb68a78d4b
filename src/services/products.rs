/// Catalog reconciliation: published products against planned imaging
use crate::alerts;
use crate::codec::{self, ProductName};
use crate::completeness;
use crate::domain::{Alert, CatalogEntry, CatalogFile, CompletenessStatus, EventValue, PublishedProduct};
use crate::errors::IngestionResult;
use crate::repo::{
    Annotation, DimSignature, EventFilter, EventId, EventLink, EventRecord, EventStore,
    ExplicitReference, Gauge, IngestionCompleteness, InsertionType, LinkMode, Operation,
    OperationMode, Source,
};
use crate::services::planning::PLANNED_IMAGING_GAUGE;
use crate::timing::{parse_compact_timestamp, parse_timestamp, seconds};
use crate::utils::{flip_coordinates, name_field};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub const DHUS_PRODUCT_GAUGE: &str = "DHUS_PRODUCT";
const GENERATOR: &str = "product_reconciler";
const VERSION: &str = "1.0";

/// Splits a footprint crossing the antimeridian into valid polygons
pub trait FootprintSplitter {
    /// `coordinates` holds space separated `lon,lat` pairs
    fn split(&self, coordinates: &str) -> Vec<String>;
}

/// Keeps every footprint as a single polygon
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughFootprints;

impl FootprintSplitter for PassThroughFootprints {
    fn split(&self, coordinates: &str) -> Vec<String> {
        vec![coordinates.to_string()]
    }
}

/// Reconciliation result of one catalog entry
#[derive(Debug, Clone)]
pub struct ProductOutcome {
    pub product: PublishedProduct,
    pub status: CompletenessStatus,
    pub planned_imaging: Option<EventId>,
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone)]
pub struct CatalogReconciliation {
    pub satellite: String,
    pub outcomes: Vec<ProductOutcome>,
    pub operations: Vec<Operation>,
}

impl CatalogReconciliation {
    pub fn unexpected(&self) -> impl Iterator<Item = &ProductOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CompletenessStatus::Unexpected)
    }
}

pub struct ProductReconciler<F: FootprintSplitter = PassThroughFootprints> {
    splitter: F,
    priority: i32,
}

impl<F: FootprintSplitter> ProductReconciler<F> {
    pub fn new(splitter: F, priority: i32) -> Self {
        Self { splitter, priority }
    }

    /// Link every catalog entry to the planned imaging with the same
    /// datatake id inside the feed's time span.
    ///
    /// An entry without a planned counterpart is UNEXPECTED and carries an
    /// alert; that is a business outcome, not an error.
    pub fn reconcile<S: EventStore + ?Sized>(
        &self,
        file: &CatalogFile,
        store: &S,
        reception_time: NaiveDateTime,
        now: NaiveDateTime,
    ) -> IngestionResult<CatalogReconciliation> {
        let satellite = name_field(&file.name, 16, 19)?.to_string();
        let reported_generation_time = parse_compact_timestamp(name_field(&file.name, 25, 40)?)?;
        let reported_validity_start = parse_compact_timestamp(name_field(&file.name, 42, 57)?)?;
        let reported_validity_stop = parse_compact_timestamp(name_field(&file.name, 58, 73)?)?;

        let products = file
            .entries
            .iter()
            .map(|entry| self.product(entry, &satellite))
            .collect::<IngestionResult<Vec<PublishedProduct>>>()?;

        // Same one second margin as the completeness events
        let validity_start = products
            .iter()
            .map(|p| p.start)
            .min()
            .map_or(reported_validity_start, |start| start - seconds(1.0));
        let validity_stop = products
            .iter()
            .map(|p| p.stop)
            .max()
            .unwrap_or(reported_validity_stop);

        let planned = if products.is_empty() {
            HashMap::new()
        } else {
            index_planned_imaging(store, &satellite, validity_start, validity_stop)?
        };

        let mut outcomes = Vec::with_capacity(products.len());
        for product in products {
            let planned_imaging = planned.get(&product.datatake_id).copied();
            let (status, alert) = match planned_imaging {
                Some(id) => {
                    debug!("Product {} linked to planned imaging {}", product.name, id);
                    (CompletenessStatus::Published, None)
                }
                None => {
                    warn!(
                        "Product {} (datatake {}) has no planned imaging",
                        product.name, product.datatake_id
                    );
                    (
                        CompletenessStatus::Unexpected,
                        Some(alerts::unlinked_product(&product.name, GENERATOR, now)),
                    )
                }
            };
            outcomes.push(ProductOutcome {
                product,
                status,
                planned_imaging,
                alert,
            });
        }

        let all_linked = outcomes
            .iter()
            .all(|o| o.status == CompletenessStatus::Published);
        let source = Source {
            name: file.name.clone(),
            reception_time,
            generation_time: reported_generation_time,
            reported_generation_time,
            validity_start,
            reported_validity_start,
            validity_stop,
            reported_validity_stop,
            priority: Some(self.priority),
            ingestion_completeness: None,
        };

        let products_operation = Operation {
            mode: OperationMode::Insert,
            dim_signature: dim_signature(format!("DHUS_PRODUCTS_{}", satellite)),
            source: Source {
                ingestion_completeness: Some(IngestionCompleteness {
                    check: all_linked,
                    message: if all_linked {
                        String::new()
                    } else {
                        "MISSING_PLANNING".to_string()
                    },
                }),
                ..source.clone()
            },
            explicit_references: outcomes
                .iter()
                .map(|o| ExplicitReference {
                    group: DHUS_PRODUCT_GAUGE.to_string(),
                    name: o.product.name.clone(),
                })
                .collect(),
            events: outcomes
                .iter()
                .map(|o| product_record(o, &satellite))
                .collect(),
            annotations: outcomes
                .iter()
                .flat_map(|o| product_annotations(&o.product))
                .collect(),
        };
        let completeness_operation = Operation {
            mode: OperationMode::Insert,
            dim_signature: dim_signature(format!("COMPLETENESS_NPPF_{}", satellite)),
            source,
            explicit_references: Vec::new(),
            events: outcomes
                .iter()
                .map(|o| completeness_record(o, &satellite))
                .collect(),
            annotations: Vec::new(),
        };

        let result = CatalogReconciliation {
            satellite,
            outcomes,
            operations: vec![products_operation, completeness_operation],
        };
        info!(
            "Catalog file {}: {} products, {} unexpected",
            file.name,
            result.outcomes.len(),
            result.unexpected().count()
        );
        Ok(result)
    }

    fn product(&self, entry: &CatalogEntry, satellite: &str) -> IngestionResult<PublishedProduct> {
        let name = ProductName::parse(&entry.name)?;
        if name.satellite != satellite {
            warn!(
                "Product {} belongs to {} but was published in the {} feed",
                entry.name, name.satellite, satellite
            );
        }
        let footprints = self
            .splitter
            .split(&flip_coordinates(&entry.geometry)?)
            .into_iter()
            .map(|polygon| polygon.replace(',', " "))
            .collect();

        Ok(PublishedProduct {
            name: entry.name.clone(),
            identifier: entry.identifier.clone(),
            level: name.level,
            ingestion_time: entry.ingestion_date.clone(),
            publication_time: entry.creation_date.clone(),
            metadata_url: entry.metadata_url.clone(),
            product_url: if entry.metadata_url.is_empty() {
                String::new()
            } else {
                format!("{}/$value", entry.metadata_url)
            },
            datatake_id: name.datatake_id,
            orbit: name.orbit,
            size: codec::decode_size(&entry.content_length)?,
            footprints,
            start: parse_timestamp(&entry.content_start)?,
            stop: parse_timestamp(&entry.content_end)?,
        })
    }
}

/// Planned imaging overlapping the feed span, keyed by datatake id
fn index_planned_imaging<S: EventStore + ?Sized>(
    store: &S,
    satellite: &str,
    start: NaiveDateTime,
    stop: NaiveDateTime,
) -> IngestionResult<HashMap<String, EventId>> {
    let filter = EventFilter::gauge(PLANNED_IMAGING_GAUGE, satellite).overlapping(start, stop);
    let mut index = HashMap::new();
    for stored in store.lookup_events(&filter)? {
        match stored.event.value("datatake_id") {
            Some(datatake_id) => {
                index.insert(datatake_id.to_string(), stored.id);
            }
            None => warn!("Planned imaging {} has no datatake id", stored.id),
        }
    }
    Ok(index)
}

fn dim_signature(name: String) -> DimSignature {
    DimSignature {
        name,
        exec: GENERATOR.to_string(),
        version: VERSION.to_string(),
    }
}

fn planned_imaging_link(outcome: &ProductOutcome, name: &str) -> Vec<EventLink> {
    outcome
        .planned_imaging
        .map(|id| EventLink {
            link: id.to_string(),
            link_mode: LinkMode::ById,
            name: name.to_string(),
            back_ref: Some(PLANNED_IMAGING_GAUGE.to_string()),
        })
        .into_iter()
        .collect()
}

fn product_record(outcome: &ProductOutcome, satellite: &str) -> EventRecord {
    let product = &outcome.product;
    EventRecord {
        explicit_reference: Some(product.name.clone()),
        link_ref: None,
        gauge: Gauge::new(DHUS_PRODUCT_GAUGE, satellite, InsertionType::SimpleUpdate),
        start: product.start,
        stop: product.stop,
        values: vec![
            EventValue::text("satellite", satellite),
            EventValue::text("datatake_id", product.datatake_id.as_str()),
            EventValue::double("orbit", product.orbit),
        ],
        links: planned_imaging_link(outcome, DHUS_PRODUCT_GAUGE),
        alerts: outcome.alert.iter().cloned().collect(),
    }
}

fn completeness_record(outcome: &ProductOutcome, satellite: &str) -> EventRecord {
    let product = &outcome.product;
    EventRecord {
        explicit_reference: Some(product.name.clone()),
        link_ref: None,
        gauge: Gauge::new(
            completeness::gauge_name(product.level),
            satellite,
            InsertionType::InsertAndErasePerEventWithPriority,
        ),
        start: product.start - seconds(1.0),
        stop: product.stop,
        values: vec![
            EventValue::text("satellite", satellite),
            EventValue::text("datatake_id", product.datatake_id.as_str()),
            EventValue::double("orbit", product.orbit),
            EventValue::text("status", outcome.status.as_str()),
        ],
        links: planned_imaging_link(outcome, "DHUS_PRODUCT_COMPLETENESS"),
        alerts: Vec::new(),
    }
}

fn product_annotations(product: &PublishedProduct) -> Vec<Annotation> {
    let mut metadata = vec![
        EventValue::timestamp("dhus_ingestion_time", product.ingestion_time.as_str()),
        EventValue::text("dhus_identifier", product.identifier.as_str()),
        EventValue::text("dhus_metadata_url", product.metadata_url.as_str()),
        EventValue::text("dhus_product_url", product.product_url.as_str()),
        EventValue::text("datatake_id", product.datatake_id.as_str()),
        EventValue::double("orbit", product.orbit),
        EventValue::double("size", product.size),
    ];
    metadata.extend(
        product
            .footprints
            .iter()
            .enumerate()
            .map(|(i, polygon)| EventValue::geometry(&format!("coordinates_{}", i), polygon.as_str())),
    );

    vec![
        Annotation {
            explicit_reference: product.name.clone(),
            name: "DHUS_PUBLICATION_TIME".to_string(),
            insertion_type: InsertionType::InsertAndEraseWithPriority,
            values: vec![EventValue::timestamp(
                "dhus_publication_time",
                product.publication_time.as_str(),
            )],
        },
        Annotation {
            explicit_reference: product.name.clone(),
            name: "DHUS_METADATA_INFORMATION".to_string(),
            insertion_type: InsertionType::SimpleUpdate,
            values: metadata,
        },
    ]
}
