/// Business logic services layer
mod planning;
mod products;

pub use planning::{PlanningReconciler, PlanningReconciliation, PLANNED_IMAGING_GAUGE};
pub use products::{
    CatalogReconciliation, FootprintSplitter, PassThroughFootprints, ProductOutcome,
    ProductReconciler, DHUS_PRODUCT_GAUGE,
};

use crate::config::AppConfig;
use crate::domain::{CatalogFile, PlanningFile};
use crate::errors::IngestionResult;
use crate::repo::{CommitReport, EventStore, Operation};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Outcome of one ingested file
#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    pub file: String,
    pub operations: Vec<Operation>,
    pub commit: CommitReport,
}

/// Feeds planning and catalog files through the reconcilers into a store.
///
/// Each file is committed as one unit: a file that fails reconciliation or
/// commit leaves the store as it was.
pub struct IngestionRunner<S: EventStore, F: FootprintSplitter = PassThroughFootprints> {
    store: S,
    planning: PlanningReconciler,
    products: ProductReconciler<F>,
}

impl<S: EventStore> IngestionRunner<S> {
    pub fn from_config(store: S, config: &AppConfig) -> Self {
        Self::new(
            store,
            PlanningReconciler::new(
                config.completeness.clone(),
                config.priorities.planning_completeness,
            ),
            ProductReconciler::new(PassThroughFootprints, config.priorities.catalog),
        )
    }
}

impl<S: EventStore, F: FootprintSplitter> IngestionRunner<S, F> {
    pub fn new(store: S, planning: PlanningReconciler, products: ProductReconciler<F>) -> Self {
        Self {
            store,
            planning,
            products,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ingest_planning(
        &mut self,
        file: &PlanningFile,
        reception_time: NaiveDateTime,
    ) -> IngestionResult<IngestionReport> {
        let reconciliation = self.planning.reconcile(file, reception_time)?;
        self.commit(&file.name, reconciliation.operations)
    }

    pub fn ingest_catalog(
        &mut self,
        file: &CatalogFile,
        reception_time: NaiveDateTime,
    ) -> IngestionResult<IngestionReport> {
        self.ingest_catalog_at(file, reception_time, Utc::now().naive_utc())
    }

    /// Like `ingest_catalog`, with `now` stamping the alerts
    pub fn ingest_catalog_at(
        &mut self,
        file: &CatalogFile,
        reception_time: NaiveDateTime,
        now: NaiveDateTime,
    ) -> IngestionResult<IngestionReport> {
        let reconciliation = self
            .products
            .reconcile(file, &self.store, reception_time, now)?;
        self.commit(&file.name, reconciliation.operations)
    }

    fn commit(&mut self, file: &str, operations: Vec<Operation>) -> IngestionResult<IngestionReport> {
        let commit = self.store.commit(&operations)?;
        info!(
            "Ingested {}: {} events, {} links, {} alerts",
            file, commit.events_inserted, commit.links_created, commit.alerts
        );
        Ok(IngestionReport {
            file: file.to_string(),
            operations,
            commit,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{CatalogEntry, CatalogFile, PlanningFile, PlanningRequest};
    use crate::timing::parse_timestamp;
    use chrono::NaiveDateTime;

    pub const PRODUCT_NAME: &str =
        "S1A_EW_GRDM_1SDH_20210316T181053_20210316T181157_037027_045B92_5AE1";

    pub fn ts(value: &str) -> NaiveDateTime {
        parse_timestamp(value).unwrap()
    }

    pub fn planning_file(requests: Vec<PlanningRequest>) -> PlanningFile {
        PlanningFile {
            name: "S1A_OPER_MPL__NPPF__20210316T160000_20210405T180000_0001.EOF".to_string(),
            creation_date: "UTC=2021-03-16T16:00:00".to_string(),
            validity_start: "UTC=2021-03-16T16:00:00".to_string(),
            validity_stop: "UTC=2021-04-05T18:00:00".to_string(),
            requests,
        }
    }

    /// Imaging request triggered at 2021-03-16T18:10:48.580 for datatake 45B92
    pub fn imaging_request(name: &str, ecc: &str, warmup: &str, chops: &str) -> PlanningRequest {
        let parameters = [
            ("RQ_ID", "1"),
            ("ECCPRNR", ecc),
            ("WARM_UP", warmup),
            ("POLAR", "1"),
            ("DT_ID", "08B72400"),
            ("N_PG_REP", chops),
            ("ORB_NUM", "37027"),
            ("ORB_ANGL", "120.5"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        PlanningRequest {
            name: name.to_string(),
            execution_time: "UTC=2021-03-16T18:10:48.580".to_string(),
            parameters,
        }
    }

    pub fn catalog_file(entries: Vec<CatalogEntry>) -> CatalogFile {
        CatalogFile {
            name: "DEC_OPER_OPDHUS_S1A_AUIP_20210419T135405_V20210316T000000_20210319T000000.json"
                .to_string(),
            entries,
        }
    }

    /// EW GRD product of datatake 45B92
    pub fn catalog_entry() -> CatalogEntry {
        CatalogEntry {
            name: PRODUCT_NAME.to_string(),
            identifier: "6b1ef9c2-8d57-4a4e-9d3e-2f0f4c6bd1a0".to_string(),
            creation_date: "2021-03-16T19:02:11.283Z".to_string(),
            ingestion_date: "2021-03-16T19:01:30.121Z".to_string(),
            content_length: "1686259573".to_string(),
            content_start: "2021-03-16T18:10:53.109Z".to_string(),
            content_end: "2021-03-16T18:11:57.398Z".to_string(),
            geometry: "45.1,-10.5 46.2,-11.0 46.0,-12.0 45.1,-10.5".to_string(),
            metadata_url:
                "https://scihub.copernicus.eu/apihub/odata/v1/Products('6b1ef9c2-8d57-4a4e-9d3e-2f0f4c6bd1a0')"
                    .to_string(),
        }
    }
}
