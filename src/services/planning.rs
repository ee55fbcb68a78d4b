/// Planning reconciliation: planning requests to acquisitions and completeness placeholders
use crate::codec;
use crate::completeness::{self, CompletenessPolicy};
use crate::domain::{
    AcquisitionEvent, CompletenessPlaceholder, ImagingModeDescriptor, OperationKind, PlanningFile,
    PlanningRequest,
};
use crate::errors::IngestionResult;
use crate::registry::{self, DELETION_QUEUE_REQUEST};
use crate::repo::{
    DimSignature, EventLink, EventRecord, Gauge, InsertionType, LinkMode, Operation,
    OperationMode, Source,
};
use crate::timing::{compute_acquisition_window, format_timestamp, parse_timestamp};
use crate::utils::{name_field, optional_param, parse_number, require_param};
use chrono::NaiveDateTime;
use tracing::{debug, info};

pub const PLANNED_IMAGING_GAUGE: &str = "PLANNED_IMAGING";
const GENERATOR: &str = "planning_reconciler";
const VERSION: &str = "1.0";

/// Everything derived from one planning file
#[derive(Debug, Clone)]
pub struct PlanningReconciliation {
    pub satellite: String,
    pub acquisitions: Vec<AcquisitionEvent>,
    pub placeholders: Vec<CompletenessPlaceholder>,
    pub operations: Vec<Operation>,
}

pub struct PlanningReconciler {
    policy: CompletenessPolicy,
    completeness_priority: i32,
}

impl PlanningReconciler {
    pub fn new(policy: CompletenessPolicy, completeness_priority: i32) -> Self {
        Self {
            policy,
            completeness_priority,
        }
    }

    /// Reconcile every imaging request of the file.
    ///
    /// Any request missing a required parameter or carrying an unknown code
    /// fails the whole file.
    pub fn reconcile(
        &self,
        file: &PlanningFile,
        reception_time: NaiveDateTime,
    ) -> IngestionResult<PlanningReconciliation> {
        let satellite = name_field(&file.name, 0, 3)?.to_string();
        let source = planning_source(file, reception_time)?;

        let mut acquisitions = Vec::new();
        let mut placeholders = Vec::new();
        for request in &file.requests {
            // Calibration-only and non-imaging requests are not reconciled
            let kind = match codec::decode_operation_kind(&request.name) {
                Ok(kind) if kind.is_reconciled() => kind,
                _ => continue,
            };

            let (acquisition, mode) = build_acquisition(&satellite, request, kind)?;
            debug!(
                "Planned imaging {} ({}) datatake {} from {} to {}",
                acquisition.request_id,
                mode.short_name,
                acquisition.datatake_id,
                format_timestamp(&acquisition.start),
                format_timestamp(&acquisition.stop)
            );
            placeholders.extend(completeness::build_placeholders(
                &acquisition,
                mode,
                &self.policy,
                GENERATOR,
            ));
            acquisitions.push(acquisition);
        }

        let imaging_operation = Operation {
            mode: OperationMode::InsertAndErase,
            dim_signature: dim_signature(format!("NPPF_{}", satellite)),
            source: source.clone(),
            explicit_references: Vec::new(),
            events: acquisitions.iter().map(acquisition_record).collect(),
            annotations: Vec::new(),
        };
        let completeness_operation = Operation {
            mode: OperationMode::Insert,
            dim_signature: dim_signature(format!("COMPLETENESS_NPPF_{}", satellite)),
            source: Source {
                priority: Some(self.completeness_priority),
                ..source
            },
            explicit_references: Vec::new(),
            events: placeholders.iter().map(placeholder_record).collect(),
            annotations: Vec::new(),
        };

        info!(
            "Planning file {}: {} planned imagings, {} completeness placeholders",
            file.name,
            acquisitions.len(),
            placeholders.len()
        );

        Ok(PlanningReconciliation {
            satellite,
            acquisitions,
            placeholders,
            operations: vec![imaging_operation, completeness_operation],
        })
    }
}

fn dim_signature(name: String) -> DimSignature {
    DimSignature {
        name,
        exec: GENERATOR.to_string(),
        version: VERSION.to_string(),
    }
}

/// Source registration of a planning file.
///
/// The generation time never exceeds the validity start, and a single
/// deletion-queue request moves the validity start to its execution time.
fn planning_source(file: &PlanningFile, reception_time: NaiveDateTime) -> IngestionResult<Source> {
    let reported_generation_time = parse_timestamp(&file.creation_date)?;
    let reported_validity_start = parse_timestamp(&file.validity_start)?;
    let validity_stop = parse_timestamp(&file.validity_stop)?;

    let deletion_queue: Vec<&PlanningRequest> = file
        .requests
        .iter()
        .filter(|r| r.name == DELETION_QUEUE_REQUEST)
        .collect();
    let validity_start = match deletion_queue.as_slice() {
        [deletion] => parse_timestamp(&deletion.execution_time)?,
        _ => reported_validity_start,
    };

    Ok(Source {
        name: file.name.clone(),
        reception_time,
        generation_time: reported_generation_time.min(reported_validity_start),
        reported_generation_time,
        validity_start,
        reported_validity_start,
        validity_stop,
        reported_validity_stop: validity_stop,
        priority: None,
        ingestion_completeness: None,
    })
}

fn build_acquisition(
    satellite: &str,
    request: &PlanningRequest,
    kind: OperationKind,
) -> IngestionResult<(AcquisitionEvent, &'static ImagingModeDescriptor)> {
    let request_id = require_param(request, "RQ_ID")?;
    let ecc = require_param(request, "ECCPRNR")?;
    let mode = registry::lookup(ecc)?;
    let warmup = require_param(request, "WARM_UP")? == "1";
    let polarisation = codec::decode_polarisation(require_param(request, "POLAR")?)?;
    let datatake_id = codec::decode_datatake_id(require_param(request, "DT_ID")?)?;
    let number_of_chops: u32 = parse_number("N_PG_REP", require_param(request, "N_PG_REP")?)?;
    let start_orbit: f64 = parse_number("ORB_NUM", require_param(request, "ORB_NUM")?)?;
    let start_angle: f64 = parse_number("ORB_ANGL", require_param(request, "ORB_ANGL")?)?;

    // Packet stores are only reported for data-take requests
    let (h_packet_store_id, v_packet_store_id) = if kind == OperationKind::Nominal {
        (
            packet_store_id(request, "PS_ID_H")?,
            packet_store_id(request, "PS_ID_V")?,
        )
    } else {
        (None, None)
    };

    let trigger_time = parse_timestamp(&request.execution_time)?;
    let (start, stop) = compute_acquisition_window(trigger_time, mode, warmup, number_of_chops);

    let acquisition = AcquisitionEvent {
        satellite: satellite.to_string(),
        request_id: request_id.to_string(),
        request_code: request.name.clone(),
        operation_kind: kind,
        start_orbit,
        start_angle,
        ecc: ecc.to_string(),
        imaging_mode: mode.short_name.to_string(),
        imaging_mode_long_name: mode.long_name.to_string(),
        warmup,
        polarisation: polarisation.to_string(),
        datatake_id,
        number_of_chops,
        h_packet_store_id,
        v_packet_store_id,
        start,
        stop,
        link_ref: format!("{}_{}", PLANNED_IMAGING_GAUGE, format_timestamp(&start)),
    };
    Ok((acquisition, mode))
}

fn packet_store_id(request: &PlanningRequest, name: &str) -> IngestionResult<Option<i64>> {
    optional_param(request, name)
        .map(|value| parse_number(name, value))
        .transpose()
}

fn acquisition_record(acquisition: &AcquisitionEvent) -> EventRecord {
    EventRecord {
        explicit_reference: None,
        link_ref: Some(acquisition.link_ref.clone()),
        gauge: Gauge::new(
            PLANNED_IMAGING_GAUGE,
            &acquisition.satellite,
            InsertionType::InsertAndErase,
        ),
        start: acquisition.start,
        stop: acquisition.stop,
        values: acquisition.values(),
        links: Vec::new(),
        alerts: Vec::new(),
    }
}

fn placeholder_record(placeholder: &CompletenessPlaceholder) -> EventRecord {
    EventRecord {
        explicit_reference: None,
        link_ref: None,
        gauge: Gauge::new(
            completeness::gauge_name(placeholder.level),
            &placeholder.satellite,
            InsertionType::InsertAndEraseIntersectedWithPriority,
        ),
        start: placeholder.start,
        stop: placeholder.stop,
        values: placeholder.values.clone(),
        links: vec![EventLink {
            link: placeholder.link_to_acquisition.clone(),
            link_mode: LinkMode::ByRef,
            name: "DHUS_PRODUCT_COMPLETENESS".to_string(),
            back_ref: Some(PLANNED_IMAGING_GAUGE.to_string()),
        }],
        alerts: vec![placeholder.alert.clone()],
    }
}
