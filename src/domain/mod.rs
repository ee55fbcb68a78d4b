/// Domain models for planning and catalog reconciliation
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Family an imaging mode belongs to; drives which product levels are expected
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeGroup {
    R,
    SM,
    IW,
    EW,
    WV,
    CAL,
    TEST,
}

/// Timing profile of one imaging mode, keyed by its ECC
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagingModeDescriptor {
    pub code: &'static str,
    pub group: ModeGroup,
    pub short_name: &'static str,
    pub long_name: &'static str,
    /// Seconds per chop
    pub chop_duration: f64,
    pub warmup: f64,
    pub preamble: f64,
    pub postamble: f64,
}

/// Kind of a planning request, decoded from its request name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    BasicCalibration,
    SarCombinedRfc,
    Nominal,
    PassThrough,
    PassThroughSar,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::BasicCalibration => "BASIC_CALIBRATION",
            OperationKind::SarCombinedRfc => "SAR_COMBINED_RFC",
            OperationKind::Nominal => "NOMINAL",
            OperationKind::PassThrough => "PASS_THROUGH",
            OperationKind::PassThroughSar => "PASS_THROUGH_SAR",
        }
    }

    /// Calibration-only requests are not reconciled for the moment
    pub fn is_reconciled(&self) -> bool {
        matches!(
            self,
            OperationKind::Nominal | OperationKind::PassThrough | OperationKind::PassThroughSar
        )
    }
}

/// Downstream processing level whose publication is monitored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "L0")]
    L0,
    #[serde(rename = "L1_SLC")]
    L1Slc,
    #[serde(rename = "L1_GRD")]
    L1Grd,
    #[serde(rename = "L2_OCN")]
    L2Ocn,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::L0, Level::L1Slc, Level::L1Grd, Level::L2Ocn];

    /// Identifier used in gauge names
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::L0 => "L0",
            Level::L1Slc => "L1_SLC",
            Level::L1Grd => "L1_GRD",
            Level::L2Ocn => "L2_OCN",
        }
    }

    /// Human readable form used in alert texts
    pub fn label(&self) -> &'static str {
        match self {
            Level::L0 => "L0",
            Level::L1Slc => "L1 SLC",
            Level::L1Grd => "L1 GRD",
            Level::L2Ocn => "L2 OCN",
        }
    }

    /// Whether a product of this level is expected for a mode of `group`
    pub fn applies_to(&self, group: ModeGroup) -> bool {
        match self {
            Level::L0 | Level::L1Grd => group != ModeGroup::WV,
            Level::L1Slc => group != ModeGroup::EW,
            Level::L2Ocn => matches!(group, ModeGroup::IW | ModeGroup::EW | ModeGroup::WV),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletenessStatus {
    Missing,
    Published,
    Unexpected,
}

impl CompletenessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletenessStatus::Missing => "MISSING",
            CompletenessStatus::Published => "PUBLISHED",
            CompletenessStatus::Unexpected => "UNEXPECTED",
        }
    }
}

/// Type tag of a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,
    Double,
    Timestamp,
    Geometry,
}

/// A named, typed value attached to an event or annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventValue {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    pub value: String,
}

impl EventValue {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            kind: ValueKind::Text,
            value: value.into(),
        }
    }

    pub fn double(name: &str, value: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            kind: ValueKind::Double,
            value: value.to_string(),
        }
    }

    pub fn timestamp(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            kind: ValueKind::Timestamp,
            value: value.into(),
        }
    }

    pub fn geometry(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            kind: ValueKind::Geometry,
            value: value.into(),
        }
    }
}

/// Alert attached to an event at creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub generator: String,
    pub notification_time: NaiveDateTime,
    pub name: String,
    pub severity: String,
    pub description: String,
    pub group: String,
}

/// One planned imaging operation ("PLANNED_IMAGING")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionEvent {
    pub satellite: String,
    pub request_id: String,
    pub request_code: String,
    pub operation_kind: OperationKind,
    pub start_orbit: f64,
    pub start_angle: f64,
    pub ecc: String,
    pub imaging_mode: String,
    pub imaging_mode_long_name: String,
    pub warmup: bool,
    pub polarisation: String,
    pub datatake_id: String,
    pub number_of_chops: u32,
    pub h_packet_store_id: Option<i64>,
    pub v_packet_store_id: Option<i64>,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub link_ref: String,
}

impl AcquisitionEvent {
    /// Values stored with the event, in the order downstream views read them
    pub fn values(&self) -> Vec<EventValue> {
        let mut values = vec![
            EventValue::text("satellite", self.satellite.as_str()),
            EventValue::text("request_id", self.request_id.as_str()),
            EventValue::text("request", self.request_code.as_str()),
            EventValue::text("imaging_operation", self.operation_kind.as_str()),
            EventValue::double("start_orbit", self.start_orbit),
            EventValue::double("start_angle", self.start_angle),
            EventValue::text("ecc", self.ecc.as_str()),
            EventValue::text("imaging_mode", self.imaging_mode.as_str()),
            EventValue::text("imaging_mode_long_name", self.imaging_mode_long_name.as_str()),
            EventValue::text("warmup", if self.warmup { "1" } else { "0" }),
            EventValue::text("polarisation", self.polarisation.as_str()),
            EventValue::text("datatake_id", self.datatake_id.as_str()),
            EventValue::double("number_of_chops", self.number_of_chops),
        ];
        if let Some(id) = self.h_packet_store_id {
            values.push(EventValue::double("h_packet_store_id", id));
        }
        if let Some(id) = self.v_packet_store_id {
            values.push(EventValue::double("v_packet_store_id", id));
        }
        values
    }

    /// Orbit number as printed in alert texts
    pub fn orbit(&self) -> i64 {
        self.start_orbit.trunc() as i64
    }
}

/// Expected publication of one level for one acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessPlaceholder {
    pub level: Level,
    pub satellite: String,
    pub datatake_id: String,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub status: CompletenessStatus,
    /// Symbolic reference to the acquisition, resolved by the store
    pub link_to_acquisition: String,
    pub values: Vec<EventValue>,
    pub alert: Alert,
}

/// A data product published in the catalog feed ("DHUS_PRODUCT")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedProduct {
    pub name: String,
    pub identifier: String,
    pub level: Level,
    pub ingestion_time: String,
    pub publication_time: String,
    pub metadata_url: String,
    pub product_url: String,
    pub datatake_id: String,
    pub orbit: u32,
    pub size: u64,
    /// Footprint polygons as `lon lat` pairs
    pub footprints: Vec<String>,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
}

/// Planning request as delivered by the file parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningRequest {
    pub name: String,
    pub execution_time: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// Mission planning file, already parsed into request records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningFile {
    pub name: String,
    pub creation_date: String,
    pub validity_start: String,
    pub validity_stop: String,
    pub requests: Vec<PlanningRequest>,
}

/// Catalog feed entry as delivered by the file parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub identifier: String,
    pub creation_date: String,
    pub ingestion_date: String,
    pub content_length: String,
    pub content_start: String,
    pub content_end: String,
    /// Space separated `lat,lon` pairs
    pub geometry: String,
    /// Absent from feeds that only list the product records
    #[serde(default)]
    pub metadata_url: String,
}

/// Catalog feed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub name: String,
    pub entries: Vec<CatalogEntry>,
}
