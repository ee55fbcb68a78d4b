/// Expected-publication windows and completeness placeholders
use crate::alerts::{self, MissingProductContext};
use crate::domain::{
    AcquisitionEvent, CompletenessPlaceholder, CompletenessStatus, EventValue,
    ImagingModeDescriptor, Level, ModeGroup,
};
use chrono::{Duration, NaiveDateTime};

pub const COMPLETENESS_GAUGE_PREFIX: &str = "PLANNED_IMAGING_DHUS_PRODUCT_COMPLETENESS_";

/// Gauge holding the completeness of `level` products
pub fn gauge_name(level: Level) -> String {
    format!("{}{}", COMPLETENESS_GAUGE_PREFIX, level.as_str())
}

/// Margins applied when deriving the expected-publication window
#[derive(Debug, Clone, PartialEq)]
pub struct CompletenessPolicy {
    pub start_margin: Duration,
    pub stop_margin: Duration,
    /// Length of the window used when the margins would invert it
    pub fallback: Duration,
    pub notification_delay: Duration,
}

impl Default for CompletenessPolicy {
    fn default() -> Self {
        Self {
            start_margin: Duration::seconds(10),
            stop_margin: Duration::seconds(20),
            fallback: Duration::seconds(1),
            notification_delay: Duration::hours(24),
        }
    }
}

impl CompletenessPolicy {
    /// Shrink the acquisition window by the margins; very short
    /// acquisitions collapse to `[start, start + fallback]`
    pub fn window(
        &self,
        acq_start: NaiveDateTime,
        acq_stop: NaiveDateTime,
    ) -> (NaiveDateTime, NaiveDateTime) {
        let exp_start = acq_start + self.start_margin;
        let exp_stop = acq_stop - self.stop_margin;
        if exp_start > exp_stop {
            (acq_start, acq_start + self.fallback)
        } else {
            (exp_start, exp_stop)
        }
    }
}

/// Expected window with the default margins
pub fn build_window(
    acq_start: NaiveDateTime,
    acq_stop: NaiveDateTime,
) -> (NaiveDateTime, NaiveDateTime) {
    CompletenessPolicy::default().window(acq_start, acq_stop)
}

pub fn applicable_levels(group: ModeGroup) -> Vec<Level> {
    Level::ALL
        .iter()
        .copied()
        .filter(|level| level.applies_to(group))
        .collect()
}

/// One MISSING placeholder per level expected for the acquisition's mode
pub fn build_placeholders(
    acquisition: &AcquisitionEvent,
    mode: &ImagingModeDescriptor,
    policy: &CompletenessPolicy,
    generator: &str,
) -> Vec<CompletenessPlaceholder> {
    let (start, stop) = policy.window(acquisition.start, acquisition.stop);
    let notification_time = acquisition.start + policy.notification_delay;

    let mut values = acquisition.values();
    values.push(EventValue::text(
        "status",
        CompletenessStatus::Missing.as_str(),
    ));

    let context = MissingProductContext {
        datatake_id: &acquisition.datatake_id,
        mode_long_name: mode.long_name,
        acquisition_start: acquisition.start,
        acquisition_stop: acquisition.stop,
        orbit: acquisition.orbit(),
    };

    applicable_levels(mode.group)
        .into_iter()
        .map(|level| CompletenessPlaceholder {
            level,
            satellite: acquisition.satellite.clone(),
            datatake_id: acquisition.datatake_id.clone(),
            start,
            stop,
            status: CompletenessStatus::Missing,
            link_to_acquisition: acquisition.link_ref.clone(),
            values: values.clone(),
            alert: alerts::missing_product(level, &context, generator, notification_time),
        })
        .collect()
}
