/// Static lookup tables: imaging modes and planning code tables
use crate::domain::ImagingModeDescriptor;
use crate::domain::ModeGroup::{self, CAL, EW, IW, R, SM, TEST, WV};
use crate::domain::OperationKind;
use crate::errors::{IngestionError, IngestionResult};

#[allow(clippy::too_many_arguments)]
const fn mode(
    code: &'static str,
    group: ModeGroup,
    short_name: &'static str,
    long_name: &'static str,
    chop_duration: f64,
    warmup: f64,
    preamble: f64,
    postamble: f64,
) -> ImagingModeDescriptor {
    ImagingModeDescriptor {
        code,
        group,
        short_name,
        long_name,
        chop_duration,
        warmup,
        preamble,
        postamble,
    }
}

// Timing values in seconds, taken from the instrument SES database
#[rustfmt::skip]
static IMAGING_MODES: [ImagingModeDescriptor; 48] = [
    mode("0", R, "R", "RESERVED", 1.0, 1.0, 1.0, 1.0),
    mode("1", SM, "S1", "STRIPMAP1", 5.000909, 1.000182, 1.299007, 0.294014),
    mode("2", SM, "S2", "STRIPMAP2", 5.00062, 1.000124, 1.298983, 0.341022),
    mode("3", SM, "S3", "STRIPMAP3", 5.000104, 1.000021, 1.298728, 0.28572),
    mode("4", SM, "S4", "STRIPMAP4", 4.999485, 0.999897, 1.298654, 0.333299),
    mode("5", SM, "S5N", "STRIPMAP5_NORTHERN_HEMISPHERE", 4.999631, 0.999926, 1.299009, 0.289605),
    mode("6", SM, "S6", "STRIPMAP6", 4.998557, 0.999711, 1.299084, 0.330632),
    mode("7", R, "R", "RESERVED", 5.000909, 1.000182, 1.299007, 0.294014),
    mode("8", IW, "IW", "INTERFEROMETRIC_WIDE_SWATH", 5.516546, 0.999924, 1.298761, 0.786299),
    mode("9", WV, "WV", "WAVE", 29.293952, 0.999897, 1.298654, 0.556306),
    mode("10", SM, "S5S", "STRIPMAP5_SOUTHERN_HEMISPHERE", 5.000212, 1.000042, 1.298942, 0.29148),
    mode("11", SM, "S1_WO_CAL", "STRIPMAP1_WITHOUT_CALIBRATION", 5.000909, 1.000182, 1.299007, 0.294014),
    mode("12", SM, "S2_WO_CAL", "STRIPMAP2_WITHOUT_CALIBRATION", 5.00062, 1.000124, 1.298983, 0.341022),
    mode("13", SM, "S3_WO_CAL", "STRIPMAP3_WITHOUT_CALIBRATION", 5.000104, 1.000021, 1.298728, 0.28572),
    mode("14", SM, "S4_WO_CAL", "STRIPMAP4_WITHOUT_CALIBRATION", 4.999485, 0.999897, 1.298654, 0.333299),
    mode("15", CAL, "RFC", "RFC", 1.020495, 1.000182, 1.299007, 0.294014),
    mode("16", TEST, "TEST", "TEST", 0.012603, 1.0, 1.299, 0.001),
    mode("17", SM, "EN3", "ELEVATION_NOTCH_STRIPMAP3", 5.000715, 1.000143, 1.298756, 0.291201),
    mode("18", SM, "AN1", "AZIMUTH_NOTCH_STRIPMAP1", 5.000909, 1.000182, 1.299007, 0.294014),
    mode("19", SM, "AN2", "AZIMUTH_NOTCH_STRIPMAP2", 5.00062, 1.000124, 1.298983, 0.341022),
    mode("20", SM, "AN3", "AZIMUTH_NOTCH_STRIPMAP3", 5.000104, 1.000021, 1.298728, 0.28572),
    mode("21", SM, "AN4", "AZIMUTH_NOTCH_STRIPMAP4", 4.999485, 0.999897, 1.298654, 0.333299),
    mode("22", SM, "AN5N", "AZIMUTH_NOTCH_STRIPMAP5_NORTHERN_HEMISPHERE", 4.999631, 0.999926, 1.299009, 0.289605),
    mode("23", SM, "AN5S", "AZIMUTH_NOTCH_STRIPMAP5_SOUTHERN_HEMISPHERE", 5.000212, 1.000042, 1.298942, 0.29148),
    mode("24", SM, "AN6", "AZIMUTH_NOTCH_STRIPMAP6", 4.998557, 0.999711, 1.299084, 0.330632),
    mode("25", SM, "S5N_WO_CAL", "STRIPMAP5_NORTHERN_HEMISPHERE_WITHOUT_CALIBRATION", 4.999631, 0.999926, 1.299009, 0.289605),
    mode("26", SM, "S5S_WO_CAL", "STRIPMAP5_SOUTHERN_HEMISPHERE_WITHOUT_CALIBRATION", 5.000212, 1.000042, 1.298942, 0.29148),
    mode("27", SM, "S6_WO_CAL", "STRIPMAP6_WITHOUT_CALIBRATION", 4.998557, 0.999711, 1.299084, 0.330632),
    mode("28", R, "R", "RESERVED", 1.0, 0.003667, 0.0, 0.003667),
    mode("29", R, "R", "RESERVED", 1.0, 0.009016, 0.0, 0.009016),
    mode("30", R, "R", "RESERVED", 1.5, 0.011, 0.0, 0.011),
    mode("31", SM, "EN3_WO_CAL", "ELEVATION_NOTCH_STRIPMAP3_WITHOUT_CALIBRATION", 5.000715, 1.000143, 1.298756, 0.291201),
    mode("32", EW, "EW", "EXTRA_WIDE_SWATH", 3.038376, 1.000049, 1.298707, 1.160363),
    mode("33", SM, "AN1_WO_CAL", "AZIMUTH_NOTCH_STRIPMAP1_WITHOUT_CALIBRATION", 5.000909, 1.000182, 1.299007, 0.294014),
    mode("34", SM, "AN3_WO_CAL", "AZIMUTH_NOTCH_STRIPMAP3_WITHOUT_CALIBRATION", 5.000104, 1.000021, 1.298728, 0.28572),
    mode("35", SM, "AN6_WO_CAL", "AZIMUTH_NOTCH_STRIPMAP6_WITHOUT_CALIBRATION", 4.998557, 0.999711, 1.299084, 0.330632),
    mode("36", R, "R", "RESERVED", 0.983607, 0.003607, 0.0, 0.003607),
    mode("37", SM, "NS1", "NOISE_STRIPMAP1", 0.025659, 1.000182, 1.299007, 0.294014),
    mode("38", SM, "NS2", "NOISE_STRIPMAP2", 0.029762, 1.000124, 1.298983, 0.341022),
    mode("39", SM, "NS3", "NOISE_STRIPMAP3", 0.024936, 1.000021, 1.298728, 0.28572),
    mode("40", SM, "NS4", "NOISE_STRIPMAP4", 0.029088, 0.999897, 1.298654, 0.333299),
    mode("41", SM, "NS5N", "NOISE_STRIPMAP5_NORTHERN_HEMISPHERE", 0.025275, 0.999926, 1.299009, 0.289605),
    mode("42", SM, "NS5S", "NOISE_STRIPMAP5_SOUTHERN_HEMISPHERE", 0.025438, 1.000042, 1.298942, 0.29148),
    mode("43", SM, "NS6", "NOISE_STRIPMAP6", 0.028855, 0.999711, 1.299084, 0.330632),
    mode("44", EW, "NEW", "NOISE_EXTRA_WIDE", 0.137736, 1.000049, 1.298707, 1.160363),
    mode("45", IW, "NIW", "NOISE_INTERFEROMETRIC", 0.089493, 0.999924, 1.298761, 0.786299),
    mode("46", WV, "NWV", "NOISE_WAVE", 0.058176, 0.999897, 1.298654, 0.556306),
    mode("47", R, "R", "RESERVED", 5.000909, 1.000182, 1.299007, 0.294014),
];

/// Resolve an ECC code to its imaging mode
pub fn lookup(ecc: &str) -> IngestionResult<&'static ImagingModeDescriptor> {
    IMAGING_MODES
        .iter()
        .find(|m| m.code == ecc)
        .ok_or_else(|| IngestionError::UnknownMode(ecc.to_string()))
}

/// All registered imaging modes, ordered by ECC
pub fn all_modes() -> &'static [ImagingModeDescriptor] {
    &IMAGING_MODES
}

static OPERATION_KINDS: [(&str, OperationKind); 5] = [
    ("MPSARRFB", OperationKind::BasicCalibration),
    ("MPSARRFC", OperationKind::SarCombinedRfc),
    ("MPSARDT2", OperationKind::Nominal),
    ("MPPASTH1", OperationKind::PassThrough),
    ("MPPASTHD", OperationKind::PassThroughSar),
];

static POLARISATIONS: [(&str, &str); 8] = [
    ("0", "H"),
    ("1", "HH"),
    ("2", "HV"),
    ("3", "HHV"),
    ("4", "V"),
    ("5", "VH"),
    ("6", "VV"),
    ("7", "VHV"),
];

static PLAYBACK_TYPES: [(&str, &str); 3] = [
    ("MPPDHS", "NOMINAL"),
    ("MPMMPREG", "PASS_THROUGH"),
    ("MPMMPBRT", "PASS_THROUGH_SAR"),
];

static PLAYBACK_MEANS: [(&str, &str); 4] = [
    ("MPPDHXON", "XBAND"),
    ("MPG1STRT", "OCP"),
    ("MPG2STRT", "OCP"),
    ("MPG3STRT", "OCP"),
];

static PLAYBACK_MEANS_BY_STOP: [(&str, &str); 2] = [("MPPDHXOF", "XBAND"), ("MPOCPRDY", "OCP")];

/// Request name of the deletion queue record
pub const DELETION_QUEUE_REQUEST: &str = "MGDHQDEL";

fn find<T: Copy>(table: &'static str, entries: &[(&str, T)], code: &str) -> IngestionResult<T> {
    entries
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, value)| *value)
        .ok_or_else(|| IngestionError::unknown_code(table, code))
}

pub fn operation_kind(request_name: &str) -> IngestionResult<OperationKind> {
    find("operation_kind", &OPERATION_KINDS, request_name)
}

pub fn polarisation(code: &str) -> IngestionResult<&'static str> {
    find("polarisation", &POLARISATIONS, code)
}

pub fn playback_type(request_name: &str) -> IngestionResult<&'static str> {
    find("playback_type", &PLAYBACK_TYPES, request_name)
}

/// Playback mean from the request starting the playback
pub fn playback_mean(request_name: &str) -> IngestionResult<&'static str> {
    find("playback_mean", &PLAYBACK_MEANS, request_name)
}

/// Playback mean from the request stopping the playback
pub fn playback_mean_by_stop(request_name: &str) -> IngestionResult<&'static str> {
    find("playback_mean_by_stop", &PLAYBACK_MEANS_BY_STOP, request_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_48_sequential_codes() {
        let modes = all_modes();
        assert_eq!(modes.len(), 48);
        for (i, m) in modes.iter().enumerate() {
            assert_eq!(m.code, i.to_string());
        }
    }

    #[test]
    fn test_lookup_extra_wide_swath() {
        let ew = lookup("32").unwrap();
        assert_eq!(ew.group, EW);
        assert_eq!(ew.short_name, "EW");
        assert_eq!(ew.long_name, "EXTRA_WIDE_SWATH");
        assert_eq!(ew.chop_duration, 3.038376);
        assert_eq!(ew.warmup, 1.000049);
        assert_eq!(ew.preamble, 1.298707);
    }

    #[test]
    fn test_lookup_groups() {
        assert_eq!(lookup("8").unwrap().group, IW);
        assert_eq!(lookup("9").unwrap().group, WV);
        assert_eq!(lookup("15").unwrap().group, CAL);
        assert_eq!(lookup("16").unwrap().group, TEST);
        assert_eq!(lookup("0").unwrap().group, R);
        assert_eq!(lookup("1").unwrap().group, SM);
    }

    #[test]
    fn test_lookup_unknown_mode() {
        assert!(matches!(lookup("48"), Err(IngestionError::UnknownMode(c)) if c == "48"));
        assert!(lookup("01").is_err());
    }

    #[test]
    fn test_code_tables() {
        assert_eq!(operation_kind("MPSARDT2").unwrap(), OperationKind::Nominal);
        assert_eq!(
            operation_kind("MPPASTHD").unwrap(),
            OperationKind::PassThroughSar
        );
        assert_eq!(polarisation("5").unwrap(), "VH");
        assert_eq!(playback_type("MPMMPREG").unwrap(), "PASS_THROUGH");
        assert_eq!(playback_mean("MPG2STRT").unwrap(), "OCP");
        assert_eq!(playback_mean_by_stop("MPPDHXOF").unwrap(), "XBAND");
    }

    #[test]
    fn test_code_tables_reject_unknown_codes() {
        assert!(matches!(
            polarisation("8"),
            Err(IngestionError::UnknownCode { table: "polarisation", .. })
        ));
        assert!(operation_kind(DELETION_QUEUE_REQUEST).is_err());
    }
}
