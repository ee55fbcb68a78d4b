/// Fixed alert templates
use crate::domain::{Alert, Level};
use crate::timing::format_timestamp;
use chrono::NaiveDateTime;

pub const SEVERITY_FATAL: &str = "fatal";
pub const GROUP_PLANNING: &str = "S1_PLANNING";
pub const GROUP_DHUS: &str = "DHUS";

/// Facts about a planned acquisition quoted in a missing-product alert
pub struct MissingProductContext<'a> {
    pub datatake_id: &'a str,
    pub mode_long_name: &'a str,
    pub acquisition_start: NaiveDateTime,
    pub acquisition_stop: NaiveDateTime,
    pub orbit: i64,
}

fn missing_product_alert_number(level: Level) -> u32 {
    match level {
        Level::L0 => 1,
        Level::L1Slc => 2,
        Level::L1Grd => 3,
        Level::L2Ocn => 4,
    }
}

/// Alert raised when the `level` product of a planned acquisition is not published in time
pub fn missing_product(
    level: Level,
    context: &MissingProductContext<'_>,
    generator: &str,
    notification_time: NaiveDateTime,
) -> Alert {
    Alert {
        message: format!(
            "The {} product related to the datatake id {} and corresponding to the planned imaging with mode {} and timings {}_{} over orbit {} has not been published",
            level.label(),
            context.datatake_id,
            context.mode_long_name,
            format_timestamp(&context.acquisition_start),
            format_timestamp(&context.acquisition_stop),
            context.orbit
        ),
        generator: generator.to_string(),
        notification_time,
        name: format!(
            "ALERT-{:04}: MISSING {} DHUS PRODUCT",
            missing_product_alert_number(level),
            level.label()
        ),
        severity: SEVERITY_FATAL.to_string(),
        description: format!(
            "Alert refers to the missing {} product published in DHUS",
            level.label()
        ),
        group: GROUP_PLANNING.to_string(),
    }
}

/// Alert raised when a published product matches no planned acquisition
pub fn unlinked_product(
    product_name: &str,
    generator: &str,
    notification_time: NaiveDateTime,
) -> Alert {
    Alert {
        message: format!(
            "The DHUS product {} could not be linked to any planned imaging",
            product_name
        ),
        generator: generator.to_string(),
        notification_time,
        name: "ALERT-0200: NO PLANNED IMAGING FOR A DHUS PRODUCT".to_string(),
        severity: SEVERITY_FATAL.to_string(),
        description:
            "Alert refers to the missing planned imaging for the corresponding DHUS product"
                .to_string(),
        group: GROUP_DHUS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::parse_timestamp;

    #[test]
    fn test_missing_product_template() {
        let context = MissingProductContext {
            datatake_id: "45B92",
            mode_long_name: "EXTRA_WIDE_SWATH",
            acquisition_start: parse_timestamp("2021-03-16T18:10:50.878756").unwrap(),
            acquisition_stop: parse_timestamp("2021-03-16T18:16:03.831484").unwrap(),
            orbit: 37027,
        };
        let notification = parse_timestamp("2021-03-17T18:10:50.878756").unwrap();
        let alert = missing_product(Level::L1Grd, &context, "planning", notification);

        assert_eq!(
            alert.message,
            "The L1 GRD product related to the datatake id 45B92 and corresponding to the planned imaging with mode EXTRA_WIDE_SWATH and timings 2021-03-16T18:10:50.878756_2021-03-16T18:16:03.831484 over orbit 37027 has not been published"
        );
        assert_eq!(alert.name, "ALERT-0003: MISSING L1 GRD DHUS PRODUCT");
        assert_eq!(alert.severity, "fatal");
        assert_eq!(alert.group, "S1_PLANNING");
        assert_eq!(alert.notification_time, notification);
    }

    #[test]
    fn test_unlinked_product_template() {
        let now = parse_timestamp("2021-04-19T13:54:05").unwrap();
        let alert = unlinked_product("S1A_PRODUCT", "catalog", now);
        assert_eq!(
            alert.message,
            "The DHUS product S1A_PRODUCT could not be linked to any planned imaging"
        );
        assert_eq!(alert.group, "DHUS");
        assert_eq!(alert.severity, "fatal");
    }
}
