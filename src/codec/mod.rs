/// Decoding of packed identifiers and coded fields
use crate::domain::{Level, OperationKind};
use crate::errors::{IngestionError, IngestionResult};
use crate::registry;

/// Bits of the raw datatake field that are not part of the identifier
pub const DATATAKE_ID_SHIFT: u32 = 9;

/// Recover the datatake id from the raw `DT_ID` request parameter.
///
/// The field is a 32-bit value whose 23 most significant bits carry the
/// identifier. The result is uppercase hex without leading zeros, the same
/// rendering the catalog uses in product names.
pub fn decode_datatake_id(raw_hex_field: &str) -> IngestionResult<String> {
    let digits = strip_hex_prefix(raw_hex_field.trim());
    let raw = parse_hex_u32(raw_hex_field, digits)?;
    Ok(format!("{:X}", raw >> DATATAKE_ID_SHIFT))
}

/// Inverse of [`decode_datatake_id`]: the raw field value with the
/// discarded low bits set to zero
pub fn encode_datatake_id(datatake_id: &str) -> IngestionResult<u32> {
    let value = parse_hex_u32(datatake_id, datatake_id)?;
    if value >> (32 - DATATAKE_ID_SHIFT) != 0 {
        return Err(IngestionError::malformed_identifier(
            datatake_id,
            "exceeds 23 bits",
        ));
    }
    Ok(value << DATATAKE_ID_SHIFT)
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn parse_hex_u32(original: &str, digits: &str) -> IngestionResult<u32> {
    if digits.is_empty() {
        return Err(IngestionError::malformed_identifier(original, "empty"));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(IngestionError::malformed_identifier(
            original,
            "not a hexadecimal value",
        ));
    }
    if digits.len() > 8 {
        return Err(IngestionError::malformed_identifier(
            original,
            "exceeds 32 bits",
        ));
    }
    u32::from_str_radix(digits, 16)
        .map_err(|e| IngestionError::malformed_identifier(original, e.to_string()))
}

pub fn decode_polarisation(code: &str) -> IngestionResult<&'static str> {
    registry::polarisation(code)
}

pub fn decode_operation_kind(code: &str) -> IngestionResult<OperationKind> {
    registry::operation_kind(code)
}

/// Product type code in a product name (`RAW`, `SLC`, ...) to its level
pub fn decode_level(code: &str) -> IngestionResult<Level> {
    match code {
        "RAW" => Ok(Level::L0),
        "SLC" => Ok(Level::L1Slc),
        "GRD" => Ok(Level::L1Grd),
        "OCN" => Ok(Level::L2Ocn),
        other => Err(IngestionError::unknown_code("product_level", other)),
    }
}

pub fn decode_orbit(field: &str) -> IngestionResult<u32> {
    field
        .trim()
        .parse()
        .map_err(|_| IngestionError::InvalidNumber {
            field: "orbit".to_string(),
            value: field.to_string(),
        })
}

pub fn decode_size(field: &str) -> IngestionResult<u64> {
    field
        .trim()
        .parse()
        .map_err(|_| IngestionError::InvalidNumber {
            field: "size".to_string(),
            value: field.to_string(),
        })
}

/// Fields carried by a catalog product name such as
/// `S1A_EW_GRDM_1SDH_20210316T181053_20210316T181157_037027_045B92_5AE1`
#[derive(Debug, Clone, PartialEq)]
pub struct ProductName {
    pub satellite: String,
    pub level: Level,
    pub orbit: u32,
    pub datatake_id: String,
}

impl ProductName {
    pub fn parse(name: &str) -> IngestionResult<Self> {
        let slice = |from: usize, to: usize| {
            name.get(from..to)
                .ok_or_else(|| IngestionError::MalformedProductName(name.to_string()))
        };

        let satellite = slice(0, 3)?.to_string();
        let level = decode_level(slice(7, 10)?)?;
        let orbit = decode_orbit(slice(49, 55)?)?;
        let datatake_field = slice(56, 62)?;
        let datatake = parse_hex_u32(datatake_field, datatake_field)?;

        Ok(Self {
            satellite,
            level,
            orbit,
            // Formatting the value drops the zero padding of the name field
            datatake_id: format!("{:X}", datatake),
        })
    }
}
