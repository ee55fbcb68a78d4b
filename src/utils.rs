/// Utility functions
use crate::domain::PlanningRequest;
use crate::errors::{IngestionError, IngestionResult};
use std::str::FromStr;

/// Get a request parameter that must be present
pub fn require_param<'a>(request: &'a PlanningRequest, name: &str) -> IngestionResult<&'a str> {
    optional_param(request, name).ok_or_else(|| IngestionError::missing_field(&request.name, name))
}

/// Get a request parameter, treating blank values as absent
pub fn optional_param<'a>(request: &'a PlanningRequest, name: &str) -> Option<&'a str> {
    request
        .parameters
        .get(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Parse a numeric field, naming it in the error
pub fn parse_number<T: FromStr>(field: &str, value: &str) -> IngestionResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| IngestionError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Fixed-position slice of a file or product name
pub fn name_field<'a>(name: &'a str, from: usize, to: usize) -> IngestionResult<&'a str> {
    name.get(from..to).ok_or_else(|| {
        IngestionError::malformed_identifier(name, format!("no field at {}..{}", from, to))
    })
}

/// Convert space separated `lat,lon` pairs into `lon,lat` pairs
pub fn flip_coordinates(geometry: &str) -> IngestionResult<String> {
    geometry
        .split_whitespace()
        .map(|pair| match pair.split_once(',') {
            Some((lat, lon)) => Ok(format!("{},{}", lon, lat)),
            None => Err(IngestionError::malformed_identifier(
                geometry,
                format!("coordinate pair {:?} has no comma", pair),
            )),
        })
        .collect::<IngestionResult<Vec<String>>>()
        .map(|pairs| pairs.join(" "))
}
