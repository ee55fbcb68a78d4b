/// Sentinel-1 planning and catalog completeness reconciliation
pub mod alerts;
pub mod codec;
pub mod completeness;
pub mod config;
pub mod domain;
pub mod errors;
pub mod registry;
pub mod repo;
pub mod services;
pub mod timing;
pub mod utils;
