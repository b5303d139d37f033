pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::engine::GeofenceEngine;
pub use crate::core::geofence::{nearest, GeofenceCheck, GeofencePolicy};
pub use crate::core::haversine::{distance_meters, haversine_meters, EARTH_RADIUS_M};
pub use crate::core::pipeline::CheckInPipeline;
pub use domain::model::{CheckIn, CheckInOutcome, CheckInReport, GeoCoordinate, Workplace};
pub use utils::error::{GeoError, Result};
