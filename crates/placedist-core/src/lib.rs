//! Core domain for placedist: coordinates, place categories, distance math,
//! per-category reduction, input ingestion, and configuration.

mod app_config;
mod config;
pub mod geo;
pub mod ingest;
pub mod reduce;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::haversine_km;
pub use ingest::parse_coordinate_lines;
pub use reduce::{category_outcome, min_distance_meters};
pub use types::{
    Category, CategoryOutcome, Coordinate, CoordinateRecord, CoordinateText, FailedRow,
    PlaceResult, ResultRow, RowOutcome,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
