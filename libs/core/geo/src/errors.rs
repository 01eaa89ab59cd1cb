// [libs/core/geo/src/errors.rs]
use thiserror::Error;

/// Failures surfaced while validating or interpreting geospatial input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// A `bounds` query parameter did not parse as four comma-separated floats.
    #[error("malformed bounding box: {0}")]
    MalformedBounds(String),
}
