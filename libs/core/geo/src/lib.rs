// [libs/core/geo/src/lib.rs]
#![deny(missing_docs)]

/*!
 * =================================================================
 * APARATO: GEOSPATIAL PRIMITIVES HUB (V1.0)
 * CLASIFICACIÓN: CORE MATH (ESTRATO L1)
 * RESPONSABILIDAD: DISTANCIA ESFÉRICA Y VALIDACIÓN DE COORDENADAS
 *
 * El clustering engine y el event store comparten este aparato para
 * evitar que la aproximación planar introduzca deriva en radios de
 * agrupación calculados sobre distancias reales de varios kilómetros.
 * =================================================================
 */

/// Coordinate validation and the `LatLon` value type.
pub mod coordinate;
/// Haversine great-circle distance on the WGS-84 mean sphere.
pub mod distance;
/// Axis-aligned bounding-box containment tests.
pub mod bounds;
/// Catalog of geospatial validation failures.
pub mod errors;

pub use bounds::BoundingBox;
pub use coordinate::LatLon;
pub use distance::haversine_meters;
pub use errors::GeoError;
