//! Common value types shared across the geoscene engine crates.

pub mod angle;
pub mod coord;
pub mod error;
pub mod geopos;
pub mod pixelpos;
pub mod raster;

pub use angle::{format_lat, format_lon, AngleFormat};
pub use coord::Coord;
pub use error::{GeoError, GeoResult};
pub use geopos::{is_valid_lat, is_valid_lon, limit_lon, GeoPos};
pub use pixelpos::PixelPos;
pub use raster::RasterSize;
