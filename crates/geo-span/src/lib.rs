//! Geodetic span detection for geocoded rasters.
//!
//! Scans sampled rows and columns of a raster through its geocoding to
//! determine the scene's angular extent, scan direction, antimeridian
//! crossing and pole crossings. The exhaustive polar refinement pass
//! runs only when a pole crossing is suspected (or forced).

mod scan;

pub mod detector;
pub mod polar;
pub mod span;

pub use detector::GeoSpan;
pub use polar::PolarCoords;
pub use span::{Direction, LatSpan, LonSpan};
