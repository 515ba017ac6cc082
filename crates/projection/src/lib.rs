//! Geocodings: bidirectional mappings between raster pixel coordinates
//! and geographic (lat/lon) coordinates.

pub mod equirect;
pub mod geocoding;
pub mod lambert;
pub mod tiepoint;

pub use equirect::EquirectangularGeoCoding;
pub use geocoding::GeoCoding;
pub use lambert::LambertConformal;
pub use tiepoint::TiePointGeoCoding;
