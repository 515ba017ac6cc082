//! The geocoding seam between rasters and geographic space.

use geo_common::{GeoPos, PixelPos};

/// Bidirectional mapping between raster pixel coordinates and
/// geographic coordinates.
///
/// Implementations return [`GeoPos::INVALID`] / [`PixelPos::INVALID`]
/// for positions outside their footprint instead of failing; the span
/// and graticule engines skip invalid samples.
pub trait GeoCoding: Send + Sync {
    /// Geographic position for a (fractional) pixel position.
    fn geo_pos(&self, pixel: PixelPos) -> GeoPos;

    /// Approximate inverse: pixel position for a geographic position.
    fn pixel_pos(&self, geo: GeoPos) -> PixelPos;

    /// Sampling stride native to the geocoding, if it is backed by a
    /// subsampled grid. Consumers may use it to pick a boundary-walk
    /// step finer than the size-derived default.
    fn native_sampling_stride(&self) -> Option<usize> {
        None
    }
}
