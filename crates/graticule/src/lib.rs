//! Graticule construction for geocoded raster scenes.
//!
//! Computes intersections of a raster's geographic boundary polygon
//! with regularly spaced meridians and parallels, producing drawable
//! line paths, edge/corner label glyphs and tick anchors for an
//! external renderer.

mod boundary;
mod intersect;

pub mod builder;
pub mod config;
pub mod glyphs;

pub use builder::{Graticule, GraticuleLine, LinePath};
pub use config::GraticuleConfig;
pub use glyphs::TextGlyph;
