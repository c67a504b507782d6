//! Persisted annotation locations.
//!
//! A [`Location`] is the unit that gets stored: natural-space coordinates
//! plus the natural size of the surface and a 1-based page number. Nothing
//! about the viewer's current zoom or rotation leaks into it, which is what
//! makes re-projection at any later viewer state possible.

use serde::{Deserialize, Serialize};
use threadmark_viewer_core::{natural_to_surface, NaturalPoint, NaturalSize, RotationAngle, SurfacePoint};

/// Force raw page metadata into 1-based page space.
///
/// Surfaces without page metadata (or with garbage metadata) have exactly
/// one effective page.
pub fn normalize_page(raw: Option<i32>) -> u32 {
    match raw {
        Some(page) if page > 0 => page as u32,
        _ => 1,
    }
}

/// A scale/rotation-invariant annotation anchor.
///
/// Coordinates live in the natural space of the surface: origin at the
/// image's top-left, scale 1, no rotation. `page` is always a positive
/// integer. Re-deriving viewport pixels from a stored location requires only
/// the current scale and rotation, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f32,
    pub y: f32,
    pub dimensions: NaturalSize,
    pub page: u32,
}

impl Location {
    /// Build a location from a resolved natural point, normalizing the raw
    /// page metadata.
    pub fn new(point: NaturalPoint, dimensions: NaturalSize, raw_page: Option<i32>) -> Self {
        Self {
            x: point.x,
            y: point.y,
            dimensions,
            page: normalize_page(raw_page),
        }
    }

    /// Whether every stored coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.dimensions.width.is_finite()
            && self.dimensions.height.is_finite()
    }

    pub fn point(&self) -> NaturalPoint {
        NaturalPoint::new(self.x, self.y)
    }

    /// Project the anchor onto a surface displayed at `scale` and
    /// `rotation`.
    pub fn project(&self, scale: f32, rotation: RotationAngle) -> SurfacePoint {
        natural_to_surface(self.point(), scale, rotation, self.dimensions)
    }
}
