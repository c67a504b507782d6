//! Geometry normalization and viewer-state snapshots for annotated surfaces.
//!
//! A displayed surface is the source image after the viewer has applied a
//! scale factor and one of four rotation angles. Annotations are anchored in
//! the *natural* frame of the image (unscaled, unrotated, origin top-left),
//! so a stored anchor stays valid across every future zoom and rotation
//! state. This crate holds the pure transforms between the two frames plus
//! the read-only snapshot types the rest of the toolkit consumes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RotationError {
    #[error("unsupported rotation angle: {0} degrees")]
    UnsupportedAngle(u16),
}

/// Rotation applied to a displayed surface, in quarter turns clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotationAngle {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl RotationAngle {
    /// Parse a surface's rotation attribute.
    ///
    /// Surfaces only ever report one of the four right angles; anything else
    /// is a malformed attribute, not a rotation to round.
    pub fn from_degrees(degrees: u16) -> Result<Self, RotationError> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(RotationError::UnsupportedAngle(other)),
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Whether the displayed width/height are swapped relative to the
    /// natural width/height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    pub fn is_upright(self) -> bool {
        matches!(self, Self::Deg0)
    }
}

/// Viewport pixels relative to the displayed surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub x: f32,
    pub y: f32,
}

impl SurfacePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A point in natural image space: unscaled, unrotated, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NaturalPoint {
    pub x: f32,
    pub y: f32,
}

impl NaturalPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a surface at scale 1, in natural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NaturalSize {
    pub width: f32,
    pub height: f32,
}

impl NaturalSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Viewport-pixel bounding box of a displayed surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceBounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }
}

/// Natural size of a surface given its displayed bounding box.
///
/// Removes scale, then un-swaps the axes at 90°/270° so the result is always
/// reported in natural orientation.
pub fn natural_size(bounds: SurfaceBounds, scale: f32, rotation: RotationAngle) -> NaturalSize {
    let width = bounds.width / scale;
    let height = bounds.height / scale;
    if rotation.swaps_axes() {
        NaturalSize { width: height, height: width }
    } else {
        NaturalSize { width, height }
    }
}

/// Map a viewport point on a displayed surface into natural image space.
///
/// The scale division comes first; the un-rotation then runs the inverse of
/// the angle the viewer applied. At `Deg0` this is the identity beyond the
/// scale division. `natural_to_surface` inverts this exactly, so the pair
/// round-trips within floating-point tolerance.
pub fn surface_to_natural(
    point: SurfacePoint,
    scale: f32,
    rotation: RotationAngle,
    bounds: SurfaceBounds,
) -> NaturalPoint {
    let size = natural_size(bounds, scale, rotation);
    let x = point.x / scale;
    let y = point.y / scale;

    match rotation {
        RotationAngle::Deg0 => NaturalPoint { x, y },
        RotationAngle::Deg90 => NaturalPoint { x: y, y: size.height - x },
        RotationAngle::Deg180 => NaturalPoint { x: size.width - x, y: size.height - y },
        RotationAngle::Deg270 => NaturalPoint { x: size.width - y, y: x },
    }
}

/// Project a natural-space point back onto the displayed surface.
///
/// Needs only the current scale and rotation plus the natural size; this is
/// what lets an anchor stored once re-project at any later zoom/rotation.
pub fn natural_to_surface(
    point: NaturalPoint,
    scale: f32,
    rotation: RotationAngle,
    size: NaturalSize,
) -> SurfacePoint {
    let (x, y) = match rotation {
        RotationAngle::Deg0 => (point.x, point.y),
        RotationAngle::Deg90 => (size.height - point.y, point.x),
        RotationAngle::Deg180 => (size.width - point.x, size.height - point.y),
        RotationAngle::Deg270 => (point.y, size.width - point.x),
    };

    SurfacePoint { x: x * scale, y: y * scale }
}

/// Capability set granted to the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub can_annotate: bool,
}

impl Permissions {
    pub fn annotator() -> Self {
        Self { can_annotate: true }
    }

    pub fn read_only() -> Self {
        Self { can_annotate: false }
    }
}

/// Immutable snapshot of the viewer context.
///
/// Owned and mutated by the surrounding viewer; the annotation core captures
/// one snapshot at the entry of each operation and never re-reads it
/// mid-computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerState {
    /// Currently applied zoom factor, always positive.
    pub scale: f32,
    /// Viewer-wide rotation. Individual surfaces may carry their own angle.
    pub rotation: RotationAngle,
    pub active_page: Option<u32>,
    pub permissions: Permissions,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: RotationAngle::Deg0,
            active_page: None,
            permissions: Permissions::default(),
        }
    }
}

impl ViewerState {
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationAngle) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }
}
