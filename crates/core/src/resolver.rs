//! Interaction-to-location resolution.
//!
//! Turns one raw pointer/touch event into a persistence-ready [`Location`],
//! or a well-defined "no location". Only a geometry read failure is surfaced
//! to the user; everything else that yields no location is a normal absence
//! of target and stays silent.

use serde::{Deserialize, Serialize};
use threadmark_viewer_core::{
    natural_size, surface_to_natural, RotationAngle, SurfaceBounds, SurfacePoint, ViewerState,
};

use crate::location::Location;
use crate::signal::{ErrorChannel, ErrorSignal};

/// Stable identity of a rendered surface element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Snapshot of the surface element an interaction targeted.
///
/// Captures the per-element attribute contract: the viewport bounding box,
/// the raw page metadata, and the element's own rotation attribute. Surfaces
/// in a multi-surface layout rotate independently, so the angle lives here
/// and not on [`ViewerState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTarget {
    pub id: SurfaceId,
    pub bounds: SurfaceBounds,
    /// Raw page metadata; may be absent or non-positive.
    pub page: Option<i32>,
    pub rotation: RotationAngle,
}

/// What an interaction event was delivered on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventTarget {
    /// An annotated image surface.
    Surface(SurfaceTarget),
    /// Anything else: toolbar, placed marker, page gutter.
    Other,
}

/// One active touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// A raw pointer/touch interaction as delivered by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInteraction {
    pub client_x: f32,
    pub client_y: f32,
    pub target: EventTarget,
    /// `Some` on touch-capable platforms: the contacts still on the target.
    /// A touch-end with no remaining contacts arrives as `Some(vec![])`.
    pub touches: Option<Vec<TouchPoint>>,
}

impl RawInteraction {
    /// A mouse/pen interaction.
    pub fn pointer(client_x: f32, client_y: f32, target: EventTarget) -> Self {
        Self { client_x, client_y, target, touches: None }
    }

    /// A touch interaction; coordinates come from the first contact.
    pub fn touch(target: EventTarget, touches: Vec<TouchPoint>) -> Self {
        let primary = touches.first().copied().unwrap_or(TouchPoint {
            client_x: f32::NAN,
            client_y: f32::NAN,
        });
        Self {
            client_x: primary.client_x,
            client_y: primary.client_y,
            target,
            touches: Some(touches),
        }
    }
}

/// A resolved location plus the surface it belongs to, kept so the caller
/// can re-render that surface later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub location: Location,
    pub surface: SurfaceId,
}

/// Resolve an interaction against the current viewer snapshot.
///
/// Returns `None` for benign absences: a target that is not a surface, or a
/// touch event with no remaining contacts. Non-finite viewport offsets emit
/// exactly one input-error signal on `errors` before returning `None`; that
/// is the only user-visible failure, since it means the surface geometry
/// could not be read rather than that nothing was hit.
pub fn resolve_location(
    interaction: &RawInteraction,
    state: &ViewerState,
    errors: &dyn ErrorChannel,
) -> Option<ResolvedLocation> {
    let (client_x, client_y) = match &interaction.touches {
        Some(touches) => {
            let primary = touches.first()?;
            (primary.client_x, primary.client_y)
        }
        None => (interaction.client_x, interaction.client_y),
    };

    let EventTarget::Surface(target) = interaction.target else {
        return None;
    };

    let offset = SurfacePoint::new(client_x - target.bounds.left, client_y - target.bounds.top);
    if !offset.x.is_finite() || !offset.y.is_finite() {
        errors.emit(ErrorSignal::input(
            "could not read a position on the surface for this annotation",
        ));
        return None;
    }

    // The target's own rotation attribute wins over the viewer-wide angle.
    let point = surface_to_natural(offset, state.scale, target.rotation, target.bounds);
    let dimensions = natural_size(target.bounds, state.scale, target.rotation);
    let location = Location::new(point, dimensions, target.page);

    tracing::debug!(?location, surface = target.id.0, "resolved interaction to location");

    Some(ResolvedLocation { location, surface: target.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalKind;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingChannel {
        signals: Mutex<Vec<ErrorSignal>>,
    }

    impl RecordingChannel {
        fn kinds(&self) -> Vec<SignalKind> {
            self.signals.lock().unwrap().iter().map(|s| s.kind).collect()
        }
    }

    impl ErrorChannel for RecordingChannel {
        fn emit(&self, signal: ErrorSignal) {
            self.signals.lock().unwrap().push(signal);
        }
    }

    fn surface(bounds: SurfaceBounds, page: Option<i32>, rotation: RotationAngle) -> EventTarget {
        EventTarget::Surface(SurfaceTarget { id: SurfaceId(7), bounds, page, rotation })
    }

    fn default_bounds() -> SurfaceBounds {
        SurfaceBounds::new(10.0, 20.0, 200.0, 100.0)
    }

    #[test]
    fn click_on_upright_surface_resolves_at_scale_one() {
        let channel = RecordingChannel::default();
        let target = surface(default_bounds(), None, RotationAngle::Deg0);
        let interaction = RawInteraction::pointer(110.0, 70.0, target);

        let resolved = resolve_location(&interaction, &ViewerState::default(), &channel)
            .expect("surface click resolves");

        assert_eq!(resolved.surface, SurfaceId(7));
        assert_eq!(resolved.location.page, 1);
        assert!((resolved.location.x - 100.0).abs() < 1e-3);
        assert!((resolved.location.y - 50.0).abs() < 1e-3);
        assert!((resolved.location.dimensions.width - 200.0).abs() < 1e-3);
        assert!((resolved.location.dimensions.height - 100.0).abs() < 1e-3);
        assert!(channel.kinds().is_empty());
    }

    #[test]
    fn scale_divides_coordinates_and_dimensions() {
        let channel = RecordingChannel::default();
        let target = surface(default_bounds(), None, RotationAngle::Deg0);
        let interaction = RawInteraction::pointer(110.0, 70.0, target);
        let state = ViewerState::default().with_scale(2.0);

        let resolved =
            resolve_location(&interaction, &state, &channel).expect("surface click resolves");

        assert!((resolved.location.x - 50.0).abs() < 1e-3);
        assert!((resolved.location.y - 25.0).abs() < 1e-3);
        assert!((resolved.location.dimensions.width - 100.0).abs() < 1e-3);
        assert!((resolved.location.dimensions.height - 50.0).abs() < 1e-3);
    }

    #[test]
    fn non_surface_target_is_silently_no_location() {
        let channel = RecordingChannel::default();
        let interaction = RawInteraction::pointer(110.0, 70.0, EventTarget::Other);

        assert!(resolve_location(&interaction, &ViewerState::default(), &channel).is_none());
        assert!(channel.kinds().is_empty());
    }

    #[test]
    fn touch_end_without_contacts_is_silently_no_location() {
        let channel = RecordingChannel::default();
        let target = surface(default_bounds(), Some(1), RotationAngle::Deg0);
        let interaction = RawInteraction::touch(target, Vec::new());

        assert!(resolve_location(&interaction, &ViewerState::default(), &channel).is_none());
        assert!(channel.kinds().is_empty());
    }

    #[test]
    fn first_touch_contact_provides_the_coordinates() {
        let channel = RecordingChannel::default();
        let target = surface(default_bounds(), Some(4), RotationAngle::Deg0);
        let touches = vec![
            TouchPoint { client_x: 60.0, client_y: 45.0 },
            TouchPoint { client_x: 500.0, client_y: 500.0 },
        ];
        let interaction = RawInteraction::touch(target, touches);

        let resolved = resolve_location(&interaction, &ViewerState::default(), &channel)
            .expect("touch with contacts resolves");
        assert!((resolved.location.x - 50.0).abs() < 1e-3);
        assert!((resolved.location.y - 25.0).abs() < 1e-3);
        assert_eq!(resolved.location.page, 4);
    }

    #[test]
    fn non_finite_offset_emits_exactly_one_input_error() {
        let channel = RecordingChannel::default();
        let target = surface(default_bounds(), Some(1), RotationAngle::Deg0);
        let interaction = RawInteraction::pointer(f32::NAN, 70.0, target);

        assert!(resolve_location(&interaction, &ViewerState::default(), &channel).is_none());
        assert_eq!(channel.kinds(), vec![SignalKind::InputError]);
    }

    #[test]
    fn negative_page_metadata_normalizes_to_one() {
        let channel = RecordingChannel::default();
        let target = surface(default_bounds(), Some(-2), RotationAngle::Deg0);
        let interaction = RawInteraction::pointer(110.0, 70.0, target);

        let resolved = resolve_location(&interaction, &ViewerState::default(), &channel)
            .expect("surface click resolves");
        assert_eq!(resolved.location.page, 1);
    }

    #[test]
    fn target_rotation_attribute_wins_over_viewer_rotation() {
        let channel = RecordingChannel::default();
        // Natural 200x100 surface displayed rotated 90 degrees: 100x200 box.
        let bounds = SurfaceBounds::new(0.0, 0.0, 100.0, 200.0);
        let target = surface(bounds, Some(1), RotationAngle::Deg90);
        // Viewer-wide state still claims upright.
        let state = ViewerState::default();

        let interaction = RawInteraction::pointer(0.0, 0.0, target);
        let resolved =
            resolve_location(&interaction, &state, &channel).expect("surface click resolves");

        // Displayed top-left is the natural bottom-left under 90 degrees.
        assert!((resolved.location.x - 0.0).abs() < 1e-3);
        assert!((resolved.location.y - 100.0).abs() < 1e-3);
        assert!((resolved.location.dimensions.width - 200.0).abs() < 1e-3);
        assert!((resolved.location.dimensions.height - 100.0).abs() < 1e-3);
    }
}
