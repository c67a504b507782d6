//! Reaction to viewer layout changes.
//!
//! The viewer notifies this module after it changes scale or rotation. The
//! reaction applies the change to the snapshot first, decides the re-render
//! scope (one page or all), and toggles the point-creation affordance.
//! Actual rendering belongs to the external [`ThreadRenderer`].

use threadmark_viewer_core::{RotationAngle, ViewerState};

use crate::thread::ThreadKind;

/// Scale and/or rotation change notification from the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewerChange {
    pub scale: Option<f32>,
    pub rotation: Option<RotationAngle>,
    /// Restrict re-rendering to a single page.
    pub page: Option<u32>,
}

impl ViewerChange {
    pub fn scale(scale: f32) -> Self {
        Self { scale: Some(scale), ..Self::default() }
    }

    pub fn rotation(rotation: RotationAngle) -> Self {
        Self { rotation: Some(rotation), ..Self::default() }
    }

    pub fn for_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// Which threads get re-rendered after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderScope {
    Page(u32),
    All,
}

/// External rendering collaborator. Never implemented by this crate.
pub trait ThreadRenderer {
    fn render_page(&self, page: u32);
    fn render_all(&self);
}

/// A UI control owning one creation affordance.
pub trait CreationControl {
    fn show(&self);
    fn hide(&self);
}

/// Permission/mode collaborator: maps annotation kinds to their UI controls.
///
/// A kind without a registered control simply has no affordance to toggle.
pub trait ModeControls {
    fn control_for(&self, kind: ThreadKind) -> Option<&dyn CreationControl>;
}

/// Outcome of one reaction, so callers can assert on what was decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reaction {
    /// Snapshot with the change applied; geometry reads after the reaction
    /// should use this, not the pre-change snapshot.
    pub state: ViewerState,
    pub scope: RenderScope,
    pub affordance_visible: bool,
}

/// Whether the point-creation affordance may be offered.
///
/// Creation is only offered upright: placing a point through a rotated
/// gesture risks misplacement, while threads already placed re-project
/// correctly at any angle.
pub fn point_creation_available(state: &ViewerState, has_point_control: bool) -> bool {
    state.permissions.can_annotate && has_point_control && state.rotation.is_upright()
}

/// React to a scale/rotation change.
///
/// The new scale/rotation are applied to the snapshot before any re-render
/// decision. With a page in the change only that page is re-rendered,
/// otherwise every page. The updated snapshot is returned rather than held,
/// so no hidden cross-call state exists.
pub fn react(
    change: ViewerChange,
    snapshot: &ViewerState,
    renderer: &dyn ThreadRenderer,
    controls: &dyn ModeControls,
) -> Reaction {
    let mut state = *snapshot;
    if let Some(scale) = change.scale {
        state.scale = scale;
    }
    if let Some(rotation) = change.rotation {
        state.rotation = rotation;
    }

    let scope = match change.page {
        Some(page) => {
            renderer.render_page(page);
            RenderScope::Page(page)
        }
        None => {
            renderer.render_all();
            RenderScope::All
        }
    };

    let control = controls.control_for(ThreadKind::Point);
    let affordance_visible = point_creation_available(&state, control.is_some());
    if let Some(control) = control {
        if affordance_visible {
            control.show();
        } else {
            control.hide();
        }
    }

    tracing::debug!(
        scale = state.scale,
        rotation = state.rotation.degrees(),
        affordance = affordance_visible,
        "viewer change applied"
    );

    Reaction { state, scope, affordance_visible }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use threadmark_viewer_core::Permissions;

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Mutex<Vec<RenderScope>>,
    }

    impl RecordingRenderer {
        fn calls(&self) -> Vec<RenderScope> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ThreadRenderer for RecordingRenderer {
        fn render_page(&self, page: u32) {
            self.calls.lock().unwrap().push(RenderScope::Page(page));
        }

        fn render_all(&self) {
            self.calls.lock().unwrap().push(RenderScope::All);
        }
    }

    #[derive(Default)]
    struct RecordingControl {
        visible: Mutex<Option<bool>>,
    }

    impl CreationControl for RecordingControl {
        fn show(&self) {
            *self.visible.lock().unwrap() = Some(true);
        }

        fn hide(&self) {
            *self.visible.lock().unwrap() = Some(false);
        }
    }

    struct PointControls<'a> {
        control: Option<&'a RecordingControl>,
    }

    impl ModeControls for PointControls<'_> {
        fn control_for(&self, kind: ThreadKind) -> Option<&dyn CreationControl> {
            match kind {
                ThreadKind::Point => self.control.map(|c| c as &dyn CreationControl),
                _ => None,
            }
        }
    }

    fn annotator_state() -> ViewerState {
        ViewerState::default().with_permissions(Permissions::annotator())
    }

    #[test]
    fn page_change_renders_only_that_page() {
        let renderer = RecordingRenderer::default();
        let control = RecordingControl::default();
        let controls = PointControls { control: Some(&control) };

        let reaction = react(
            ViewerChange::scale(2.0).for_page(3),
            &annotator_state(),
            &renderer,
            &controls,
        );

        assert_eq!(reaction.scope, RenderScope::Page(3));
        assert_eq!(renderer.calls(), vec![RenderScope::Page(3)]);
    }

    #[test]
    fn surface_wide_change_renders_all_pages() {
        let renderer = RecordingRenderer::default();
        let control = RecordingControl::default();
        let controls = PointControls { control: Some(&control) };

        let reaction = react(
            ViewerChange::scale(0.5),
            &annotator_state(),
            &renderer,
            &controls,
        );

        assert_eq!(reaction.scope, RenderScope::All);
        assert_eq!(renderer.calls(), vec![RenderScope::All]);
    }

    #[test]
    fn new_scale_is_applied_before_the_reaction_returns() {
        let renderer = RecordingRenderer::default();
        let controls = PointControls { control: None };

        let reaction = react(
            ViewerChange::scale(3.0),
            &annotator_state(),
            &renderer,
            &controls,
        );
        assert!((reaction.state.scale - 3.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_away_from_upright_hides_the_affordance() {
        let renderer = RecordingRenderer::default();
        let control = RecordingControl::default();
        let controls = PointControls { control: Some(&control) };
        let state = annotator_state();

        let rotated = react(
            ViewerChange::rotation(RotationAngle::Deg90),
            &state,
            &renderer,
            &controls,
        );
        assert!(!rotated.affordance_visible);
        assert_eq!(*control.visible.lock().unwrap(), Some(false));

        let back = react(
            ViewerChange::rotation(RotationAngle::Deg0),
            &rotated.state,
            &renderer,
            &controls,
        );
        assert!(back.affordance_visible);
        assert_eq!(*control.visible.lock().unwrap(), Some(true));
    }

    #[test]
    fn missing_permission_hides_the_affordance_at_any_rotation() {
        let renderer = RecordingRenderer::default();
        let control = RecordingControl::default();
        let controls = PointControls { control: Some(&control) };
        let state = ViewerState::default().with_permissions(Permissions::read_only());

        let upright = react(ViewerChange::default(), &state, &renderer, &controls);
        assert!(!upright.affordance_visible);

        let rotated = react(
            ViewerChange::rotation(RotationAngle::Deg180),
            &state,
            &renderer,
            &controls,
        );
        assert!(!rotated.affordance_visible);
    }

    #[test]
    fn missing_point_control_means_no_affordance() {
        let renderer = RecordingRenderer::default();
        let controls = PointControls { control: None };

        let reaction = react(ViewerChange::default(), &annotator_state(), &renderer, &controls);
        assert!(!reaction.affordance_visible);
    }
}
