//! The per-media-kind annotator contract and its image implementation.

use std::sync::Arc;

use threadmark_viewer_core::ViewerState;

use crate::factory::ThreadFactory;
use crate::location::Location;
use crate::reactor::{react, ModeControls, Reaction, ThreadRenderer, ViewerChange};
use crate::resolver::{resolve_location, EventTarget, RawInteraction, ResolvedLocation, SurfaceTarget};
use crate::signal::{ErrorChannel, ErrorSignal, NullChannel};
use crate::thread::{AnnotationRecord, Thread, ThreadKind};

/// Operations every media-kind annotator provides.
///
/// The toolkit ships one implementation per media kind (image, document,
/// video); this crate implements the image kind. Every method takes the
/// viewer snapshot explicitly, captured once at entry.
pub trait Annotator {
    /// The surface element the interaction targeted, if it is one this
    /// annotator handles.
    fn annotated_surface(&self, interaction: &RawInteraction) -> Option<SurfaceTarget>;

    /// Map an interaction to a location, or a well-defined no-location.
    fn resolve_location(
        &self,
        interaction: &RawInteraction,
        state: &ViewerState,
    ) -> Option<ResolvedLocation>;

    /// Validate the candidate location plus payload and build a thread.
    ///
    /// Failures are reported on the error channel and yield `None`; nothing
    /// propagates past this boundary.
    fn create_thread(
        &self,
        annotations: Vec<AnnotationRecord>,
        location: Location,
        kind: ThreadKind,
    ) -> Option<Thread>;

    /// React to a scale/rotation change notification.
    fn on_scale_or_rotation_change(&self, change: ViewerChange, state: &ViewerState) -> Reaction;
}

/// Image-kind annotator: resolver, factory, and reactor wired to one error
/// channel and the rendering/mode collaborators.
pub struct ImageAnnotator {
    factory: ThreadFactory,
    errors: Arc<dyn ErrorChannel>,
    renderer: Arc<dyn ThreadRenderer>,
    controls: Arc<dyn ModeControls>,
}

impl ImageAnnotator {
    pub fn new(renderer: Arc<dyn ThreadRenderer>, controls: Arc<dyn ModeControls>) -> Self {
        Self {
            factory: ThreadFactory::new(),
            errors: Arc::new(NullChannel),
            renderer,
            controls,
        }
    }

    /// Route error signals to `errors` instead of dropping them.
    pub fn with_error_channel(mut self, errors: Arc<dyn ErrorChannel>) -> Self {
        self.errors = errors;
        self
    }

    /// Replace the default factory, e.g. to register extra constructors.
    pub fn with_factory(mut self, factory: ThreadFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn factory(&self) -> &ThreadFactory {
        &self.factory
    }

    /// Resolve and create in one gesture: the full creation path for a
    /// single interaction. Benign no-locations yield `None` without a
    /// factory call.
    pub fn create_thread_at(
        &self,
        interaction: &RawInteraction,
        state: &ViewerState,
        annotations: Vec<AnnotationRecord>,
        kind: ThreadKind,
    ) -> Option<Thread> {
        let resolved = Annotator::resolve_location(self, interaction, state)?;
        Annotator::create_thread(self, annotations, resolved.location, kind)
    }
}

impl Annotator for ImageAnnotator {
    fn annotated_surface(&self, interaction: &RawInteraction) -> Option<SurfaceTarget> {
        match interaction.target {
            EventTarget::Surface(target) => Some(target),
            EventTarget::Other => None,
        }
    }

    fn resolve_location(
        &self,
        interaction: &RawInteraction,
        state: &ViewerState,
    ) -> Option<ResolvedLocation> {
        resolve_location(interaction, state, self.errors.as_ref())
    }

    fn create_thread(
        &self,
        annotations: Vec<AnnotationRecord>,
        location: Location,
        kind: ThreadKind,
    ) -> Option<Thread> {
        match self.factory.create_thread(annotations, location, kind) {
            Ok(thread) => Some(thread),
            Err(error) => {
                tracing::warn!(%error, kind = kind.as_str(), "thread creation refused");
                self.errors.emit(ErrorSignal::new(error.signal_kind(), error.to_string()));
                None
            }
        }
    }

    fn on_scale_or_rotation_change(&self, change: ViewerChange, state: &ViewerState) -> Reaction {
        react(change, state, self.renderer.as_ref(), self.controls.as_ref())
    }
}
