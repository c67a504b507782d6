//! Threadmark Core Library
//!
//! Interaction-to-location core for image annotation threads: resolves raw
//! pointer/touch events on scaled, rotated surfaces into persistence-ready
//! locations and governs creation of annotation threads at those locations.

pub mod annotator;
pub mod factory;
pub mod location;
pub mod reactor;
pub mod resolver;
pub mod signal;
pub mod thread;

pub use annotator::{Annotator, ImageAnnotator};
pub use factory::{
    CreateThreadError, PointThreadConstructor, ThreadConstructor, ThreadFactory, ThreadParams,
};
pub use location::{normalize_page, Location};
pub use reactor::{
    point_creation_available, react, CreationControl, ModeControls, Reaction, RenderScope,
    ThreadRenderer, ViewerChange,
};
pub use resolver::{
    resolve_location, EventTarget, RawInteraction, ResolvedLocation, SurfaceId, SurfaceTarget,
    TouchPoint,
};
pub use signal::{ErrorChannel, ErrorSignal, NullChannel, SignalKind};
pub use thread::{AnnotationRecord, RecordId, Thread, ThreadCollection, ThreadId, ThreadKind};
