//! Thread construction and validation.
//!
//! The factory owns a registry mapping annotation kinds to constructor
//! capabilities. Dispatch is a single lookup, so adding a kind means
//! registering a constructor, not growing a branch somewhere.

use std::collections::HashMap;

use crate::location::Location;
use crate::signal::SignalKind;
use crate::thread::{AnnotationRecord, Thread, ThreadKind};

/// Why thread creation was refused.
#[derive(Debug, thiserror::Error)]
pub enum CreateThreadError {
    /// Parameters failed the shared validity predicate.
    #[error("invalid thread parameters: {0}")]
    Validation(String),

    /// No constructor is registered for the requested kind.
    #[error("no constructor registered for {} threads", .kind.as_str())]
    Unsupported { kind: ThreadKind },

    /// A registered constructor refused otherwise-valid parameters.
    #[error("constructing {} thread failed: {reason}", .kind.as_str())]
    Construction { kind: ThreadKind, reason: String },
}

impl CreateThreadError {
    /// Signal class for the error channel.
    ///
    /// Unsupported kinds and failed constructions both report as load
    /// errors, distinct from bad input.
    pub fn signal_kind(&self) -> SignalKind {
        match self {
            Self::Validation(_) => SignalKind::ValidationError,
            Self::Unsupported { .. } | Self::Construction { .. } => SignalKind::LoadError,
        }
    }
}

/// Parameters handed to a kind-specific constructor.
#[derive(Debug, Clone)]
pub struct ThreadParams {
    pub annotations: Vec<AnnotationRecord>,
    pub location: Location,
    pub kind: ThreadKind,
}

impl ThreadParams {
    /// Shared validity predicate for every kind.
    ///
    /// Finite coordinates, positive dimensions, and a non-empty body on each
    /// annotation record. The kind itself is checked by the registry lookup.
    pub fn validate(&self) -> Result<(), CreateThreadError> {
        if !self.location.is_finite() {
            return Err(CreateThreadError::Validation(
                "location coordinates must be finite".to_owned(),
            ));
        }
        if self.location.dimensions.width <= 0.0 || self.location.dimensions.height <= 0.0 {
            return Err(CreateThreadError::Validation(
                "surface dimensions must be positive".to_owned(),
            ));
        }
        if self.annotations.iter().any(|record| record.body.trim().is_empty()) {
            return Err(CreateThreadError::Validation(
                "annotation records must carry a non-empty body".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Kind-specific constructor capability.
///
/// The registered constructor is the final source of truth on whether a kind
/// is supported; a kind can be recognized by the type system and still fail
/// here.
pub trait ThreadConstructor {
    fn construct(&self, params: ThreadParams) -> Result<Thread, CreateThreadError>;
}

/// Built-in constructor for point threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointThreadConstructor;

impl ThreadConstructor for PointThreadConstructor {
    fn construct(&self, params: ThreadParams) -> Result<Thread, CreateThreadError> {
        Ok(Thread::new(ThreadKind::Point, params.location, params.annotations))
    }
}

/// Validates candidate locations plus payloads and builds typed threads.
pub struct ThreadFactory {
    constructors: HashMap<ThreadKind, Box<dyn ThreadConstructor>>,
}

impl ThreadFactory {
    /// Factory with the point constructor registered.
    pub fn new() -> Self {
        Self { constructors: HashMap::new() }
            .with_constructor(ThreadKind::Point, PointThreadConstructor)
    }

    /// Factory with no constructors at all; register them explicitly.
    pub fn without_constructors() -> Self {
        Self { constructors: HashMap::new() }
    }

    pub fn with_constructor(
        mut self,
        kind: ThreadKind,
        constructor: impl ThreadConstructor + 'static,
    ) -> Self {
        self.constructors.insert(kind, Box::new(constructor));
        self
    }

    pub fn supports(&self, kind: ThreadKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Validate and construct a thread at `location`.
    ///
    /// `annotations` may be empty for a brand-new thread. On any error the
    /// caller gets the classified reason and no thread is registered
    /// anywhere.
    pub fn create_thread(
        &self,
        annotations: Vec<AnnotationRecord>,
        mut location: Location,
        kind: ThreadKind,
    ) -> Result<Thread, CreateThreadError> {
        // Deserialized or hand-built locations may bypass normalize_page.
        if location.page == 0 {
            location.page = 1;
        }

        let params = ThreadParams { annotations, location, kind };
        params.validate()?;

        let constructor = self
            .constructors
            .get(&kind)
            .ok_or(CreateThreadError::Unsupported { kind })?;

        let thread = constructor.construct(params)?;
        tracing::debug!(thread = %thread.id(), kind = kind.as_str(), page = thread.page(), "thread created");
        Ok(thread)
    }
}

impl Default for ThreadFactory {
    fn default() -> Self {
        Self::new()
    }
}
