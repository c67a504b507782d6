//! Annotation thread data model.
//!
//! A thread is a persisted anchor (its [`Location`]) plus the ordered
//! annotation records attached to it. The location is immutable once the
//! thread exists: a new interaction produces a new thread, never a moved
//! one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Unique identifier for a thread.
///
/// Stable across the document lifetime, persists in saved files. Generated
/// using UUID v4.
pub type ThreadId = uuid::Uuid;

/// Unique identifier for one annotation record within a thread.
pub type RecordId = uuid::Uuid;

/// Annotation kinds understood by the toolkit.
///
/// Kinds are recognized at the type level; whether a kind can actually be
/// *constructed* is decided by the factory's registry, which is the final
/// source of truth on support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreadKind {
    /// Anchored to a single (x, y) location.
    Point,
    /// Anchored to a text range. No built-in constructor.
    Highlight,
    /// Anchored to a rectangular region. No built-in constructor.
    Region,
}

impl ThreadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Highlight => "highlight",
            Self::Region => "region",
        }
    }
}

/// One annotation entry within a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: RecordId,
    pub author: Option<String>,
    pub body: String,
    /// Unix timestamp in seconds.
    pub created_at: i64,
}

impl AnnotationRecord {
    pub fn new(body: impl Into<String>) -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        Self {
            id: RecordId::new_v4(),
            author: None,
            body: body.into(),
            created_at: now,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// A persisted annotation anchor plus its ordered annotation records.
///
/// Threads are produced by the factory after validation; construct one
/// directly only from inside a registered [`crate::factory::ThreadConstructor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    id: ThreadId,
    kind: ThreadKind,
    location: Location,
    annotations: Vec<AnnotationRecord>,
}

impl Thread {
    pub fn new(kind: ThreadKind, location: Location, annotations: Vec<AnnotationRecord>) -> Self {
        Self {
            id: ThreadId::new_v4(),
            kind,
            location,
            annotations,
        }
    }

    /// Rebuild a thread with a known id (for deserialized data).
    pub fn with_id(
        id: ThreadId,
        kind: ThreadKind,
        location: Location,
        annotations: Vec<AnnotationRecord>,
    ) -> Self {
        Self { id, kind, location, annotations }
    }

    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn kind(&self) -> ThreadKind {
        self.kind
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn annotations(&self) -> &[AnnotationRecord] {
        &self.annotations
    }

    /// Append a record. Records stay in insertion order.
    pub fn add_annotation(&mut self, record: AnnotationRecord) {
        self.annotations.push(record);
    }

    pub fn page(&self) -> u32 {
        self.location.page
    }
}

/// Threads for a document, grouped by page.
///
/// The page grouping matches the reactor's re-render scopes: one page after
/// a page-local change, every page otherwise.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ThreadCollection {
    threads: HashMap<ThreadId, Thread>,
    by_page: HashMap<u32, Vec<ThreadId>>,
}

impl ThreadCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, thread: Thread) {
        let id = thread.id();
        let page = thread.page();

        self.threads.insert(id, thread);
        self.by_page.entry(page).or_default().push(id);
    }

    pub fn remove(&mut self, id: ThreadId) -> Option<Thread> {
        let thread = self.threads.remove(&id)?;
        if let Some(page_threads) = self.by_page.get_mut(&thread.page()) {
            page_threads.retain(|&tid| tid != id);
            if page_threads.is_empty() {
                self.by_page.remove(&thread.page());
            }
        }
        Some(thread)
    }

    pub fn get(&self, id: ThreadId) -> Option<&Thread> {
        self.threads.get(&id)
    }

    pub fn get_mut(&mut self, id: ThreadId) -> Option<&mut Thread> {
        self.threads.get_mut(&id)
    }

    /// Threads on one page, in insertion order.
    pub fn page_threads(&self, page: u32) -> Vec<&Thread> {
        self.by_page
            .get(&page)
            .map(|ids| ids.iter().filter_map(|id| self.threads.get(id)).collect())
            .unwrap_or_default()
    }

    /// Pages that currently hold at least one thread, ascending.
    pub fn pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.by_page.keys().copied().collect();
        pages.sort_unstable();
        pages
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn clear(&mut self) {
        self.threads.clear();
        self.by_page.clear();
    }

    /// Export the collection as JSON for the persistence layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
