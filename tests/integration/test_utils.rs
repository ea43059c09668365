//! Shared test utilities for integration tests
//!
//! Centralizes object-store fixtures and a recording visitor so the test
//! modules stay focused on the behavior they exercise.

use lockstep::store::MemoryObjectStore;
use lockstep::tree::builder::TreeBuilder;
use lockstep::tree::entry::FileKind;
use lockstep::types::ObjectId;
use lockstep::{Advance, Mask, Step, TraverseError, Visit};

/// Serialize `(kind, name, id)` rows as a tree object in `store` and
/// return the tree's id.
pub fn put_tree(store: &MemoryObjectStore, rows: &[(FileKind, &[u8], ObjectId)]) -> ObjectId {
    let mut builder = TreeBuilder::new(store.hash_kind());
    for &(kind, name, id) in rows {
        builder.push(kind, name, id).unwrap();
    }
    store.insert(builder.finish().unwrap())
}

/// Store raw content and return its id.
pub fn put_blob(store: &MemoryObjectStore, content: &[u8]) -> ObjectId {
    store.insert(content)
}

/// One step as captured by [`StepRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStep {
    pub name: Vec<u8>,
    pub mask: Mask,
    pub dirmask: Mask,
    pub ids: Vec<Option<ObjectId>>,
}

/// Visitor that records every aligned step and always advances everything.
#[derive(Default)]
pub struct StepRecorder {
    pub steps: Vec<RecordedStep>,
}

impl Visit for StepRecorder {
    fn step(&mut self, step: &Step<'_>) -> Result<Advance, TraverseError> {
        self.steps.push(RecordedStep {
            name: step.name().to_vec(),
            mask: step.mask,
            dirmask: step.dirmask,
            ids: step
                .entries
                .iter()
                .map(|entry| entry.map(|e| e.object_id()))
                .collect(),
        });
        Ok(Advance::All)
    }
}
