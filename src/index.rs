//! Pre-parsed index snapshots backing the non-decoding cursor variant.
//!
//! A snapshot is one directory level of collaborator state that never
//! lived in tree-object form, such as a staging area or working-tree
//! listing: owned `(name, kind, id)` rows, already in tree order.
//! Construction validates everything the record decoder validates, so the
//! two cursor variants stay interchangeable from the alignment engine's
//! point of view.

use crate::error::TraverseError;
use crate::tree::cursor::TreeCursor;
use crate::tree::entry::{follows, Entry, FileKind};
use crate::types::{HashKind, ObjectId};
use tracing::trace;

/// One owned snapshot row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: Vec<u8>,
    pub kind: FileKind,
    pub id: ObjectId,
}

impl IndexEntry {
    pub fn new(kind: FileKind, name: impl Into<Vec<u8>>, id: ObjectId) -> IndexEntry {
        IndexEntry {
            name: name.into(),
            kind,
            id,
        }
    }

    fn as_entry(&self) -> Entry<'_> {
        Entry {
            kind: self.kind,
            name: &self.name,
            id: self.id.as_bytes(),
        }
    }
}

/// An owned, validated, tree-ordered entry listing.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    entries: Vec<IndexEntry>,
}

impl IndexSnapshot {
    /// Validate and adopt `entries`.
    ///
    /// Names must be non-empty and free of `/` and NUL, all ids must share
    /// one width, and rows must already be in strict tree order with
    /// distinct names. Order violations are [`TraverseError::UnsortedTree`],
    /// everything else [`TraverseError::InvalidEntry`].
    pub fn new(entries: Vec<IndexEntry>) -> Result<IndexSnapshot, TraverseError> {
        let mut hash: Option<HashKind> = None;
        for entry in &entries {
            if entry.name.is_empty() {
                return Err(TraverseError::InvalidEntry("empty entry name".to_string()));
            }
            if entry.name.iter().any(|&byte| byte == b'/' || byte == 0) {
                return Err(TraverseError::InvalidEntry(format!(
                    "name {:?} contains a path separator or NUL",
                    String::from_utf8_lossy(&entry.name)
                )));
            }
            match hash {
                None => hash = Some(entry.id.kind()),
                Some(kind) if kind != entry.id.kind() => {
                    return Err(TraverseError::InvalidEntry(
                        "mixed id widths in one snapshot".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }
        for pair in entries.windows(2) {
            if !follows(&pair[0].as_entry(), &pair[1].as_entry()) {
                return Err(TraverseError::UnsortedTree);
            }
        }
        trace!(entries = entries.len(), "adopted index snapshot");
        Ok(IndexSnapshot { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor positioned at the first row. No decoding happens during the
    /// walk; this variant replays what validation already parsed.
    pub fn cursor(&self) -> TreeCursor<'_> {
        TreeCursor::from_snapshot(self)
    }

    pub(crate) fn entry_at(&self, pos: usize) -> Option<Entry<'_>> {
        self.entries.get(pos).map(|entry| entry.as_entry())
    }
}
