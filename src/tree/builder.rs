//! Serializing entry lists into tree-object bytes.
//!
//! The write-side counterpart of the record decoder, used to materialize
//! trees in object stores. Records are sorted into tree order on finish;
//! the decoder's invariants (name rules, one id width, unique names) are
//! enforced up front so a built buffer always round-trips through a
//! cursor.

use crate::error::TraverseError;
use crate::tree::entry::{compare, follows, Entry, FileKind};
use crate::types::{HashKind, ObjectId};
use tracing::trace;

/// Accumulates `(kind, name, id)` records and emits the wire format.
pub struct TreeBuilder {
    hash: HashKind,
    records: Vec<Record>,
}

struct Record {
    kind: FileKind,
    name: Vec<u8>,
    id: ObjectId,
}

impl Record {
    fn as_entry(&self) -> Entry<'_> {
        Entry {
            kind: self.kind,
            name: &self.name,
            id: self.id.as_bytes(),
        }
    }
}

impl TreeBuilder {
    pub fn new(hash: HashKind) -> TreeBuilder {
        TreeBuilder {
            hash,
            records: Vec::new(),
        }
    }

    /// Queue one record, in any order.
    ///
    /// Name and id-width rules are checked here so the error points at the
    /// offending call site rather than at `finish`.
    pub fn push(
        &mut self,
        kind: FileKind,
        name: impl Into<Vec<u8>>,
        id: ObjectId,
    ) -> Result<(), TraverseError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TraverseError::InvalidEntry("empty entry name".to_string()));
        }
        if name.iter().any(|&byte| byte == b'/' || byte == 0) {
            return Err(TraverseError::InvalidEntry(format!(
                "name {:?} contains a path separator or NUL",
                String::from_utf8_lossy(&name)
            )));
        }
        if id.kind() != self.hash {
            return Err(TraverseError::InvalidEntry(format!(
                "{}-byte id in a tree keyed by {}-byte ids",
                id.kind().width(),
                self.hash.width()
            )));
        }
        self.records.push(Record { kind, name, id });
        Ok(())
    }

    /// Sort into tree order and serialize.
    ///
    /// Fails if two records share a literal name; a file and a same-named
    /// directory count as sharing one. An empty builder yields an empty
    /// buffer, the encoding of an empty tree.
    pub fn finish(mut self) -> Result<Vec<u8>, TraverseError> {
        self.records
            .sort_by(|a, b| compare(&a.as_entry(), &b.as_entry()));
        for pair in self.records.windows(2) {
            if !follows(&pair[0].as_entry(), &pair[1].as_entry()) {
                return Err(TraverseError::InvalidEntry(format!(
                    "duplicate entry name {:?}",
                    String::from_utf8_lossy(&pair[1].name)
                )));
            }
        }

        let width = self.hash.width();
        let capacity = self
            .records
            .iter()
            .map(|record| 8 + record.name.len() + width)
            .sum();
        let mut out = Vec::with_capacity(capacity);
        for record in &self.records {
            out.extend_from_slice(format!("{:o}", record.kind.as_mode()).as_bytes());
            out.push(b' ');
            out.extend_from_slice(&record.name);
            out.push(0);
            out.extend_from_slice(record.id.as_bytes());
        }
        trace!(entries = self.records.len(), bytes = out.len(), "serialized tree");
        Ok(out)
    }
}
