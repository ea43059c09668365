//! Forward-only cursors over a single tree's entries.
//!
//! Two backings share one interface: a buffer cursor lazily decodes
//! records straight out of a tree object's bytes, and an index cursor
//! replays an already-parsed snapshot. Both emit entries in identical
//! tree sort order; the alignment engine depends on that equivalence and
//! never asks which variant it holds.

use crate::error::TraverseError;
use crate::index::IndexSnapshot;
use crate::tree::decode::decode_entry;
use crate::tree::entry::{follows, Entry};
use crate::types::HashKind;

enum Backing<'a> {
    /// Decodes records on demand; `next` is the offset of the first
    /// undecoded record.
    Buffer {
        buf: &'a [u8],
        next: usize,
        hash: HashKind,
    },
    /// Replays a validated snapshot; `pos` indexes the first unread row.
    Index { snapshot: &'a IndexSnapshot, pos: usize },
}

/// A forward-only, lazily decoding position over one tree's entries.
pub struct TreeCursor<'a> {
    current: Option<Entry<'a>>,
    backing: Backing<'a>,
}

impl<'a> TreeCursor<'a> {
    /// Cursor over a raw tree object.
    ///
    /// The first record is decoded eagerly, so corruption at the head of
    /// the buffer surfaces here rather than mid-walk. An empty buffer is
    /// a valid, immediately exhausted tree.
    pub fn from_bytes(buf: &'a [u8], hash: HashKind) -> Result<TreeCursor<'a>, TraverseError> {
        let mut cursor = TreeCursor {
            current: None,
            backing: Backing::Buffer { buf, next: 0, hash },
        };
        cursor.load_next()?;
        Ok(cursor)
    }

    /// Cursor positioned at the first row of a snapshot.
    pub(crate) fn from_snapshot(snapshot: &'a IndexSnapshot) -> TreeCursor<'a> {
        TreeCursor {
            current: snapshot.entry_at(0),
            backing: Backing::Index { snapshot, pos: 1 },
        }
    }

    /// A cursor over no tree at all: exhausted from the start.
    ///
    /// Stands in for a side that lacks the subtree in N-way walks, so the
    /// cursor set keeps its width when descending.
    pub fn empty() -> TreeCursor<'static> {
        TreeCursor {
            current: None,
            backing: Backing::Buffer {
                buf: &[],
                next: 0,
                hash: HashKind::Sha1,
            },
        }
    }

    /// The current entry, if any.
    ///
    /// The returned copy borrows from the backing bytes, not from the
    /// cursor, so it stays valid across [`advance`](Self::advance).
    pub fn peek(&self) -> Option<Entry<'a>> {
        self.current
    }

    /// True once every entry has been consumed.
    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Step past the current entry and decode the next one.
    ///
    /// Each freshly decoded entry must sort strictly after the one it
    /// replaces. Buffer-backed trees are untrusted input, so a violation
    /// is a hard [`TraverseError::UnsortedTree`]; snapshots were validated
    /// at construction and only carry a debug assertion. Calling at the
    /// end has no effect.
    pub fn advance(&mut self) -> Result<(), TraverseError> {
        let prev = match self.current {
            Some(entry) => entry,
            None => return Ok(()),
        };
        self.load_next()?;
        if let Some(next) = self.current {
            match self.backing {
                Backing::Buffer { .. } => {
                    if !follows(&prev, &next) {
                        return Err(TraverseError::UnsortedTree);
                    }
                }
                Backing::Index { .. } => {
                    debug_assert!(follows(&prev, &next), "snapshot order broke after validation");
                }
            }
        }
        Ok(())
    }

    fn load_next(&mut self) -> Result<(), TraverseError> {
        self.current = match &mut self.backing {
            Backing::Buffer { buf, next, hash } => {
                if *next >= buf.len() {
                    None
                } else {
                    let (entry, after) = decode_entry(buf, *next, *hash)?;
                    *next = after;
                    Some(entry)
                }
            }
            Backing::Index { snapshot, pos } => {
                let entry = snapshot.entry_at(*pos);
                if entry.is_some() {
                    *pos += 1;
                }
                entry
            }
        };
        Ok(())
    }

    /// Consume the cursor as an iterator over its remaining entries.
    ///
    /// Valid entries are yielded up to the damaged record; the error for
    /// that record follows them, after which the iterator fuses.
    pub fn entries(self) -> Entries<'a> {
        Entries {
            cursor: self,
            pending: None,
            failed: false,
        }
    }
}

/// Iterator adapter over a cursor's remaining entries.
pub struct Entries<'a> {
    cursor: TreeCursor<'a>,
    pending: Option<TraverseError>,
    failed: bool,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<Entry<'a>, TraverseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(err) = self.pending.take() {
            self.failed = true;
            return Some(Err(err));
        }
        let entry = self.cursor.peek()?;
        if let Err(err) = self.cursor.advance() {
            self.pending = Some(err);
        }
        Some(Ok(entry))
    }
}
