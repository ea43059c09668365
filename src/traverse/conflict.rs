//! Directory/file conflict detection.
//!
//! Under the tree comparator a non-directory sorts strictly before a
//! same-named directory, so the two never tie in the minimum scan: the
//! file wins the step and the directory's cursor is left behind, which
//! would present one logical name as two separate steps. This lookahead
//! spots the leftover so the engine can fold it into the winning step.
//! The check is forward-only: it only ever reads the losing cursor's
//! current entry, never anything behind it.

use crate::tree::cursor::TreeCursor;
use crate::tree::entry::{Entry, FileKind};

/// True when `cursor`'s current entry is a directory shadowed by the
/// non-directory `winner` at the same name.
pub fn df_conflict(winner: &Entry<'_>, cursor: &TreeCursor<'_>) -> bool {
    if winner.kind == FileKind::Directory {
        return false;
    }
    match cursor.peek() {
        Some(candidate) => candidate.kind == FileKind::Directory && candidate.name == winner.name,
        None => false,
    }
}
