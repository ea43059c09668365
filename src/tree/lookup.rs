//! Keyed lookup of one path inside nested trees.
//!
//! A convenience over the cursor layer for callers that want a single
//! entry rather than a walk: resolve a `/`-separated path against a root
//! tree, fetching each intermediate level through the object store.

use crate::error::TraverseError;
use crate::store::ObjectStore;
use crate::tree::cursor::TreeCursor;
use crate::tree::entry::{compare, Entry, FileKind};
use crate::types::ObjectId;
use std::cmp::Ordering;
use tracing::trace;

/// Resolve `path` against the tree named by `root`.
///
/// Walks one tree level per path segment. Returns `Ok(None)` when the
/// path names nothing: a missing entry, or a path that tries to descend
/// through a non-directory (submodule links do not descend). The empty
/// path resolves to the root tree itself; a trailing `/` additionally
/// requires the resolved entry to be a directory. An empty interior
/// segment (as in `a//b`) is an invalid path, not a miss.
pub fn lookup_path<S>(
    store: &S,
    root: &ObjectId,
    path: &[u8],
) -> Result<Option<(FileKind, ObjectId)>, TraverseError>
where
    S: ObjectStore + ?Sized,
{
    if path.is_empty() {
        return Ok(Some((FileKind::Directory, *root)));
    }

    let mut tree_id = *root;
    let mut rest = path;
    loop {
        let (segment, tail, had_slash) = match rest.iter().position(|&byte| byte == b'/') {
            Some(slash) => (&rest[..slash], &rest[slash + 1..], true),
            None => (rest, &rest[rest.len()..], false),
        };
        if segment.is_empty() {
            return Err(TraverseError::InvalidEntry("empty path segment".to_string()));
        }

        let bytes = store.get(&tree_id)?;
        let cursor = TreeCursor::from_bytes(&bytes, tree_id.kind())?;
        // In tree order, the last place a match can sit is the directory
        // form of the segment: a file form sorts earlier, so once the
        // directory form sorts below the current entry the scan can stop.
        let dir_form = Entry {
            kind: FileKind::Directory,
            name: segment,
            id: &[],
        };
        let mut found = None;
        for entry in cursor.entries() {
            let entry = entry?;
            if entry.name == segment {
                found = Some((entry.kind, entry.object_id()));
                break;
            }
            if compare(&dir_form, &entry) == Ordering::Less {
                break;
            }
        }

        let (kind, id) = match found {
            Some(hit) => hit,
            None => {
                trace!(
                    segment = %String::from_utf8_lossy(segment),
                    tree = %tree_id,
                    "path segment not found"
                );
                return Ok(None);
            }
        };

        if tail.is_empty() {
            if had_slash && kind != FileKind::Directory {
                return Ok(None);
            }
            return Ok(Some((kind, id)));
        }
        if kind != FileKind::Directory {
            return Ok(None);
        }
        tree_id = id;
        rest = tail;
    }
}
