//! Tree entry records and the tree-name comparator.

use crate::types::ObjectId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Classified file mode of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    Regular,
    Executable,
    Symlink,
    Directory,
    /// A commit reference embedded in the tree (submodule link).
    Submodule,
}

impl FileKind {
    /// Classify a raw octal mode by its format bits.
    ///
    /// Non-canonical regular-file modes (for example `100664` written by
    /// old tooling) fold into `Regular`; an unrecognized format is `None`.
    pub fn from_mode(mode: u32) -> Option<FileKind> {
        match mode & 0o170000 {
            0o040000 => Some(FileKind::Directory),
            0o120000 => Some(FileKind::Symlink),
            0o160000 => Some(FileKind::Submodule),
            0o100000 => {
                if mode & 0o111 != 0 {
                    Some(FileKind::Executable)
                } else {
                    Some(FileKind::Regular)
                }
            }
            _ => None,
        }
    }

    /// Canonical octal mode for re-encoding.
    pub fn as_mode(self) -> u32 {
        match self {
            FileKind::Regular => 0o100644,
            FileKind::Executable => 0o100755,
            FileKind::Symlink => 0o120000,
            FileKind::Directory => 0o040000,
            FileKind::Submodule => 0o160000,
        }
    }

    /// Whether entries of this kind name a subtree.
    pub fn is_dir(self) -> bool {
        matches!(self, FileKind::Directory)
    }
}

/// One decoded `(mode, name, id)` record, borrowing from its backing bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub kind: FileKind,
    /// Entry name: never empty, never contains `/` or NUL.
    pub name: &'a [u8],
    /// Raw id bytes, exactly `HashKind::width()` long.
    pub id: &'a [u8],
}

impl<'a> Entry<'a> {
    /// Copy the borrowed id out into an owned [`ObjectId`].
    pub fn object_id(&self) -> ObjectId {
        // The id width was validated when the entry was decoded or the
        // snapshot was constructed.
        ObjectId::from_bytes(self.id).expect("entry id has a known width")
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("kind", &self.kind)
            .field("name", &String::from_utf8_lossy(self.name))
            .field("id", &hex::encode(self.id))
            .finish()
    }
}

/// Compare two entries in tree sort order.
///
/// Names compare byte-wise, except that a directory's name is treated as
/// if terminated by `/`. A file and a same-named directory therefore never
/// compare equal, and the file always sorts first (NUL sorts below `/`).
pub fn compare(a: &Entry<'_>, b: &Entry<'_>) -> Ordering {
    let common = a.name.len().min(b.name.len());
    match a.name[..common].cmp(&b.name[..common]) {
        Ordering::Equal => {}
        other => return other,
    }
    sort_suffix(a, common).cmp(&sort_suffix(b, common))
}

/// The byte an entry's name presents at `pos` for ordering purposes: the
/// literal byte if the name continues, a virtual `/` for directories, NUL
/// otherwise.
fn sort_suffix(entry: &Entry<'_>, pos: usize) -> u8 {
    match entry.name.get(pos) {
        Some(&byte) => byte,
        None if entry.kind.is_dir() => b'/',
        None => 0,
    }
}

/// Strict successor check used by the order-verification paths: `next`
/// must sort after `prev` and carry a different literal name. A file and a
/// same-named directory sort apart but cannot coexist in one listing.
pub(crate) fn follows(prev: &Entry<'_>, next: &Entry<'_>) -> bool {
    compare(prev, next) == Ordering::Less && prev.name != next.name
}
