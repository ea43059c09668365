//! Core identifier types shared across the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash function family behind a repository's object ids.
///
/// The traversal layer never computes hashes; the kind only fixes the raw
/// id width embedded in tree records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashKind {
    /// 20-byte ids (legacy repositories).
    Sha1,
    /// 32-byte ids.
    Sha256,
}

impl HashKind {
    /// Raw id width in bytes.
    pub const fn width(self) -> usize {
        match self {
            HashKind::Sha1 => 20,
            HashKind::Sha256 => 32,
        }
    }

    /// Map a raw id length back to its kind.
    pub const fn from_width(len: usize) -> Option<HashKind> {
        match len {
            20 => Some(HashKind::Sha1),
            32 => Some(HashKind::Sha256),
            _ => None,
        }
    }
}

/// An opaque content-addressed object id.
///
/// Holds up to 32 raw bytes; only the first `kind().width()` are
/// significant, the remainder is zero. Equality covers the kind, so a
/// 20-byte id never equals a 32-byte id sharing its prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    kind: HashKind,
    bytes: [u8; 32],
}

impl ObjectId {
    /// Build an id from raw bytes. The slice length must be a known width.
    pub fn from_bytes(raw: &[u8]) -> Option<ObjectId> {
        let kind = HashKind::from_width(raw.len())?;
        let mut bytes = [0u8; 32];
        bytes[..raw.len()].copy_from_slice(raw);
        Some(ObjectId { kind, bytes })
    }

    /// The all-zero id of the given kind.
    pub const fn null(kind: HashKind) -> ObjectId {
        ObjectId {
            kind,
            bytes: [0u8; 32],
        }
    }

    pub const fn kind(&self) -> HashKind {
        self.kind
    }

    /// The significant raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.kind.width()]
    }

    /// Lowercase hex rendering of the significant bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}
