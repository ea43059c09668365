//! Object access: the store contract and an in-memory implementation.
//!
//! The alignment engine performs no I/O of its own. Callers hand it
//! cursors over already-resident buffers and resolve child trees through
//! this interface from inside the visitor when they decide to descend.
//! [`MemoryObjectStore`] is the bundled collaborator for consumers, tests
//! and benches; a production object database implements the same trait
//! elsewhere.

use crate::error::StoreError;
use crate::types::{HashKind, ObjectId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resolves an object id to the bytes it names.
pub trait ObjectStore {
    /// Fetch an object's bytes.
    ///
    /// `NotFound` and I/O failures are equally fatal to the traversal
    /// level that requested the object.
    fn get(&self, id: &ObjectId) -> Result<Arc<[u8]>, StoreError>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn get(&self, id: &ObjectId) -> Result<Arc<[u8]>, StoreError> {
        (**self).get(id)
    }
}

/// Content-addressed in-memory store.
///
/// Ids are BLAKE3 digests truncated to the configured width. Buffers hand
/// out as `Arc` slices, so concurrent traversals share them without
/// copying; stored bytes are immutable.
pub struct MemoryObjectStore {
    hash: HashKind,
    objects: RwLock<HashMap<ObjectId, Arc<[u8]>>>,
}

impl MemoryObjectStore {
    pub fn new(hash: HashKind) -> MemoryObjectStore {
        MemoryObjectStore {
            hash,
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// The id width this store addresses with.
    pub fn hash_kind(&self) -> HashKind {
        self.hash
    }

    /// Store `bytes`, returning the derived id. Re-inserting identical
    /// content is a no-op that yields the same id.
    pub fn insert(&self, bytes: impl Into<Vec<u8>>) -> ObjectId {
        let bytes: Arc<[u8]> = bytes.into().into();
        let digest = blake3::hash(&bytes);
        let id = ObjectId::from_bytes(&digest.as_bytes()[..self.hash.width()])
            .expect("hash width is a known id width");
        let size = bytes.len();
        self.objects.write().insert(id, bytes);
        debug!(id = %id, size, "stored object");
        id
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get(&self, id: &ObjectId) -> Result<Arc<[u8]>, StoreError> {
        self.objects
            .read()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }
}
