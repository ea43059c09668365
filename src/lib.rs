//! Lockstep: N-way Synchronized Tree Traversal
//!
//! Walks several content-addressed directory trees in lockstep, aligning
//! entries by name at every step so a consumer can classify additions,
//! deletions, modifications and directory/file conflicts across all sides
//! at once, and descend into matching subtrees under its own control.

pub mod error;
pub mod index;
pub mod logging;
pub mod store;
pub mod traverse;
pub mod tree;
pub mod types;

pub use error::{StoreError, TraverseError};
pub use traverse::{traverse, traverse_with_options, Advance, Mask, PathFrame, Step, Visit};
pub use tree::cursor::TreeCursor;
pub use types::{HashKind, ObjectId};
