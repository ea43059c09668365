//! Tree Objects
//!
//! Decoding, ordering, construction and keyed lookup of tree objects: the
//! flat, sorted records that name a directory's children by mode, name and
//! content hash.

pub mod builder;
pub mod cursor;
pub mod decode;
pub mod entry;
pub mod lookup;

pub use builder::TreeBuilder;
pub use cursor::TreeCursor;
pub use entry::{Entry, FileKind};
