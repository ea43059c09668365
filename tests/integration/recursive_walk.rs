//! Integration tests for visitor-driven recursive descent

use super::test_utils::{put_blob, put_tree};
use lockstep::store::{MemoryObjectStore, ObjectStore};
use lockstep::traverse::TraverseOptions;
use lockstep::tree::entry::FileKind;
use lockstep::types::{HashKind, ObjectId};
use lockstep::{
    traverse_with_options, Advance, Mask, PathFrame, Step, TraverseError, TreeCursor, Visit,
};

/// Visitor that descends into every directory bit, recording the full
/// path and mask of each step it sees at any depth.
struct DeepLister<'s> {
    store: &'s MemoryObjectStore,
    options: TraverseOptions,
    seen: Vec<(Vec<u8>, Mask)>,
}

impl<'s> DeepLister<'s> {
    fn new(store: &'s MemoryObjectStore) -> DeepLister<'s> {
        DeepLister {
            store,
            options: TraverseOptions::default(),
            seen: Vec::new(),
        }
    }

    fn walk(&mut self, roots: &[ObjectId]) -> Result<(), TraverseError> {
        let buffers: Vec<_> = roots
            .iter()
            .map(|id| self.store.get(id))
            .collect::<Result<_, _>>()?;
        let mut cursors = Vec::with_capacity(buffers.len());
        for buffer in &buffers {
            cursors.push(TreeCursor::from_bytes(buffer, self.store.hash_kind())?);
        }
        let options = self.options.clone();
        traverse_with_options(&mut cursors, self, &PathFrame::root(), &options)
    }
}

impl Visit for DeepLister<'_> {
    fn step(&mut self, step: &Step<'_>) -> Result<Advance, TraverseError> {
        self.seen
            .push((step.frame.format_path(step.name()), step.mask));

        if !step.dirmask.is_empty() {
            // Fetch child trees for the directory sides; everyone else
            // descends as an empty cursor so indices keep their meaning.
            let mut buffers = Vec::with_capacity(step.width());
            for index in 0..step.width() {
                if step.dirmask.contains(index) {
                    let entry = step.entry(index).unwrap();
                    buffers.push(Some(self.store.get(&entry.object_id())?));
                } else {
                    buffers.push(None);
                }
            }
            let mut children = Vec::with_capacity(step.width());
            for buffer in &buffers {
                children.push(match buffer {
                    Some(bytes) => TreeCursor::from_bytes(bytes, self.store.hash_kind())?,
                    None => TreeCursor::empty(),
                });
            }
            let child_frame = step.frame.child(step.name());
            let options = self.options.clone();
            traverse_with_options(&mut children, self, &child_frame, &options)?;
        }

        Ok(Advance::All)
    }
}

/// Test that a nested two-way walk visits every path in depth-first
/// order with the right masks at every level.
#[test]
fn test_nested_walk_reaches_every_path() {
    let store = MemoryObjectStore::new(HashKind::Sha1);
    let blob = put_blob(&store, b"same everywhere");
    let changed = put_blob(&store, b"only on the right");

    // Left:  src/{lib.rs, util.rs}, README
    // Right: src/{lib.rs (changed), util.rs}, README
    let left_src = put_tree(
        &store,
        &[
            (FileKind::Regular, b"lib.rs", blob),
            (FileKind::Regular, b"util.rs", blob),
        ],
    );
    let right_src = put_tree(
        &store,
        &[
            (FileKind::Regular, b"lib.rs", changed),
            (FileKind::Regular, b"util.rs", blob),
        ],
    );
    let left = put_tree(
        &store,
        &[
            (FileKind::Regular, b"README", blob),
            (FileKind::Directory, b"src", left_src),
        ],
    );
    let right = put_tree(
        &store,
        &[
            (FileKind::Regular, b"README", blob),
            (FileKind::Directory, b"src", right_src),
        ],
    );

    let mut lister = DeepLister::new(&store);
    lister.walk(&[left, right]).unwrap();

    let both = Mask::of(&[0, 1]);
    assert_eq!(
        lister.seen,
        vec![
            (b"README".to_vec(), both),
            (b"src".to_vec(), both),
            (b"src/lib.rs".to_vec(), both),
            (b"src/util.rs".to_vec(), both),
        ]
    );
}

/// Test that a subtree present on one side only still gets walked, with
/// single-sided masks below it.
#[test]
fn test_one_sided_subtree_descends_with_gaps() {
    let store = MemoryObjectStore::new(HashKind::Sha1);
    let blob = put_blob(&store, b"content");

    let only_left_dir = put_tree(&store, &[(FileKind::Regular, b"deep.txt", blob)]);
    let left = put_tree(&store, &[(FileKind::Directory, b"extra", only_left_dir)]);
    let right = put_tree(&store, &[]);

    let mut lister = DeepLister::new(&store);
    lister.walk(&[left, right]).unwrap();

    assert_eq!(
        lister.seen,
        vec![
            (b"extra".to_vec(), Mask::of(&[0])),
            (b"extra/deep.txt".to_vec(), Mask::of(&[0])),
        ]
    );
}

/// Test that three levels of nesting reconstruct full slash-joined paths.
#[test]
fn test_paths_reconstruct_across_depths() {
    let store = MemoryObjectStore::new(HashKind::Sha1);
    let blob = put_blob(&store, b"leaf");

    let level3 = put_tree(&store, &[(FileKind::Regular, b"leaf.txt", blob)]);
    let level2 = put_tree(&store, &[(FileKind::Directory, b"c", level3)]);
    let level1 = put_tree(&store, &[(FileKind::Directory, b"b", level2)]);
    let root = put_tree(&store, &[(FileKind::Directory, b"a", level1)]);

    let mut lister = DeepLister::new(&store);
    lister.walk(&[root]).unwrap();

    let paths: Vec<&[u8]> = lister.seen.iter().map(|(p, _)| p.as_slice()).collect();
    assert_eq!(
        paths,
        vec![
            b"a".as_slice(),
            b"a/b".as_slice(),
            b"a/b/c".as_slice(),
            b"a/b/c/leaf.txt".as_slice(),
        ]
    );
}

/// Test that the depth ceiling aborts a walk that descends too far.
#[test]
fn test_depth_ceiling_aborts_deep_descent() {
    let store = MemoryObjectStore::new(HashKind::Sha1);
    let blob = put_blob(&store, b"leaf");

    let level3 = put_tree(&store, &[(FileKind::Regular, b"leaf.txt", blob)]);
    let level2 = put_tree(&store, &[(FileKind::Directory, b"c", level3)]);
    let level1 = put_tree(&store, &[(FileKind::Directory, b"b", level2)]);
    let root = put_tree(&store, &[(FileKind::Directory, b"a", level1)]);

    let mut lister = DeepLister::new(&store);
    lister.options = TraverseOptions { max_depth: Some(2) };
    let result = lister.walk(&[root]);

    assert!(matches!(
        result,
        Err(TraverseError::DepthExceeded { depth: 3, max: 2 })
    ));
    // Everything up to the ceiling was still visited.
    let paths: Vec<&[u8]> = lister.seen.iter().map(|(p, _)| p.as_slice()).collect();
    assert_eq!(
        paths,
        vec![b"a".as_slice(), b"a/b".as_slice(), b"a/b/c".as_slice()]
    );
}

/// Test that a dangling subtree reference surfaces as a store error from
/// the level that tried to fetch it.
#[test]
fn test_missing_subtree_surfaces_store_error() {
    let store = MemoryObjectStore::new(HashKind::Sha1);
    let ghost = ObjectId::null(HashKind::Sha1);
    let root = put_tree(&store, &[(FileKind::Directory, b"ghost", ghost)]);

    let mut lister = DeepLister::new(&store);
    let result = lister.walk(&[root]);
    assert!(matches!(result, Err(TraverseError::Store(_))));
}

/// Test that an error raised by the visitor deep in the walk aborts the
/// whole traversal and comes back verbatim.
#[test]
fn test_visitor_error_propagates_from_depth() {
    let store = MemoryObjectStore::new(HashKind::Sha1);
    let blob = put_blob(&store, b"leaf");
    let inner = put_tree(&store, &[(FileKind::Regular, b"stop-here", blob)]);
    let root = put_tree(&store, &[(FileKind::Directory, b"dir", inner)]);
    let bytes = store.get(&root).unwrap();

    struct Bomb<'s> {
        store: &'s MemoryObjectStore,
    }

    impl Visit for Bomb<'_> {
        fn step(&mut self, step: &Step<'_>) -> Result<Advance, TraverseError> {
            if step.name() == b"stop-here" {
                return Err(TraverseError::Callback(anyhow::anyhow!(
                    "refusing {}",
                    String::from_utf8_lossy(&step.frame.format_path(step.name()))
                )));
            }
            if !step.dirmask.is_empty() {
                let entry = step.entry(0).unwrap();
                let child_bytes = self.store.get(&entry.object_id())?;
                let mut children =
                    vec![TreeCursor::from_bytes(&child_bytes, HashKind::Sha1)?];
                let child_frame = step.frame.child(step.name());
                lockstep::traverse(&mut children, self, &child_frame)?;
            }
            Ok(Advance::All)
        }
    }

    let mut cursors = vec![TreeCursor::from_bytes(&bytes, HashKind::Sha1).unwrap()];
    let mut bomb = Bomb { store: &store };
    let result = lockstep::traverse(&mut cursors, &mut bomb, &PathFrame::root());

    let err = result.unwrap_err();
    assert!(matches!(err, TraverseError::Callback(_)));
    assert_eq!(err.to_string(), "refusing dir/stop-here");
}
