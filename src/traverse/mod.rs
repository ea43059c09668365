//! N-way Lockstep Traversal
//!
//! Drives any number of tree cursors forward in lockstep, aligning
//! entries by name at every step. The visitor sees each distinct name
//! exactly once per directory level with the aligned entry (or a gap)
//! from every side, decides what it means, descends into subtrees by
//! re-entering the engine with child cursors, and controls which cursors
//! move. The engine itself performs no hashing and no I/O; it mutates
//! nothing but the cursors it was handed.

pub mod conflict;
pub mod frame;

pub use frame::PathFrame;

use crate::error::TraverseError;
use crate::tree::cursor::TreeCursor;
use crate::tree::entry::{compare, Entry};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};
use tracing::{debug, instrument, trace};

/// Bitset over cursor indices.
///
/// Bit `i` set means cursor `i` participates. Capacity is the machine
/// word width; the engine rejects wider cursor sets at entry instead of
/// truncating silently.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask(usize);

impl Mask {
    /// Maximum number of simultaneously traversed trees.
    pub const CAPACITY: usize = usize::BITS as usize;

    pub const EMPTY: Mask = Mask(0);

    /// Mask with only bit `index` set.
    ///
    /// Panics if `index` is outside the mask capacity; cursor indices are
    /// bounded before any mask is built.
    pub fn single(index: usize) -> Mask {
        assert!(index < Mask::CAPACITY, "cursor index {} out of mask range", index);
        Mask(1 << index)
    }

    /// Mask with the given bits set.
    pub fn of(indices: &[usize]) -> Mask {
        let mut mask = Mask::EMPTY;
        for &index in indices {
            mask |= Mask::single(index);
        }
        mask
    }

    pub fn contains(&self, index: usize) -> bool {
        index < Mask::CAPACITY && self.0 & (1 << index) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Indices of set bits, ascending.
    pub fn iter(&self) -> MaskIter {
        MaskIter(self.0)
    }
}

impl BitAnd for Mask {
    type Output = Mask;
    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}

impl BitOr for Mask {
    type Output = Mask;
    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl BitAndAssign for Mask {
    fn bitand_assign(&mut self, rhs: Mask) {
        self.0 &= rhs.0;
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Mask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask{{")?;
        for (position, index) in self.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "}}")
    }
}

/// Iterator over a mask's set bits, lowest first.
pub struct MaskIter(usize);

impl Iterator for MaskIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(index)
    }
}

/// How the visitor wants cursors moved after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Advance every cursor aligned in this step (the common case).
    All,
    /// Advance only these cursors; the rest present the same entry again
    /// next step. A set that does not intersect the step's mask degrades
    /// to `All`, so a misbehaving visitor cannot stall the walk.
    Set(Mask),
}

/// One aligned step handed to the visitor.
#[derive(Debug)]
pub struct Step<'s> {
    /// Cursors aligned at this step's winning name.
    pub mask: Mask,
    /// Subset of `mask` whose entries are directories, including any
    /// directory folded in over a same-named non-directory winner.
    pub dirmask: Mask,
    /// Per-cursor entries; `None` outside `mask`.
    pub entries: &'s [Option<Entry<'s>>],
    /// Naming context for the current depth.
    pub frame: &'s PathFrame<'s>,
}

impl<'s> Step<'s> {
    /// Number of cursors being traversed, aligned or not.
    pub fn width(&self) -> usize {
        self.entries.len()
    }

    /// The entry cursor `index` aligned, if its bit is in `mask`.
    pub fn entry(&self, index: usize) -> Option<Entry<'s>> {
        self.entries.get(index).copied().flatten()
    }

    /// The name this step aligned on. Every aligned entry carries it.
    pub fn name(&self) -> &'s [u8] {
        self.entries
            .iter()
            .flatten()
            .next()
            .map(|entry| entry.name)
            .unwrap_or(&[])
    }

    /// True when some aligned side is a directory while another is not:
    /// the directory bits came from the conflict fold-in, or the kinds
    /// genuinely split across sides.
    pub fn is_df_conflict(&self) -> bool {
        !self.dirmask.is_empty() && self.dirmask != self.mask
    }
}

/// Per-step control callback.
///
/// Implement on a type when the walk must recurse (the visitor re-enters
/// [`traverse`] with `self` for matched subtrees); bare `FnMut` closures
/// work for single-level walks.
pub trait Visit {
    fn step(&mut self, step: &Step<'_>) -> Result<Advance, TraverseError>;
}

impl<F> Visit for F
where
    F: FnMut(&Step<'_>) -> Result<Advance, TraverseError>,
{
    fn step(&mut self, step: &Step<'_>) -> Result<Advance, TraverseError> {
        self(step)
    }
}

/// Default recursion ceiling.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

fn default_max_depth() -> Option<usize> {
    Some(DEFAULT_MAX_DEPTH)
}

/// Traversal tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraverseOptions {
    /// Recursion depth ceiling; `None` disables the guard. The engine
    /// checks the frame depth on entry, so the limit binds re-entrant
    /// visitors as well as flat walks.
    #[serde(default = "default_max_depth")]
    pub max_depth: Option<usize>,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        TraverseOptions {
            max_depth: default_max_depth(),
        }
    }
}

/// Walk `cursors` in lockstep with default options.
pub fn traverse<V>(
    cursors: &mut [TreeCursor<'_>],
    visitor: &mut V,
    frame: &PathFrame<'_>,
) -> Result<(), TraverseError>
where
    V: Visit + ?Sized,
{
    traverse_with_options(cursors, visitor, frame, &TraverseOptions::default())
}

/// Walk `cursors` in lockstep.
///
/// Every step aligns the smallest current name across all live cursors
/// under the tree comparator, folds shadowed same-named directories into
/// the step, hands the aligned view to the visitor, and advances the
/// cursors it picked. Steps arrive in strict tree order; the walk ends
/// when every cursor is exhausted. Identical inputs produce the identical
/// step sequence.
#[instrument(level = "debug", skip_all, fields(width = cursors.len(), depth = frame.depth()))]
pub fn traverse_with_options<V>(
    cursors: &mut [TreeCursor<'_>],
    visitor: &mut V,
    frame: &PathFrame<'_>,
    options: &TraverseOptions,
) -> Result<(), TraverseError>
where
    V: Visit + ?Sized,
{
    let width = cursors.len();
    if width > Mask::CAPACITY {
        return Err(TraverseError::TooManyTrees {
            count: width,
            max: Mask::CAPACITY,
        });
    }
    if let Some(max) = options.max_depth {
        if frame.depth() > max {
            return Err(TraverseError::DepthExceeded {
                depth: frame.depth(),
                max,
            });
        }
    }

    let mut entries: Vec<Option<Entry<'_>>> = vec![None; width];
    let mut steps: usize = 0;

    loop {
        // Step 1: scan for the minimum name and the cursors tied to it.
        let mut mask = Mask::EMPTY;
        let mut dirmask = Mask::EMPTY;
        let mut winner: Option<Entry<'_>> = None;

        for (index, cursor) in cursors.iter().enumerate() {
            let entry = match cursor.peek() {
                Some(entry) => entry,
                None => continue,
            };
            if let Some(best) = winner {
                match compare(&entry, &best) {
                    // Sorts after the running minimum: not in this step.
                    Ordering::Greater => continue,
                    // New minimum: earlier candidates pointed past it.
                    Ordering::Less => mask = Mask::EMPTY,
                    Ordering::Equal => {}
                }
            }
            mask |= Mask::single(index);
            if entry.kind.is_dir() {
                dirmask |= Mask::single(index);
            }
            winner = Some(entry);
        }

        // Directory bits gathered before a reset belong to discarded
        // candidates.
        dirmask &= mask;

        let winner = match winner {
            Some(entry) => entry,
            None => break,
        };

        // Step 2: fill the aligned view.
        for slot in entries.iter_mut() {
            *slot = None;
        }
        for index in mask.iter() {
            entries[index] = cursors[index].peek();
        }

        // Step 3: fold in directories shadowed by a non-directory winner,
        // so one logical name stays one step.
        for (index, cursor) in cursors.iter().enumerate() {
            if mask.contains(index) {
                continue;
            }
            if conflict::df_conflict(&winner, cursor) {
                mask |= Mask::single(index);
                dirmask |= Mask::single(index);
                entries[index] = cursor.peek();
            }
        }

        trace!(
            ?mask,
            ?dirmask,
            name = %String::from_utf8_lossy(winner.name),
            "aligned step"
        );

        // Step 4: let the visitor classify the step and pick who moves.
        let step = Step {
            mask,
            dirmask,
            entries: &entries,
            frame,
        };
        let advance = visitor.step(&step)?;

        let chosen = match advance {
            Advance::All => mask,
            Advance::Set(set) => {
                let set = set & mask;
                if set.is_empty() {
                    // Nothing aligned was picked; advancing the whole
                    // step keeps the walk moving.
                    mask
                } else {
                    set
                }
            }
        };
        for index in chosen.iter() {
            cursors[index].advance()?;
        }
        steps += 1;
    }

    debug!(steps, "Traversal complete");
    Ok(())
}
