//! Per-depth path context for traversals.
//!
//! A frame chain reconstructs full paths without allocating per step.
//! Each recursion level stacks one frame that borrows its directory's
//! name, and [`PathFrame::write_path`] walks the parent links into a
//! caller-supplied buffer. A frame's parent link only lives as long as
//! the recursive call that owns it; copy paths out before returning.

/// One traversal depth's naming context.
#[derive(Debug, Clone, Copy)]
pub struct PathFrame<'a> {
    name: &'a [u8],
    parent: Option<&'a PathFrame<'a>>,
    depth: usize,
}

impl<'a> PathFrame<'a> {
    /// Root frame with no prefix.
    pub fn root() -> PathFrame<'static> {
        PathFrame {
            name: &[],
            parent: None,
            depth: 0,
        }
    }

    /// Root frame whose reconstructed paths start with `base`.
    ///
    /// A trailing `/` on the base is trimmed; the separator is re-added
    /// during reconstruction.
    pub fn with_base(base: &'a [u8]) -> PathFrame<'a> {
        let base = match base.last() {
            Some(&b'/') => &base[..base.len() - 1],
            _ => base,
        };
        PathFrame {
            name: base,
            parent: None,
            depth: 0,
        }
    }

    /// Frame for the subdirectory `name` below this one.
    pub fn child(&'a self, name: &'a [u8]) -> PathFrame<'a> {
        PathFrame {
            name,
            parent: Some(self),
            depth: self.depth + 1,
        }
    }

    /// Recursion depth: 0 at the root, one more per [`child`](Self::child).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Byte length of the full path of `name` under this frame,
    /// separators included.
    pub fn path_len(&self, name: &[u8]) -> usize {
        let mut len = name.len();
        let mut frame = Some(self);
        while let Some(current) = frame {
            if !current.name.is_empty() {
                len += current.name.len() + 1;
            }
            frame = current.parent;
        }
        len
    }

    /// Write the full path of `name` under this frame into `out`.
    ///
    /// Clears `out` first. Reusing one buffer across steps keeps path
    /// reconstruction allocation-free once the buffer has grown to the
    /// deepest path.
    pub fn write_path(&self, name: &[u8], out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.path_len(name));
        self.write_prefix(out);
        out.extend_from_slice(name);
    }

    fn write_prefix(&self, out: &mut Vec<u8>) {
        if let Some(parent) = self.parent {
            parent.write_prefix(out);
        }
        if !self.name.is_empty() {
            out.extend_from_slice(self.name);
            out.push(b'/');
        }
    }

    /// Allocating convenience for cold paths and assertions.
    pub fn format_path(&self, name: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_path(name, &mut out);
        out
    }
}
