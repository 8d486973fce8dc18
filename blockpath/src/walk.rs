//! Sequential traversal of the address space.

use core::iter::FusedIterator;

use crate::{path::BlockPath, translator::BlockPointersPath};

/// Iterator over consecutive `(block, path)` pairs.
///
/// Starts at the block of the [`BlockPointersPath`] it was created from and
/// advances with [`succ`](BlockPointersPath::succ) until the last
/// addressable block has been yielded.
///
/// # Examples
///
/// ```
/// use blockpath::{AddressingScheme, BlockPath};
///
/// let scheme = AddressingScheme::new(4).unwrap();
/// let mut walk = scheme.walk_from(14).unwrap();
/// assert_eq!(walk.next(), Some((14, BlockPath::Single(2))));
/// assert_eq!(walk.next(), Some((15, BlockPath::Single(3))));
/// assert_eq!(walk.next(), Some((16, BlockPath::Double(0, 0))));
/// ```
#[derive(Debug, Clone)]
pub struct PathWalk {
    cursor: BlockPointersPath,
    done: bool,
}

impl PathWalk {
    pub(crate) const fn new(cursor: BlockPointersPath) -> Self {
        Self {
            cursor,
            done: false,
        }
    }

    /// Blocks not yet yielded.
    pub const fn remaining(&self) -> u64 {
        if self.done {
            0
        } else {
            self.cursor.scheme().capacity() - self.cursor.block()
        }
    }
}

impl Iterator for PathWalk {
    type Item = (u64, BlockPath);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = (self.cursor.block(), self.cursor.path());
        if self.cursor.succ().is_err() {
            self.done = true;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for PathWalk {}

#[cfg(test)]
mod tests {
    use crate::AddressingScheme;

    #[test]
    fn test_walk_covers_address_space() {
        let scheme = AddressingScheme::new(3).unwrap();
        let walk = scheme.walk_from(0).unwrap();
        assert_eq!(walk.remaining(), scheme.capacity());

        let mut expected = 0;
        for (block, path) in walk {
            assert_eq!(block, expected);
            assert_eq!(scheme.block_of(&path).unwrap(), block);
            expected += 1;
        }
        assert_eq!(expected, scheme.capacity());
    }

    #[test]
    fn test_walk_from_last_block() {
        let scheme = AddressingScheme::new(2).unwrap();
        let mut walk = scheme.walk_from(scheme.last_block()).unwrap();
        assert_eq!(walk.size_hint(), (1, Some(1)));
        assert!(walk.next().is_some());
        assert_eq!(walk.next(), None);
        assert_eq!(walk.next(), None);
        assert_eq!(walk.remaining(), 0);
    }

    #[test]
    fn test_walk_from_out_of_range() {
        let scheme = AddressingScheme::new(2).unwrap();
        assert!(scheme.walk_from(scheme.capacity()).is_err());
    }
}
