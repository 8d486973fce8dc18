//! Addressing scheme value object.
//!
//! An [`AddressingScheme`] fixes how many pointers fit in one indirect block
//! and derives from it the size and starting block of every level. It is
//! the pure arithmetic half of the translator: no state, every method is a
//! function of its arguments.

use core::fmt;

use crate::{
    error::{PathError, Result},
    path::{BlockPath, IndirectionLevel, PATH_SLOTS},
    walk::PathWalk,
    BlockPointersPath,
};

/// Number of direct block pointers in an inode.
pub const DIRECT_COUNT: u32 = 12;

/// `i_block` slot of the single-indirect table pointer.
pub const SINGLE_INDIRECT_INDEX: u32 = DIRECT_COUNT;

/// `i_block` slot of the double-indirect table pointer.
pub const DOUBLE_INDIRECT_INDEX: u32 = DIRECT_COUNT + 1;

/// `i_block` slot of the triple-indirect table pointer.
pub const TRIPLE_INDIRECT_INDEX: u32 = DIRECT_COUNT + 2;

/// Width of an on-disk block pointer in ext2/3.
pub const EXT2_POINTER_SIZE: u32 = 4;

/// Capacity and layout of a direct + single/double/triple indirect scheme.
///
/// Logical blocks are laid out level after level:
///
/// ```text
/// | direct (12) | single (P) | double (P^2) | triple (P^3) |
/// 0             12           12+P           12+P+P^2       capacity
/// ```
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressingScheme {
    pointers_per_block: u32,
    double_count: u64,
    triple_count: u64,
    double_base: u64,
    triple_base: u64,
    capacity: u64,
}

impl AddressingScheme {
    /// Create a scheme with `pointers_per_block` pointers per indirect block.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidScheme`] if `pointers_per_block` is zero or
    /// the resulting capacity does not fit in a `u64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockpath::AddressingScheme;
    ///
    /// let scheme = AddressingScheme::new(4).unwrap();
    /// assert_eq!(scheme.capacity(), 12 + 4 + 16 + 64);
    /// ```
    pub const fn new(pointers_per_block: u32) -> Result<Self> {
        let invalid = PathError::InvalidScheme { pointers_per_block };
        if pointers_per_block == 0 {
            return Err(invalid);
        }

        let single_count = pointers_per_block as u64;
        let double_count = match single_count.checked_mul(single_count) {
            Some(count) => count,
            None => return Err(invalid),
        };
        let triple_count = match double_count.checked_mul(single_count) {
            Some(count) => count,
            None => return Err(invalid),
        };

        let double_base = DIRECT_COUNT as u64 + single_count;
        let triple_base = double_base + double_count;
        let capacity = match triple_base.checked_add(triple_count) {
            Some(capacity) => capacity,
            None => return Err(invalid),
        };

        Ok(Self {
            pointers_per_block,
            double_count,
            triple_count,
            double_base,
            triple_base,
            capacity,
        })
    }

    /// Create a scheme from the block size and the width of one pointer.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidBlockSize`] if either size is zero or the
    /// block does not hold a whole number of pointers.
    pub const fn from_block_size(block_size: u32, pointer_size: u32) -> Result<Self> {
        if block_size == 0 || pointer_size == 0 || block_size % pointer_size != 0 {
            return Err(PathError::InvalidBlockSize {
                block_size,
                pointer_size,
            });
        }
        Self::new(block_size / pointer_size)
    }

    /// Create the ext2/3 scheme for `block_size` (4-byte block pointers).
    ///
    /// # Examples
    ///
    /// ```
    /// use blockpath::AddressingScheme;
    ///
    /// let scheme = AddressingScheme::ext2(1024).unwrap();
    /// assert_eq!(scheme.pointers_per_block(), 256);
    /// ```
    pub const fn ext2(block_size: u32) -> Result<Self> {
        Self::from_block_size(block_size, EXT2_POINTER_SIZE)
    }

    /// Pointers held by one indirect block (P).
    #[inline]
    pub const fn pointers_per_block(&self) -> u32 {
        self.pointers_per_block
    }

    /// Blocks reachable through the single-indirect table (P).
    #[inline]
    pub const fn single_indirect_count(&self) -> u64 {
        self.pointers_per_block as u64
    }

    /// Blocks reachable through the double-indirect table (P²).
    #[inline]
    pub const fn double_indirect_count(&self) -> u64 {
        self.double_count
    }

    /// Blocks reachable through the triple-indirect table (P³).
    #[inline]
    pub const fn triple_indirect_count(&self) -> u64 {
        self.triple_count
    }

    /// First logical block behind the single-indirect table.
    #[inline]
    pub const fn single_indirect_base(&self) -> u64 {
        DIRECT_COUNT as u64
    }

    /// First logical block behind the double-indirect table.
    #[inline]
    pub const fn double_indirect_base(&self) -> u64 {
        self.double_base
    }

    /// First logical block behind the triple-indirect table.
    #[inline]
    pub const fn triple_indirect_base(&self) -> u64 {
        self.triple_base
    }

    /// Total number of addressable logical blocks.
    #[inline]
    pub const fn capacity(&self) -> u64 {
        self.capacity
    }

    /// The highest addressable logical block.
    #[inline]
    pub const fn last_block(&self) -> u64 {
        self.capacity - 1
    }

    /// Check whether `block` is addressable.
    #[inline]
    pub const fn contains(&self, block: u64) -> bool {
        block < self.capacity
    }

    /// Number of blocks addressed through `level`.
    pub const fn level_count(&self, level: IndirectionLevel) -> u64 {
        match level {
            IndirectionLevel::Direct => DIRECT_COUNT as u64,
            IndirectionLevel::SingleIndirect => self.single_indirect_count(),
            IndirectionLevel::DoubleIndirect => self.double_count,
            IndirectionLevel::TripleIndirect => self.triple_count,
        }
    }

    /// First logical block addressed through `level`.
    pub const fn level_base(&self, level: IndirectionLevel) -> u64 {
        match level {
            IndirectionLevel::Direct => 0,
            IndirectionLevel::SingleIndirect => self.single_indirect_base(),
            IndirectionLevel::DoubleIndirect => self.double_base,
            IndirectionLevel::TripleIndirect => self.triple_base,
        }
    }

    /// Exclusive upper bound of the index in `slot` for a path at `level`.
    const fn slot_bound(&self, level: IndirectionLevel, slot: usize) -> u32 {
        if slot == 0 && level.is_direct() {
            DIRECT_COUNT
        } else {
            self.pointers_per_block
        }
    }

    /// Translate a logical block into its pointer path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::BlockOutOfRange`] if `block` is not addressable.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockpath::{AddressingScheme, BlockPath};
    ///
    /// let scheme = AddressingScheme::new(4).unwrap();
    /// assert_eq!(scheme.path_of(11).unwrap(), BlockPath::Direct(11));
    /// assert_eq!(scheme.path_of(12).unwrap(), BlockPath::Single(0));
    /// assert_eq!(scheme.path_of(21).unwrap(), BlockPath::Double(1, 1));
    /// ```
    pub const fn path_of(&self, block: u64) -> Result<BlockPath> {
        let per_block = self.pointers_per_block as u64;

        if block < DIRECT_COUNT as u64 {
            return Ok(BlockPath::Direct(block as u32));
        }
        let rem = block - DIRECT_COUNT as u64;

        if rem < per_block {
            return Ok(BlockPath::Single(rem as u32));
        }
        let rem = rem - per_block;

        if rem < self.double_count {
            return Ok(BlockPath::Double(
                (rem / per_block) as u32,
                (rem % per_block) as u32,
            ));
        }
        let rem = rem - self.double_count;

        if rem < self.triple_count {
            let i1 = rem / self.double_count;
            let rem = rem % self.double_count;
            return Ok(BlockPath::Triple(
                i1 as u32,
                (rem / per_block) as u32,
                (rem % per_block) as u32,
            ));
        }

        Err(PathError::BlockOutOfRange {
            block,
            capacity: self.capacity,
        })
    }

    /// Check that every index of `path` fits in the table it indexes.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfBounds`] for the first offending slot.
    pub const fn validate(&self, path: &BlockPath) -> Result<()> {
        let level = path.level();
        let (slots, depth) = path.to_raw();
        let first = if level.is_direct() { 0 } else { 1 };

        let mut slot = first;
        while slot <= depth {
            let bound = self.slot_bound(level, slot);
            if slots[slot] >= bound {
                return Err(PathError::IndexOutOfBounds {
                    level,
                    slot: slot as u8,
                    index: slots[slot],
                    bound,
                });
            }
            slot += 1;
        }
        Ok(())
    }

    /// Translate a pointer path back into its logical block.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfBounds`] if `path` does not belong to
    /// this scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockpath::{AddressingScheme, BlockPath};
    ///
    /// let scheme = AddressingScheme::new(4).unwrap();
    /// assert_eq!(scheme.block_of(&BlockPath::Triple(0, 0, 0)).unwrap(), 32);
    /// assert!(scheme.block_of(&BlockPath::Single(4)).is_err());
    /// ```
    pub const fn block_of(&self, path: &BlockPath) -> Result<u64> {
        if let Err(err) = self.validate(path) {
            return Err(err);
        }
        Ok(self.block_of_unchecked(path))
    }

    /// [`block_of`](Self::block_of) for paths already known to be valid.
    pub(crate) const fn block_of_unchecked(&self, path: &BlockPath) -> u64 {
        let per_block = self.pointers_per_block as u64;
        match *path {
            BlockPath::Direct(i0) => i0 as u64,
            BlockPath::Single(i1) => self.single_indirect_base() + i1 as u64,
            BlockPath::Double(i1, i2) => self.double_base + i1 as u64 * per_block + i2 as u64,
            BlockPath::Triple(i1, i2, i3) => {
                self.triple_base
                    + i1 as u64 * self.double_count
                    + i2 as u64 * per_block
                    + i3 as u64
            }
        }
    }

    /// The path of the block following `path`.
    ///
    /// Increments the innermost index and carries outward like a
    /// mixed-radix counter. A carry into slot 0 of an indirect path moves
    /// to the next level's selector and opens a new innermost index at 0.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfBounds`] if `path` does not belong to
    /// this scheme, or [`PathError::AddressSpaceExhausted`] if `path` is the
    /// last addressable block.
    pub const fn successor(&self, path: &BlockPath) -> Result<BlockPath> {
        if let Err(err) = self.validate(path) {
            return Err(err);
        }

        let (mut slots, mut depth) = path.to_raw();
        let mut index = depth;
        loop {
            slots[index] += 1;

            if index == 0 {
                if slots[0] > TRIPLE_INDIRECT_INDEX {
                    return Err(PathError::AddressSpaceExhausted {
                        capacity: self.capacity,
                    });
                }
                if slots[0] >= SINGLE_INDIRECT_INDEX {
                    depth += 1;
                    slots[depth] = 0;
                }
                break;
            }

            if slots[index] < self.pointers_per_block {
                break;
            }
            slots[index] = 0;
            index -= 1;
        }

        debug_assert!(depth < PATH_SLOTS);
        Ok(BlockPath::from_raw(slots, depth))
    }

    /// Blocks left in the pointer table that holds `path`'s data pointer,
    /// counting `path` itself.
    ///
    /// A reader can resolve that many consecutive blocks from one table
    /// before it has to load another.
    pub const fn blocks_until_table_change(&self, path: &BlockPath) -> u64 {
        let bound = match path {
            BlockPath::Direct(_) => DIRECT_COUNT,
            _ => self.pointers_per_block,
        };
        bound.saturating_sub(path.innermost_index()) as u64
    }

    /// Iterate over `(block, path)` pairs from `block` to the last
    /// addressable block.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::BlockOutOfRange`] if `block` is not addressable.
    pub fn walk_from(&self, block: u64) -> Result<PathWalk> {
        BlockPointersPath::at(*self, block).map(BlockPointersPath::walk)
    }
}

impl fmt::Display for AddressingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scheme(P={}, capacity={})",
            self.pointers_per_block, self.capacity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme4() -> AddressingScheme {
        AddressingScheme::new(4).unwrap()
    }

    #[test]
    fn test_scheme_layout() {
        let scheme = scheme4();
        assert_eq!(scheme.pointers_per_block(), 4);
        assert_eq!(scheme.single_indirect_count(), 4);
        assert_eq!(scheme.double_indirect_count(), 16);
        assert_eq!(scheme.triple_indirect_count(), 64);
        assert_eq!(scheme.single_indirect_base(), 12);
        assert_eq!(scheme.double_indirect_base(), 16);
        assert_eq!(scheme.triple_indirect_base(), 32);
        assert_eq!(scheme.capacity(), 96);
        assert_eq!(scheme.last_block(), 95);
    }

    #[test]
    fn test_zero_pointers_rejected() {
        let err = AddressingScheme::new(0).unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidScheme {
                pointers_per_block: 0
            }
        );
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_capacity_overflow_rejected() {
        assert!(AddressingScheme::new(u32::MAX).is_err());
        // 2^21 cubed is 2^63, still representable
        assert!(AddressingScheme::new(1 << 21).is_ok());
    }

    #[test]
    fn test_ext2_block_sizes() {
        assert_eq!(AddressingScheme::ext2(1024).unwrap().pointers_per_block(), 256);
        assert_eq!(AddressingScheme::ext2(4096).unwrap().pointers_per_block(), 1024);

        let scheme = AddressingScheme::ext2(1024).unwrap();
        assert_eq!(scheme.capacity(), 12 + 256 + 65_536 + 16_777_216);
    }

    #[test]
    fn test_invalid_block_size() {
        assert_eq!(
            AddressingScheme::from_block_size(1022, 4),
            Err(PathError::InvalidBlockSize {
                block_size: 1022,
                pointer_size: 4
            })
        );
        assert!(AddressingScheme::from_block_size(1024, 0).is_err());
        assert!(AddressingScheme::from_block_size(0, 4).is_err());
    }

    #[test]
    fn test_path_of_level_boundaries() {
        let scheme = scheme4();
        assert_eq!(scheme.path_of(0).unwrap(), BlockPath::Direct(0));
        assert_eq!(scheme.path_of(11).unwrap(), BlockPath::Direct(11));
        assert_eq!(scheme.path_of(12).unwrap(), BlockPath::Single(0));
        assert_eq!(scheme.path_of(15).unwrap(), BlockPath::Single(3));
        assert_eq!(scheme.path_of(16).unwrap(), BlockPath::Double(0, 0));
        assert_eq!(scheme.path_of(19).unwrap(), BlockPath::Double(0, 3));
        assert_eq!(scheme.path_of(20).unwrap(), BlockPath::Double(1, 0));
        assert_eq!(scheme.path_of(31).unwrap(), BlockPath::Double(3, 3));
        assert_eq!(scheme.path_of(32).unwrap(), BlockPath::Triple(0, 0, 0));
        assert_eq!(scheme.path_of(49).unwrap(), BlockPath::Triple(1, 0, 1));
        assert_eq!(scheme.path_of(95).unwrap(), BlockPath::Triple(3, 3, 3));
    }

    #[test]
    fn test_path_of_out_of_range() {
        let err = scheme4().path_of(96).unwrap_err();
        assert_eq!(
            err,
            PathError::BlockOutOfRange {
                block: 96,
                capacity: 96
            }
        );
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_block_of_inverts_path_of() {
        let scheme = AddressingScheme::new(5).unwrap();
        for block in 0..scheme.capacity() {
            let path = scheme.path_of(block).unwrap();
            assert_eq!(scheme.block_of(&path).unwrap(), block);
        }
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let scheme = scheme4();
        assert_eq!(
            scheme.validate(&BlockPath::Direct(12)),
            Err(PathError::IndexOutOfBounds {
                level: IndirectionLevel::Direct,
                slot: 0,
                index: 12,
                bound: 12
            })
        );
        assert_eq!(
            scheme.validate(&BlockPath::Triple(0, 4, 0)),
            Err(PathError::IndexOutOfBounds {
                level: IndirectionLevel::TripleIndirect,
                slot: 2,
                index: 4,
                bound: 4
            })
        );
        assert!(scheme.validate(&BlockPath::Double(3, 3)).is_ok());
    }

    #[test]
    fn test_successor_carries() {
        let scheme = scheme4();
        assert_eq!(
            scheme.successor(&BlockPath::Direct(11)).unwrap(),
            BlockPath::Single(0)
        );
        assert_eq!(
            scheme.successor(&BlockPath::Single(3)).unwrap(),
            BlockPath::Double(0, 0)
        );
        assert_eq!(
            scheme.successor(&BlockPath::Double(0, 3)).unwrap(),
            BlockPath::Double(1, 0)
        );
        assert_eq!(
            scheme.successor(&BlockPath::Double(3, 3)).unwrap(),
            BlockPath::Triple(0, 0, 0)
        );
        assert_eq!(
            scheme.successor(&BlockPath::Triple(0, 3, 3)).unwrap(),
            BlockPath::Triple(1, 0, 0)
        );
    }

    #[test]
    fn test_successor_of_last_block() {
        let scheme = scheme4();
        assert_eq!(
            scheme.successor(&BlockPath::Triple(3, 3, 3)),
            Err(PathError::AddressSpaceExhausted { capacity: 96 })
        );
    }

    #[test]
    fn test_successor_single_pointer_scheme() {
        let scheme = AddressingScheme::new(1).unwrap();
        assert_eq!(scheme.capacity(), 15);
        assert_eq!(
            scheme.successor(&BlockPath::Single(0)).unwrap(),
            BlockPath::Double(0, 0)
        );
        assert_eq!(
            scheme.successor(&BlockPath::Double(0, 0)).unwrap(),
            BlockPath::Triple(0, 0, 0)
        );
        assert!(scheme.successor(&BlockPath::Triple(0, 0, 0)).is_err());
    }

    #[test]
    fn test_blocks_until_table_change() {
        let scheme = scheme4();
        assert_eq!(scheme.blocks_until_table_change(&BlockPath::Direct(0)), 12);
        assert_eq!(scheme.blocks_until_table_change(&BlockPath::Direct(11)), 1);
        assert_eq!(scheme.blocks_until_table_change(&BlockPath::Single(1)), 3);
        assert_eq!(scheme.blocks_until_table_change(&BlockPath::Double(2, 0)), 4);
        assert_eq!(
            scheme.blocks_until_table_change(&BlockPath::Triple(1, 1, 3)),
            1
        );
    }

    #[test]
    fn test_level_count_and_base() {
        let scheme = scheme4();
        let mut expected_base = 0;
        for level in IndirectionLevel::ALL {
            assert_eq!(scheme.level_base(level), expected_base);
            expected_base += scheme.level_count(level);
        }
        assert_eq!(expected_base, scheme.capacity());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", scheme4()), "Scheme(P=4, capacity=96)");
    }
}
