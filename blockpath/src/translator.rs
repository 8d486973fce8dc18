//! The stateful block pointer path.
//!
//! [`BlockPointersPath`] pairs a logical block number with its pointer path
//! and keeps the two in step. Jumps re-derive the path from scratch;
//! [`succ`](BlockPointersPath::succ) advances it incrementally. Every
//! mutation is computed on a copy first and committed only on success.

use core::fmt;

use crate::{
    error::{PathError, Result},
    path::{BlockPath, IndirectionLevel, PATH_SLOTS},
    scheme::AddressingScheme,
    walk::PathWalk,
};

/// A logical block number together with the pointer path that reaches it.
///
/// # Examples
///
/// ```
/// use blockpath::{AddressingScheme, BlockPath, BlockPointersPath};
///
/// let scheme = AddressingScheme::new(4).unwrap();
/// let mut cursor = BlockPointersPath::with_block(scheme, 15).unwrap();
/// assert!(cursor.is_single_indirect());
///
/// cursor.succ().unwrap();
/// assert_eq!(cursor.block(), 16);
/// assert_eq!(cursor.path(), BlockPath::Double(0, 0));
/// ```
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPointersPath {
    scheme: AddressingScheme,
    block: u64,
    path: BlockPath,
}

impl BlockPointersPath {
    /// Create a path positioned at block 0.
    pub const fn new(scheme: AddressingScheme) -> Self {
        Self {
            scheme,
            block: 0,
            path: BlockPath::Direct(0),
        }
    }

    /// Create a path positioned at `block`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NegativeBlock`] if `block` is negative, or
    /// [`PathError::BlockOutOfRange`] if it is beyond the scheme's capacity.
    pub fn with_block(scheme: AddressingScheme, block: i64) -> Result<Self> {
        let mut this = Self::new(scheme);
        this.set_block(block)?;
        Ok(this)
    }

    /// Create a path positioned at the unsigned `block`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::BlockOutOfRange`] if `block` is beyond the
    /// scheme's capacity.
    pub fn at(scheme: AddressingScheme, block: u64) -> Result<Self> {
        let mut this = Self::new(scheme);
        this.seek(block)?;
        Ok(this)
    }

    /// The scheme this path is computed in.
    #[inline]
    pub const fn scheme(&self) -> AddressingScheme {
        self.scheme
    }

    /// The current logical block number.
    #[inline]
    pub const fn block(&self) -> u64 {
        self.block
    }

    /// The current pointer path.
    #[inline]
    pub const fn path(&self) -> BlockPath {
        self.path
    }

    /// Jump to `block`, re-deriving the path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NegativeBlock`] if `block` is negative, or
    /// [`PathError::BlockOutOfRange`] if it is beyond the scheme's capacity.
    /// The current position is kept on error.
    pub fn set_block(&mut self, block: i64) -> Result<()> {
        let block = u64::try_from(block).map_err(|_| PathError::NegativeBlock { block })?;
        self.seek(block)
    }

    /// Jump to the unsigned `block`, re-deriving the path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::BlockOutOfRange`] if `block` is beyond the
    /// scheme's capacity. The current position is kept on error.
    pub fn seek(&mut self, block: u64) -> Result<()> {
        let path = self.scheme.path_of(block)?;
        trace!("block {} resolves to {}", block, path);
        self.block = block;
        self.path = path;
        Ok(())
    }

    /// Jump to the block addressed by `path` and return its number.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfBounds`] if an index of `path` does not
    /// fit in its table. The current position is kept on error.
    pub fn set_path(&mut self, path: BlockPath) -> Result<u64> {
        let block = self.scheme.block_of(&path)?;
        trace!("path {} resolves to block {}", path, block);
        self.block = block;
        self.path = path;
        Ok(block)
    }

    /// Advance to the next logical block.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::AddressSpaceExhausted`] when already at the last
    /// addressable block; the position is left unchanged.
    pub fn succ(&mut self) -> Result<()> {
        let next = self.scheme.successor(&self.path)?;
        if next.level() != self.path.level() {
            debug!(
                "block {} moves from {} to {}",
                self.block + 1,
                self.path.level(),
                next.level()
            );
        }
        self.block += 1;
        self.path = next;
        Ok(())
    }

    /// Recompute the block number from the current path.
    ///
    /// Always equal to [`block`](Self::block).
    #[inline]
    pub const fn path_to_block(&self) -> u64 {
        self.scheme.block_of_unchecked(&self.path)
    }

    /// Slot 0 of the path: the direct index, or the indirect level selector.
    #[inline]
    pub const fn direct_index(&self) -> u32 {
        self.path.direct_index()
    }

    /// Index into the first indirect table, if any.
    #[inline]
    pub const fn single_indirect_index(&self) -> Option<u32> {
        self.path.single_indirect_index()
    }

    /// Index into the second indirect table, if any.
    #[inline]
    pub const fn double_indirect_index(&self) -> Option<u32> {
        self.path.double_indirect_index()
    }

    /// Index into the third indirect table, if any.
    #[inline]
    pub const fn triple_indirect_index(&self) -> Option<u32> {
        self.path.triple_indirect_index()
    }

    /// The indirection level of the current block.
    #[inline]
    pub const fn index_type(&self) -> IndirectionLevel {
        self.path.level()
    }

    /// Number of active indirect indices (0 when direct).
    #[inline]
    pub const fn path_index(&self) -> u8 {
        self.path.path_index()
    }

    /// Check if the current block is direct.
    #[inline]
    pub const fn is_direct(&self) -> bool {
        self.path.is_direct()
    }

    /// Check if the current block is single-indirect.
    #[inline]
    pub const fn is_single_indirect(&self) -> bool {
        self.path.is_single_indirect()
    }

    /// Check if the current block is double-indirect.
    #[inline]
    pub const fn is_double_indirect(&self) -> bool {
        self.path.is_double_indirect()
    }

    /// Check if the current block is triple-indirect.
    #[inline]
    pub const fn is_triple_indirect(&self) -> bool {
        self.path.is_triple_indirect()
    }

    /// Copy of the flat four-slot path.
    #[inline]
    pub const fn to_slots(&self) -> [Option<u32>; PATH_SLOTS] {
        self.path.slots()
    }

    /// Iterate from the current block to the end of the address space.
    pub fn walk(self) -> PathWalk {
        PathWalk::new(self)
    }
}

impl fmt::Display for BlockPointersPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({}) {}", self.block, self.path)
    }
}
