//! Pointer paths through the inode block table.
//!
//! A [`BlockPath`] names the entries to follow from the inode's `i_block`
//! array down to a data block. Each variant carries only the indices its
//! level needs, so "which level" is the variant itself rather than a magic
//! value in the first slot.

use core::fmt;

use crate::scheme::{
    DOUBLE_INDIRECT_INDEX, SINGLE_INDIRECT_INDEX, TRIPLE_INDIRECT_INDEX,
};

/// Number of slots in the flat path view (level selector plus three indices).
pub const PATH_SLOTS: usize = 4;

/// How many pointer tables sit between the inode and the data block.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndirectionLevel {
    /// The inode points at the data block.
    Direct,
    /// One indirect table.
    SingleIndirect,
    /// Two nested indirect tables.
    DoubleIndirect,
    /// Three nested indirect tables.
    TripleIndirect,
}

impl IndirectionLevel {
    /// All levels, shallowest first.
    pub const ALL: [IndirectionLevel; 4] = [
        IndirectionLevel::Direct,
        IndirectionLevel::SingleIndirect,
        IndirectionLevel::DoubleIndirect,
        IndirectionLevel::TripleIndirect,
    ];

    /// Number of indirect tables on the way to the data block (0..=3).
    #[inline]
    pub const fn depth(self) -> u8 {
        match self {
            Self::Direct => 0,
            Self::SingleIndirect => 1,
            Self::DoubleIndirect => 2,
            Self::TripleIndirect => 3,
        }
    }

    /// Level with the given depth, or `None` past triple indirection.
    #[inline]
    pub const fn from_depth(depth: u8) -> Option<Self> {
        match depth {
            0 => Some(Self::Direct),
            1 => Some(Self::SingleIndirect),
            2 => Some(Self::DoubleIndirect),
            3 => Some(Self::TripleIndirect),
            _ => None,
        }
    }

    /// The `i_block` slot holding this level's top table pointer.
    ///
    /// `None` for [`Direct`](Self::Direct), whose slot is the block index itself.
    #[inline]
    pub const fn selector(self) -> Option<u32> {
        match self {
            Self::Direct => None,
            Self::SingleIndirect => Some(SINGLE_INDIRECT_INDEX),
            Self::DoubleIndirect => Some(DOUBLE_INDIRECT_INDEX),
            Self::TripleIndirect => Some(TRIPLE_INDIRECT_INDEX),
        }
    }

    /// Snake-case name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::SingleIndirect => "single_indirect",
            Self::DoubleIndirect => "double_indirect",
            Self::TripleIndirect => "triple_indirect",
        }
    }

    /// Check if this is the direct level.
    #[inline]
    pub const fn is_direct(self) -> bool {
        matches!(self, Self::Direct)
    }

    /// Check if this is the single-indirect level.
    #[inline]
    pub const fn is_single_indirect(self) -> bool {
        matches!(self, Self::SingleIndirect)
    }

    /// Check if this is the double-indirect level.
    #[inline]
    pub const fn is_double_indirect(self) -> bool {
        matches!(self, Self::DoubleIndirect)
    }

    /// Check if this is the triple-indirect level.
    #[inline]
    pub const fn is_triple_indirect(self) -> bool {
        matches!(self, Self::TripleIndirect)
    }
}

impl fmt::Display for IndirectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indices to follow from the inode down to one data block.
///
/// Derived ordering matches logical block order: every direct path sorts
/// before every single-indirect path, and so on, with indices compared
/// outermost first.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockPath {
    /// Index into the inode's direct pointers.
    Direct(u32),
    /// Index into the single-indirect table.
    Single(u32),
    /// Index into the double-indirect table, then into the table it points at.
    Double(u32, u32),
    /// Indices through all three tables, outermost first.
    Triple(u32, u32, u32),
}

impl BlockPath {
    /// The level this path resolves through.
    #[inline]
    pub const fn level(&self) -> IndirectionLevel {
        match self {
            Self::Direct(_) => IndirectionLevel::Direct,
            Self::Single(_) => IndirectionLevel::SingleIndirect,
            Self::Double(..) => IndirectionLevel::DoubleIndirect,
            Self::Triple(..) => IndirectionLevel::TripleIndirect,
        }
    }

    /// Number of active indirect indices (0 for a direct path).
    #[inline]
    pub const fn path_index(&self) -> u8 {
        self.level().depth()
    }

    /// Slot of the inode's `i_block` array this path starts from.
    ///
    /// For a direct path this is the direct block index; otherwise it is
    /// the slot holding the top indirect table (12, 13 or 14).
    #[inline]
    pub const fn direct_index(&self) -> u32 {
        match self {
            Self::Direct(index) => *index,
            Self::Single(_) => SINGLE_INDIRECT_INDEX,
            Self::Double(..) => DOUBLE_INDIRECT_INDEX,
            Self::Triple(..) => TRIPLE_INDIRECT_INDEX,
        }
    }

    /// Index into the first indirect table, if any.
    #[inline]
    pub const fn single_indirect_index(&self) -> Option<u32> {
        match self {
            Self::Direct(_) => None,
            Self::Single(i1) | Self::Double(i1, _) | Self::Triple(i1, _, _) => Some(*i1),
        }
    }

    /// Index into the second indirect table, if any.
    #[inline]
    pub const fn double_indirect_index(&self) -> Option<u32> {
        match self {
            Self::Direct(_) | Self::Single(_) => None,
            Self::Double(_, i2) | Self::Triple(_, i2, _) => Some(*i2),
        }
    }

    /// Index into the third indirect table, if any.
    #[inline]
    pub const fn triple_indirect_index(&self) -> Option<u32> {
        match self {
            Self::Triple(_, _, i3) => Some(*i3),
            _ => None,
        }
    }

    /// Index within the table that holds the data block pointer.
    #[inline]
    pub const fn innermost_index(&self) -> u32 {
        match self {
            Self::Direct(index)
            | Self::Single(index)
            | Self::Double(_, index)
            | Self::Triple(_, _, index) => *index,
        }
    }

    /// Flat view: level selector (or direct index) followed by the indices.
    ///
    /// Unused trailing slots are `None`.
    pub const fn slots(&self) -> [Option<u32>; PATH_SLOTS] {
        [
            Some(self.direct_index()),
            self.single_indirect_index(),
            self.double_indirect_index(),
            self.triple_indirect_index(),
        ]
    }

    /// Check if this is a direct path.
    #[inline]
    pub const fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }

    /// Check if this is a single-indirect path.
    #[inline]
    pub const fn is_single_indirect(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Check if this is a double-indirect path.
    #[inline]
    pub const fn is_double_indirect(&self) -> bool {
        matches!(self, Self::Double(..))
    }

    /// Check if this is a triple-indirect path.
    #[inline]
    pub const fn is_triple_indirect(&self) -> bool {
        matches!(self, Self::Triple(..))
    }

    /// Flat slots with unused entries zeroed, plus the active depth.
    pub(crate) const fn to_raw(self) -> ([u32; PATH_SLOTS], usize) {
        match self {
            Self::Direct(i0) => ([i0, 0, 0, 0], 0),
            Self::Single(i1) => ([SINGLE_INDIRECT_INDEX, i1, 0, 0], 1),
            Self::Double(i1, i2) => ([DOUBLE_INDIRECT_INDEX, i1, i2, 0], 2),
            Self::Triple(i1, i2, i3) => ([TRIPLE_INDIRECT_INDEX, i1, i2, i3], 3),
        }
    }

    /// Inverse of [`to_raw`](Self::to_raw); slots past `depth` are ignored.
    pub(crate) const fn from_raw(slots: [u32; PATH_SLOTS], depth: usize) -> Self {
        match depth {
            0 => Self::Direct(slots[0]),
            1 => Self::Single(slots[1]),
            2 => Self::Double(slots[1], slots[2]),
            _ => Self::Triple(slots[1], slots[2], slots[3]),
        }
    }
}

impl Default for BlockPath {
    fn default() -> Self {
        Self::Direct(0)
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(i0) => write!(f, "Direct({})", i0),
            Self::Single(i1) => write!(f, "Single({})", i1),
            Self::Double(i1, i2) => write!(f, "Double({}, {})", i1, i2),
            Self::Triple(i1, i2, i3) => write!(f, "Triple({}, {}, {})", i1, i2, i3),
        }
    }
}
