//! Errors returned by path translation.
//!
//! Every error is a caller or configuration mistake (an address the scheme
//! cannot express, or a scheme that cannot exist). Nothing here is retried;
//! operations that fail leave the translator untouched.

use core::fmt;

use crate::path::IndirectionLevel;

/// Broad classification of a [`PathError`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An argument can never be valid: negative block, zero pointers per
    /// block, or a path index past its table.
    InvalidArgument,
    /// A well-formed address lies beyond the scheme's capacity.
    OutOfRange,
}

/// Errors that can occur while translating between blocks and paths.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    /// A negative logical block number was supplied.
    NegativeBlock {
        /// The rejected block number.
        block: i64,
    },

    /// The scheme cannot be built from this many pointers per block.
    ///
    /// Either zero, or so large that the addressable capacity overflows `u64`.
    InvalidScheme {
        /// The rejected pointers-per-block value.
        pointers_per_block: u32,
    },

    /// A block size that does not hold a whole number of pointers.
    InvalidBlockSize {
        /// Block size in bytes.
        block_size: u32,
        /// Pointer width in bytes.
        pointer_size: u32,
    },

    /// A path index does not fit in the table it indexes.
    IndexOutOfBounds {
        /// Level of the offending path.
        level: IndirectionLevel,
        /// Slot of the offending index (0 is the inode's own table).
        slot: u8,
        /// The rejected index.
        index: u32,
        /// Exclusive upper bound for the slot.
        bound: u32,
    },

    /// The block lies beyond the last addressable block.
    BlockOutOfRange {
        /// The rejected block number.
        block: u64,
        /// Total number of addressable blocks.
        capacity: u64,
    },

    /// Advancing past the last addressable block.
    AddressSpaceExhausted {
        /// Total number of addressable blocks.
        capacity: u64,
    },
}

impl PathError {
    /// Returns the broad classification of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NegativeBlock { .. }
            | Self::InvalidScheme { .. }
            | Self::InvalidBlockSize { .. }
            | Self::IndexOutOfBounds { .. } => ErrorKind::InvalidArgument,
            Self::BlockOutOfRange { .. } | Self::AddressSpaceExhausted { .. } => {
                ErrorKind::OutOfRange
            }
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::InvalidArgument`.
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidArgument)
    }

    /// Shorthand for `self.kind() == ErrorKind::OutOfRange`.
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfRange)
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeBlock { block } => {
                write!(f, "Block must be greater than or equal to 0, got {}", block)
            }
            Self::InvalidScheme { pointers_per_block } => write!(
                f,
                "Cannot address blocks with {} pointers per block",
                pointers_per_block
            ),
            Self::InvalidBlockSize {
                block_size,
                pointer_size,
            } => write!(
                f,
                "Block size {} must be a non-zero multiple of pointer size {}",
                block_size, pointer_size
            ),
            Self::IndexOutOfBounds {
                level,
                slot,
                index,
                bound,
            } => write!(
                f,
                "Index {} in slot {} of {} path must be below {}",
                index, slot, level, bound
            ),
            Self::BlockOutOfRange { block, capacity } => write!(
                f,
                "Block {} outside valid range (capacity {} blocks)",
                block, capacity
            ),
            Self::AddressSpaceExhausted { capacity } => write!(
                f,
                "No block after the last addressable block (capacity {} blocks)",
                capacity
            ),
        }
    }
}

impl core::error::Error for PathError {}

#[cfg(feature = "std")]
impl From<PathError> for std::io::Error {
    fn from(value: PathError) -> Self {
        match value.kind() {
            ErrorKind::InvalidArgument => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, value)
            }
            ErrorKind::OutOfRange => std::io::Error::other(value),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            PathError::NegativeBlock { block: -1 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            PathError::InvalidScheme {
                pointers_per_block: 0
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert!(
            PathError::BlockOutOfRange {
                block: 96,
                capacity: 96
            }
            .is_out_of_range()
        );
        assert!(PathError::AddressSpaceExhausted { capacity: 96 }.is_out_of_range());
    }

    #[test]
    fn test_negative_block_display() {
        let msg = format!("{}", PathError::NegativeBlock { block: -7 });
        assert!(msg.contains("-7"));
        assert!(msg.contains("greater than or equal to 0"));
    }

    #[test]
    fn test_index_out_of_bounds_display() {
        let error = PathError::IndexOutOfBounds {
            level: IndirectionLevel::DoubleIndirect,
            slot: 2,
            index: 9,
            bound: 4,
        };
        let msg = format!("{}", error);
        assert!(msg.contains("double_indirect"));
        assert!(msg.contains("slot 2"));
        assert!(msg.contains("below 4"));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_io_error_conversion() {
        let err: std::io::Error = PathError::NegativeBlock { block: -1 }.into();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

        let err: std::io::Error = PathError::AddressSpaceExhausted { capacity: 96 }.into();
        assert_eq!(err.kind(), std::io::ErrorKind::Other);
    }
}
