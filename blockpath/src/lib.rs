//! Logical block to indirect pointer path translation.
//!
//! ext2/3-style inodes locate file data through twelve direct block pointers
//! followed by a single-, a double- and a triple-indirect pointer table. This
//! crate is the arithmetic between a logical block number and the pointer
//! table entries a reader has to follow to reach it:
//!
//! - [`AddressingScheme`]: pointers per indirect block and the capacities and
//!   base blocks derived from it; pure `block -> path` and `path -> block`.
//! - [`BlockPath`]: the indices to follow, one variant per level.
//! - [`BlockPointersPath`]: a block number kept in step with its path,
//!   advanced one block at a time with [`succ`](BlockPointersPath::succ).
//! - [`PathWalk`]: sequential iteration over the address space.
//!
//! Reading pointer tables from storage is up to the caller.
//!
//! # Quick Start
//!
//! ```
//! use blockpath::{AddressingScheme, BlockPointersPath, IndirectionLevel};
//!
//! // 1 KiB blocks, 4-byte pointers
//! let scheme = AddressingScheme::ext2(1024).unwrap();
//! let mut cursor = BlockPointersPath::with_block(scheme, 267).unwrap();
//! assert_eq!(cursor.index_type(), IndirectionLevel::SingleIndirect);
//! assert_eq!(cursor.single_indirect_index(), Some(255));
//!
//! cursor.succ().unwrap();
//! assert_eq!(cursor.index_type(), IndirectionLevel::DoubleIndirect);
//! assert_eq!(cursor.single_indirect_index(), Some(0));
//! assert_eq!(cursor.double_indirect_index(), Some(0));
//! ```
//!
//! # Features
//!
//! - `log` (default): log through the `log` crate
//! - `defmt`: log through `defmt` and derive `defmt::Format`
//! - `std`: convert [`PathError`] into `std::io::Error`

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![warn(missing_docs)]

#[macro_use]
mod log_macros;

pub mod error;
pub mod path;
pub mod scheme;
pub mod translator;
pub mod walk;

pub use error::{ErrorKind, PathError, Result};
pub use path::{BlockPath, IndirectionLevel, PATH_SLOTS};
pub use scheme::{
    AddressingScheme, DIRECT_COUNT, DOUBLE_INDIRECT_INDEX, EXT2_POINTER_SIZE,
    SINGLE_INDIRECT_INDEX, TRIPLE_INDIRECT_INDEX,
};
pub use translator::BlockPointersPath;
pub use walk::PathWalk;
