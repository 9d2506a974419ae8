//! Carton - The artist's toolbox for Vernis.
//!
//! This crate provides the small shared utilities every Vernis crate reaches
//! for, much like a carton (artist's portfolio case) holds the essential tools
//! an artist carries from one canvas to the next.
//!
//! # Modules
//!
//! - **line_index**: Byte offset to line/column conversion for diagnostics
//! - **path**: Lexical path normalization used as file identity
//!
//! # Example
//!
//! ```
//! use vernis_carton::LineIndex;
//!
//! let index = LineIndex::new("class A {}\nclass B {}");
//! assert_eq!(index.line_col(11), (1, 0));
//! ```

pub mod line_index;
pub mod path;

pub use line_index::LineIndex;
pub use path::{normalize_path, to_slash};

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export bitflags for flag types
pub use bitflags::bitflags;

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};
