//! # vernis_croquis
//!
//! Croquis - The program model for Vernis.
//!
//! ## Name Origin
//!
//! **Croquis** (/kʁɔ.ki/) is a French term for a quick, sketchy drawing that captures
//! the essential features of a subject. `vernis_croquis` does not type-check
//! TypeScript; it sketches just enough meaning (scopes, symbols, imports and
//! exports) to answer "which declaration does this heritage clause name?".
//!
//! ## Purpose
//!
//! - **Parsing**: TypeScript/TSX sources through oxc
//! - **Binding**: program-wide symbol table with declaration merging
//! - **Resolution**: aliases, module specifiers, `export =`, UMD globals
//! - **Loading**: breadth-first project loading from disk
//!
//! ## Architecture
//!
//! ```text
//! ProjectLoader / ProgramBuilder (Parse)
//!        ↓
//!      Binder (SymbolTable)
//!        ↓
//!      Program (Resolution)  ← queried by vernis_patina
//! ```

// Core modules
mod scope;
mod symbol;
mod table;

// Building
mod binder;
mod builder;
mod error;
mod loader;
mod program;
mod source;

pub mod modules;

// Re-export core types
pub use scope::*;
pub use symbol::*;
pub use table::{SymbolTable, GLOBAL_SCOPE};

pub use builder::ProgramBuilder;
pub use error::LoadError;
pub use loader::{LoadOptions, ProjectLoader};
pub use program::Program;
pub use source::SourceUnit;
