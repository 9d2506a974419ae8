//! # Vernis
//!
//! Finds inline function and array props in React class component renders.
//!
//! This crate re-exports all Vernis sub-crates for unified documentation.
//!
//! ## Crates
//!
//! - [`carton`] - Shared utilities: line index, paths, collection re-exports
//! - [`croquis`] - Program model: parsing, binding, module resolution, loading
//! - [`patina`] - The inline props rule, diagnostics and output formats

/// Shared utilities.
pub use vernis_carton as carton;

/// Program model.
pub use vernis_croquis as croquis;

/// The inline props rule.
pub use vernis_patina as patina;
