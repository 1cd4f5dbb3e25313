//! Shared primitives: viewport, error taxonomy, small math helpers.

/// Viewport and geometry vocabulary.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
