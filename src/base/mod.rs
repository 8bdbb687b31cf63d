//! Foundation types for the processor.
//!
//! This module provides the primitives every other layer builds on:
//! - [`FileId`] - Opaque compilation unit identifiers
//! - [`LineCol`], [`Span`] - Source positions for diagnostic anchors
//!
//! This module has NO dependencies on other crate modules.

mod file_id;
mod span;

pub use file_id::FileId;
pub use span::{LineCol, Span};
