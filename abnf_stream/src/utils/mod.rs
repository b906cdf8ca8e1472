//! Shared source-location types used by the scanner, driver and logging

pub mod span;

pub use span::{line_of, Position, Span, Spanned};
