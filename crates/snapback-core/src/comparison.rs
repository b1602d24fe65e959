//! Staleness detection between a source file and its mirror copy
//!
//! Files are compared by modification time only. Contents are never hashed.

mod timestamp;

pub use timestamp::{STALENESS_EPSILON, TimestampComparator};
