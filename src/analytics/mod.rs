//! Derived metrics, classification and aggregates over a view.
//!
//! Every function takes the records it needs as borrowed slices and returns
//! fresh values; nothing here holds state between calls.

pub mod aggregate;
pub mod classify;
pub mod insights;
pub mod metrics;
