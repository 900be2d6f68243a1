//! Platform-agnostic logic: the reshaping pipeline, filters, aggregation, and session state.

pub mod aggregate;
pub mod filters;
pub mod format;
pub mod loader;
pub mod pipeline;
pub mod platform;
pub mod session;
