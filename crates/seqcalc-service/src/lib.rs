//! # seqcalc-service
//!
//! Request coordination on top of the engine and cache: per-request
//! limits, batch fan-out, contiguous range derivation, and the named
//! definition registry consumed by external callers.

pub mod config;
pub mod coordinator;
pub mod registry;

// Re-exports
pub use config::ServiceConfig;
pub use coordinator::Coordinator;
pub use registry::DefinitionRegistry;
