//! Data-normalization and state-reconciliation core for a KYC review
//! console, plus the HTTP/CLI surfaces around it. Field extraction itself is
//! delegated to an external multimodal inference service behind the traits
//! in [`extraction`]; this crate shapes, reconciles, and formats the
//! structured results.

pub mod config;
pub mod error;
pub mod extraction;
pub mod review;
pub mod server;
pub mod taxonomy;
pub mod telemetry;
