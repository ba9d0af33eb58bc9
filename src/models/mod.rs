//! Request-scoped data produced by the provider clients.

pub mod location;
pub mod review;

pub use location::LocationRecord;
pub use review::ReviewAnalysis;
