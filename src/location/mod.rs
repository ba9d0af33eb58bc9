//! Mapping provider client: geocoding, reverse geocoding and place search.
//!
//! Place search can be access-restricted on some provider tiers. When that
//! happens the client degrades to forward geocoding instead of failing.

mod client;
mod policy;
mod response;

pub use client::LocationClient;
pub use policy::{AccessRestrictedPolicy, DegradePolicy};
