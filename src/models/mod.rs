//! Core data types for the proxy pipeline.
//!
//! Everything here is created fresh per request and discarded when the
//! response completes; nothing is shared or cached across requests.

pub mod attrs;
pub mod delivery;
