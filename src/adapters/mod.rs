//! Adapters Layer
//!
//! Outbound implementations of the `Upstream` port, one per kind of
//! upstream system.

pub mod outbound;
