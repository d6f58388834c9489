//! Adapters: concrete implementations of the outbound ports plus the
//! inbound HTTP surface.

pub mod evaluation;
pub mod generation;
pub mod http;
pub mod memory;
pub mod postgres;
