//! Sales Trainer - Conversational Sales Training Backend
//!
//! This crate implements a role-play training loop where trainees pitch a
//! product to AI customer personas of increasing difficulty, with conviction
//! scoring driving level progression.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
