//! Storyframe Core — shared domain abstractions.
//!
//! This crate defines the request/response model, the closed setting
//! variants, the error taxonomy and the capability traits that every
//! pipeline stage depends on. It contains no heuristics and no I/O.

pub mod command;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod settings;
pub mod storyboard;
