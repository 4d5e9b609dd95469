//! Storyframe Prompt — turns tracked beats into deterministic image prompts.
//!
//! Responsible for the lighting, mood, camera and style rule tables, prompt
//! composition per beat, and optional bounded enrichment through an
//! external text backend.

pub mod application;
pub mod domain;
pub mod infrastructure;
