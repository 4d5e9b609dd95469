//! Storyframe Pipeline — end-to-end storyboard generation.
//!
//! Responsible for running the stages in order (normalize, segment, extract
//! beats, track continuity, compose, enrich, audit, assemble) for a single
//! request.

pub mod application;
pub mod domain;
