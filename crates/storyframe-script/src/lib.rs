//! Storyframe Script — turns raw screenplay or prose text into ordered,
//! timed scenes and beats.
//!
//! Responsible for normalization, scene segmentation, beat extraction and
//! duration estimates. Entity tracking happens downstream.

pub mod application;
pub mod domain;
