//! Domain layer for script decomposition.

pub mod beats;
pub mod document;
pub mod lexicon;
pub mod normalizer;
pub mod segmenter;
pub mod text;
pub mod timing;
