//! Enrichment backends.

pub mod chat_completion;
