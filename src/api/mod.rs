//! API layer - transport client, failure normalization and wire models.

pub mod client;
pub mod models;
pub mod normalizer;
