//! Domain logic for the code bug finder.
//!
//! Everything here is independent of HTTP and of the database: preference
//! lookup, prompt construction, model-reply normalization and the analysis
//! orchestrator that ties them to an injected [`analysis::ModelClient`].

pub mod analysis;
pub mod error;
pub mod finding;
pub mod history;
pub mod normalize;
pub mod preference;
pub mod prompt;
pub mod types;
