//! CLI command implementations.

pub mod participants;
pub mod report;
pub mod stats;
pub mod util;
pub mod wordcloud;
