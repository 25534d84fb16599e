//! News sentiment reduction.
//!
//! Turns per-article tone scores into labelled observations and collapses a
//! company's observation history into the single score the prediction join
//! consumes.

pub mod aggregate;
pub mod scoring;
pub mod summary;

pub use aggregate::{aggregate, SentimentByCompany};
pub use scoring::{score_article, ArticleScore, SentimentLabel, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};
pub use summary::{summarize, SentimentSummary};
