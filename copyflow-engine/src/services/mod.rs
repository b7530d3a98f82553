//! Engine services
//!
//! The artifact managers own the upload write paths; enrichment runs
//! detached behind the SEO manager; review transitions and aggregate reads
//! live in the review manager.

pub mod content_manager;
pub mod enrichment;
pub mod metrics_client;
pub mod review_manager;
pub mod seo_manager;
