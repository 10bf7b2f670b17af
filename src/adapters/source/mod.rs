//! Source cluster adapter
//!
//! Opens a scroll over the configured index and hands back one page per
//! call. [`SourceReader`] is the seam the migration core depends on;
//! [`ElasticsearchSource`] is the HTTP implementation.

pub mod elasticsearch;
pub mod models;
pub mod traits;

pub use elasticsearch::ElasticsearchSource;
pub use traits::{ScanRequest, ScanStep, SourceReader};
