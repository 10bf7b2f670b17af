//! Destination cluster adapter
//!
//! [`DestinationWriter`] receives one bulk request per non-empty page.
//! [`ElasticsearchDestination`] sends it over HTTP; [`DryRunDestination`]
//! only logs what would have been written.

pub mod dry_run;
pub mod elasticsearch;
pub mod models;
pub mod traits;

pub use dry_run::DryRunDestination;
pub use elasticsearch::ElasticsearchDestination;
pub use traits::{BulkItemOutcome, BulkWriteResult, DestinationWriter};
