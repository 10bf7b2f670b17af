//! External system integrations for esmigrate.
//!
//! This module provides adapters for the two clusters a migration talks to:
//!
//! - [`source`] - Scroll reader for the source cluster
//! - [`destination`] - Bulk writer for the destination cluster
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the HTTP transport and
//! enable testing with scripted implementations. The migration core holds
//! `Arc<dyn SourceReader>` and `Arc<dyn DestinationWriter>` and never sees
//! reqwest types; transport failures surface as
//! [`ClusterError`](crate::domain::ClusterError).
//!
//! ```rust,no_run
//! use esmigrate::adapters::destination::ElasticsearchDestination;
//! use esmigrate::adapters::source::ElasticsearchSource;
//! use esmigrate::config::ClusterConfig;
//! use esmigrate::domain::ClusterVersion;
//!
//! # fn example() -> esmigrate::domain::Result<()> {
//! let source = ElasticsearchSource::new(&ClusterConfig {
//!     host: "http://old-cluster:9200".to_string(),
//!     version: ClusterVersion::new(2, 3),
//!     ..Default::default()
//! })?;
//! let destination = ElasticsearchDestination::new(&ClusterConfig {
//!     host: "http://new-cluster:9200".to_string(),
//!     version: ClusterVersion::new(7, 17),
//!     ..Default::default()
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod destination;
pub(crate) mod http;
pub mod source;
