//! Data transformation logic
//!
//! Migration is structural only: each source record becomes action metadata
//! paired with its unmodified body. See [`page`].

pub mod page;

pub use page::{transform_page, transform_record};
