//! Page transformer
//!
//! Repacks source records into bulk index actions. The destination index,
//! type and id are taken from the record itself and the body is passed
//! through untouched.

use crate::domain::{ActionMetadata, SourcePage, SourceRecord, WriteActionPair};

/// Build the action pair for one record
///
/// `parent` is set only when the record carries a parent reference.
pub fn transform_record(record: SourceRecord) -> WriteActionPair {
    WriteActionPair {
        action: ActionMetadata {
            index: record.index,
            doc_type: record.doc_type,
            id: record.id,
            parent: record.parent,
        },
        body: record.source,
    }
}

/// Convert a page into action pairs, one per record, in page order
///
/// Records are neither reordered nor deduplicated, and malformed bodies are
/// left for the destination to reject.
///
/// # Examples
///
/// ```
/// use esmigrate::core::transform::transform_page;
/// use esmigrate::domain::{SourcePage, SourceRecord};
/// use serde_json::json;
///
/// let page = SourcePage::new(
///     vec![
///         SourceRecord::new("shop", "1", json!({"name": "lamp"})).with_type("product"),
///         SourceRecord::new("shop", "2", json!({"sku": "L-1"}))
///             .with_type("variant")
///             .with_parent("1"),
///     ],
///     2,
/// );
///
/// let pairs = transform_page(page);
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[1].action.parent.as_deref(), Some("1"));
/// ```
pub fn transform_page(page: SourcePage) -> Vec<WriteActionPair> {
    page.records.into_iter().map(transform_record).collect()
}
