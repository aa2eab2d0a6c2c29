//! Flattening items into Arrow record batches
//!
//! Every column is a nullable `Utf8` array. Built-in collection types use
//! their fixed export columns; namespace routes use the union of the
//! top-level keys of the exported items, in first-seen order.

use crate::error::Result;
use crate::types::{CollectionType, Item, JsonValue};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Column headers and the JSON pointers their values are read from
pub fn export_columns(collection: &CollectionType, items: &[Item]) -> Vec<(String, String)> {
    let spec = collection.spec();
    if !spec.export_columns.is_empty() {
        return spec
            .export_columns
            .iter()
            .map(|(header, pointer)| ((*header).to_string(), (*pointer).to_string()))
            .collect();
    }

    let mut columns: Vec<(String, String)> = Vec::new();
    for key in items
        .iter()
        .filter_map(JsonValue::as_object)
        .flat_map(|object| object.keys())
    {
        if !columns.iter().any(|(header, _)| header == key) {
            columns.push((key.clone(), pointer_for_key(key)));
        }
    }
    columns
}

/// Build a record batch with one row per item
pub fn items_to_batch(collection: &CollectionType, items: &[Item]) -> Result<RecordBatch> {
    let columns = export_columns(collection, items);

    let fields: Vec<Field> = columns
        .iter()
        .map(|(header, _)| Field::new(header, DataType::Utf8, true))
        .collect();

    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|(_, pointer)| {
            let values: Vec<Option<String>> = items
                .iter()
                .map(|item| item.pointer(pointer).and_then(cell_text))
                .collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(items.len()));
    let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
    Ok(batch)
}

/// Text of one cell. Strings are unquoted, null is empty, the rest is JSON.
fn cell_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// JSON pointer for a top-level key (RFC 6901 escaping)
fn pointer_for_key(key: &str) -> String {
    format!("/{}", key.replace('~', "~0").replace('/', "~1"))
}
