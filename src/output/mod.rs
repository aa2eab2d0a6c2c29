//! Output module
//!
//! Exports listed items to files.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Flattening items into an Arrow RecordBatch of text columns
//! - Writing JSON, CSV and Parquet exports
//! - Writing posts as HTML pages with author, category and tag names

mod html;
mod table;
mod writer;

pub use html::{export_posts_html, References};
pub use table::{export_columns, items_to_batch};
pub use writer::{export_items, write_parquet, ExportFormat};
