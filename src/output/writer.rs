//! Export file writers
//!
//! JSON exports keep the items untouched; CSV and Parquet exports go
//! through the text record batch built by `items_to_batch`. HTML exports
//! write a folder with one page per post.

use super::html::{export_posts_html, References};
use super::table::items_to_batch;
use crate::error::{Error, Result};
use crate::types::{CollectionType, Item};
use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Pretty-printed JSON array of the raw items
    #[default]
    Json,
    /// Comma-separated values with a header row
    Csv,
    /// Snappy-compressed Parquet
    Parquet,
    /// A folder of HTML pages, one per post or page
    Html,
}

impl ExportFormat {
    /// Guess the format from a file extension. HTML exports are folders and
    /// are never guessed.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .filter(|format| *format != Self::Html)
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "parquet" | "pq" => Ok(Self::Parquet),
            "html" | "htm" => Ok(Self::Html),
            other => Err(Error::output(format!(
                "Unknown export format '{other}' (expected json, csv, parquet or html)"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Parquet => "parquet",
            Self::Html => "html",
        };
        f.write_str(name)
    }
}

/// Export items of a collection to a file. Returns the number of rows written.
///
/// `refs` names authors, categories and tags in HTML exports.
pub fn export_items(
    collection: &CollectionType,
    items: &[Item],
    format: ExportFormat,
    path: impl AsRef<Path>,
    refs: &References<'_>,
) -> Result<usize> {
    let path = path.as_ref();
    let rows = match format {
        ExportFormat::Json => {
            let mut out = create(path)?;
            serde_json::to_writer_pretty(&mut out, items)?;
            out.flush()?;
            items.len()
        }
        ExportFormat::Csv => {
            let batch = items_to_batch(collection, items)?;
            let mut writer = WriterBuilder::new().with_header(true).build(create(path)?);
            writer.write(&batch)?;
            batch.num_rows()
        }
        ExportFormat::Parquet => {
            let batch = items_to_batch(collection, items)?;
            write_parquet(path, &batch)?
        }
        ExportFormat::Html => match collection {
            CollectionType::Posts | CollectionType::Pages => export_posts_html(items, path, refs)?,
            other => {
                return Err(Error::output(format!(
                    "HTML export is only available for posts and pages, not {other}"
                )));
            }
        },
    };

    info!(
        "Exported {rows} {collection} to {} ({format})",
        path.display()
    );
    Ok(rows)
}

/// Write a single RecordBatch to a Parquet file
pub fn write_parquet(path: impl AsRef<Path>, batch: &RecordBatch) -> Result<usize> {
    let file = File::create(path.as_ref())
        .map_err(|e| Error::output(format!("Failed to create file: {e}")))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;

    writer
        .write(batch)
        .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;
    writer
        .close()
        .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;
    Ok(batch.num_rows())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        Error::output(format!("Failed to create file '{}': {e}", path.display()))
    })?;
    Ok(BufWriter::new(file))
}
