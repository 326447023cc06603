//! # tracekeep
//!
//! Client side of the **tracekeep** trace store.
//!
//! Finished OpenTelemetry spans are normalized into a flat, storage-friendly
//! [`Span`] record and shipped in batches to a tracekeep server:
//!
//! ```text
//! RawSpan ──▶ SpanConverter ──▶ Span ──▶ BatchExporter ──▶ POST /api/v2/spans
//! ```
//!
//! - [`attributes`] - typed attribute values and their string rendering
//! - [`convert`] - raw span to canonical [`Span`] conversion and filtering
//! - [`exporter`] - JSON batch delivery over HTTP
//! - [`span`] - the canonical wire model shared with the server
//!
//! ## Example
//!
//! ```no_run
//! use tracekeep::{BatchExporter, ExporterConfig};
//!
//! # async fn run(spans: Vec<tracekeep::RawSpan>) -> Result<(), tracekeep::ExportError> {
//! let exporter = BatchExporter::new(ExporterConfig::new("http://localhost:5390/api/v2/spans"))?;
//! exporter.export_raw(&spans).await?;
//! exporter.shutdown().await
//! # }
//! ```

pub mod attributes;
pub mod convert;
pub mod error;
pub mod exporter;
pub mod span;

pub use attributes::{AttributeValue, normalize, normalize_key_value};
pub use convert::{ConvertConfig, RawSpan, SpanConverter, convert_span};
pub use error::ExportError;
pub use exporter::{BatchExporter, ExporterConfig};
pub use span::{Span, Tags};
