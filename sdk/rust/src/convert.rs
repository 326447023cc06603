//! Raw span to canonical span conversion
//!
//! A [`RawSpan`] is what a tracer hands over once a span ends: binary ids,
//! wall-clock instants, typed attributes plus the attributes of the resource
//! that produced it. [`convert_span`] flattens it into a [`Span`]:
//!
//! - ids become lowercase hex, an invalid parent id becomes `""`
//! - `timestamp` is the start time in whole milliseconds since the epoch
//! - `duration` is `end - start` in whole milliseconds (may be negative)
//! - tags hold span attributes, then resource attributes on top

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use opentelemetry::trace::{SpanId, TraceId};
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SpanData;
use serde::Deserialize;

use crate::attributes::normalize_key_value;
use crate::span::{Span, Tags};

/// Finished span as produced by a tracer.
#[derive(Debug, Clone)]
pub struct RawSpan {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    /// `SpanId::INVALID` for root spans
    pub parent_span_id: SpanId,
    pub name: String,
    pub start_time: SystemTime,
    pub end_time: SystemTime,
    pub attributes: Vec<KeyValue>,
    pub resource_attributes: Vec<KeyValue>,
}

impl RawSpan {
    /// Capture an OpenTelemetry SDK span together with its resource.
    pub fn from_span_data(data: SpanData, resource: &Resource) -> Self {
        Self {
            trace_id: data.span_context.trace_id(),
            span_id: data.span_context.span_id(),
            parent_span_id: data.parent_span_id,
            name: data.name.into_owned(),
            start_time: data.start_time,
            end_time: data.end_time,
            attributes: data.attributes,
            resource_attributes: resource
                .iter()
                .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Batch filtering options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Spans whose name starts with this prefix are dropped from batches
    pub exclude_name_prefix: Option<String>,
}

impl ConvertConfig {
    pub fn with_exclude_prefix(prefix: impl Into<String>) -> Self {
        Self {
            exclude_name_prefix: Some(prefix.into()),
        }
    }
}

/// Converts raw spans, applying the batch filter.
#[derive(Debug, Clone, Default)]
pub struct SpanConverter {
    config: ConvertConfig,
}

impl SpanConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Convert a single span. Filtering does not apply here.
    pub fn convert(&self, raw: &RawSpan) -> Span {
        convert_span(raw)
    }

    /// Convert a batch, dropping excluded spans and keeping input order.
    pub fn convert_batch(&self, raw: &[RawSpan]) -> Vec<Span> {
        raw.iter()
            .filter(|s| !self.is_excluded(&s.name))
            .map(convert_span)
            .collect()
    }

    fn is_excluded(&self, name: &str) -> bool {
        match self.config.exclude_name_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => name.starts_with(prefix),
            _ => false,
        }
    }
}

/// Flatten a raw span into its canonical shape.
pub fn convert_span(raw: &RawSpan) -> Span {
    let mut tags = Tags::with_capacity(raw.attributes.len() + raw.resource_attributes.len());
    for kv in raw.attributes.iter().chain(raw.resource_attributes.iter()) {
        let (key, value) = normalize_key_value(kv);
        tags.insert(key, value);
    }

    let parent_span_id = if raw.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        raw.parent_span_id.to_string()
    };

    Span {
        trace_id: raw.trace_id.to_string(),
        span_id: raw.span_id.to_string(),
        parent_span_id,
        name: raw.name.clone(),
        timestamp: millis_since_epoch(raw.start_time),
        duration: signed_millis_between(raw.start_time, raw.end_time),
        tags,
    }
}

fn millis_since_epoch(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => duration_millis(d),
        Err(e) => -duration_millis(e.duration()),
    }
}

fn signed_millis_between(start: SystemTime, end: SystemTime) -> i64 {
    match end.duration_since(start) {
        Ok(d) => duration_millis(d),
        Err(e) => -duration_millis(e.duration()),
    }
}

fn duration_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
