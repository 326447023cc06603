//! SQLite schema definitions

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Traces (one row per external trace id)
-- =============================================================================
CREATE TABLE IF NOT EXISTS traces (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    trace_id TEXT NOT NULL UNIQUE CHECK(length(trace_id) >= 1),
    timestamp INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_traces_trace_id ON traces(trace_id);

-- =============================================================================
-- 2. Spans (references traces by surrogate id)
-- =============================================================================
CREATE TABLE IF NOT EXISTS spans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    trace_id INTEGER NOT NULL REFERENCES traces(id),
    span_id TEXT NOT NULL,
    parent_id TEXT,
    name TEXT NOT NULL,
    duration INTEGER NOT NULL,
    timestamp INTEGER NOT NULL,
    tags TEXT CHECK(tags IS NULL OR json_valid(tags))
);

CREATE INDEX IF NOT EXISTS idx_spans_trace_id ON spans(trace_id);
CREATE INDEX IF NOT EXISTS idx_spans_parent_id ON spans(parent_id);
CREATE INDEX IF NOT EXISTS idx_spans_trace_order ON spans(trace_id, timestamp, id);
"#;
