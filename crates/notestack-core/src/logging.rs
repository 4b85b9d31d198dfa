//! Structured logging conventions for notestack.
//!
//! Events are emitted with `tracing` using the literal field names below, so
//! log aggregation can query the same keys across crates.
//!
//! ## Fields
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | Originating subsystem: `api`, `auth`, `db` |
//! | `component` | Part of the subsystem, e.g. `pool`, `middleware`, `ownership`, `notes` |
//! | `op` | Logical operation name |
//! | `username` | Authenticated or requested username |
//! | `note_id` / `tag_id` | Entity being operated on |
//! | `duration_ms` | Wall-clock duration in milliseconds |
//! | `result_count` | Rows returned by a list or search |
//! | `pool_size` / `pool_idle` | Postgres pool occupancy |
//! | `error` | Display form of the failure |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), account events |
//! | DEBUG | Decision points: auth rejections, ownership denials |
//! | TRACE | Per-row iteration |
