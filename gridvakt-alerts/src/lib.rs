//! # Gridvakt Alert Lifecycle
//!
//! Stateful alert management: converts propagation reports into a
//! de-duplicated, time-bounded alert set and emits lifecycle events
//! (raised, renewed, expired, cleared) to a pluggable sink.
//!
//! State machine per alert key:
//! `ABSENT -> ACTIVE -> (renewed | EXPIRED | CLEARED) -> ABSENT`
//!
//! WARNING alerts self-expire after a grace period unless renewed; a
//! renewal racing a pending expiry always wins. CRITICAL alerts never
//! expire on their own and only clear when their condition stops matching.

mod alert;
mod manager;
mod sink;

pub use alert::{Alert, AlertEvent, AlertKey, AlertRule};
pub use manager::{AlertManager, DEFAULT_GRACE};
pub use sink::{AlertSink, ChannelSink, MemorySink, TracingSink};
