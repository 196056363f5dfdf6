//! # gridvakt-core
//!
//! Foundation layer for the cascading-risk engine: the immutable topology
//! store, the latest-reading cache, telemetry event types, the pull-based
//! telemetry channel, and the virtual clock used by deterministic feeds.
//!
//! ### Key Submodules:
//! - `topology`: node/supply-edge graph, validated once at load
//! - `readings`: per-(node, metric) latest-reading cache with tick snapshots
//! - `events`: wire-level telemetry events and decoding
//! - `channel`: bounded batch channel with explicit ready acknowledgment
//! - `time`: seedable virtual clock for simulation feeds

pub mod channel;
pub mod events;
pub mod readings;
pub mod time;
pub mod topology;

pub mod prelude {
    pub use crate::channel::*;
    pub use crate::events::*;
    pub use crate::readings::*;
    pub use crate::time::*;
    pub use crate::topology::*;
}
