//! Market feed boundary.
//!
//! The engine consumes one validated snapshot per tracked symbol per tick.
//! Retrieval is synchronous: feeds hand over already-materialized
//! snapshots, so no tick step can block on I/O.

mod synthetic;

pub use synthetic::SyntheticFeed;

use anyhow::Result;

use crate::models::MarketSnapshot;

/// Source of per-tick market snapshots.
///
/// Implementations must reject malformed snapshots (see
/// [`MarketSnapshot::validate`]) before returning them; the engine assumes
/// validated input.
pub trait MarketFeed: Send {
    /// Produce the next snapshot for every tracked symbol.
    fn next_tick(&mut self) -> Result<Vec<MarketSnapshot>>;
}
