//! Oracle and clock adapters for sessions.
//!
//! Oracles are shared read-only content, so they live behind `Arc` and can be
//! handed to many sessions at once.

use std::sync::Arc;
use std::time::Instant;

use battle_core::{Clock, ItemCatalog, ItemOracle, PcgRng, RngOracle};

/// Static collaborators a session needs besides the battle itself.
#[derive(Clone)]
pub struct OracleBundle {
    pub items: Arc<dyn ItemOracle>,
    pub rng: Arc<dyn RngOracle>,
}

impl OracleBundle {
    pub fn new(items: Arc<dyn ItemOracle>, rng: Arc<dyn RngOracle>) -> Self {
        Self { items, rng }
    }

    /// Catalog-backed items with the deterministic PCG oracle.
    pub fn from_catalog(items: ItemCatalog) -> Self {
        Self::new(Arc::new(items), Arc::new(PcgRng))
    }
}

/// Reads tokio's clock, so paused test time also drives the item cooldown.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}
