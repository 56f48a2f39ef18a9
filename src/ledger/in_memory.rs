// ============================================================================
// In-Memory Trade Ledger
// ============================================================================

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::domain::Trade;
use crate::error::{MatchError, MatchResult};
use crate::interfaces::TradeLedger;

/// Trade ledger backed by a vector under a read/write lock.
///
/// A trade's sequence equals its index, so `list_since` is a slice copy.
/// Sequences are assigned under the write lock, so any number of engines
/// may append concurrently.
#[derive(Default)]
pub struct InMemoryTradeLedger {
    trades: RwLock<Vec<Trade>>,
}

impl InMemoryTradeLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TradeLedger for InMemoryTradeLedger {
    fn append_all(&self, batch: &mut [Trade]) -> MatchResult<()> {
        if let Some(trade) = batch.iter().find(|t| t.quantity <= Decimal::ZERO) {
            return Err(MatchError::InvalidRequest(format!(
                "trade {} has non-positive quantity {}",
                trade.id, trade.quantity
            )));
        }

        let mut trades = self.trades.write();
        let head = trades.len() as u64;
        for (offset, trade) in batch.iter_mut().enumerate() {
            trade.sequence = head + offset as u64;
        }

        trades.extend_from_slice(batch);
        Ok(())
    }

    fn list_since(&self, cursor: u64) -> Vec<Trade> {
        let trades = self.trades.read();
        let start = usize::try_from(cursor).unwrap_or(usize::MAX).min(trades.len());
        trades[start..].to_vec()
    }

    fn next_sequence(&self) -> u64 {
        self.trades.read().len() as u64
    }

    fn len(&self) -> usize {
        self.trades.read().len()
    }
}
