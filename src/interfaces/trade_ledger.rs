// ============================================================================
// Trade Ledger Interface
// Append-only storage contract for executed trades
// ============================================================================

use crate::domain::Trade;
use crate::error::MatchResult;

/// Append-only trade log.
///
/// Trades are kept in creation order and are never mutated or deleted. The
/// ledger owns trade numbering: `append_all` stamps each trade with its
/// sequence under the ledger's own lock, so several engines may share one
/// ledger and the sequence stays dense.
pub trait TradeLedger: Send + Sync {
    /// Number `trades` from the ledger head and append them; either all of
    /// them are stored or none are. On success each trade carries the
    /// sequence it was stored under.
    ///
    /// Storage failures surface as `MatchError::StoreUnavailable`.
    fn append_all(&self, trades: &mut [Trade]) -> MatchResult<()>;

    /// All trades whose sequence is `>= cursor`, oldest first
    fn list_since(&self, cursor: u64) -> Vec<Trade>;

    /// Sequence the next appended trade will carry
    fn next_sequence(&self) -> u64;

    fn append(&self, mut trade: Trade) -> MatchResult<Trade> {
        self.append_all(std::slice::from_mut(&mut trade))?;
        Ok(trade)
    }

    fn len(&self) -> usize {
        self.next_sequence() as usize
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
