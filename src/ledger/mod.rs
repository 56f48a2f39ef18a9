// ============================================================================
// Trade Ledger Module
// Storage backends implementing `TradeLedger`
// ============================================================================

mod in_memory;

pub use in_memory::InMemoryTradeLedger;
