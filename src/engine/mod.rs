// ============================================================================
// Engine Module
// Contains the core matching engine business logic
// ============================================================================

mod matching_engine;
mod price_time;
mod sequencer;

pub mod factory;

pub use factory::{create_from_config, create_with_ledger, MatchingEngineBuilder};
pub use matching_engine::{MatchOutcome, MatchingEngine};
pub use price_time::{MatchPass, PriceTimePriority};
pub use sequencer::{Sequencer, SequencerHandle, Ticket};
