//! FamilyWallet Core - the ledger behind the family finance app.
//!
//! Holds the confirmed expense, goal and portfolio records of a session,
//! applies remote confirmations to them through a single mutation applier,
//! and derives budget usage, goal progress and portfolio valuation from
//! what is held. Record services are traits; [`gateway`] provides an
//! in-memory implementation.

pub mod aggregates;
pub mod budget;
pub mod constants;
pub mod errors;
pub mod events;
pub mod expenses;
pub mod gateway;
pub mod goals;
pub mod ledger;
pub mod portfolio;
pub mod records;
pub mod settings;

#[cfg(test)]
mod test_fixtures;

pub use ledger::{LedgerService, LedgerSnapshot, Mutation, MutationApplier};
pub use records::{RecordKind, RecordStore};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
